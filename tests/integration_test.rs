use navigator::{
    builders::DqnAgentBuilder,
    approximator::QFunction,
    config::{Config, DqnConfig, NetworkConfig, TrainerConfig},
    environment::{Environment, StepResult},
    optimizer::OptimizerKind,
    trainer::Trainer,
    NavigatorError, Result,
};
use ndarray::{array, Array1};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A short corridor: action 1 moves right, action 0 moves left. Reaching the
/// right end pays 1 and ends the episode; every other step costs 0.01.
struct Corridor {
    length: usize,
    position: usize,
}

impl Corridor {
    fn new(length: usize) -> Self {
        Corridor { length, position: 0 }
    }

    fn observation(&self) -> Array1<f32> {
        array![self.position as f32 / self.length as f32, 1.0]
    }
}

impl Environment for Corridor {
    fn state_size(&self) -> usize {
        2
    }

    fn action_size(&self) -> usize {
        2
    }

    fn reset(&mut self, _train_mode: bool) -> Result<Array1<f32>> {
        self.position = 0;
        Ok(self.observation())
    }

    fn step(&mut self, action: usize) -> Result<StepResult> {
        match action {
            0 => self.position = self.position.saturating_sub(1),
            1 => self.position += 1,
            _ => return Err(NavigatorError::InvalidAction { action, max_actions: 2 }),
        }
        let done = self.position >= self.length;
        Ok(StepResult {
            observation: self.observation(),
            reward: if done { 1.0 } else { -0.01 },
            done,
        })
    }
}

fn config(checkpoint_dir: &std::path::Path) -> Config {
    Config {
        agent: DqnConfig {
            buffer_size: 500,
            batch_size: 16,
            warmup: 32,
            update_every: 2,
            learning_rate: 1e-3,
            tau: 1e-2,
            optimizer: OptimizerKind::default(),
            seed: Some(11),
            ..DqnConfig::default()
        },
        network: NetworkConfig { hidden_sizes: vec![32, 32], seed: Some(5) },
        trainer: TrainerConfig {
            n_episodes: 30,
            max_t: 40,
            eps_decay: 0.9,
            solved_threshold: 10.0,
            report_every: 10,
            checkpoint_dir: checkpoint_dir.to_path_buf(),
            ..TrainerConfig::default()
        },
    }
}

#[test]
fn test_end_to_end_training() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let mut env = Corridor::new(4);

    // Two frames of [obs (2) | reward | one-hot (2)]
    let mut agent = DqnAgentBuilder::new()
        .state_size(10)
        .action_size(env.action_size())
        .network(config.network.clone())
        .config(config.agent.clone())
        .build()
        .unwrap();
    let mut trainer = Trainer::with_writer(config.trainer.clone(), Vec::new()).unwrap();

    let report = trainer.train(&mut env, &mut agent).unwrap();

    // Rewards never add up to 10, so every episode runs
    assert_eq!(report.scores.len(), 30);
    assert_eq!(report.solved_episode, None);
    assert!(report.scores.iter().all(|s| s.is_finite() && *s <= 1.0));
    assert!(agent.learn_steps > 0);
    assert!(agent.memory.len() <= 500);
    assert!(report.mean_losses.iter().flatten().all(|l| l.is_finite() && *l >= 0.0));
    assert!(agent.local.parameters().iter().all(|(_, t)| t.iter().all(|v| v.is_finite())));

    let expected_epsilon = (0..30).fold(1.0f32, |eps, _| (0.9 * eps).max(0.005));
    assert_eq!(report.final_epsilon, expected_epsilon);

    let output = String::from_utf8(trainer.into_writer()).unwrap();
    assert!(output.contains("Episode 10\tAverage Score:"));
    assert!(output.contains("Episode 30\tAverage Score:"));
}

#[test]
fn test_evaluate_after_checkpoint_restore() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let mut env = Corridor::new(3);

    let build = || {
        DqnAgentBuilder::new()
            .state_size(10)
            .action_size(2)
            .network(config.network.clone())
            .config(config.agent.clone())
            .build()
            .unwrap()
    };

    let mut agent = build();
    let mut trainer = Trainer::with_writer(
        TrainerConfig { n_episodes: 5, ..config.trainer.clone() },
        Vec::new(),
    )
    .unwrap();
    trainer.train(&mut env, &mut agent).unwrap();

    let path = dir.path().join("trained.bin");
    agent.save(&path).unwrap();

    let mut restored = build();
    restored.load(&path).unwrap();
    assert_eq!(restored.local.parameters(), agent.local.parameters());

    // Greedy play is deterministic, so both agents score the same
    let original = trainer.evaluate(&mut env, &mut agent, 2).unwrap();
    let reloaded = trainer.evaluate(&mut env, &mut restored, 2).unwrap();
    assert_eq!(original, reloaded);
    assert!(restored.memory.is_empty());
}

#[test]
fn test_config_file_drives_training() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.json");
    config(dir.path()).to_json_file(&path).unwrap();

    let config = Config::from_json_file(&path).unwrap();
    assert_eq!(config.trainer.n_episodes, 30);
    assert_eq!(config.agent.seed, Some(11));
    assert_eq!(config.network.hidden_sizes, vec![32, 32]);
}
