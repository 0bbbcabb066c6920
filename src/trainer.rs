//! # Training Loop
//!
//! Drives episodes against an [`Environment`], feeding the agent augmented
//! states built by a [`StateEncoder`], decaying epsilon once per episode and
//! stopping early once the trailing mean score reaches the solved threshold.
//!
//! ```rust,no_run
//! use navigator::builders::DqnAgentBuilder;
//! use navigator::config::TrainerConfig;
//! use navigator::environment::Environment;
//! use navigator::trainer::Trainer;
//!
//! fn run<E: Environment>(env: &mut E) -> navigator::error::Result<()> {
//!     let mut agent = DqnAgentBuilder::new()
//!         .state_size(2 * (env.state_size() + 1 + env.action_size()))
//!         .action_size(env.action_size())
//!         .build()?;
//!     let mut trainer = Trainer::new(TrainerConfig::default())?;
//!     let report = trainer.train(env, &mut agent)?;
//!     println!("solved at {:?}", report.solved_episode);
//!     Ok(())
//! }
//! ```

use std::io::{self, Write};
use std::path::PathBuf;

use log::{debug, info, warn};

use crate::agent::Agent;
use crate::config::TrainerConfig;
use crate::environment::Environment;
use crate::error::{NavigatorError, Result};
use crate::metrics::ScoreTracker;
use crate::state_window::StateEncoder;

/// Multiplicatively decaying exploration rate with a floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpsilonSchedule {
    start: f32,
    end: f32,
    decay: f32,
    value: f32,
}

impl EpsilonSchedule {
    pub fn new(start: f32, end: f32, decay: f32) -> Self {
        EpsilonSchedule { start, end, decay, value: start }
    }

    pub fn from_config(config: &TrainerConfig) -> Self {
        Self::new(config.eps_start, config.eps_end, config.eps_decay)
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Apply one episode's decay: `ε = max(end, decay · ε)`.
    pub fn decay(&mut self) -> f32 {
        self.value = (self.decay * self.value).max(self.end);
        self.value
    }

    pub fn reset(&mut self) {
        self.value = self.start;
    }
}

/// Writes the per-episode status line.
///
/// Every episode overwrites the current terminal line; every
/// `report_every`-th episode also ends it with a newline so it stays visible.
pub struct ProgressReporter<W: Write> {
    out: W,
    report_every: usize,
}

impl<W: Write> ProgressReporter<W> {
    pub fn new(out: W, report_every: usize) -> Self {
        ProgressReporter { out, report_every: report_every.max(1) }
    }

    pub fn episode(&mut self, episode: usize, average: f32, score: f32) -> io::Result<()> {
        let line = format!(
            "Episode {}\tAverage Score: {:.2}\tActual Score:{:.2}",
            episode, average, score
        );
        write!(self.out, "\r{}", line)?;
        if episode % self.report_every == 0 {
            writeln!(self.out, "\r{}", line)?;
        }
        self.out.flush()
    }

    pub fn solved(&mut self, episodes: usize, average: f32, score: f32) -> io::Result<()> {
        writeln!(
            self.out,
            "\nEnvironment solved in {} episodes!\tAverage Score: {:.2}\tActual Score:{:.2}",
            episodes, average, score
        )?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Result of a single episode.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeOutcome {
    pub score: f32,
    pub steps: usize,
    /// Mean loss over the learning updates that ran, if any did.
    pub mean_loss: Option<f32>,
}

/// Summary of a [`Trainer::train`] run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub scores: Vec<f32>,
    /// 1-based episode at which the solved threshold was reached.
    pub solved_episode: Option<usize>,
    /// Where the solved checkpoint was written.
    pub checkpoint: Option<PathBuf>,
    pub final_epsilon: f32,
    pub mean_losses: Vec<Option<f32>>,
}

pub struct Trainer<W: Write = io::Stdout> {
    config: TrainerConfig,
    epsilon: EpsilonSchedule,
    scores: ScoreTracker,
    reporter: ProgressReporter<W>,
}

impl Trainer<io::Stdout> {
    /// Trainer reporting progress on stdout.
    pub fn new(config: TrainerConfig) -> Result<Self> {
        Self::with_writer(config, io::stdout())
    }
}

impl<W: Write> Trainer<W> {
    pub fn with_writer(config: TrainerConfig, out: W) -> Result<Self> {
        config.validate()?;
        Ok(Trainer {
            epsilon: EpsilonSchedule::from_config(&config),
            scores: ScoreTracker::new(config.score_window),
            reporter: ProgressReporter::new(out, config.report_every),
            config,
        })
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon.value()
    }

    pub fn scores(&self) -> &ScoreTracker {
        &self.scores
    }

    pub fn into_writer(self) -> W {
        self.reporter.into_inner()
    }

    /// Train `agent` on `env` until solved or `n_episodes` run out.
    ///
    /// Every call is a fresh run: epsilon restarts at `eps_start` and the
    /// score history starts empty.
    pub fn train<E, A>(&mut self, env: &mut E, agent: &mut A) -> Result<TrainingReport>
    where
        E: Environment,
        A: Agent,
    {
        let mut encoder = self.encoder_for(env, agent)?;
        self.epsilon.reset();
        self.scores = ScoreTracker::new(self.config.score_window);
        info!(
            "training for up to {} episodes: state size {} = {} frame(s) of {}",
            self.config.n_episodes,
            encoder.state_size(),
            encoder.history_frames(),
            encoder.frame_size()
        );

        let mut mean_losses = Vec::new();
        let mut solved_episode = None;
        let mut checkpoint = None;

        for episode in 1..=self.config.n_episodes {
            let epsilon = self.epsilon.value();
            let outcome = self.run_episode(env, agent, &mut encoder, epsilon, true)?;
            mean_losses.push(outcome.mean_loss);

            self.scores.record(outcome.score);
            let next_epsilon = self.epsilon.decay();
            let average = self.scores.trailing_mean();

            self.reporter.episode(episode, average, outcome.score)?;
            debug!(
                "episode {}: score {:.2}, steps {}, avg {:.2}, eps {:.4}, loss {:?}",
                episode, outcome.score, outcome.steps, average, next_epsilon, outcome.mean_loss
            );

            if average >= self.config.solved_threshold {
                let path = self
                    .config
                    .checkpoint_dir
                    .join(format!("{:.2}_checkpoint.bin", average));
                agent.save_checkpoint(&path)?;

                let solved_in = episode.saturating_sub(self.config.score_window);
                self.reporter.solved(solved_in, average, outcome.score)?;
                info!(
                    "solved after {} episodes (avg {:.2}), checkpoint written to {}",
                    episode,
                    average,
                    path.display()
                );

                solved_episode = Some(episode);
                checkpoint = Some(path);
                break;
            }
        }

        Ok(TrainingReport {
            scores: self.scores.scores().to_vec(),
            solved_episode,
            checkpoint,
            final_epsilon: self.epsilon.value(),
            mean_losses,
        })
    }

    /// Run greedy (ε = 0) episodes without storing transitions.
    pub fn evaluate<E, A>(&mut self, env: &mut E, agent: &mut A, episodes: usize) -> Result<Vec<f32>>
    where
        E: Environment,
        A: Agent,
    {
        let mut encoder = self.encoder_for(env, agent)?;
        let mut scores = Vec::with_capacity(episodes);
        for episode in 1..=episodes {
            let outcome = self.run_episode(env, agent, &mut encoder, 0.0, false)?;
            debug!("evaluation episode {}: score {:.2}", episode, outcome.score);
            scores.push(outcome.score);
        }
        Ok(scores)
    }

    /// Play one episode of at most `max_t` steps.
    ///
    /// With `learn` set, every transition is handed to `agent.step`.
    pub fn run_episode<E, A>(
        &mut self,
        env: &mut E,
        agent: &mut A,
        encoder: &mut StateEncoder,
        epsilon: f32,
        learn: bool,
    ) -> Result<EpisodeOutcome>
    where
        E: Environment,
        A: Agent,
    {
        let observation = env.reset(learn)?;
        encoder.begin_episode(observation.view())?;

        let mut score = 0.0;
        let mut steps = 0;
        let mut loss_sum = 0.0;
        let mut updates = 0usize;

        for _ in 0..self.config.max_t {
            let state = encoder.state();
            let action = agent.act(state.view(), epsilon)?;
            let result = env.step(action)?;
            encoder.record(result.observation.view(), result.reward, action)?;

            if learn {
                if let Some(loss) = agent.step(state, action, result.reward, encoder.state(), result.done)? {
                    loss_sum += loss;
                    updates += 1;
                }
            }

            score += result.reward;
            steps += 1;
            if result.done {
                break;
            }
        }

        Ok(EpisodeOutcome {
            score,
            steps,
            mean_loss: (updates > 0).then(|| loss_sum / updates as f32),
        })
    }

    fn encoder_for<E, A>(&self, env: &E, agent: &A) -> Result<StateEncoder>
    where
        E: Environment,
        A: Agent,
    {
        if agent.action_size() != env.action_size() {
            return Err(NavigatorError::dimension_mismatch(
                format!("{} actions", env.action_size()),
                format!("agent with {} actions", agent.action_size()),
            ));
        }
        let encoder = StateEncoder::new(env.state_size(), env.action_size(), agent.state_size())?;
        if encoder.state_size() % encoder.frame_size() != 0 {
            warn!(
                "state size {} is not a multiple of the frame size {}; the oldest frame is truncated",
                encoder.state_size(),
                encoder.frame_size()
            );
        }
        Ok(encoder)
    }
}
