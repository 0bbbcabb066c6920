use std::path::Path;

use log::{debug, trace};
use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::approximator::{soft_update, Parameters, QFunction};
use crate::config::DqnConfig;
use crate::error::{NavigatorError, Result};
use crate::network::QNetwork;
use crate::numerics::ensure_finite;
use crate::replay_buffer::{Batch, Experience, ReplayBuffer};
use super::traits::Agent;

/// Deep Q-Network agent with experience replay and a soft-updated target
/// network.
///
/// The local network selects actions and is trained every `update_every`
/// steps; the target network only moves toward the local one through
/// [`soft_update`], which keeps the bootstrapped TD targets stable.
///
/// # Example
///
/// ```rust
/// use navigator::builders::DqnAgentBuilder;
/// use navigator::config::DqnConfig;
/// use ndarray::array;
///
/// let mut agent = DqnAgentBuilder::new()
///     .state_size(4)
///     .action_size(2)
///     .hidden_sizes(&[16, 16])
///     .config(DqnConfig { batch_size: 2, warmup: 2, update_every: 1, seed: Some(0), ..DqnConfig::default() })
///     .network_seed(0)
///     .build()
///     .unwrap();
///
/// let state = array![0.1, -0.2, 0.3, -0.1];
/// let action = agent.act(state.view(), 0.0).unwrap();
/// let next_state = array![0.15, -0.25, 0.35, -0.05];
/// agent.step(state, action, 1.0, next_state, false).unwrap();
/// ```
pub struct DqnAgent<Q: QFunction = QNetwork> {
    /// Network used for action selection and trained every update
    pub local: Q,

    /// Network that produces the bootstrapped TD targets
    pub target: Q,

    pub memory: ReplayBuffer,

    pub config: DqnConfig,

    /// Calls to `step` so far
    t_step: usize,

    /// Learning updates performed so far
    pub learn_steps: usize,

    rng: StdRng,
}

impl<Q: QFunction> DqnAgent<Q> {
    /// Wrap `local` into an agent. The target starts as an exact copy.
    pub fn new(local: Q, config: DqnConfig) -> Result<Self> {
        config.validate()?;
        if local.output_size() == 0 {
            return Err(NavigatorError::invalid_parameter(
                "local".to_string(),
                "approximator must produce at least one action-value".to_string(),
            ));
        }

        let target = local.clone();
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(DqnAgent {
            local,
            target,
            memory: ReplayBuffer::new(config.buffer_size),
            config,
            t_step: 0,
            learn_steps: 0,
            rng,
        })
    }

    pub fn state_size(&self) -> usize {
        self.local.input_size()
    }

    pub fn action_size(&self) -> usize {
        self.local.output_size()
    }

    pub fn step_count(&self) -> usize {
        self.t_step
    }

    /// Epsilon-greedy action selection.
    ///
    /// With probability `epsilon` a uniformly random action, otherwise the
    /// greedy action of the local network. Ties go to the lowest index.
    pub fn act(&mut self, state: ArrayView1<f32>, epsilon: f32) -> Result<usize> {
        let num_actions = self.action_size();
        if self.rng.gen::<f32>() < epsilon {
            Ok(self.rng.gen_range(0..num_actions))
        } else {
            let q_values = self.local.forward_one(state)?;
            greedy_action(q_values.view())
        }
    }

    /// Store a transition and learn every `update_every` steps once the
    /// memory holds enough samples.
    pub fn step(
        &mut self,
        state: Array1<f32>,
        action: usize,
        reward: f32,
        next_state: Array1<f32>,
        done: bool,
    ) -> Result<Option<f32>> {
        if action >= self.action_size() {
            return Err(NavigatorError::InvalidAction {
                action,
                max_actions: self.action_size(),
            });
        }
        let state_size = self.state_size();
        if state.len() != state_size || next_state.len() != state_size {
            return Err(NavigatorError::dimension_mismatch(
                format!("states of length {}", state_size),
                format!("{} and {}", state.len(), next_state.len()),
            ));
        }

        self.memory.add(Experience { state, action, reward, next_state, done });
        self.t_step += 1;
        trace!("DqnAgent::step() t_step = {}, memory = {}", self.t_step, self.memory.len());

        if self.t_step % self.config.update_every == 0
            && self.memory.len() >= self.config.learning_threshold()
        {
            let batch = {
                let experiences = self.memory.sample(self.config.batch_size, &mut self.rng)?;
                Batch::from_experiences(&experiences)?
            };
            return self.learn(&batch).map(Some);
        }
        Ok(None)
    }

    /// One learning update on `batch`: TD targets from the target network,
    /// a gradient step on the local network, then a soft update.
    pub fn learn(&mut self, batch: &Batch) -> Result<f32> {
        let next_q_values = self.target.forward(batch.next_states.view())?;
        let targets = td_targets(
            next_q_values.view(),
            batch.rewards.view(),
            &batch.dones,
            self.config.gamma,
        )?;

        let loss = self.local.train_step(
            batch.states.view(),
            &batch.actions,
            targets.view(),
            self.config.learning_rate,
        )?;

        self.soft_update(self.config.tau)?;
        self.learn_steps += 1;
        debug!("learning update {}: loss = {:.6}", self.learn_steps, loss);

        Ok(loss)
    }

    /// Blend the target network toward the local one with rate `tau`.
    pub fn soft_update(&mut self, tau: f32) -> Result<()> {
        trace!("DqnAgent::soft_update(tau = {})", tau);
        let blended = soft_update(self.target.parameters(), &self.local.parameters(), tau)?;
        self.target.set_parameters(blended)
    }

    /// Write the local network's parameters to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.local.parameters().save(path)
    }

    /// Load local parameters from `path` and copy them into the target.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let params = Parameters::load(path)?;
        self.local.set_parameters(params.clone())?;
        self.target.set_parameters(params)
    }
}

impl<Q: QFunction> Agent for DqnAgent<Q> {
    fn state_size(&self) -> usize {
        DqnAgent::state_size(self)
    }

    fn action_size(&self) -> usize {
        DqnAgent::action_size(self)
    }

    fn act(&mut self, state: ArrayView1<f32>, epsilon: f32) -> Result<usize> {
        DqnAgent::act(self, state, epsilon)
    }

    fn step(
        &mut self,
        state: Array1<f32>,
        action: usize,
        reward: f32,
        next_state: Array1<f32>,
        done: bool,
    ) -> Result<Option<f32>> {
        DqnAgent::step(self, state, action, reward, next_state, done)
    }

    fn save_checkpoint(&self, path: &Path) -> Result<()> {
        self.save(path)
    }
}

/// Index of the largest value; the first one wins ties.
pub fn greedy_action(q_values: ArrayView1<f32>) -> Result<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, &value) in q_values.iter().enumerate() {
        if value.is_nan() {
            return Err(NavigatorError::NumericalError(format!("Q-value for action {} is NaN", idx)));
        }
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
        .ok_or_else(|| NavigatorError::NumericalError("No Q-values to choose from".to_string()))
}

/// TD targets `y = r + γ · max_a Q_target(s', a)`, or exactly `r` for
/// terminal transitions.
pub fn td_targets(
    next_q_values: ArrayView2<f32>,
    rewards: ArrayView1<f32>,
    dones: &[bool],
    gamma: f32,
) -> Result<Array1<f32>> {
    let batch_size = rewards.len();
    if next_q_values.nrows() != batch_size || dones.len() != batch_size {
        return Err(NavigatorError::dimension_mismatch(
            format!("{} rows", batch_size),
            format!("{} next Q rows, {} done flags", next_q_values.nrows(), dones.len()),
        ));
    }

    let targets = next_q_values
        .outer_iter()
        .zip(rewards.iter())
        .zip(dones.iter())
        .enumerate()
        .map(|(i, ((row, &reward), &done))| {
            if done {
                return Ok(reward);
            }
            // f32::max would silently drop a NaN here.
            ensure_finite(&format!("next Q-values of row {}", i), &row)?;
            let max_next = row.iter().fold(f32::NEG_INFINITY, |max, &v| max.max(v));
            Ok(reward + gamma * max_next)
        })
        .collect::<Result<Vec<f32>>>()?;

    Ok(Array1::from(targets))
}
