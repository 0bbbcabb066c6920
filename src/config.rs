//! # Configuration
//!
//! Hyperparameters for the agent, its network and the training loop. Every
//! struct has defaults matching the reference banana-collector setup and can be
//! loaded from a JSON file, e.g.
//!
//! ```json
//! {
//!   "agent":   { "batch_size": 64, "gamma": 0.99, "tau": 0.001 },
//!   "network": { "hidden_sizes": [256, 256] },
//!   "trainer": { "n_episodes": 1200, "max_t": 300 }
//! }
//! ```
//!
//! Missing fields fall back to their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};

use crate::error::{NavigatorError, Result};
use crate::optimizer::OptimizerKind;

/// Hyperparameters of [`DqnAgent`](crate::agent::DqnAgent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DqnConfig {
    /// Replay memory capacity.
    pub buffer_size: usize,
    /// Mini-batch size B.
    pub batch_size: usize,
    /// Discount factor γ.
    pub gamma: f32,
    /// Soft-update rate τ.
    pub tau: f32,
    pub learning_rate: f32,
    /// Learn once every this many calls to `step`.
    pub update_every: usize,
    /// Minimum number of stored transitions before learning starts.
    /// The effective threshold is `max(warmup, batch_size)`.
    pub warmup: usize,
    pub optimizer: OptimizerKind,
    /// Seed for exploration draws and replay sampling.
    pub seed: Option<u64>,
}

impl Default for DqnConfig {
    fn default() -> Self {
        DqnConfig {
            buffer_size: 100_000,
            batch_size: 64,
            gamma: 0.99,
            tau: 1e-3,
            learning_rate: 5e-4,
            update_every: 4,
            warmup: 64,
            optimizer: OptimizerKind::default(),
            seed: None,
        }
    }
}

impl DqnConfig {
    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(invalid("buffer_size", "must be greater than 0"));
        }
        if self.batch_size == 0 {
            return Err(invalid("batch_size", "must be greater than 0"));
        }
        if self.batch_size > self.buffer_size {
            return Err(invalid("batch_size", "cannot exceed buffer_size"));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(invalid("gamma", "must be within [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.tau) {
            return Err(invalid("tau", "must be within [0, 1]"));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(invalid("learning_rate", "must be a positive finite number"));
        }
        if self.update_every == 0 {
            return Err(invalid("update_every", "must be greater than 0"));
        }
        if self.warmup > self.buffer_size {
            return Err(invalid("warmup", "cannot exceed buffer_size"));
        }
        Ok(())
    }

    /// Number of stored transitions required before the first update.
    pub fn learning_threshold(&self) -> usize {
        self.warmup.max(self.batch_size)
    }
}

/// Shape of the Q-network between its input and output layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub hidden_sizes: Vec<usize>,
    /// Seed for weight initialization.
    pub seed: Option<u64>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            hidden_sizes: vec![256, 256],
            seed: None,
        }
    }
}

impl NetworkConfig {
    pub fn validate(&self) -> Result<()> {
        if self.hidden_sizes.iter().any(|&size| size == 0) {
            return Err(invalid("hidden_sizes", "every hidden layer needs at least one unit"));
        }
        Ok(())
    }
}

/// Parameters of the episode loop in [`Trainer`](crate::trainer::Trainer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub n_episodes: usize,
    /// Maximum timesteps per episode.
    pub max_t: usize,
    pub eps_start: f32,
    pub eps_end: f32,
    /// Multiplicative per-episode epsilon decay.
    pub eps_decay: f32,
    /// Trailing mean score at which training stops.
    pub solved_threshold: f32,
    /// Length of the trailing score window.
    pub score_window: usize,
    /// Episodes between permanent progress lines.
    pub report_every: usize,
    /// Directory the solved checkpoint is written to.
    pub checkpoint_dir: PathBuf,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            n_episodes: 1200,
            max_t: 300,
            eps_start: 1.0,
            eps_end: 0.005,
            eps_decay: 0.995,
            solved_threshold: 15.0,
            score_window: 100,
            report_every: 100,
            checkpoint_dir: PathBuf::from("."),
        }
    }
}

impl TrainerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_t == 0 {
            return Err(invalid("max_t", "must be greater than 0"));
        }
        if !(0.0..=1.0).contains(&self.eps_start) {
            return Err(invalid("eps_start", "must be within [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.eps_end) {
            return Err(invalid("eps_end", "must be within [0, 1]"));
        }
        if self.eps_end > self.eps_start {
            return Err(invalid("eps_end", "cannot exceed eps_start"));
        }
        if !(0.0..=1.0).contains(&self.eps_decay) {
            return Err(invalid("eps_decay", "must be within [0, 1]"));
        }
        if self.score_window == 0 {
            return Err(invalid("score_window", "must be greater than 0"));
        }
        if self.report_every == 0 {
            return Err(invalid("report_every", "must be greater than 0"));
        }
        Ok(())
    }
}

/// Complete run configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub agent: DqnConfig,
    pub network: NetworkConfig,
    pub trainer: TrainerConfig,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.agent.validate()?;
        self.network.validate()?;
        self.trainer.validate()
    }

    /// Load and validate a JSON config file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

fn invalid(name: &str, reason: &str) -> NavigatorError {
    NavigatorError::invalid_parameter(name, reason)
}
