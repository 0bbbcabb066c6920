//! # Navigator - Deep Q-Learning for Discrete Navigation Tasks
//!
//! Navigator trains a single agent to act in a simulated, episodic,
//! discrete-action environment with Deep Q-Learning: experience replay, an
//! epsilon-greedy behavior policy and a target network that is soft-updated
//! toward the local one after every learning step.
//!
//! The environment and the value-function approximator are external
//! collaborators behind the [`environment::Environment`] and
//! [`approximator::QFunction`] traits. A ReLU multi-layer perceptron
//! ([`network::QNetwork`]) is provided as the default approximator.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use navigator::builders::DqnAgentBuilder;
//! use navigator::config::Config;
//! use navigator::trainer::Trainer;
//!
//! let config = Config::default();
//! let agent = DqnAgentBuilder::new()
//!     .state_size(84)
//!     .action_size(4)
//!     .network(config.network.clone())
//!     .config(config.agent.clone())
//!     .build()
//!     .unwrap();
//! let trainer = Trainer::new(config.trainer).unwrap();
//! // trainer.train(&mut env, &mut agent)
//! ```
//!
//! ## Module Organization
//!
//! - [`activations`] - ReLU and linear activations
//! - [`agent`] - The DQN agent and the trait the training loop drives
//! - [`approximator`] - Function approximator contract and parameter sets
//! - [`builders`] - Builder for a network-backed DQN agent
//! - [`config`] - Serializable hyperparameters
//! - [`environment`] - Environment contract
//! - [`error`] - Error types and result handling
//! - [`layers`] - Dense layers and weight initialization
//! - [`loss`] - MSE over the taken actions
//! - [`metrics`] - Score history
//! - [`network`] - The default Q-network
//! - [`optimizer`] - SGD and Adam
//! - [`replay_buffer`] - Experience replay
//! - [`state_window`] - Rolling augmented observation state
//! - [`trainer`] - Episode loop, epsilon schedule and progress reporting

pub mod activations;
pub mod agent;
pub mod approximator;
pub mod builders;
pub mod config;
pub mod environment;
pub mod error;
pub mod layers;
pub mod loss;
pub mod metrics;
pub mod network;
pub mod numerics;
pub mod optimizer;
pub mod replay_buffer;
pub mod state_window;
pub mod trainer;

pub use error::{NavigatorError, Result};

#[cfg(test)]
mod tests;
