//! # Environment Contract
//!
//! The simulator is a black box. The trainer only needs to reset it, step it
//! with a discrete action and know the sizes of its observation and action
//! spaces.

use ndarray::Array1;

use crate::error::Result;

/// What the environment reports after one action.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    pub observation: Array1<f32>,
    pub reward: f32,
    pub done: bool,
}

/// A single-agent, discrete-action environment.
pub trait Environment {
    /// Dimensionality of the raw observation vector.
    fn state_size(&self) -> usize;

    /// Number of discrete actions.
    fn action_size(&self) -> usize;

    /// Start a new episode and return the initial observation.
    ///
    /// `train_mode` lets simulators run faster or without rendering while
    /// training.
    fn reset(&mut self, train_mode: bool) -> Result<Array1<f32>>;

    /// Apply `action` and advance one timestep.
    fn step(&mut self, action: usize) -> Result<StepResult>;
}
