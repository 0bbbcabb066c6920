use std::path::Path;

use ndarray::{Array1, ArrayView1};

use crate::error::Result;

/// What the training loop needs from a learning agent.
pub trait Agent {
    /// Length of the state vectors the agent accepts.
    fn state_size(&self) -> usize;

    /// Number of discrete actions.
    fn action_size(&self) -> usize;

    /// Select an action for `state` with exploration rate `epsilon`.
    fn act(&mut self, state: ArrayView1<f32>, epsilon: f32) -> Result<usize>;

    /// Observe one transition. Returns the loss when a learning update ran.
    fn step(
        &mut self,
        state: Array1<f32>,
        action: usize,
        reward: f32,
        next_state: Array1<f32>,
        done: bool,
    ) -> Result<Option<f32>>;

    /// Persist the parameters used for acting.
    fn save_checkpoint(&self, path: &Path) -> Result<()>;
}
