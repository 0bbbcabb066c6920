//! # Augmented Observation State
//!
//! The network does not see raw observations. Each timestep contributes a
//! *frame* `[observation | reward | one-hot action]` to a rolling window of
//! scalars whose length is fixed to the network's input size. Whatever does
//! not fit falls off the old end, so the window holds the most recent
//! `state_size / frame_size` frames (plus a partial one if the sizes do not
//! divide evenly).

use std::collections::VecDeque;

use ndarray::{Array1, ArrayView1};

use crate::error::{NavigatorError, Result};

/// Fixed-capacity circular buffer of scalars.
///
/// Always holds exactly `capacity` values: pushing one drops the oldest.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingWindow {
    values: VecDeque<f32>,
    capacity: usize,
}

impl RollingWindow {
    /// A window of `capacity` zeros.
    pub fn new(capacity: usize) -> Self {
        let mut values = VecDeque::with_capacity(capacity);
        values.resize(capacity, 0.0);
        RollingWindow { values, capacity }
    }

    /// Overwrite every slot with zero.
    pub fn clear(&mut self) {
        self.values.iter_mut().for_each(|v| *v = 0.0);
    }

    pub fn push(&mut self, value: f32) {
        if self.capacity == 0 {
            return;
        }
        self.values.pop_front();
        self.values.push_back(value);
    }

    pub fn extend<I: IntoIterator<Item = f32>>(&mut self, values: I) {
        for value in values {
            self.push(value);
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Contents from oldest to newest.
    pub fn to_array(&self) -> Array1<f32> {
        self.values.iter().copied().collect()
    }
}

/// Builds the augmented state the agent acts on.
#[derive(Debug, Clone)]
pub struct StateEncoder {
    window: RollingWindow,
    observation_size: usize,
    action_size: usize,
}

impl StateEncoder {
    /// `state_size` is the length of the vector fed to the agent; it must fit
    /// at least one full frame.
    pub fn new(observation_size: usize, action_size: usize, state_size: usize) -> Result<Self> {
        if action_size == 0 {
            return Err(NavigatorError::invalid_parameter(
                "action_size".to_string(),
                "must be greater than 0".to_string(),
            ));
        }
        let frame_size = observation_size + 1 + action_size;
        if state_size < frame_size {
            return Err(NavigatorError::invalid_parameter(
                "state_size".to_string(),
                format!(
                    "{} cannot hold one frame of {} (observation {} + reward 1 + actions {})",
                    state_size, frame_size, observation_size, action_size
                ),
            ));
        }

        Ok(StateEncoder {
            window: RollingWindow::new(state_size),
            observation_size,
            action_size,
        })
    }

    /// Length of one `[observation | reward | one-hot]` frame.
    pub fn frame_size(&self) -> usize {
        self.observation_size + 1 + self.action_size
    }

    /// Number of whole frames the window holds.
    pub fn history_frames(&self) -> usize {
        self.window.capacity() / self.frame_size()
    }

    pub fn state_size(&self) -> usize {
        self.window.capacity()
    }

    /// Zero the window and seed it with the episode's first observation,
    /// a zero reward and an all-zero action encoding.
    pub fn begin_episode(&mut self, observation: ArrayView1<f32>) -> Result<()> {
        self.check_observation(observation)?;
        self.window.clear();
        self.window.extend(observation.iter().copied());
        self.window.push(0.0);
        self.window.extend(std::iter::repeat(0.0).take(self.action_size));
        Ok(())
    }

    /// Append the frame produced by taking `action` and observing
    /// `observation` with `reward`.
    pub fn record(&mut self, observation: ArrayView1<f32>, reward: f32, action: usize) -> Result<()> {
        self.check_observation(observation)?;
        if action >= self.action_size {
            return Err(NavigatorError::InvalidAction {
                action,
                max_actions: self.action_size,
            });
        }
        self.window.extend(observation.iter().copied());
        self.window.push(reward);
        self.window
            .extend((0..self.action_size).map(|a| if a == action { 1.0 } else { 0.0 }));
        Ok(())
    }

    /// Current augmented state.
    pub fn state(&self) -> Array1<f32> {
        self.window.to_array()
    }

    fn check_observation(&self, observation: ArrayView1<f32>) -> Result<()> {
        if observation.len() != self.observation_size {
            return Err(NavigatorError::dimension_mismatch(
                format!("observation of length {}", self.observation_size),
                format!("observation of length {}", observation.len()),
            ));
        }
        Ok(())
    }
}
