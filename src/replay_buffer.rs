use ndarray::{Array1, Array2};
use rand::Rng;
use std::collections::VecDeque;

use crate::error::{NavigatorError, Result};

/// One environment transition.
#[derive(Clone, Debug, PartialEq)]
pub struct Experience {
    pub state: Array1<f32>,
    pub action: usize,
    pub reward: f32,
    pub next_state: Array1<f32>,
    pub done: bool,
}

/// Fixed-capacity FIFO experience store with uniform sampling.
#[derive(Clone, Debug)]
pub struct ReplayBuffer {
    buffer: VecDeque<Experience>,
    capacity: usize,
}

impl ReplayBuffer {
    pub fn new(capacity: usize) -> Self {
        ReplayBuffer {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an experience, evicting the oldest one when full.
    pub fn add(&mut self, experience: Experience) {
        if self.capacity == 0 {
            return;
        }
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(experience);
    }

    /// Draw `batch_size` distinct experiences uniformly at random.
    ///
    /// Separate calls are independent, so the same experience can show up
    /// in consecutive batches.
    pub fn sample<R: Rng + ?Sized>(&self, batch_size: usize, rng: &mut R) -> Result<Vec<&Experience>> {
        if self.buffer.len() < batch_size {
            return Err(NavigatorError::InsufficientData {
                requested: batch_size,
                available: self.buffer.len(),
            });
        }
        Ok(rand::seq::index::sample(rng, self.buffer.len(), batch_size)
            .into_iter()
            .map(|i| &self.buffer[i])
            .collect())
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Experiences from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Experience> {
        self.buffer.iter()
    }
}

/// A sampled mini-batch stacked into matrices.
#[derive(Clone, Debug)]
pub struct Batch {
    pub states: Array2<f32>,
    pub actions: Vec<usize>,
    pub rewards: Array1<f32>,
    pub next_states: Array2<f32>,
    pub dones: Vec<bool>,
}

impl Batch {
    /// Stack experiences row by row. All states must share one length.
    pub fn from_experiences(experiences: &[&Experience]) -> Result<Self> {
        let first = experiences.first().ok_or(NavigatorError::InsufficientData {
            requested: 1,
            available: 0,
        })?;
        let batch_size = experiences.len();
        let state_size = first.state.len();

        let mut states = Array2::zeros((batch_size, state_size));
        let mut next_states = Array2::zeros((batch_size, state_size));
        let mut actions = Vec::with_capacity(batch_size);
        let mut rewards = Array1::zeros(batch_size);
        let mut dones = Vec::with_capacity(batch_size);

        for (i, exp) in experiences.iter().enumerate() {
            if exp.state.len() != state_size || exp.next_state.len() != state_size {
                return Err(NavigatorError::dimension_mismatch(
                    format!("states of length {}", state_size),
                    format!("{} and {}", exp.state.len(), exp.next_state.len()),
                ));
            }
            states.row_mut(i).assign(&exp.state);
            next_states.row_mut(i).assign(&exp.next_state);
            actions.push(exp.action);
            rewards[i] = exp.reward;
            dones.push(exp.done);
        }

        Ok(Batch { states, actions, rewards, next_states, dones })
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
