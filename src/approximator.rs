//! # Function Approximator Contract
//!
//! The agent never looks inside its value function. It only needs something
//! that maps a batch of observations to a batch of action-values, takes one
//! gradient step on an MSE objective, and exposes its parameters as a named
//! set of tensors so the target copy can be blended toward the local one.
//!
//! [`QNetwork`](crate::network::QNetwork) is the provided implementation.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use ndarray::{Array1, Array2, ArrayD, ArrayView1, ArrayView2, Axis, Zip};
use serde::{Serialize, Deserialize};

use crate::error::{NavigatorError, Result};

/// A pluggable action-value function.
pub trait QFunction: Clone {
    /// Length of the observation vector the function consumes.
    fn input_size(&self) -> usize;

    /// Number of discrete actions it produces values for.
    fn output_size(&self) -> usize;

    /// Inference-mode evaluation of a `(batch, input_size)` matrix.
    fn forward(&self, observations: ArrayView2<f32>) -> Result<Array2<f32>>;

    /// Inference-mode evaluation of a single observation.
    fn forward_one(&self, observation: ArrayView1<f32>) -> Result<Array1<f32>> {
        let values = self.forward(observation.insert_axis(Axis(0)))?;
        Ok(values.index_axis_move(Axis(0), 0))
    }

    /// One gradient-descent step minimizing `mean((Q(s)[a] - y)^2)`.
    ///
    /// Returns the loss measured before the update.
    fn train_step(
        &mut self,
        observations: ArrayView2<f32>,
        actions: &[usize],
        targets: ArrayView1<f32>,
        learning_rate: f32,
    ) -> Result<f32>;

    /// Snapshot of every parameter tensor.
    fn parameters(&self) -> Parameters;

    /// Replace every parameter tensor. Names and shapes must match.
    fn set_parameters(&mut self, parameters: Parameters) -> Result<()>;
}

/// Named parameter tensors of an approximator, e.g. `fc1.weight`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    tensors: BTreeMap<String, ArrayD<f32>>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<S: Into<String>>(&mut self, name: S, tensor: ArrayD<f32>) -> Option<ArrayD<f32>> {
        self.tensors.insert(name.into(), tensor)
    }

    pub fn get(&self, name: &str) -> Option<&ArrayD<f32>> {
        self.tensors.get(name)
    }

    /// Remove and return a tensor, failing if it is absent.
    pub fn take(&mut self, name: &str) -> Result<ArrayD<f32>> {
        self.tensors.remove(name).ok_or_else(|| {
            NavigatorError::invalid_parameter(name.to_string(), "missing from parameter set".to_string())
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ArrayD<f32>)> {
        self.tensors.iter()
    }

    pub fn len(&self) -> usize {
        self.tensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tensors.is_empty()
    }

    /// Total number of scalar parameters.
    pub fn numel(&self) -> usize {
        self.tensors.values().map(|t| t.len()).sum()
    }

    /// Write the parameters to `path` as a bincode blob.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = bincode::serialize(self)?;
        fs::write(path, serialized)?;
        Ok(())
    }

    /// Read parameters previously written by [`Parameters::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path)?;
        Ok(bincode::deserialize(&data)?)
    }
}

/// Blend `target` toward `local`: `θ_target ← τ·θ_local + (1 − τ)·θ_target`.
///
/// Takes the target set by value and hands back the blended set, so the
/// caller cannot keep an alias to the stale one. `tau = 1` yields an exact
/// copy of `local`; `tau = 0` returns `target` untouched.
pub fn soft_update(mut target: Parameters, local: &Parameters, tau: f32) -> Result<Parameters> {
    if !(0.0..=1.0).contains(&tau) {
        return Err(NavigatorError::invalid_parameter(
            "tau".to_string(),
            format!("must be within [0, 1], got {}", tau),
        ));
    }
    if target.len() != local.len() {
        return Err(NavigatorError::dimension_mismatch(
            format!("{} tensors", local.len()),
            format!("{} tensors", target.len()),
        ));
    }

    for (name, target_tensor) in target.tensors.iter_mut() {
        let local_tensor = local.get(name).ok_or_else(|| {
            NavigatorError::invalid_parameter(name.clone(), "missing from local parameters".to_string())
        })?;
        if local_tensor.shape() != target_tensor.shape() {
            return Err(NavigatorError::dimension_mismatch(
                format!("{}: {:?}", name, local_tensor.shape()),
                format!("{}: {:?}", name, target_tensor.shape()),
            ));
        }

        if tau == 1.0 {
            target_tensor.assign(local_tensor);
        } else if tau > 0.0 {
            Zip::from(target_tensor)
                .and(local_tensor)
                .for_each(|t, &l| *t = tau * l + (1.0 - tau) * *t);
        }
    }

    Ok(target)
}
