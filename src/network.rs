use ndarray::{Array2, ArrayView1, ArrayView2, Ix1, Ix2};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::activations::Activation;
use crate::approximator::{Parameters, QFunction};
use crate::error::{NavigatorError, Result};
use crate::layers::{DenseLayer, WeightInit};
use crate::loss;
use crate::numerics::{ensure_finite, ensure_finite_scalar};
use crate::optimizer::{Optimizer, OptimizerWrapper};

/// A multi-layer perceptron mapping observations to action-values.
///
/// Hidden layers use ReLU, the output layer is linear. Layers are named
/// `fc1`, `fc2`, … in the parameter set, matching their position.
#[derive(Clone, Debug)]
pub struct QNetwork {
    pub layers: Vec<DenseLayer>,
    pub optimizer: OptimizerWrapper,
}

impl QNetwork {
    /// Build a network with `layer_sizes = [input, hidden…, output]`.
    ///
    /// Weights use Xavier-uniform initialization scaled by the ReLU gain.
    /// The same `seed` always produces the same initial parameters; `None`
    /// draws one from the OS.
    pub fn new(layer_sizes: &[usize], optimizer: OptimizerWrapper, seed: Option<u64>) -> Result<Self> {
        if layer_sizes.len() < 2 {
            return Err(NavigatorError::invalid_parameter(
                "layer_sizes".to_string(),
                "must contain at least an input and an output size".to_string(),
            ));
        }
        if layer_sizes.iter().any(|&size| size == 0) {
            return Err(NavigatorError::invalid_parameter(
                "layer_sizes".to_string(),
                format!("every layer needs at least one unit, got {:?}", layer_sizes),
            ));
        }

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let init = WeightInit::XavierUniform { gain: Activation::Relu.init_gain() };
        let last = layer_sizes.len() - 2;

        let layers = layer_sizes
            .windows(2)
            .enumerate()
            .map(|(i, window)| {
                let activation = if i == last { Activation::Linear } else { Activation::Relu };
                DenseLayer::new(window[0], window[1], activation, init, &mut rng)
            })
            .collect();

        Ok(QNetwork { layers, optimizer })
    }

    /// Convenience constructor: `input → hidden… → output`.
    pub fn with_hidden(
        input_size: usize,
        hidden_sizes: &[usize],
        output_size: usize,
        optimizer: OptimizerWrapper,
        seed: Option<u64>,
    ) -> Result<Self> {
        let mut sizes = Vec::with_capacity(hidden_sizes.len() + 2);
        sizes.push(input_size);
        sizes.extend_from_slice(hidden_sizes);
        sizes.push(output_size);
        Self::new(&sizes, optimizer, seed)
    }

    fn layer_name(index: usize) -> String {
        format!("fc{}", index + 1)
    }
}

impl QFunction for QNetwork {
    fn input_size(&self) -> usize {
        self.layers.first().map_or(0, |layer| layer.input_size())
    }

    fn output_size(&self) -> usize {
        self.layers.last().map_or(0, |layer| layer.output_size())
    }

    fn forward(&self, observations: ArrayView2<f32>) -> Result<Array2<f32>> {
        let mut current = observations.to_owned();
        for layer in &self.layers {
            current = layer.forward_batch(current.view())?;
        }
        Ok(current)
    }

    fn train_step(
        &mut self,
        observations: ArrayView2<f32>,
        actions: &[usize],
        targets: ArrayView1<f32>,
        learning_rate: f32,
    ) -> Result<f32> {
        let batch_size = observations.nrows();
        if actions.len() != batch_size || targets.len() != batch_size {
            return Err(NavigatorError::dimension_mismatch(
                format!("{} actions and targets", batch_size),
                format!("{} actions, {} targets", actions.len(), targets.len()),
            ));
        }
        let num_actions = self.output_size();
        if let Some(&action) = actions.iter().find(|&&a| a >= num_actions) {
            return Err(NavigatorError::InvalidAction { action, max_actions: num_actions });
        }

        let mut caches = Vec::with_capacity(self.layers.len());
        let mut current = observations.to_owned();
        for layer in &self.layers {
            let (output, cache) = layer.forward_train(current.view())?;
            caches.push(cache);
            current = output;
        }

        let predictions = loss::gather_actions(current.view(), actions);
        let loss_value = loss::mse(&predictions, targets);
        ensure_finite_scalar("loss", loss_value)?;

        let mut error = loss::mse_gradient(current.view(), actions, targets);
        let mut gradients = Vec::with_capacity(self.layers.len());
        for (layer, cache) in self.layers.iter().zip(caches.iter()).rev() {
            let grads = layer.backward(cache, error.view());
            error = grads.input_error;
            gradients.push((grads.weights, grads.biases));
        }
        gradients.reverse();

        // Reject the whole step before touching any tensor.
        for (weights, biases) in &gradients {
            ensure_finite("weight gradients", weights)?;
            ensure_finite("bias gradients", biases)?;
        }

        self.optimizer.begin_step();
        for (slot, (layer, (weight_grads, bias_grads))) in self.layers.iter_mut().zip(gradients).enumerate() {
            self.optimizer.update_weights(slot, &mut layer.weights, &weight_grads, learning_rate);
            self.optimizer.update_biases(slot, &mut layer.biases, &bias_grads, learning_rate);
        }

        Ok(loss_value)
    }

    fn parameters(&self) -> Parameters {
        let mut params = Parameters::new();
        for (i, layer) in self.layers.iter().enumerate() {
            let name = Self::layer_name(i);
            params.insert(format!("{}.weight", name), layer.weights.clone().into_dyn());
            params.insert(format!("{}.bias", name), layer.biases.clone().into_dyn());
        }
        params
    }

    fn set_parameters(&mut self, mut parameters: Parameters) -> Result<()> {
        let expected = self.layers.len() * 2;
        if parameters.len() != expected {
            return Err(NavigatorError::dimension_mismatch(
                format!("{} tensors", expected),
                format!("{} tensors", parameters.len()),
            ));
        }

        // Validate everything first so a bad set leaves the network untouched.
        let mut staged = Vec::with_capacity(self.layers.len());
        for (i, layer) in self.layers.iter().enumerate() {
            let name = Self::layer_name(i);
            let weights = parameters
                .take(&format!("{}.weight", name))?
                .into_dimensionality::<Ix2>()
                .map_err(|e| NavigatorError::dimension_mismatch(format!("{}.weight: 2-D", name), e.to_string()))?;
            let biases = parameters
                .take(&format!("{}.bias", name))?
                .into_dimensionality::<Ix1>()
                .map_err(|e| NavigatorError::dimension_mismatch(format!("{}.bias: 1-D", name), e.to_string()))?;

            if weights.dim() != layer.weights.dim() || biases.dim() != layer.biases.dim() {
                return Err(NavigatorError::dimension_mismatch(
                    format!("{}: {:?} / {:?}", name, layer.weights.dim(), layer.biases.dim()),
                    format!("{}: {:?} / {:?}", name, weights.dim(), biases.dim()),
                ));
            }
            staged.push((weights, biases));
        }

        for (layer, (weights, biases)) in self.layers.iter_mut().zip(staged) {
            layer.weights = weights;
            layer.biases = biases;
        }
        Ok(())
    }
}
