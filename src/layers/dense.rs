use ndarray::{Array1, Array2, ArrayView2, Axis};
use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activations::Activation;
use crate::error::{NavigatorError, Result};
use super::initialization::WeightInit;

/// A fully connected (dense) layer: `activation(x · W + b)`.
///
/// Weights are stored as `(input_size, output_size)` so a batch of row vectors
/// multiplies on the left.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DenseLayer {
    pub weights: Array2<f32>,
    pub biases: Array1<f32>,
    pub activation: Activation,
}

/// Intermediate values from a training-mode forward pass, kept for backprop.
pub struct LayerCache {
    pub inputs: Array2<f32>,
    pub pre_activation: Array2<f32>,
}

/// Gradients produced by [`DenseLayer::backward`].
pub struct LayerGradients {
    pub weights: Array2<f32>,
    pub biases: Array1<f32>,
    /// Error propagated to the previous layer's outputs.
    pub input_error: Array2<f32>,
}

impl DenseLayer {
    /// Create a layer with weights drawn from `init` using `rng`.
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        activation: Activation,
        init: WeightInit,
        rng: &mut R,
    ) -> Self {
        DenseLayer {
            weights: init.initialize_weights((input_size, output_size), rng),
            biases: init.initialize_biases(input_size, output_size, rng),
            activation,
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights.nrows()
    }

    pub fn output_size(&self) -> usize {
        self.weights.ncols()
    }

    /// Inference-mode forward pass. Does not touch the layer.
    pub fn forward_batch(&self, inputs: ArrayView2<f32>) -> Result<Array2<f32>> {
        let mut outputs = self.affine(inputs)?;
        self.activation.apply_batch(&mut outputs);
        Ok(outputs)
    }

    /// Training-mode forward pass returning the outputs plus the cache needed
    /// by [`DenseLayer::backward`].
    pub fn forward_train(&self, inputs: ArrayView2<f32>) -> Result<(Array2<f32>, LayerCache)> {
        let pre_activation = self.affine(inputs)?;
        let mut outputs = pre_activation.clone();
        self.activation.apply_batch(&mut outputs);
        let cache = LayerCache {
            inputs: inputs.to_owned(),
            pre_activation,
        };
        Ok((outputs, cache))
    }

    /// Backpropagate `output_error` (dLoss/dOutput) through this layer.
    pub fn backward(&self, cache: &LayerCache, output_error: ArrayView2<f32>) -> LayerGradients {
        let activation_deriv = self.activation.derivative_batch(cache.pre_activation.view());
        let adjusted_error = &output_error * &activation_deriv;
        LayerGradients {
            weights: cache.inputs.t().dot(&adjusted_error),
            biases: adjusted_error.sum_axis(Axis(0)),
            input_error: adjusted_error.dot(&self.weights.t()),
        }
    }

    fn affine(&self, inputs: ArrayView2<f32>) -> Result<Array2<f32>> {
        if inputs.ncols() != self.input_size() {
            return Err(NavigatorError::dimension_mismatch(
                format!("{} input features", self.input_size()),
                format!("{} input features", inputs.ncols()),
            ));
        }
        Ok(inputs.dot(&self.weights) + &self.biases.view().insert_axis(Axis(0)))
    }
}
