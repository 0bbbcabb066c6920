//! Gradient-descent optimizers for the Q-network.
//!
//! Each parameter tensor is addressed by a `slot` (its layer index), so
//! stateful optimizers like Adam keep their moment estimates per tensor.

use std::collections::BTreeMap;

use ndarray::{Array, Array1, Array2, Dimension, Zip};
use serde::{Serialize, Deserialize};

pub trait Optimizer {
    /// Called once before the tensors of one gradient step are updated.
    fn begin_step(&mut self) {}
    fn update_weights(&mut self, slot: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32);
    fn update_biases(&mut self, slot: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32);
}

/// Serializable choice of optimizer, used by configs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OptimizerKind {
    Sgd,
    Adam { beta1: f32, beta2: f32, epsilon: f32 },
}

impl Default for OptimizerKind {
    fn default() -> Self {
        OptimizerKind::Adam { beta1: 0.9, beta2: 0.999, epsilon: 1e-8 }
    }
}

impl OptimizerKind {
    pub fn build(&self) -> OptimizerWrapper {
        match *self {
            OptimizerKind::Sgd => OptimizerWrapper::SGD(SGD::new()),
            OptimizerKind::Adam { beta1, beta2, epsilon } => {
                OptimizerWrapper::Adam(Adam::new(beta1, beta2, epsilon))
            }
        }
    }
}

#[derive(Clone, Debug)]
pub enum OptimizerWrapper {
    SGD(SGD),
    Adam(Adam),
}

impl Optimizer for OptimizerWrapper {
    fn begin_step(&mut self) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.begin_step(),
            OptimizerWrapper::Adam(optimizer) => optimizer.begin_step(),
        }
    }

    fn update_weights(&mut self, slot: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.update_weights(slot, weights, gradients, learning_rate),
            OptimizerWrapper::Adam(optimizer) => optimizer.update_weights(slot, weights, gradients, learning_rate),
        }
    }

    fn update_biases(&mut self, slot: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.update_biases(slot, biases, gradients, learning_rate),
            OptimizerWrapper::Adam(optimizer) => optimizer.update_biases(slot, biases, gradients, learning_rate),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SGD;

impl SGD {
    pub fn new() -> SGD {
        SGD
    }
}

impl Optimizer for SGD {
    fn update_weights(&mut self, _slot: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        weights.zip_mut_with(gradients, |w, &g| *w -= learning_rate * g);
    }

    fn update_biases(&mut self, _slot: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        biases.zip_mut_with(gradients, |b, &g| *b -= learning_rate * g);
    }
}

/// First and second moment estimates for one tensor.
#[derive(Clone, Debug)]
struct Moments<D: Dimension> {
    m: Array<f32, D>,
    v: Array<f32, D>,
}

impl<D: Dimension> Moments<D> {
    fn zeros(dim: D) -> Self {
        Moments {
            m: Array::zeros(dim.clone()),
            v: Array::zeros(dim),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Adam {
    pub beta1: f32,
    pub beta2: f32,
    pub epsilon: f32,
    /// Number of steps taken so far (1-based once the first step begins).
    pub t: i32,
    weights: BTreeMap<usize, Moments<ndarray::Ix2>>,
    biases: BTreeMap<usize, Moments<ndarray::Ix1>>,
}

impl Adam {
    pub fn new(beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Adam {
            beta1,
            beta2,
            epsilon,
            t: 0,
            weights: BTreeMap::new(),
            biases: BTreeMap::new(),
        }
    }

    fn apply<D: Dimension>(
        &self,
        moments: &mut Moments<D>,
        param: &mut Array<f32, D>,
        gradients: &Array<f32, D>,
        learning_rate: f32,
    ) {
        let (beta1, beta2, epsilon) = (self.beta1, self.beta2, self.epsilon);
        let t = self.t.max(1);
        let bias1 = 1.0 - beta1.powi(t);
        let bias2 = 1.0 - beta2.powi(t);

        Zip::from(param)
            .and(&mut moments.m)
            .and(&mut moments.v)
            .and(gradients)
            .for_each(|p, m, v, &g| {
                *m = beta1 * *m + (1.0 - beta1) * g;
                *v = beta2 * *v + (1.0 - beta2) * g * g;
                let m_hat = *m / bias1;
                let v_hat = *v / bias2;
                *p -= learning_rate * m_hat / (v_hat.sqrt() + epsilon);
            });
    }
}

impl Default for Adam {
    fn default() -> Self {
        Self::new(0.9, 0.999, 1e-8)
    }
}

impl Optimizer for Adam {
    fn begin_step(&mut self) {
        self.t += 1;
    }

    fn update_weights(&mut self, slot: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        let mut moments = self
            .weights
            .remove(&slot)
            .filter(|m| m.m.dim() == weights.dim())
            .unwrap_or_else(|| Moments::zeros(weights.raw_dim()));
        self.apply(&mut moments, weights, gradients, learning_rate);
        self.weights.insert(slot, moments);
    }

    fn update_biases(&mut self, slot: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        let mut moments = self
            .biases
            .remove(&slot)
            .filter(|m| m.m.dim() == biases.dim())
            .unwrap_or_else(|| Moments::zeros(biases.raw_dim()));
        self.apply(&mut moments, biases, gradients, learning_rate);
        self.biases.insert(slot, moments);
    }
}
