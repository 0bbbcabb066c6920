use ndarray::{Array1, Array2};
use ndarray_rand::RandomExt;
use rand_distr::Uniform;
use rand::Rng;
use serde::{Serialize, Deserialize};

/// Weight initialization strategies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WeightInit {
    /// Xavier/Glorot uniform scaled by a gain: `U(-g·√(6/(fan_in+fan_out)), +…)`
    XavierUniform { gain: f32 },

    /// Uniform distribution with custom range
    Uniform { min: f32, max: f32 },

    /// All zeros
    Zeros,
}

impl WeightInit {
    /// Initialize a `(fan_in, fan_out)` weight matrix.
    pub fn initialize_weights<R: Rng + ?Sized>(&self, shape: (usize, usize), rng: &mut R) -> Array2<f32> {
        let (fan_in, fan_out) = shape;

        match *self {
            WeightInit::XavierUniform { gain } => {
                let limit = gain * (6.0 / (fan_in + fan_out) as f32).sqrt();
                Array2::random_using(shape, Uniform::new_inclusive(-limit, limit), rng)
            }

            WeightInit::Uniform { min, max } => {
                Array2::random_using(shape, Uniform::new_inclusive(min, max), rng)
            }

            WeightInit::Zeros => Array2::zeros(shape),
        }
    }

    /// Initialize biases for a layer with `fan_in` inputs.
    ///
    /// Non-zero strategies draw from `U(-1/√fan_in, 1/√fan_in)`, the usual
    /// default for fully connected layers.
    pub fn initialize_biases<R: Rng + ?Sized>(&self, fan_in: usize, size: usize, rng: &mut R) -> Array1<f32> {
        match *self {
            WeightInit::Zeros => Array1::zeros(size),
            WeightInit::XavierUniform { .. } | WeightInit::Uniform { .. } => {
                let bound = 1.0 / (fan_in.max(1) as f32).sqrt();
                Array1::random_using(size, Uniform::new_inclusive(-bound, bound), rng)
            }
        }
    }
}
