//! # Activation Functions
//!
//! The Q-network only needs two activations: ReLU on hidden layers and the
//! identity on the output layer, which has to produce unbounded action-values.

pub mod functions;

pub use functions::Activation;
