use ndarray::{array, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::activations::Activation;
use crate::layers::{DenseLayer, WeightInit};

#[test]
fn test_relu_and_linear() {
    let mut values = array![[-1.0, 0.0, 2.5]];
    Activation::Relu.apply_batch(&mut values);
    assert_eq!(values, array![[0.0, 0.0, 2.5]]);

    let mut values = array![[-1.0, 0.0, 2.5]];
    Activation::Linear.apply_batch(&mut values);
    assert_eq!(values, array![[-1.0, 0.0, 2.5]]);

    let deriv = Activation::Relu.derivative_batch(array![[-1.0, 0.0, 2.5]].view());
    assert_eq!(deriv, array![[0.0, 0.0, 1.0]]);
}

#[test]
fn test_xavier_weights_within_limit() {
    let mut rng = StdRng::seed_from_u64(3);
    let init = WeightInit::XavierUniform { gain: 1.0 };
    let weights = init.initialize_weights((30, 20), &mut rng);
    let limit = (6.0f32 / 50.0).sqrt();

    assert_eq!(weights.dim(), (30, 20));
    assert!(weights.iter().all(|w| w.abs() <= limit));
    assert!(weights.iter().any(|&w| w != 0.0));

    let biases = init.initialize_biases(30, 20, &mut rng);
    let bound = 1.0 / 30f32.sqrt();
    assert!(biases.iter().all(|b| b.abs() <= bound));
}

#[test]
fn test_dense_forward_batch() {
    let layer = DenseLayer {
        weights: array![[1.0, -1.0], [2.0, 0.5]],
        biases: array![0.5, -3.0],
        activation: Activation::Relu,
    };

    let output = layer.forward_batch(array![[1.0, 1.0], [0.0, 2.0]].view()).unwrap();
    // Row 0: [3.5, -3.5] -> relu; row 1: [4.5, -2.0] -> relu
    assert_eq!(output, array![[3.5, 0.0], [4.5, 0.0]]);
}

#[test]
fn test_dense_rejects_wrong_width() {
    let mut rng = StdRng::seed_from_u64(0);
    let layer = DenseLayer::new(3, 2, Activation::Linear, WeightInit::Zeros, &mut rng);
    assert!(layer.forward_batch(Array2::zeros((1, 4)).view()).is_err());
}

#[test]
fn test_dense_backward_linear() {
    let layer = DenseLayer {
        weights: array![[1.0], [2.0]],
        biases: array![0.0],
        activation: Activation::Linear,
    };
    let inputs = array![[1.0, 3.0]];
    let (_, cache) = layer.forward_train(inputs.view()).unwrap();
    let grads = layer.backward(&cache, array![[2.0]].view());

    assert_eq!(grads.weights, array![[2.0], [6.0]]);
    assert_eq!(grads.biases, array![2.0]);
    assert_eq!(grads.input_error, array![[2.0, 4.0]]);
}
