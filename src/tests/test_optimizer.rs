use ndarray::array;

use crate::optimizer::{Adam, Optimizer, OptimizerKind, OptimizerWrapper, SGD};

#[test]
fn test_sgd_update() {
    let mut sgd = SGD::new();
    let mut weights = array![[1.0, 2.0], [3.0, 4.0]];
    let gradients = array![[0.5, -0.5], [1.0, 0.0]];

    sgd.update_weights(0, &mut weights, &gradients, 0.1);

    let expected = array![[0.95, 2.05], [2.9, 4.0]];
    for (w, e) in weights.iter().zip(expected.iter()) {
        assert!((w - e).abs() < 1e-6, "{} != {}", w, e);
    }
}

#[test]
fn test_adam_first_step_moves_by_learning_rate() {
    let mut adam = Adam::default();
    let mut biases = array![1.0, 1.0];
    let gradients = array![2.0, -3.0];

    adam.begin_step();
    adam.update_biases(0, &mut biases, &gradients, 0.01);

    // After bias correction the first step is lr * sign(g)
    assert!((biases[0] - 0.99).abs() < 1e-5);
    assert!((biases[1] - 1.01).abs() < 1e-5);
    assert_eq!(adam.t, 1);
}

#[test]
fn test_adam_keeps_state_per_slot() {
    let mut adam = Adam::default();
    let mut first = array![[0.0]];
    let mut second = array![[0.0, 0.0]];

    adam.begin_step();
    adam.update_weights(0, &mut first, &array![[1.0]], 0.1);
    adam.update_weights(1, &mut second, &array![[1.0, 1.0]], 0.1);

    assert!((first[[0, 0]] + 0.1).abs() < 1e-5);
    assert!(second.iter().all(|w| (w + 0.1).abs() < 1e-5));
}

#[test]
fn test_optimizer_kind_builds_wrapper() {
    assert!(matches!(OptimizerKind::Sgd.build(), OptimizerWrapper::SGD(_)));
    match OptimizerKind::default().build() {
        OptimizerWrapper::Adam(adam) => {
            assert_eq!(adam.beta1, 0.9);
            assert_eq!(adam.beta2, 0.999);
        }
        other => panic!("expected Adam, got {:?}", other),
    }
}
