use ndarray::{array, Array2, Axis, IxDyn};

use crate::approximator::QFunction;
use crate::error::NavigatorError;
use crate::network::QNetwork;
use crate::optimizer::{OptimizerWrapper, SGD};

fn network(seed: u64) -> QNetwork {
    QNetwork::new(&[3, 8, 2], OptimizerWrapper::SGD(SGD::new()), Some(seed)).unwrap()
}

#[test]
fn test_network_creation() {
    let net = network(0);
    assert_eq!(net.layers.len(), 2);
    assert_eq!(net.input_size(), 3);
    assert_eq!(net.output_size(), 2);
    assert_eq!(net.layers[0].weights.dim(), (3, 8));
    assert_eq!(net.layers[1].biases.len(), 2);
}

#[test]
fn test_network_rejects_bad_sizes() {
    assert!(QNetwork::new(&[3], OptimizerWrapper::SGD(SGD::new()), None).is_err());
    assert!(QNetwork::new(&[3, 0, 2], OptimizerWrapper::SGD(SGD::new()), None).is_err());
}

#[test]
fn test_forward_shapes_and_single_row() {
    let net = network(1);
    let batch = array![[0.1, 0.2, 0.3], [-0.5, 0.0, 1.0]];
    let output = net.forward(batch.view()).unwrap();
    assert_eq!(output.dim(), (2, 2));

    let single = net.forward_one(batch.index_axis(Axis(0), 1)).unwrap();
    assert_eq!(single, output.row(1));
}

#[test]
fn test_forward_does_not_change_parameters() {
    let net = network(2);
    let before = net.parameters();
    net.forward(Array2::ones((4, 3)).view()).unwrap();
    assert_eq!(net.parameters(), before);
}

#[test]
fn test_seed_controls_initialization() {
    assert_eq!(network(5).parameters(), network(5).parameters());
    assert_ne!(network(5).parameters(), network(6).parameters());
}

#[test]
fn test_parameter_names() {
    let params = network(0).parameters();
    let names: Vec<&String> = params.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["fc1.bias", "fc1.weight", "fc2.bias", "fc2.weight"]);
    assert_eq!(params.numel(), 3 * 8 + 8 + 8 * 2 + 2);
}

#[test]
fn test_set_parameters_round_trip() {
    let source = network(10);
    let mut dest = network(11);
    dest.set_parameters(source.parameters()).unwrap();
    assert_eq!(dest.parameters(), source.parameters());

    let input = array![[0.3, -0.3, 0.9]];
    assert_eq!(dest.forward(input.view()).unwrap(), source.forward(input.view()).unwrap());
}

#[test]
fn test_set_parameters_rejects_wrong_shape() {
    let mut net = network(0);
    let before = net.parameters();

    let mut params = net.parameters();
    params.insert("fc2.weight", ndarray::ArrayD::zeros(IxDyn(&[8, 3])));
    match net.set_parameters(params) {
        Err(NavigatorError::DimensionMismatch { .. }) => {}
        other => panic!("expected DimensionMismatch, got {:?}", other),
    }
    assert_eq!(net.parameters(), before);
}

#[test]
fn test_train_step_reduces_loss() {
    let mut net = network(3);
    let observations = array![
        [0.5, -0.2, 0.1],
        [-0.3, 0.8, 0.0],
        [0.9, 0.1, -0.7],
        [0.0, 0.0, 0.4],
    ];
    let actions = [0, 1, 1, 0];
    let targets = array![1.0, -0.5, 0.25, 0.75];

    let first = net.train_step(observations.view(), &actions, targets.view(), 0.01).unwrap();
    let mut last = first;
    for _ in 0..300 {
        last = net.train_step(observations.view(), &actions, targets.view(), 0.01).unwrap();
    }

    assert!(first.is_finite());
    assert!(last < first, "loss did not decrease: {} -> {}", first, last);
}

#[test]
fn test_train_step_only_moves_taken_action_output_weights() {
    let mut net = network(4);
    let before = net.layers[1].weights.clone();
    let observations = array![[0.5, 0.5, 0.5]];

    net.train_step(observations.view(), &[1], array![10.0].view(), 0.1).unwrap();

    // Column 0 of the output layer belongs to the untaken action
    assert_eq!(net.layers[1].weights.column(0), before.column(0));
    assert_eq!(net.layers[1].biases[0], network(4).layers[1].biases[0]);
}

#[test]
fn test_train_step_rejects_non_finite_loss() {
    let mut net = network(0);
    let before = net.parameters();
    let observations = array![[0.1, 0.2, 0.3]];

    let result = net.train_step(observations.view(), &[0], array![f32::NAN].view(), 0.01);
    assert!(matches!(result, Err(NavigatorError::NumericalError(_))));
    assert_eq!(net.parameters(), before);
}

#[test]
fn test_train_step_rejects_invalid_action() {
    let mut net = network(0);
    let observations = array![[0.1, 0.2, 0.3]];
    let result = net.train_step(observations.view(), &[2], array![0.0].view(), 0.01);
    assert!(matches!(result, Err(NavigatorError::InvalidAction { action: 2, max_actions: 2 })));
}
