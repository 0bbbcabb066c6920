//! Mean-squared-error loss over the action-values actually taken.

use ndarray::{Array2, ArrayView1, ArrayView2};

/// Gather `q_values[i, actions[i]]` for every row.
pub fn gather_actions(q_values: ArrayView2<f32>, actions: &[usize]) -> Vec<f32> {
    actions
        .iter()
        .enumerate()
        .map(|(row, &action)| q_values[[row, action]])
        .collect()
}

/// `mean((q - y)^2)` where `q` are the selected action-values.
pub fn mse(predictions: &[f32], targets: ArrayView1<f32>) -> f32 {
    let n = predictions.len().max(1) as f32;
    predictions
        .iter()
        .zip(targets.iter())
        .map(|(q, y)| (q - y) * (q - y))
        .sum::<f32>()
        / n
}

/// Gradient of [`mse`] with respect to the full output matrix.
///
/// Only the taken action in each row receives error; the targets are
/// constants, so nothing flows back toward whoever produced them.
pub fn mse_gradient(
    q_values: ArrayView2<f32>,
    actions: &[usize],
    targets: ArrayView1<f32>,
) -> Array2<f32> {
    let n = actions.len().max(1) as f32;
    let mut grad = Array2::zeros(q_values.dim());
    for (row, (&action, &target)) in actions.iter().zip(targets.iter()).enumerate() {
        grad[[row, action]] = 2.0 * (q_values[[row, action]] - target) / n;
    }
    grad
}
