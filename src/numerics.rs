use ndarray::{ArrayBase, Data, Dimension};

use crate::error::{NavigatorError, Result};

/// Count NaN and infinite values in an array.
pub fn count_non_finite<S, D>(array: &ArrayBase<S, D>) -> (usize, usize)
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    array.iter().fold((0, 0), |(nan, inf), &value| {
        if value.is_nan() {
            (nan + 1, inf)
        } else if value.is_infinite() {
            (nan, inf + 1)
        } else {
            (nan, inf)
        }
    })
}

/// Fail with `NumericalError` if `array` holds any NaN or infinite value.
pub fn ensure_finite<S, D>(what: &str, array: &ArrayBase<S, D>) -> Result<()>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    match count_non_finite(array) {
        (0, 0) => Ok(()),
        (nan, inf) => Err(NavigatorError::NumericalError(format!(
            "{}: found {} NaN and {} infinite values",
            what, nan, inf
        ))),
    }
}

/// Fail with `NumericalError` if a scalar is NaN or infinite.
pub fn ensure_finite_scalar(what: &str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(NavigatorError::NumericalError(format!("{} is {}", what, value)))
    }
}
