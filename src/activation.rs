//! Numerically stable activation functions.
//!
//! This module provides the sigmoid activation used by the gate math in
//! [`crate::cells`], written so that it never overflows in `exp`.

use ndarray::{Array, Dimension};

/// Numerically stable logistic sigmoid for a single value.
///
/// The function is defined as:
/// `sigmoid(x) = 1 / (1 + exp(-x))`
///
/// Evaluating that formula directly overflows `exp` for large negative
/// inputs, so the two half-lines are computed separately:
/// - For `x >= 0` the usual form `1 / (1 + exp(-x))` is used
/// - For `x < 0` the equivalent form `exp(x) / (1 + exp(x))` is used
///
/// Either way the exponential only ever sees a non-positive argument, so
/// the result is finite for every finite input, saturating at exactly
/// `1.0` and `0.0` in the extremes.
///
/// # Example
///
/// ```rust
/// use seqgrad::activation::sigmoid_scalar;
///
/// assert!((sigmoid_scalar(0.0) - 0.5).abs() < 1e-12);
/// assert_eq!(sigmoid_scalar(1000.0), 1.0);
/// assert_eq!(sigmoid_scalar(-1000.0), 0.0);
/// ```
pub fn sigmoid_scalar(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}

/// Applies the stable sigmoid element-wise to an array of any dimension.
///
/// # Arguments
///
/// * `x` - Input array of any dimension
///
/// # Returns
///
/// Array of the same shape with [`sigmoid_scalar`] applied element-wise
pub fn sigmoid<D: Dimension>(x: &Array<f64, D>) -> Array<f64, D> {
    x.mapv(sigmoid_scalar)
}
