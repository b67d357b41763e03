//! Finite-difference gradient checking.
//!
//! Centered-difference approximations for verifying the analytic backward
//! passes, plus the relative-error metric used to compare them. Every
//! backward function in this crate is validated against these utilities
//! in the integration tests; they are public so downstream layers can be
//! checked the same way.

use ndarray::{Array, Dimension, NdIndex};

/// Centered finite-difference gradient of a scalar-valued function with
/// respect to an array input.
///
/// Perturbs one element at a time by `step` in both directions and
/// evaluates `(f(x + step) - f(x - step)) / (2 * step)`. The probe array
/// is restored between elements, so `f` always sees `x` with exactly one
/// element displaced.
///
/// # Arguments
/// * `f` - Scalar function of the full array, evaluated `2 * len` times
/// * `x` - Point at which to take the gradient
/// * `step` - Displacement per element; `1e-5` is a good default for f64
pub fn numeric_gradient<D, F>(mut f: F, x: &Array<f64, D>, step: f64) -> Array<f64, D>
where
    D: Dimension,
    D::Pattern: NdIndex<D> + Clone,
    F: FnMut(&Array<f64, D>) -> f64,
{
    let mut grad = Array::<f64, D>::zeros(x.raw_dim());
    let mut probe = x.clone();
    let patterns: Vec<D::Pattern> = x.indexed_iter().map(|(p, _)| p).collect();

    for p in patterns {
        let orig = probe[p.clone()];
        probe[p.clone()] = orig + step;
        let plus = f(&probe);
        probe[p.clone()] = orig - step;
        let minus = f(&probe);
        probe[p.clone()] = orig;
        grad[p] = (plus - minus) / (2.0 * step);
    }
    grad
}

/// Centered finite-difference derivative of a scalar function at a point.
pub fn numeric_gradient_scalar<F>(mut f: F, x: f64, step: f64) -> f64
where
    F: FnMut(f64) -> f64,
{
    (f(x + step) - f(x - step)) / (2.0 * step)
}

/// Worst-case relative error between two arrays of the same shape.
///
/// `max |a - b| / max(|a| + |b|, 1e-8)` over all elements, the usual
/// gradient-check metric: scale-free for large values, absolute near
/// zero.
pub fn rel_error<D: Dimension>(a: &Array<f64, D>, b: &Array<f64, D>) -> f64 {
    debug_assert_eq!(a.shape(), b.shape());
    let mut worst = 0.0_f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let denom = (x.abs() + y.abs()).max(1e-8);
        worst = worst.max((x - y).abs() / denom);
    }
    worst
}
