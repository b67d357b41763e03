//! Per-timestep layers with no recurrence.
//!
//! Both layers here treat the time axis as an extra batch axis: the
//! affine projection runs one fused matrix multiply over the flattened
//! `(N*T, D)` view, and the softmax loss scores every `(n, t)` position
//! independently, honoring a mask for padded positions.

use ndarray::{Array1, Array2, Array3, Axis, CowArray, Ix2};

use crate::error::{check_shape, LayerError, Result};

/// Forward intermediates of the temporal affine projection.
#[derive(Debug, Clone)]
pub struct TemporalAffineCache {
    pub(crate) x: Array3<f64>,
    pub(crate) w: Array2<f64>,
}

/// Gradients of the temporal affine projection, one per forward input.
#[derive(Debug, Clone)]
pub struct TemporalAffineGrads {
    /// Gradient with respect to the input, shape `(N, T, D)`.
    pub dx: Array3<f64>,
    /// Gradient with respect to the weights, shape `(D, M)`.
    pub dw: Array2<f64>,
    /// Gradient with respect to the bias, shape `(M,)`.
    pub db: Array1<f64>,
}

fn flat_view<'a>(op: &'static str, x: &'a Array3<f64>) -> Result<CowArray<'a, f64, Ix2>> {
    let (n, t_len, m) = x.dim();
    x.to_shape((n * t_len, m))
        .map_err(|_| LayerError::ShapeMismatch {
            op,
            expected: vec![n * t_len, m],
            actual: x.shape().to_vec(),
        })
}

fn unflat(op: &'static str, a: Array2<f64>, dims: (usize, usize, usize)) -> Result<Array3<f64>> {
    let actual = a.shape().to_vec();
    a.into_shape_with_order(dims)
        .map_err(|_| LayerError::ShapeMismatch {
            op,
            expected: vec![dims.0, dims.1, dims.2],
            actual,
        })
}

/// Apply an affine projection to every timestep of a sequence.
///
/// `out[n, t, :] = x[n, t, :] @ w + b`, computed as a single matrix
/// multiply over the flattened `(N*T, D)` view rather than `T` separate
/// ones.
///
/// # Arguments
/// * `x` - Input sequence of shape `(N, T, D)`
/// * `w` - Projection weights of shape `(D, M)`
/// * `b` - Bias of shape `(M,)`
///
/// # Returns
/// Tuple of (projected sequence of shape `(N, T, M)`, cache for the
/// backward pass)
pub fn temporal_affine_forward(
    x: &Array3<f64>,
    w: &Array2<f64>,
    b: &Array1<f64>,
) -> Result<(Array3<f64>, TemporalAffineCache)> {
    let (n, t_len, d) = x.dim();
    let m = w.ncols();
    check_shape("temporal_affine_forward", &[d, m], w.shape())?;
    check_shape("temporal_affine_forward", &[m], b.shape())?;

    let x_flat = flat_view("temporal_affine_forward", x)?;
    let out_flat = x_flat.dot(w) + b;
    let out = unflat("temporal_affine_forward", out_flat, (n, t_len, m))?;

    let cache = TemporalAffineCache {
        x: x.clone(),
        w: w.clone(),
    };
    Ok((out, cache))
}

/// Run the backward pass matching [`temporal_affine_forward`].
///
/// Standard affine gradients through the flattened views; `db` sums over
/// both the batch and time axes.
///
/// # Arguments
/// * `dout` - Upstream gradient of shape `(N, T, M)`
/// * `cache` - Cache returned by the matching forward call
pub fn temporal_affine_backward(
    dout: &Array3<f64>,
    cache: TemporalAffineCache,
) -> Result<TemporalAffineGrads> {
    let TemporalAffineCache { x, w } = cache;
    let (n, t_len, d) = x.dim();
    let m = w.ncols();
    check_shape("temporal_affine_backward", &[n, t_len, m], dout.shape())?;

    let dout_flat = flat_view("temporal_affine_backward", dout)?;
    let x_flat = flat_view("temporal_affine_backward", &x)?;

    let dx_flat = dout_flat.dot(&w.t());
    let dx = unflat("temporal_affine_backward", dx_flat, (n, t_len, d))?;

    Ok(TemporalAffineGrads {
        dx,
        dw: x_flat.t().dot(&dout_flat),
        db: dout_flat.sum_axis(Axis(0)),
    })
}

/// Cross-entropy loss over every unmasked `(n, t)` position, with its
/// gradient.
///
/// A numerically stable softmax (row max subtracted before
/// exponentiating) scores each position's `V` classes; the negative log
/// likelihood of the target class is summed over positions where `mask`
/// is `true` and divided by `N`. Time does not enter the normalization:
/// longer sequences weigh more, matching the sum-over-time convention of
/// the recurrent layers.
///
/// There is no separate backward call. The gradient with respect to `x`,
/// `(softmax - one_hot(y)) / N` with masked positions zeroed, comes back
/// alongside the loss.
///
/// # Arguments
/// * `x` - Class scores of shape `(N, T, V)`
/// * `y` - Target class indices of shape `(N, T)`, each in `[0, V)`
/// * `mask` - `(N, T)` selector; `false` marks padding that contributes
///   nothing to loss or gradient
///
/// # Returns
/// Tuple of (scalar loss, gradient with respect to `x` of shape
/// `(N, T, V)`)
pub fn temporal_softmax_loss(
    x: &Array3<f64>,
    y: &Array2<usize>,
    mask: &Array2<bool>,
) -> Result<(f64, Array3<f64>)> {
    let (n, t_len, v) = x.dim();
    check_shape("temporal_softmax_loss", &[n, t_len], y.shape())?;
    check_shape("temporal_softmax_loss", &[n, t_len], mask.shape())?;

    let x_flat = flat_view("temporal_softmax_loss", x)?;

    // Stable softmax per flattened row
    let mut probs = x_flat.to_owned();
    for mut row in probs.rows_mut() {
        let max = row.fold(f64::NEG_INFINITY, |m, &s| m.max(s));
        row.mapv_inplace(|s| (s - max).exp());
        let sum = row.sum();
        row.mapv_inplace(|p| p / sum);
    }

    let mut loss = 0.0;
    let mut dx_flat = probs;
    for ((row, t), &label) in y.indexed_iter() {
        if label >= v {
            return Err(LayerError::IndexOutOfRange {
                op: "temporal_softmax_loss",
                index: label,
                size: v,
            });
        }
        let r = row * t_len + t;
        if mask[[row, t]] {
            loss -= dx_flat[[r, label]].ln();
            dx_flat[[r, label]] -= 1.0;
        } else {
            dx_flat.row_mut(r).fill(0.0);
        }
    }

    loss /= n as f64;
    dx_flat.mapv_inplace(|g| g / n as f64);

    let dx = unflat("temporal_softmax_loss", dx_flat, (n, t_len, v))?;
    Ok((loss, dx))
}
