use ndarray::{Array1, Array2, Axis};

use crate::error::{check_shape, Result};

/// Forward intermediates of a single vanilla RNN step.
///
/// Produced by [`rnn_step_forward`] and consumed, by value, by exactly one
/// call to [`rnn_step_backward`]. The fields are the values the backward
/// math reads; in particular `next_h` carries the tanh output so the
/// derivative `1 - next_h^2` needs no recomputation of the activation.
#[derive(Debug, Clone)]
pub struct RnnStepCache {
    pub(crate) x: Array2<f64>,
    pub(crate) prev_h: Array2<f64>,
    pub(crate) wx: Array2<f64>,
    pub(crate) wh: Array2<f64>,
    pub(crate) next_h: Array2<f64>,
}

/// Gradients of a single vanilla RNN step, one per forward input.
#[derive(Debug, Clone)]
pub struct RnnStepGrads {
    /// Gradient with respect to the input minibatch, shape `(N, D)`.
    pub dx: Array2<f64>,
    /// Gradient with respect to the previous hidden state, shape `(N, H)`.
    pub dprev_h: Array2<f64>,
    /// Gradient with respect to the input-to-hidden weights, shape `(D, H)`.
    pub dwx: Array2<f64>,
    /// Gradient with respect to the hidden-to-hidden weights, shape `(H, H)`.
    pub dwh: Array2<f64>,
    /// Gradient with respect to the bias, shape `(H,)`.
    pub db: Array1<f64>,
}

/// Perform a single forward step of a vanilla RNN with tanh activation.
///
/// Implements:
/// - `next_h = tanh(x @ Wx + prev_h @ Wh + b)`
///
/// # Arguments
/// * `x` - Input minibatch of shape `(N, D)`
/// * `prev_h` - Hidden state from the previous timestep, shape `(N, H)`
/// * `wx` - Input-to-hidden weights of shape `(D, H)`
/// * `wh` - Hidden-to-hidden weights of shape `(H, H)`
/// * `b` - Bias of shape `(H,)`
///
/// # Returns
/// Tuple of (next hidden state of shape `(N, H)`, cache for the backward
/// pass), or a [`crate::LayerError::ShapeMismatch`] when the arguments do
/// not agree on `N`, `D` or `H`.
pub fn rnn_step_forward(
    x: &Array2<f64>,
    prev_h: &Array2<f64>,
    wx: &Array2<f64>,
    wh: &Array2<f64>,
    b: &Array1<f64>,
) -> Result<(Array2<f64>, RnnStepCache)> {
    let (n, d) = x.dim();
    let h = wx.ncols();
    check_shape("rnn_step_forward", &[d, h], wx.shape())?;
    check_shape("rnn_step_forward", &[n, h], prev_h.shape())?;
    check_shape("rnn_step_forward", &[h, h], wh.shape())?;
    check_shape("rnn_step_forward", &[h], b.shape())?;

    let pre = x.dot(wx) + prev_h.dot(wh) + b;
    let next_h = pre.mapv(f64::tanh);

    let cache = RnnStepCache {
        x: x.clone(),
        prev_h: prev_h.clone(),
        wx: wx.clone(),
        wh: wh.clone(),
        next_h: next_h.clone(),
    };
    Ok((next_h, cache))
}

/// Perform the backward step matching [`rnn_step_forward`].
///
/// The tanh derivative is taken through the cached output, then the
/// gradient is pushed through both affine arms:
/// - `dpre = dnext_h * (1 - next_h^2)`
/// - `dx = dpre @ Wx^T`, `dprev_h = dpre @ Wh^T`
/// - `dWx = x^T @ dpre`, `dWh = prev_h^T @ dpre`, `db = sum_rows(dpre)`
///
/// # Arguments
/// * `dnext_h` - Upstream gradient with respect to the step output, shape `(N, H)`
/// * `cache` - Cache returned by the matching forward call
///
/// # Returns
/// Gradients for every forward input, each with the same shape as that input
pub fn rnn_step_backward(dnext_h: &Array2<f64>, cache: RnnStepCache) -> Result<RnnStepGrads> {
    let RnnStepCache {
        x,
        prev_h,
        wx,
        wh,
        next_h,
    } = cache;
    check_shape("rnn_step_backward", next_h.shape(), dnext_h.shape())?;

    // tanh'(pre) expressed through the activation output itself
    let dpre = dnext_h * &(1.0 - &next_h * &next_h);

    Ok(RnnStepGrads {
        dx: dpre.dot(&wx.t()),
        dprev_h: dpre.dot(&wh.t()),
        dwx: x.t().dot(&dpre),
        dwh: prev_h.t().dot(&dpre),
        db: dpre.sum_axis(Axis(0)),
    })
}
