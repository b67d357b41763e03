//! Vanilla RNN layer over full sequences.
//!
//! Runs the tanh RNN cell across every timestep of a minibatch of
//! sequences, then replays the recurrence in reverse for exact gradients.

use ndarray::{Array1, Array2, Array3, Axis};

use crate::cells::{rnn_step_backward, rnn_step_forward, RnnStepCache};
use crate::error::{check_shape, LayerError, Result};

/// Gradients of a full RNN sequence pass, one per forward input.
///
/// Weight gradients are summed over all timesteps; `dx` keeps one slice
/// per timestep and `dh0` is the gradient that reaches the initial state.
#[derive(Debug, Clone)]
pub struct RnnGrads {
    /// Gradient with respect to the input sequence, shape `(N, T, D)`.
    pub dx: Array3<f64>,
    /// Gradient with respect to the initial hidden state, shape `(N, H)`.
    pub dh0: Array2<f64>,
    /// Gradient with respect to the input-to-hidden weights, shape `(D, H)`.
    pub dwx: Array2<f64>,
    /// Gradient with respect to the hidden-to-hidden weights, shape `(H, H)`.
    pub dwh: Array2<f64>,
    /// Gradient with respect to the bias, shape `(H,)`.
    pub db: Array1<f64>,
}

/// Run a vanilla RNN forward over an entire sequence.
///
/// Timestep `0` consumes `h0`; every later timestep consumes the hidden
/// state produced just before it. The same weights drive all `T` steps.
///
/// # Arguments
/// * `x` - Input sequence of shape `(N, T, D)`
/// * `h0` - Initial hidden state of shape `(N, H)`
/// * `wx` - Input-to-hidden weights of shape `(D, H)`
/// * `wh` - Hidden-to-hidden weights of shape `(H, H)`
/// * `b` - Bias of shape `(H,)`
///
/// # Returns
/// Tuple of (hidden states for every timestep, shape `(N, T, H)`, and the
/// per-step caches in timestep order, length exactly `T`)
pub fn rnn_forward(
    x: &Array3<f64>,
    h0: &Array2<f64>,
    wx: &Array2<f64>,
    wh: &Array2<f64>,
    b: &Array1<f64>,
) -> Result<(Array3<f64>, Vec<RnnStepCache>)> {
    let (n, t_len, d) = x.dim();
    if t_len == 0 {
        return Err(LayerError::EmptySequence { op: "rnn_forward" });
    }
    let h = h0.ncols();
    check_shape("rnn_forward", &[n, h], h0.shape())?;
    check_shape("rnn_forward", &[d, h], wx.shape())?;
    check_shape("rnn_forward", &[h, h], wh.shape())?;
    check_shape("rnn_forward", &[h], b.shape())?;

    let mut out = Array3::<f64>::zeros((n, t_len, h));
    let mut caches = Vec::with_capacity(t_len);
    let mut prev_h = h0.clone();

    for t in 0..t_len {
        let x_t = x.index_axis(Axis(1), t).to_owned();
        let (next_h, cache) = rnn_step_forward(&x_t, &prev_h, wx, wh, b)?;
        out.index_axis_mut(Axis(1), t).assign(&next_h);
        caches.push(cache);
        prev_h = next_h;
    }

    Ok((out, caches))
}

/// Run the backward pass matching [`rnn_forward`].
///
/// `dh` carries the *external* gradient injected at each timestep's
/// output (from a loss layer, say), not the gradient flowing between
/// timesteps. The walk goes from the last timestep down to the first; at
/// each step, the gradient fed into the cell backward is the external
/// `dh[:, t, :]` plus the `dprev_h` carried back from the step after it.
///
/// # Arguments
/// * `dh` - Per-timestep upstream gradients of shape `(N, T, H)`
/// * `caches` - The per-step caches from the matching forward call
///
/// # Returns
/// [`RnnGrads`] with weight gradients summed across timesteps
pub fn rnn_backward(dh: &Array3<f64>, caches: Vec<RnnStepCache>) -> Result<RnnGrads> {
    if caches.is_empty() {
        return Err(LayerError::EmptySequence { op: "rnn_backward" });
    }
    let t_len = caches.len();
    let (n, h) = caches[0].next_h.dim();
    let d = caches[0].x.ncols();
    check_shape("rnn_backward", &[n, t_len, h], dh.shape())?;

    let mut dx = Array3::<f64>::zeros((n, t_len, d));
    let mut dwx = Array2::<f64>::zeros((d, h));
    let mut dwh = Array2::<f64>::zeros((h, h));
    let mut db = Array1::<f64>::zeros(h);
    // Hidden-state gradient only flows backward through time, so the
    // carried piece starts at zero for the last timestep.
    let mut dprev_h = Array2::<f64>::zeros((n, h));

    for (t, cache) in caches.into_iter().enumerate().rev() {
        let dh_t = dh.index_axis(Axis(1), t);
        let dnext_h = &dh_t + &dprev_h;
        let grads = rnn_step_backward(&dnext_h, cache)?;

        dx.index_axis_mut(Axis(1), t).assign(&grads.dx);
        dwx += &grads.dwx;
        dwh += &grads.dwh;
        db += &grads.db;
        dprev_h = grads.dprev_h;
    }

    Ok(RnnGrads {
        dx,
        dh0: dprev_h,
        dwx,
        dwh,
        db,
    })
}
