//! LSTM layer over full sequences.
//!
//! Threads both hidden and cell state across timesteps. The cell state is
//! an internal detail of this layer: it starts at zero for every call and
//! is never part of the returned outputs.

use ndarray::{Array1, Array2, Array3, Axis};

use crate::cells::{lstm_step_backward, lstm_step_forward, LstmStepCache};
use crate::error::{check_shape, LayerError, Result};

/// Gradients of a full LSTM sequence pass, one per forward input.
#[derive(Debug, Clone)]
pub struct LstmGrads {
    /// Gradient with respect to the input sequence, shape `(N, T, D)`.
    pub dx: Array3<f64>,
    /// Gradient with respect to the initial hidden state, shape `(N, H)`.
    pub dh0: Array2<f64>,
    /// Gradient with respect to the input-to-hidden weights, shape `(D, 4H)`.
    pub dwx: Array2<f64>,
    /// Gradient with respect to the hidden-to-hidden weights, shape `(H, 4H)`.
    pub dwh: Array2<f64>,
    /// Gradient with respect to the bias, shape `(4H,)`.
    pub db: Array1<f64>,
}

/// Run an LSTM forward over an entire sequence.
///
/// The cell state is initialized to zeros of the same shape as `h0`; no
/// caller-supplied cell state is accepted and none is returned. Callers
/// that need the per-step hidden states get all of them in the output.
///
/// # Arguments
/// * `x` - Input sequence of shape `(N, T, D)`
/// * `h0` - Initial hidden state of shape `(N, H)`
/// * `wx` - Input-to-hidden weights of shape `(D, 4H)`
/// * `wh` - Hidden-to-hidden weights of shape `(H, 4H)`
/// * `b` - Bias of shape `(4H,)`
///
/// # Returns
/// Tuple of (hidden states for every timestep, shape `(N, T, H)`, and the
/// per-step caches in timestep order, length exactly `T`)
pub fn lstm_forward(
    x: &Array3<f64>,
    h0: &Array2<f64>,
    wx: &Array2<f64>,
    wh: &Array2<f64>,
    b: &Array1<f64>,
) -> Result<(Array3<f64>, Vec<LstmStepCache>)> {
    let (n, t_len, d) = x.dim();
    if t_len == 0 {
        return Err(LayerError::EmptySequence { op: "lstm_forward" });
    }
    let h = h0.ncols();
    check_shape("lstm_forward", &[n, h], h0.shape())?;
    check_shape("lstm_forward", &[d, 4 * h], wx.shape())?;
    check_shape("lstm_forward", &[h, 4 * h], wh.shape())?;
    check_shape("lstm_forward", &[4 * h], b.shape())?;

    let mut out = Array3::<f64>::zeros((n, t_len, h));
    let mut caches = Vec::with_capacity(t_len);
    let mut prev_h = h0.clone();
    // Fresh zero cell state per call; it never crosses the layer boundary.
    let mut prev_c = Array2::<f64>::zeros(h0.raw_dim());

    for t in 0..t_len {
        let x_t = x.index_axis(Axis(1), t).to_owned();
        let (next_h, next_c, cache) = lstm_step_forward(&x_t, &prev_h, &prev_c, wx, wh, b)?;
        out.index_axis_mut(Axis(1), t).assign(&next_h);
        caches.push(cache);
        prev_h = next_h;
        prev_c = next_c;
    }

    Ok((out, caches))
}

/// Run the backward pass matching [`lstm_forward`].
///
/// Walks timesteps from last to first carrying two running gradients:
/// `dprev_h` joins the external `dh[:, t, :]` as the hidden-state input
/// to each step backward, and `dprev_c` is passed through as that step's
/// upstream cell-state gradient. Both start at zero because nothing
/// downstream of the final timestep feeds either state.
///
/// # Arguments
/// * `dh` - Per-timestep upstream gradients of shape `(N, T, H)`
/// * `caches` - The per-step caches from the matching forward call
///
/// # Returns
/// [`LstmGrads`] with weight gradients summed across timesteps
pub fn lstm_backward(dh: &Array3<f64>, caches: Vec<LstmStepCache>) -> Result<LstmGrads> {
    if caches.is_empty() {
        return Err(LayerError::EmptySequence { op: "lstm_backward" });
    }
    let t_len = caches.len();
    let (n, h) = caches[0].next_c.dim();
    let d = caches[0].x.ncols();
    check_shape("lstm_backward", &[n, t_len, h], dh.shape())?;

    let mut dx = Array3::<f64>::zeros((n, t_len, d));
    let mut dwx = Array2::<f64>::zeros((d, 4 * h));
    let mut dwh = Array2::<f64>::zeros((h, 4 * h));
    let mut db = Array1::<f64>::zeros(4 * h);
    let mut dprev_h = Array2::<f64>::zeros((n, h));
    let mut dprev_c = Array2::<f64>::zeros((n, h));

    for (t, cache) in caches.into_iter().enumerate().rev() {
        let dh_t = dh.index_axis(Axis(1), t);
        let dnext_h = &dh_t + &dprev_h;
        let grads = lstm_step_backward(&dnext_h, &dprev_c, cache)?;

        dx.index_axis_mut(Axis(1), t).assign(&grads.dx);
        dwx += &grads.dwx;
        dwh += &grads.dwh;
        db += &grads.db;
        dprev_h = grads.dprev_h;
        dprev_c = grads.dprev_c;
    }

    Ok(LstmGrads {
        dx,
        dh0: dprev_h,
        dwx,
        dwh,
        db,
    })
}
