use ndarray::{s, Array1, Array2, Axis};

use crate::activation::sigmoid_scalar;
use crate::error::{check_shape, Result};

/// Forward intermediates of a single LSTM step.
///
/// Produced by [`lstm_step_forward`] and consumed, by value, by exactly one
/// call to [`lstm_step_backward`]. The four gate activations are stored
/// post-nonlinearity; `tanh(next_c)` is the only value the backward pass
/// recomputes.
#[derive(Debug, Clone)]
pub struct LstmStepCache {
    pub(crate) x: Array2<f64>,
    pub(crate) prev_h: Array2<f64>,
    pub(crate) prev_c: Array2<f64>,
    pub(crate) wx: Array2<f64>,
    pub(crate) wh: Array2<f64>,
    pub(crate) i: Array2<f64>,
    pub(crate) f: Array2<f64>,
    pub(crate) o: Array2<f64>,
    pub(crate) g: Array2<f64>,
    pub(crate) next_c: Array2<f64>,
}

/// Gradients of a single LSTM step, one per forward input.
#[derive(Debug, Clone)]
pub struct LstmStepGrads {
    /// Gradient with respect to the input minibatch, shape `(N, D)`.
    pub dx: Array2<f64>,
    /// Gradient with respect to the previous hidden state, shape `(N, H)`.
    pub dprev_h: Array2<f64>,
    /// Gradient with respect to the previous cell state, shape `(N, H)`.
    pub dprev_c: Array2<f64>,
    /// Gradient with respect to the input-to-hidden weights, shape `(D, 4H)`.
    pub dwx: Array2<f64>,
    /// Gradient with respect to the hidden-to-hidden weights, shape `(H, 4H)`.
    pub dwh: Array2<f64>,
    /// Gradient with respect to the bias, shape `(4H,)`.
    pub db: Array1<f64>,
}

/// Perform a single forward step of an LSTM.
///
/// Implements the standard LSTM equations:
/// - `a = x @ Wx + prev_h @ Wh + b`, shape `(N, 4H)`
/// - `i = sigmoid(a_i)`, `f = sigmoid(a_f)`, `o = sigmoid(a_o)`, `g = tanh(a_g)`
/// - `next_c = f * prev_c + i * g`
/// - `next_h = o * tanh(next_c)`
///
/// The `4H`-wide weight blocks are split in the fixed order
/// `[i | f | o | g]`, each block of width `H`. Callers supplying `Wx`,
/// `Wh` or `b` produced elsewhere must lay them out the same way.
///
/// # Arguments
/// * `x` - Input minibatch of shape `(N, D)`
/// * `prev_h` - Hidden state from the previous timestep, shape `(N, H)`
/// * `prev_c` - Cell state from the previous timestep, shape `(N, H)`
/// * `wx` - Input-to-hidden weights of shape `(D, 4H)`
/// * `wh` - Hidden-to-hidden weights of shape `(H, 4H)`
/// * `b` - Bias of shape `(4H,)`
///
/// # Returns
/// Tuple of (next hidden state, next cell state, cache for the backward
/// pass); both states have shape `(N, H)`
pub fn lstm_step_forward(
    x: &Array2<f64>,
    prev_h: &Array2<f64>,
    prev_c: &Array2<f64>,
    wx: &Array2<f64>,
    wh: &Array2<f64>,
    b: &Array1<f64>,
) -> Result<(Array2<f64>, Array2<f64>, LstmStepCache)> {
    let (n, d) = x.dim();
    let h = prev_h.ncols();
    check_shape("lstm_step_forward", &[n, h], prev_h.shape())?;
    check_shape("lstm_step_forward", &[n, h], prev_c.shape())?;
    check_shape("lstm_step_forward", &[d, 4 * h], wx.shape())?;
    check_shape("lstm_step_forward", &[h, 4 * h], wh.shape())?;
    check_shape("lstm_step_forward", &[4 * h], b.shape())?;

    // One fused multiply produces all four gate pre-activations
    let a = x.dot(wx) + prev_h.dot(wh) + b;

    // Split into the four gates and apply their nonlinearities
    let i = a.slice(s![.., ..h]).mapv(sigmoid_scalar);
    let f = a.slice(s![.., h..2 * h]).mapv(sigmoid_scalar);
    let o = a.slice(s![.., 2 * h..3 * h]).mapv(sigmoid_scalar);
    let g = a.slice(s![.., 3 * h..]).mapv(f64::tanh);

    // Update cell state: next_c = f * prev_c + i * g
    let next_c = &f * prev_c + &i * &g;

    // Update hidden state: next_h = o * tanh(next_c)
    let next_h = &o * &next_c.mapv(f64::tanh);

    let cache = LstmStepCache {
        x: x.clone(),
        prev_h: prev_h.clone(),
        prev_c: prev_c.clone(),
        wx: wx.clone(),
        wh: wh.clone(),
        i,
        f,
        o,
        g,
        next_c: next_c.clone(),
    };
    Ok((next_h, next_c, cache))
}

/// Perform the backward step matching [`lstm_step_forward`].
///
/// `dnext_c` is the cell-state gradient handed back from the later
/// timestep. It is added to the cell-state gradient induced through
/// `next_h`, never substituted for it:
/// - `dc = dnext_c + dnext_h * o * (1 - tanh(next_c)^2)`
/// - `dprev_c = dc * f`
/// - gate gradients `do = dnext_h * tanh(next_c)`, `df = dc * prev_c`,
///   `di = dc * g`, `dg = dc * i`, each converted through its own
///   nonlinearity derivative and packed back into the `(N, 4H)` layout
///
/// # Arguments
/// * `dnext_h` - Upstream gradient with respect to the hidden state, shape `(N, H)`
/// * `dnext_c` - Upstream gradient with respect to the cell state, shape `(N, H)`
/// * `cache` - Cache returned by the matching forward call
///
/// # Returns
/// Gradients for every forward input, each with the same shape as that input
pub fn lstm_step_backward(
    dnext_h: &Array2<f64>,
    dnext_c: &Array2<f64>,
    cache: LstmStepCache,
) -> Result<LstmStepGrads> {
    let LstmStepCache {
        x,
        prev_h,
        prev_c,
        wx,
        wh,
        i,
        f,
        o,
        g,
        next_c,
    } = cache;
    check_shape("lstm_step_backward", next_c.shape(), dnext_h.shape())?;
    check_shape("lstm_step_backward", next_c.shape(), dnext_c.shape())?;

    let (n, h) = next_c.dim();
    let tanh_next_c = next_c.mapv(f64::tanh);

    // Total cell-state gradient: external piece plus the piece flowing
    // through next_h = o * tanh(next_c)
    let dc = dnext_c + &(dnext_h * &o * &(1.0 - &tanh_next_c * &tanh_next_c));
    let dprev_c = &dc * &f;

    // Gradients at the gate outputs
    let do_gate = dnext_h * &tanh_next_c;
    let df = &dc * &prev_c;
    let di = &dc * &g;
    let dg = &dc * &i;

    // Through the gate nonlinearities, back to the pre-activations
    let da_i = di * &i * &(1.0 - &i);
    let da_f = df * &f * &(1.0 - &f);
    let da_o = do_gate * &o * &(1.0 - &o);
    let da_g = dg * &(1.0 - &g * &g);

    // Repack in the [i | f | o | g] layout the forward pass split from
    let mut da = Array2::<f64>::zeros((n, 4 * h));
    da.slice_mut(s![.., ..h]).assign(&da_i);
    da.slice_mut(s![.., h..2 * h]).assign(&da_f);
    da.slice_mut(s![.., 2 * h..3 * h]).assign(&da_o);
    da.slice_mut(s![.., 3 * h..]).assign(&da_g);

    Ok(LstmStepGrads {
        dx: da.dot(&wx.t()),
        dprev_h: da.dot(&wh.t()),
        dprev_c,
        dwx: x.t().dot(&da),
        dwh: prev_h.t().dot(&da),
        db: da.sum_axis(Axis(0)),
    })
}
