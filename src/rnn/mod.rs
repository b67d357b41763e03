//! # Recurrent Layers for Sequence Processing
//!
//! This module provides the full-sequence forward and backward passes
//! built on the single-step cells in [`crate::cells`]. **These are the
//! primary APIs most users should call.**
//!
//! ## Available Layers
//!
//! | Layer | Forward | Backward | Recurrent State |
//! |-------|---------|----------|-----------------|
//! | vanilla RNN | [`rnn_forward`] | [`rnn_backward`] | hidden `h` |
//! | LSTM | [`lstm_forward`] | [`lstm_backward`] | hidden `h` + internal cell `c` |
//!
//! ## Quick Start
//!
//! ```rust
//! use ndarray::{Array1, Array2, Array3};
//! use seqgrad::rnn::{rnn_forward, rnn_backward};
//!
//! // Sequence: batch N=4, T=10 timesteps, D=16 features, H=32 hidden
//! let x = Array3::from_elem((4, 10, 16), 0.01);
//! let h0 = Array2::zeros((4, 32));
//! let wx = Array2::from_elem((16, 32), 0.02);
//! let wh = Array2::from_elem((32, 32), -0.01);
//! let b = Array1::zeros(32);
//!
//! let (h, caches) = rnn_forward(&x, &h0, &wx, &wh, &b)?;
//! // h: (4, 10, 32) - hidden state at every timestep
//!
//! // Upstream gradient injected at every timestep's output
//! let dh = Array3::ones(h.dim());
//! let grads = rnn_backward(&dh, caches)?;
//! // grads.dx: (4, 10, 16), grads.dwx summed over all timesteps
//! # Ok::<(), seqgrad::LayerError>(())
//! ```
//!
//! ## Tensor Shapes
//!
//! | Tensor | Shape | Description |
//! |--------|-------|-------------|
//! | `x` | `(N, T, D)` | Batch-first input sequence |
//! | `h0` | `(N, H)` | Initial hidden state |
//! | output | `(N, T, H)` | Hidden state at every timestep |
//! | `dh` | `(N, T, H)` | External per-timestep gradient |
//!
//! ## The Backward Contract
//!
//! `dh` is the gradient a downstream consumer (a projection, a loss)
//! injects at each timestep's *output*. The gradient that flows from
//! timestep `t+1` back into timestep `t` is handled internally by the
//! reverse walk; callers never see it. Weight gradients come back summed
//! over the whole sequence and `dx` keeps one slice per timestep. `dh0`
//! is whatever reaches the initial state.
//!
//! ## Stateful Processing
//!
//! Hidden state can be carried across calls by feeding the last output
//! slice of one call as the `h0` of the next. The LSTM's cell state
//! cannot: it always starts at zero inside [`lstm_forward`] and is never
//! returned, so each call is an independent sequence.

pub mod lstm;
pub mod vanilla;

pub use lstm::{lstm_backward, lstm_forward, LstmGrads};
pub use vanilla::{rnn_backward, rnn_forward, RnnGrads};
