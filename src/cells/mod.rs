//! # Single-Timestep Recurrent Cells
//!
//! This module provides the per-timestep forward and backward kernels the
//! sequence layers in [`crate::rnn`] are built from. Each cell processes
//! one timestep of a minibatch and hands every intermediate the gradient
//! math needs to its caller through an opaque cache.
//!
//! ## Cell Types
//!
//! | Cell | Forward | State |
//! |------|---------|-------|
//! | vanilla RNN ([`rnn_step_forward`]) | `next_h = tanh(x @ Wx + prev_h @ Wh + b)` | hidden only |
//! | LSTM ([`lstm_step_forward`]) | gated update through `[i \| f \| o \| g]` | hidden + cell |
//!
//! ## When to Use Cells Directly
//!
//! Most callers should use [`rnn_forward`](crate::rnn::rnn_forward) or
//! [`lstm_forward`](crate::rnn::lstm_forward), which thread the recurrent
//! state across a full sequence and collect the per-step caches. Use the
//! cells directly when you need:
//!
//! - Custom sequence processing logic
//! - Truncated backpropagation with your own cache management
//! - A single-step sanity check against the sequence layers
//!
//! ## Tensor Shapes
//!
//! All cells work on 2D minibatch tensors for single-timestep processing:
//!
//! | Tensor | Shape | Description |
//! |--------|-------|-------------|
//! | `x` | `(N, D)` | Input features |
//! | `prev_h` | `(N, H)` | Previous hidden state |
//! | `prev_c` | `(N, H)` | Previous cell state (LSTM only) |
//! | `next_h` | `(N, H)` | Updated hidden state |
//!
//! The LSTM weight matrices are `4H` wide, split into four `H`-wide gate
//! blocks in the fixed order `[i | f | o | g]`.
//!
//! ## Example: One Step Forward and Back
//!
//! ```rust
//! use ndarray::{Array1, Array2};
//! use seqgrad::cells::{rnn_step_forward, rnn_step_backward};
//!
//! let x = Array2::from_elem((4, 3), 0.1);
//! let prev_h = Array2::zeros((4, 5));
//! let wx = Array2::from_elem((3, 5), 0.02);
//! let wh = Array2::from_elem((5, 5), -0.01);
//! let b = Array1::zeros(5);
//!
//! let (next_h, cache) = rnn_step_forward(&x, &prev_h, &wx, &wh, &b)?;
//! let dnext_h = Array2::ones(next_h.dim());
//! let grads = rnn_step_backward(&dnext_h, cache)?;
//! assert_eq!(grads.dx.dim(), x.dim());
//! # Ok::<(), seqgrad::LayerError>(())
//! ```

pub mod lstm_cell;
pub mod rnn_cell;

pub use lstm_cell::{lstm_step_backward, lstm_step_forward, LstmStepCache, LstmStepGrads};
pub use rnn_cell::{rnn_step_backward, rnn_step_forward, RnnStepCache, RnnStepGrads};
