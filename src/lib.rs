//! # seqgrad - Recurrent Layer Kernels with Exact Gradients
//!
//! Forward and analytic backward passes for the building blocks of
//! recurrent sequence models, on `ndarray` tensors of `f64`.
//!
//! ## Features
//!
//! - **Vanilla RNN**: tanh cell, single step and full sequence, with
//!   backpropagation through time
//! - **LSTM**: gated cell in the fixed `[i | f | o | g]` block layout,
//!   single step and full sequence
//! - **Word Embedding**: index lookup with accumulating scatter-add
//!   backward
//! - **Temporal Affine**: one fused projection across all timesteps
//! - **Temporal Softmax Loss**: masked, numerically stable, gradient
//!   returned with the loss
//! - **Gradient Checking**: centered finite differences for validating
//!   any backward pass
//!
//! Every forward call returns its output together with an opaque cache;
//! the paired backward call consumes that cache by value, so a cache can
//! be spent exactly once. Weights are plain caller-owned arrays; this
//! crate never allocates or updates parameters, it only computes outputs
//! and exact gradients.
//!
//! ## Quick Start
//!
//! ```rust
//! use ndarray::{Array1, Array2, Array3};
//! use seqgrad::prelude::*;
//!
//! // N=2 sequences, T=3 timesteps, D=4 features, H=5 hidden units
//! let x = Array3::from_elem((2, 3, 4), 0.1);
//! let h0 = Array2::zeros((2, 5));
//! let wx = Array2::from_elem((4, 5), 0.05);
//! let wh = Array2::from_elem((5, 5), -0.02);
//! let b = Array1::zeros(5);
//!
//! let (h, caches) = rnn_forward(&x, &h0, &wx, &wh, &b)?;
//! assert_eq!(h.dim(), (2, 3, 5));
//!
//! let dh = Array3::ones(h.dim());
//! let grads = rnn_backward(&dh, caches)?;
//! assert_eq!(grads.dwx.dim(), (4, 5));
//! # Ok::<(), seqgrad::LayerError>(())
//! ```
//!
//! ## Layer-level Usage
//!
//! A caption-model-style stack wires the layers together by hand:
//!
//! ```rust
//! use ndarray::{Array1, Array2, Array3};
//! use seqgrad::prelude::*;
//!
//! let words = ndarray::array![[0usize, 2, 1], [3, 3, 0]];
//! let w_embed = Array2::from_elem((4, 3), 0.1);
//!
//! let (x, _embed_cache) = word_embedding_forward(&words, &w_embed)?;
//! let h0 = Array2::zeros((2, 5));
//! let wx = Array2::from_elem((3, 20), 0.02);
//! let wh = Array2::from_elem((5, 20), 0.01);
//! let b = Array1::zeros(20);
//! let (h, _lstm_caches) = lstm_forward(&x, &h0, &wx, &wh, &b)?;
//!
//! assert_eq!(h.dim(), (2, 3, 5));
//! # Ok::<(), seqgrad::LayerError>(())
//! ```

pub mod activation;
pub mod cells;
pub mod embedding;
pub mod error;
pub mod gradcheck;
pub mod rnn;
pub mod temporal;

pub use error::{LayerError, Result};

pub mod prelude {
    pub use crate::activation::{sigmoid, sigmoid_scalar};
    pub use crate::cells::{
        lstm_step_backward, lstm_step_forward, rnn_step_backward, rnn_step_forward, LstmStepCache,
        LstmStepGrads, RnnStepCache, RnnStepGrads,
    };
    pub use crate::embedding::{word_embedding_backward, word_embedding_forward, WordEmbeddingCache};
    pub use crate::error::{LayerError, Result};
    pub use crate::rnn::{lstm_backward, lstm_forward, rnn_backward, rnn_forward, LstmGrads, RnnGrads};
    pub use crate::temporal::{
        temporal_affine_backward, temporal_affine_forward, temporal_softmax_loss,
        TemporalAffineCache, TemporalAffineGrads,
    };
}
