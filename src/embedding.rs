//! Word embedding lookup and its scatter-add backward pass.
//!
//! Maps integer word indices to rows of an embedding matrix. The backward
//! pass accumulates into the selected rows, so a word appearing several
//! times in a minibatch collects the sum of all its occurrence gradients.

use ndarray::{s, Array2, Array3};

use crate::error::{check_shape, LayerError, Result};

/// Forward intermediates of an embedding lookup.
///
/// Holds the index matrix and the embedding dimensions; the backward pass
/// never needs the embedding values themselves.
#[derive(Debug, Clone)]
pub struct WordEmbeddingCache {
    pub(crate) x: Array2<usize>,
    pub(crate) vocab: usize,
    pub(crate) dim: usize,
}

/// Look up embedding vectors for a minibatch of word index sequences.
///
/// `out[n, t, :] = w[x[n, t], :]` for every `(n, t)` position.
///
/// # Arguments
/// * `x` - Word indices of shape `(N, T)`, each in `[0, V)`
/// * `w` - Embedding matrix of shape `(V, D)`, one row per vocabulary word
///
/// # Returns
/// Tuple of (embedded sequence of shape `(N, T, D)`, cache for the
/// backward pass), or [`LayerError::IndexOutOfRange`] on the first index
/// at or beyond `V`
pub fn word_embedding_forward(
    x: &Array2<usize>,
    w: &Array2<f64>,
) -> Result<(Array3<f64>, WordEmbeddingCache)> {
    let (n, t_len) = x.dim();
    let (v, d) = w.dim();

    let mut out = Array3::<f64>::zeros((n, t_len, d));
    for ((row, t), &word) in x.indexed_iter() {
        if word >= v {
            return Err(LayerError::IndexOutOfRange {
                op: "word_embedding_forward",
                index: word,
                size: v,
            });
        }
        out.slice_mut(s![row, t, ..]).assign(&w.row(word));
    }

    let cache = WordEmbeddingCache {
        x: x.clone(),
        vocab: v,
        dim: d,
    };
    Ok((out, cache))
}

/// Run the backward pass matching [`word_embedding_forward`].
///
/// Produces the gradient with respect to the embedding matrix only; the
/// integer indices have no gradient. Each `dout[n, t, :]` slice is added
/// into row `x[n, t]` of the result, and repeated indices accumulate.
/// Plain indexed assignment would silently keep only the last occurrence.
///
/// # Arguments
/// * `dout` - Upstream gradient of shape `(N, T, D)`
/// * `cache` - Cache returned by the matching forward call
///
/// # Returns
/// Gradient with respect to the embedding matrix, shape `(V, D)`
pub fn word_embedding_backward(
    dout: &Array3<f64>,
    cache: WordEmbeddingCache,
) -> Result<Array2<f64>> {
    let WordEmbeddingCache { x, vocab, dim } = cache;
    let (n, t_len) = x.dim();
    check_shape("word_embedding_backward", &[n, t_len, dim], dout.shape())?;

    let mut dw = Array2::<f64>::zeros((vocab, dim));
    for ((row, t), &word) in x.indexed_iter() {
        let mut dw_row = dw.row_mut(word);
        dw_row += &dout.slice(s![row, t, ..]);
    }
    Ok(dw)
}
