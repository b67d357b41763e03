//! End-to-end pipeline example: embedding -> LSTM -> projection -> loss
//!
//! This example wires the layers into the forward pass of a small
//! caption-model-style network, then runs the full backward chain and
//! spot-checks one analytic gradient against finite differences.

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use seqgrad::gradcheck::{numeric_gradient, rel_error};
use seqgrad::prelude::*;

fn randn2(rng: &mut StdRng, dim: (usize, usize), scale: f64) -> Array2<f64> {
    Array2::from_shape_fn(dim, |_| {
        let z: f64 = StandardNormal.sample(rng);
        z * scale
    })
}

fn randn1(rng: &mut StdRng, len: usize, scale: f64) -> Array1<f64> {
    Array1::from_shape_fn(len, |_| {
        let z: f64 = StandardNormal.sample(rng);
        z * scale
    })
}

fn main() -> Result<()> {
    println!("=== seqgrad Pipeline Example ===\n");

    // Vocabulary of 10 words embedded in 8 dimensions; 4 sequences of
    // 6 timesteps; 16 LSTM hidden units.
    let (v, d, n, t_len, h) = (10, 8, 4, 6, 16);
    let mut rng = StdRng::seed_from_u64(42);

    let w_embed = randn2(&mut rng, (v, d), 0.1);
    let wx = randn2(&mut rng, (d, 4 * h), 0.1);
    let wh = randn2(&mut rng, (h, 4 * h), 0.1);
    let b_cell = randn1(&mut rng, 4 * h, 0.1);
    let w_proj = randn2(&mut rng, (h, v), 0.1);
    let b_proj = randn1(&mut rng, v, 0.1);

    // Input sentences and next-word targets; the last two timesteps of
    // the final sequence are padding.
    let words = Array2::from_shape_fn((n, t_len), |_| rng.gen_range(0..v));
    let targets = Array2::from_shape_fn((n, t_len), |_| rng.gen_range(0..v));
    let mask = Array2::from_shape_fn((n, t_len), |(row, t)| !(row == n - 1 && t >= t_len - 2));

    // Forward
    println!("Forward pass");
    let (x, embed_cache) = word_embedding_forward(&words, &w_embed)?;
    println!("  embedded:  {:?}", x.dim());

    let h0 = Array2::zeros((n, h));
    let (hidden, lstm_caches) = lstm_forward(&x, &h0, &wx, &wh, &b_cell)?;
    println!("  lstm out:  {:?}", hidden.dim());

    let (scores, proj_cache) = temporal_affine_forward(&hidden, &w_proj, &b_proj)?;
    println!("  scores:    {:?}", scores.dim());

    let (loss, dscores) = temporal_softmax_loss(&scores, &targets, &mask)?;
    println!("  loss:      {:.6}\n", loss);

    // Backward, in reverse layer order
    println!("Backward pass");
    let proj_grads = temporal_affine_backward(&dscores, proj_cache)?;
    println!("  d(proj w): {:?}", proj_grads.dw.dim());

    let lstm_grads = lstm_backward(&proj_grads.dx, lstm_caches)?;
    println!("  d(wx):     {:?}", lstm_grads.dwx.dim());
    println!("  d(wh):     {:?}", lstm_grads.dwh.dim());

    let dw_embed = word_embedding_backward(&lstm_grads.dx, embed_cache)?;
    println!("  d(embed):  {:?}\n", dw_embed.dim());

    // Spot-check: the projection bias gradient against centered finite
    // differences through the loss.
    let num_db = numeric_gradient(
        |p: &Array1<f64>| {
            let (s, _) = temporal_affine_forward(&hidden, &w_proj, p).unwrap();
            temporal_softmax_loss(&s, &targets, &mask).unwrap().0
        },
        &b_proj,
        1e-5,
    );
    let err = rel_error(&num_db, &proj_grads.db);
    println!("Gradient check on projection bias");
    println!("  rel error: {:.3e}", err);

    println!("\n=== Pipeline completed successfully! ===");
    Ok(())
}
