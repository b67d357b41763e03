//! Gradient and consistency tests for the vanilla RNN layers

mod common;

use ndarray::{Array1, Array2, Array3, Axis};
use seqgrad::cells::{rnn_step_backward, rnn_step_forward};
use seqgrad::gradcheck::{numeric_gradient, rel_error};
use seqgrad::rnn::{rnn_backward, rnn_forward};

const STEP: f64 = 1e-5;
const TOL: f64 = 1e-6;

#[test]
fn test_rnn_step_gradients_match_numeric() {
    let mut rng = common::rng(42);
    let x = common::randn2(&mut rng, (3, 4));
    let prev_h = common::randn2(&mut rng, (3, 5));
    let wx = common::randn2(&mut rng, (4, 5));
    let wh = common::randn2(&mut rng, (5, 5));
    let b = common::randn1(&mut rng, 5);
    // Fixed projection turns the step output into a scalar whose
    // analytic gradient is exactly the backward pass fed with `r`.
    let r = common::randn2(&mut rng, (3, 5));

    let (_, cache) = rnn_step_forward(&x, &prev_h, &wx, &wh, &b).unwrap();
    let grads = rnn_step_backward(&r, cache).unwrap();

    let num_dx = numeric_gradient(
        |p: &Array2<f64>| {
            let (out, _) = rnn_step_forward(p, &prev_h, &wx, &wh, &b).unwrap();
            (&out * &r).sum()
        },
        &x,
        STEP,
    );
    assert!(rel_error(&num_dx, &grads.dx) < TOL, "dx mismatch");

    let num_dprev_h = numeric_gradient(
        |p: &Array2<f64>| {
            let (out, _) = rnn_step_forward(&x, p, &wx, &wh, &b).unwrap();
            (&out * &r).sum()
        },
        &prev_h,
        STEP,
    );
    assert!(rel_error(&num_dprev_h, &grads.dprev_h) < TOL, "dprev_h mismatch");

    let num_dwx = numeric_gradient(
        |p: &Array2<f64>| {
            let (out, _) = rnn_step_forward(&x, &prev_h, p, &wh, &b).unwrap();
            (&out * &r).sum()
        },
        &wx,
        STEP,
    );
    assert!(rel_error(&num_dwx, &grads.dwx) < TOL, "dwx mismatch");

    let num_dwh = numeric_gradient(
        |p: &Array2<f64>| {
            let (out, _) = rnn_step_forward(&x, &prev_h, &wx, p, &b).unwrap();
            (&out * &r).sum()
        },
        &wh,
        STEP,
    );
    assert!(rel_error(&num_dwh, &grads.dwh) < TOL, "dwh mismatch");

    let num_db = numeric_gradient(
        |p: &Array1<f64>| {
            let (out, _) = rnn_step_forward(&x, &prev_h, &wx, &wh, p).unwrap();
            (&out * &r).sum()
        },
        &b,
        STEP,
    );
    assert!(rel_error(&num_db, &grads.db) < TOL, "db mismatch");
}

#[test]
fn test_rnn_sequence_gradients_match_numeric() {
    let mut rng = common::rng(7);
    let x = common::randn3(&mut rng, (2, 3, 4));
    let h0 = common::randn2(&mut rng, (2, 5));
    let wx = common::randn2(&mut rng, (4, 5));
    let wh = common::randn2(&mut rng, (5, 5));
    let b = common::randn1(&mut rng, 5);
    // External per-timestep gradient injected at every output
    let r = common::randn3(&mut rng, (2, 3, 5));

    let (_, caches) = rnn_forward(&x, &h0, &wx, &wh, &b).unwrap();
    let grads = rnn_backward(&r, caches).unwrap();

    let num_dx = numeric_gradient(
        |p: &Array3<f64>| {
            let (h, _) = rnn_forward(p, &h0, &wx, &wh, &b).unwrap();
            (&h * &r).sum()
        },
        &x,
        STEP,
    );
    assert!(rel_error(&num_dx, &grads.dx) < TOL, "dx mismatch");

    let num_dh0 = numeric_gradient(
        |p: &Array2<f64>| {
            let (h, _) = rnn_forward(&x, p, &wx, &wh, &b).unwrap();
            (&h * &r).sum()
        },
        &h0,
        STEP,
    );
    assert!(rel_error(&num_dh0, &grads.dh0) < TOL, "dh0 mismatch");

    let num_dwx = numeric_gradient(
        |p: &Array2<f64>| {
            let (h, _) = rnn_forward(&x, &h0, p, &wh, &b).unwrap();
            (&h * &r).sum()
        },
        &wx,
        STEP,
    );
    assert!(rel_error(&num_dwx, &grads.dwx) < TOL, "dwx mismatch");

    let num_dwh = numeric_gradient(
        |p: &Array2<f64>| {
            let (h, _) = rnn_forward(&x, &h0, &wx, p, &b).unwrap();
            (&h * &r).sum()
        },
        &wh,
        STEP,
    );
    assert!(rel_error(&num_dwh, &grads.dwh) < TOL, "dwh mismatch");

    let num_db = numeric_gradient(
        |p: &Array1<f64>| {
            let (h, _) = rnn_forward(&x, &h0, &wx, &wh, p).unwrap();
            (&h * &r).sum()
        },
        &b,
        STEP,
    );
    assert!(rel_error(&num_db, &grads.db) < TOL, "db mismatch");
}

#[test]
fn test_rnn_sequence_of_one_matches_single_step() {
    let mut rng = common::rng(3);
    let x_seq = common::randn3(&mut rng, (4, 1, 3));
    let h0 = common::randn2(&mut rng, (4, 6));
    let wx = common::randn2(&mut rng, (3, 6));
    let wh = common::randn2(&mut rng, (6, 6));
    let b = common::randn1(&mut rng, 6);
    let r = common::randn2(&mut rng, (4, 6));

    let (h_seq, caches) = rnn_forward(&x_seq, &h0, &wx, &wh, &b).unwrap();

    let x_step = x_seq.index_axis(Axis(1), 0).to_owned();
    let (h_step, step_cache) = rnn_step_forward(&x_step, &h0, &wx, &wh, &b).unwrap();

    assert_eq!(h_seq.index_axis(Axis(1), 0), h_step);

    // The backward sides must agree too: a length-one sequence is just
    // the step with the external gradient as its only upstream input.
    let mut dh = Array3::zeros((4, 1, 6));
    dh.index_axis_mut(Axis(1), 0).assign(&r);
    let seq_grads = rnn_backward(&dh, caches).unwrap();
    let step_grads = rnn_step_backward(&r, step_cache).unwrap();

    assert!(rel_error(&seq_grads.dh0, &step_grads.dprev_h) < 1e-12);
    assert!(rel_error(&seq_grads.dwx, &step_grads.dwx) < 1e-12);
    assert!(rel_error(&seq_grads.dwh, &step_grads.dwh) < 1e-12);
    assert!(rel_error(&seq_grads.db, &step_grads.db) < 1e-12);
    assert_eq!(seq_grads.dx.index_axis(Axis(1), 0), step_grads.dx);
}

#[test]
fn test_rnn_scenario_shapes() {
    // N=2, T=3, D=4, H=5 end to end
    let mut rng = common::rng(1);
    let x = common::randn3(&mut rng, (2, 3, 4));
    let h0 = common::randn2(&mut rng, (2, 5));
    let wx = common::randn2(&mut rng, (4, 5));
    let wh = common::randn2(&mut rng, (5, 5));
    let b = common::randn1(&mut rng, 5);

    let (h, caches) = rnn_forward(&x, &h0, &wx, &wh, &b).unwrap();
    assert_eq!(h.dim(), (2, 3, 5));
    assert_eq!(caches.len(), 3);

    let dh = Array3::ones((2, 3, 5));
    let grads = rnn_backward(&dh, caches).unwrap();
    assert_eq!(grads.dx.dim(), (2, 3, 4));
    assert_eq!(grads.dh0.dim(), (2, 5));
    assert_eq!(grads.dwx.dim(), (4, 5));
    assert_eq!(grads.dwh.dim(), (5, 5));
    assert_eq!(grads.db.len(), 5);
}

#[test]
fn test_rnn_backward_carries_gradient_through_time() {
    // With the external gradient only at the last timestep, dh0 must
    // still be nonzero: the recurrence carries it all the way back.
    let mut rng = common::rng(9);
    let x = common::randn3(&mut rng, (2, 4, 3));
    let h0 = common::randn2(&mut rng, (2, 5));
    let wx = common::randn2(&mut rng, (3, 5));
    let wh = common::randn2(&mut rng, (5, 5));
    let b = common::randn1(&mut rng, 5);

    let (_, caches) = rnn_forward(&x, &h0, &wx, &wh, &b).unwrap();

    let mut dh = Array3::zeros((2, 4, 5));
    dh.index_axis_mut(Axis(1), 3).fill(1.0);
    let grads = rnn_backward(&dh, caches).unwrap();

    let dh0_norm: f64 = grads.dh0.iter().map(|g| g.abs()).sum();
    assert!(dh0_norm > 1e-8, "gradient vanished before reaching h0");

    // And the early timesteps' dx receive gradient only through the
    // recurrence, so they are nonzero as well.
    let dx0_norm: f64 = grads.dx.index_axis(Axis(1), 0).iter().map(|g| g.abs()).sum();
    assert!(dx0_norm > 1e-8);
}
