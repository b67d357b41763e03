//! Shared helpers for the integration tests: seeded random tensors so
//! every gradient check runs on the same values.
#![allow(dead_code)]

use ndarray::{Array1, Array2, Array3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn randn1(rng: &mut StdRng, len: usize) -> Array1<f64> {
    Array1::from_shape_fn(len, |_| StandardNormal.sample(rng))
}

pub fn randn2(rng: &mut StdRng, dim: (usize, usize)) -> Array2<f64> {
    Array2::from_shape_fn(dim, |_| StandardNormal.sample(rng))
}

pub fn randn3(rng: &mut StdRng, dim: (usize, usize, usize)) -> Array3<f64> {
    Array3::from_shape_fn(dim, |_| StandardNormal.sample(rng))
}
