//! Synthetic dataset generation and shuffled train/test splitting.

use ndarray::{Array1, Array2, Axis};
use rand::seq::SliceRandom;
use rand::Rng;

/// Held-out partition of a dataset.
pub struct Split {
    pub x_train: Array2<f64>,
    pub x_test: Array2<f64>,
    pub y_train: Array1<f64>,
    pub y_test: Array1<f64>,
}

/// `rows x cols` matrix of uniform samples in `[0, 1)`.
pub fn uniform_features<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Array2<f64> {
    Array2::from_shape_fn((rows, cols), |_| rng.random::<f64>())
}

/// Random class labels `0.0` or `1.0`.
pub fn binary_labels<R: Rng + ?Sized>(rows: usize, rng: &mut R) -> Array1<f64> {
    Array1::from_shape_fn(rows, |_| rng.random_range(0..2u8) as f64)
}

/// Continuous targets in `[0, 1)`.
pub fn uniform_targets<R: Rng + ?Sized>(rows: usize, rng: &mut R) -> Array1<f64> {
    Array1::from_shape_fn(rows, |_| rng.random::<f64>())
}

/// Shuffle rows and hold out `ceil(rows * test_fraction)` of them.
pub fn train_test_split<R: Rng + ?Sized>(
    x: &Array2<f64>,
    y: &Array1<f64>,
    test_fraction: f64,
    rng: &mut R,
) -> Split {
    let n = x.nrows();
    let n_test = ((n as f64) * test_fraction).ceil() as usize;
    let n_test = n_test.min(n);
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);
    let (test_idx, train_idx) = order.split_at(n_test);
    Split {
        x_train: x.select(Axis(0), train_idx),
        x_test: x.select(Axis(0), test_idx),
        y_train: y.select(Axis(0), train_idx),
        y_test: y.select(Axis(0), test_idx),
    }
}
