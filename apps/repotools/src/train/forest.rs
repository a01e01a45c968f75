//! Bootstrap-aggregated forest of CART trees.
//!
//! Classification averages leaf class proportions across trees and takes
//! the argmax. Regression averages leaf means. Per-tree seeds are drawn
//! sequentially from the forest seed before fitting in parallel, so a fit
//! with the same seed and data always yields the same trees.

use super::tree::{Criterion, DecisionTree, TreeParams};
use crate::error::{Error, Result};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Task {
    Classification,
    Regression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Number of features examined per split.
pub enum MaxFeatures {
    Sqrt,
    All,
}

impl MaxFeatures {
    fn resolve(self, n_features: usize) -> usize {
        match self {
            MaxFeatures::Sqrt => ((n_features as f64).sqrt() as usize).max(1),
            MaxFeatures::All => n_features.max(1),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ForestParams {
    pub task: Task,
    pub n_trees: usize,
    pub max_features: MaxFeatures,
    pub bootstrap: bool,
    pub seed: u64,
}

impl ForestParams {
    /// Gini trees, `sqrt` features per split.
    pub fn classifier(n_trees: usize, seed: u64) -> Self {
        ForestParams {
            task: Task::Classification,
            n_trees,
            max_features: MaxFeatures::Sqrt,
            bootstrap: true,
            seed,
        }
    }

    /// Squared-error trees, every feature per split.
    pub fn regressor(n_trees: usize, seed: u64) -> Self {
        ForestParams {
            task: Task::Regression,
            n_trees,
            max_features: MaxFeatures::All,
            bootstrap: true,
            seed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub task: Task,
    pub n_features: usize,
    /// Zero for regression.
    pub n_classes: usize,
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Fit on `x` (one row per sample). Classification labels must be
    /// non-negative integers stored as `f64`.
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>, params: &ForestParams) -> Result<Self> {
        if x.nrows() != y.len() {
            return Err(Error::Shape {
                expected: x.nrows(),
                found: y.len(),
            });
        }
        let n = x.nrows();
        let n_features = x.ncols();
        let (criterion, n_classes) = match params.task {
            Task::Classification => {
                let max = y.iter().fold(0.0f64, |m, v| m.max(*v));
                (Criterion::Gini, (max as usize + 1).max(2))
            }
            Task::Regression => (Criterion::Mse, 0),
        };
        let tree_params = TreeParams {
            criterion,
            n_classes,
            max_features: params.max_features.resolve(n_features),
        };

        let mut seeder = StdRng::seed_from_u64(params.seed);
        let seeds: Vec<u64> = (0..params.n_trees).map(|_| seeder.random()).collect();
        let trees: Vec<DecisionTree> = seeds
            .par_iter()
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(*seed);
                let samples: Vec<usize> = if params.bootstrap && n > 0 {
                    (0..n).map(|_| rng.random_range(0..n)).collect()
                } else {
                    (0..n).collect()
                };
                DecisionTree::fit(x.view(), y.view(), samples, &tree_params, &mut rng)
            })
            .collect();

        Ok(RandomForest {
            task: params.task,
            n_features,
            n_classes,
            trees,
        })
    }

    /// Mean class proportions per row (`rows x n_classes`).
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_width(x)?;
        let width = match self.task {
            Task::Classification => self.n_classes,
            Task::Regression => 1,
        };
        let mut out = Array2::<f64>::zeros((x.nrows(), width));
        if self.trees.is_empty() {
            return Ok(out);
        }
        for (row, mut acc) in x.rows().into_iter().zip(out.rows_mut()) {
            for tree in &self.trees {
                for (a, v) in acc.iter_mut().zip(tree.predict_row(row)) {
                    *a += v;
                }
            }
            acc.mapv_inplace(|a| a / self.trees.len() as f64);
        }
        Ok(out)
    }

    /// Class label (argmax, lowest class on ties) or regression mean per row.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let proba = self.predict_proba(x)?;
        let out = match self.task {
            Task::Regression => proba.column(0).to_owned(),
            Task::Classification => proba
                .rows()
                .into_iter()
                .map(|r| {
                    let mut best = 0usize;
                    for (c, v) in r.iter().enumerate() {
                        if *v > r[best] {
                            best = c;
                        }
                    }
                    best as f64
                })
                .collect(),
        };
        Ok(out)
    }

    fn check_width(&self, x: &Array2<f64>) -> Result<()> {
        if x.ncols() != self.n_features {
            return Err(Error::Shape {
                expected: self.n_features,
                found: x.ncols(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::train::data::{binary_labels, uniform_features};
    use ndarray::Axis;

    #[test]
    fn test_same_seed_same_forest() {
        let mut rng = StdRng::seed_from_u64(5);
        let x = uniform_features(120, 4, &mut rng);
        let y = binary_labels(120, &mut rng);
        let a = RandomForest::fit(&x, &y, &ForestParams::classifier(10, 42)).unwrap();
        let b = RandomForest::fit(&x, &y, &ForestParams::classifier(10, 42)).unwrap();
        assert_eq!(a, b);
        let c = RandomForest::fit(&x, &y, &ForestParams::classifier(10, 43)).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_classifier_learns_threshold_rule() {
        let mut rng = StdRng::seed_from_u64(11);
        let x = uniform_features(400, 2, &mut rng);
        let y: Array1<f64> = x
            .axis_iter(Axis(0))
            .map(|r| if r[0] > 0.5 { 1.0 } else { 0.0 })
            .collect();
        let forest = RandomForest::fit(&x, &y, &ForestParams::classifier(25, 42)).unwrap();
        let rows = ndarray::array![[0.05, 0.5], [0.95, 0.5], [0.2, 0.9], [0.8, 0.1]];
        let pred = forest.predict(&rows).unwrap();
        assert_eq!(pred.to_vec(), vec![0.0, 1.0, 0.0, 1.0]);
        let proba = forest.predict_proba(&rows).unwrap();
        for r in proba.rows() {
            assert!((r.sum() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_regressor_tracks_linear_target() {
        let mut rng = StdRng::seed_from_u64(13);
        let x = uniform_features(300, 1, &mut rng);
        let y: Array1<f64> = x.column(0).mapv(|v| 2.0 * v);
        let forest = RandomForest::fit(&x, &y, &ForestParams::regressor(20, 42)).unwrap();
        let pred = forest.predict(&ndarray::array![[0.25], [0.75]]).unwrap();
        assert!((pred[0] - 0.5).abs() < 0.1);
        assert!((pred[1] - 1.5).abs() < 0.1);
    }

    #[test]
    fn test_width_mismatch_is_an_error() {
        let mut rng = StdRng::seed_from_u64(1);
        let x = uniform_features(30, 3, &mut rng);
        let y = binary_labels(30, &mut rng);
        let forest = RandomForest::fit(&x, &y, &ForestParams::classifier(3, 42)).unwrap();
        let bad = uniform_features(2, 2, &mut rng);
        assert!(matches!(
            forest.predict(&bad),
            Err(Error::Shape {
                expected: 3,
                found: 2
            })
        ));
        let short = binary_labels(10, &mut rng);
        assert!(RandomForest::fit(&x, &short, &ForestParams::classifier(3, 42)).is_err());
    }

    #[test]
    fn test_max_features_resolution() {
        assert_eq!(MaxFeatures::Sqrt.resolve(5), 2);
        assert_eq!(MaxFeatures::Sqrt.resolve(1), 1);
        assert_eq!(MaxFeatures::All.resolve(3), 3);
    }
}
