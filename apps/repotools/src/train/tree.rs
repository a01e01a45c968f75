//! CART decision tree used as the forest's base learner.
//!
//! Trees are grown until leaves are pure or hold a single sample. At each
//! node a random subset of features is examined; constant features do not
//! count toward the subset, so the search keeps drawing until `max_features`
//! informative features were visited or none remain. Nodes live in a flat
//! arena (root at index 0) so a fitted tree serializes as plain data.

use ndarray::{ArrayView1, ArrayView2};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Split quality measure.
pub enum Criterion {
    /// Gini impurity over class labels.
    Gini,
    /// Squared error around the node mean.
    Mse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Node {
    /// Class proportions for Gini trees, a single mean for MSE trees.
    Leaf { value: Vec<f64> },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    pub criterion: Criterion,
    pub n_classes: usize,
    pub max_features: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<Node>,
}

impl DecisionTree {
    /// Fit on the rows listed in `samples` (duplicates allowed).
    pub fn fit<'a, R: Rng + ?Sized>(
        x: ArrayView2<'a, f64>,
        y: ArrayView1<'a, f64>,
        mut samples: Vec<usize>,
        params: &TreeParams,
        rng: &mut R,
    ) -> Self {
        let mut builder = Builder {
            x,
            y,
            params,
            rng,
            nodes: Vec::new(),
        };
        builder.build(&mut samples);
        DecisionTree {
            nodes: builder.nodes,
        }
    }

    /// Leaf value reached by `row`.
    pub fn predict_row(&self, row: ArrayView1<'_, f64>) -> &[f64] {
        let mut at = 0usize;
        loop {
            match &self.nodes[at] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    at = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], at: usize) -> usize {
            match &nodes[at] {
                Node::Leaf { .. } => 1,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    proxy: f64,
}

struct Builder<'a, 'b, R: ?Sized> {
    x: ArrayView2<'a, f64>,
    y: ArrayView1<'a, f64>,
    params: &'b TreeParams,
    rng: &'b mut R,
    nodes: Vec<Node>,
}

impl<R: Rng + ?Sized> Builder<'_, '_, R> {
    fn build(&mut self, samples: &mut [usize]) -> usize {
        let at = self.nodes.len();
        self.nodes.push(Node::Leaf {
            value: self.leaf_value(samples),
        });
        if samples.len() < 2 || self.is_pure(samples) {
            return at;
        }
        let Some(split) = self.best_split(samples) else {
            return at;
        };
        let mid = partition(samples, |i| self.x[[i, split.feature]] <= split.threshold);
        let (lo, hi) = samples.split_at_mut(mid);
        let left = self.build(lo);
        let right = self.build(hi);
        self.nodes[at] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        at
    }

    fn class_of(&self, i: usize) -> usize {
        (self.y[i] as usize).min(self.params.n_classes.saturating_sub(1))
    }

    fn leaf_value(&self, samples: &[usize]) -> Vec<f64> {
        let n = samples.len();
        match self.params.criterion {
            Criterion::Gini => {
                let mut counts = vec![0.0; self.params.n_classes];
                for &i in samples {
                    counts[self.class_of(i)] += 1.0;
                }
                if n > 0 {
                    counts.iter_mut().for_each(|c| *c /= n as f64);
                }
                counts
            }
            Criterion::Mse => {
                if n == 0 {
                    return vec![0.0];
                }
                let sum: f64 = samples.iter().map(|&i| self.y[i]).sum();
                vec![sum / n as f64]
            }
        }
    }

    fn is_pure(&self, samples: &[usize]) -> bool {
        let first = self.y[samples[0]];
        match self.params.criterion {
            Criterion::Gini => {
                let c = self.class_of(samples[0]);
                samples.iter().all(|&i| self.class_of(i) == c)
            }
            Criterion::Mse => samples
                .iter()
                .all(|&i| (self.y[i] - first).abs() <= f64::EPSILON),
        }
    }

    fn best_split(&mut self, samples: &[usize]) -> Option<BestSplit> {
        let n_features = self.x.ncols();
        let mut features: Vec<usize> = (0..n_features).collect();
        features.shuffle(&mut *self.rng);

        let mut best: Option<BestSplit> = None;
        let mut visited = 0usize;
        let mut sorted: Vec<(f64, usize)> = Vec::with_capacity(samples.len());
        for f in features {
            if visited >= self.params.max_features {
                break;
            }
            sorted.clear();
            sorted.extend(samples.iter().map(|&i| (self.x[[i, f]], i)));
            sorted.sort_by(|a, b| a.0.total_cmp(&b.0));
            if sorted[sorted.len() - 1].0 <= sorted[0].0 {
                continue;
            }
            visited += 1;
            if let Some(cand) = self.scan_feature(f, &sorted) {
                if best.as_ref().map_or(true, |b| cand.proxy > b.proxy) {
                    best = Some(cand);
                }
            }
        }
        best
    }

    /// Best threshold on one feature. Maximizes the proxy
    /// `sum_l^2/n_l + sum_r^2/n_r` (per class for Gini), which orders
    /// splits the same way as the weighted child impurity.
    fn scan_feature(&self, feature: usize, sorted: &[(f64, usize)]) -> Option<BestSplit> {
        let n = sorted.len();
        let width = match self.params.criterion {
            Criterion::Gini => self.params.n_classes,
            Criterion::Mse => 1,
        };
        let mut total = vec![0.0; width];
        for &(_, i) in sorted {
            self.accumulate(&mut total, i);
        }
        let mut left = vec![0.0; width];
        let mut best: Option<BestSplit> = None;
        for k in 1..n {
            self.accumulate(&mut left, sorted[k - 1].1);
            let (prev, next) = (sorted[k - 1].0, sorted[k].0);
            if next <= prev {
                continue;
            }
            let n_l = k as f64;
            let n_r = (n - k) as f64;
            let proxy: f64 = left
                .iter()
                .zip(total.iter())
                .map(|(l, t)| l * l / n_l + (t - l) * (t - l) / n_r)
                .sum();
            if best.as_ref().map_or(true, |b| proxy > b.proxy) {
                let mut threshold = prev + (next - prev) / 2.0;
                if threshold >= next {
                    threshold = prev;
                }
                best = Some(BestSplit {
                    feature,
                    threshold,
                    proxy,
                });
            }
        }
        best
    }

    fn accumulate(&self, acc: &mut [f64], i: usize) {
        match self.params.criterion {
            Criterion::Gini => acc[self.class_of(i)] += 1.0,
            Criterion::Mse => acc[0] += self.y[i],
        }
    }
}

/// Move entries matching `pred` to the front; returns their count.
fn partition<F: Fn(usize) -> bool>(samples: &mut [usize], pred: F) -> usize {
    let mut mid = 0usize;
    for k in 0..samples.len() {
        if pred(samples[k]) {
            samples.swap(k, mid);
            mid += 1;
        }
    }
    mid
}
