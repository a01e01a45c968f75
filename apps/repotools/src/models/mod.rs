//! Shared data models for check and train outputs.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A single rule violation. `file` is absent for project-wide issues.
pub struct Issue {
    pub file: Option<String>,
    pub rule: String,
    pub message: String,
}

#[derive(Debug, Default, Clone, Serialize)]
/// Aggregated scan counters used by printers.
pub struct Summary {
    pub files: usize,
    pub markers: usize,
    pub issues: usize,
}

#[derive(Debug, Default, Clone, Serialize)]
/// Check results container.
pub struct CheckReport {
    pub issues: Vec<Issue>,
    pub summary: Summary,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
/// Outcome of one training run.
pub struct TrainReport {
    pub accuracy: f64,
    pub mse: f64,
    pub classifier_path: String,
    pub regressor_path: String,
    pub learning_projects: usize,
    pub learning_patterns: usize,
}
