//! Model trainer: fits two forests on synthetic data and writes them out.
//!
//! - Code quality: 1000 x 5 uniform features, random binary labels,
//!   random-forest classifier scored by accuracy.
//! - Performance: 1000 x 3 uniform features, uniform targets, random-forest
//!   regressor scored by mean squared error.
//!
//! Both use an 80/20 shuffled split and 100 trees. The forest seed is fixed
//! (default 42) while data generation is unseeded unless `data_seed` is set.

pub mod artifact;
pub mod data;
pub mod forest;
pub mod metrics;
pub mod tree;

use crate::error::Result;
use crate::models::TrainReport;
use forest::{ForestParams, RandomForest};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tracing::info;

pub const CLASSIFIER_FILE: &str = "code_quality_model.json";
pub const REGRESSOR_FILE: &str = "performance_model.json";
pub const LEARNING_DATA_FILE: &str = "learning_data.json";
pub const DEFAULT_MODEL_DIR: &str = ".quantum_models";
pub const DEFAULT_SEED: u64 = 42;

pub const SAMPLES: usize = 1000;
pub const QUALITY_FEATURES: usize = 5;
pub const PERFORMANCE_FEATURES: usize = 3;
pub const N_TREES: usize = 100;
pub const TEST_FRACTION: f64 = 0.2;

#[derive(Debug, Clone)]
/// Where models go and how randomness is seeded.
pub struct TrainSettings {
    pub model_dir: PathBuf,
    pub learning_data: PathBuf,
    pub seed: u64,
    pub data_seed: Option<u64>,
}

impl TrainSettings {
    pub fn in_dir(model_dir: impl Into<PathBuf>) -> Self {
        let model_dir = model_dir.into();
        TrainSettings {
            learning_data: model_dir.join(LEARNING_DATA_FILE),
            model_dir,
            seed: DEFAULT_SEED,
            data_seed: None,
        }
    }

    pub fn classifier_path(&self) -> PathBuf {
        self.model_dir.join(CLASSIFIER_FILE)
    }

    pub fn regressor_path(&self) -> PathBuf {
        self.model_dir.join(REGRESSOR_FILE)
    }
}

/// Fit the code-quality classifier; returns the model and held-out accuracy.
pub fn train_code_quality_model<R: Rng + ?Sized>(
    settings: &TrainSettings,
    rng: &mut R,
) -> Result<(RandomForest, f64)> {
    let x = data::uniform_features(SAMPLES, QUALITY_FEATURES, rng);
    let y = data::binary_labels(SAMPLES, rng);
    let split = data::train_test_split(&x, &y, TEST_FRACTION, rng);

    let params = ForestParams::classifier(N_TREES, settings.seed);
    let model = RandomForest::fit(&split.x_train, &split.y_train, &params)?;
    let pred = model.predict(&split.x_test)?;
    let acc = metrics::accuracy(&split.y_test, &pred);
    info!(accuracy = acc, "code quality model fitted");
    Ok((model, acc))
}

/// Fit the performance regressor; returns the model and held-out MSE.
pub fn train_performance_model<R: Rng + ?Sized>(
    settings: &TrainSettings,
    rng: &mut R,
) -> Result<(RandomForest, f64)> {
    let x = data::uniform_features(SAMPLES, PERFORMANCE_FEATURES, rng);
    let y = data::uniform_targets(SAMPLES, rng);
    let split = data::train_test_split(&x, &y, TEST_FRACTION, rng);

    let params = ForestParams::regressor(N_TREES, settings.seed);
    let model = RandomForest::fit(&split.x_train, &split.y_train, &params)?;
    let pred = model.predict(&split.x_test)?;
    let mse = metrics::mean_squared_error(&split.y_test, &pred);
    info!(mse, "performance model fitted");
    Ok((model, mse))
}

/// Train both models and write them into `settings.model_dir`.
pub fn save_models(settings: &TrainSettings) -> Result<TrainReport> {
    // Loaded for visibility only; training still runs on synthetic data.
    let learning = artifact::load_learning_data(&settings.learning_data)?;
    info!(
        path = %settings.learning_data.display(),
        projects = learning.projects(),
        patterns = learning.patterns(),
        "learning data loaded"
    );

    let data_seed = settings
        .data_seed
        .unwrap_or_else(|| rand::rng().random());
    let mut rng = StdRng::seed_from_u64(data_seed);

    let (quality, accuracy) = train_code_quality_model(settings, &mut rng)?;
    let (performance, mse) = train_performance_model(settings, &mut rng)?;

    let classifier_path = settings.classifier_path();
    let regressor_path = settings.regressor_path();
    artifact::save_model(&classifier_path, &quality)?;
    artifact::save_model(&regressor_path, &performance)?;

    Ok(TrainReport {
        accuracy,
        mse,
        classifier_path: classifier_path.to_string_lossy().to_string(),
        regressor_path: regressor_path.to_string_lossy().to_string(),
        learning_projects: learning.projects(),
        learning_patterns: learning.patterns(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_two_runs_write_loadable_models() {
        let dir = tempdir().unwrap();
        let settings = TrainSettings::in_dir(dir.path().join("models"));
        for _ in 0..2 {
            let report = save_models(&settings).unwrap();
            assert!(
                (0.35..=0.65).contains(&report.accuracy),
                "accuracy {}",
                report.accuracy
            );
            // Variance of U(0,1) is 1/12; a forest on noise lands a bit above it
            assert!((0.04..=0.2).contains(&report.mse), "mse {}", report.mse);

            let clf = artifact::load_model(&settings.classifier_path()).unwrap();
            let reg = artifact::load_model(&settings.regressor_path()).unwrap();
            assert_eq!(clf.trees.len(), N_TREES);
            assert_eq!(reg.trees.len(), N_TREES);

            let rows = Array2::from_elem((3, QUALITY_FEATURES), 0.5);
            let labels = clf.predict(&rows).unwrap();
            assert!(labels.iter().all(|v| *v == 0.0 || *v == 1.0));
            let rows = Array2::from_elem((3, PERFORMANCE_FEATURES), 0.5);
            let scores = reg.predict(&rows).unwrap();
            assert!(scores.iter().all(|v| (0.0..1.0).contains(v)));
        }
    }

    #[test]
    fn test_data_seed_makes_runs_repeatable() {
        let dir = tempdir().unwrap();
        let mut settings = TrainSettings::in_dir(dir.path());
        settings.data_seed = Some(7);
        let a = save_models(&settings).unwrap();
        let first = fs::read(settings.classifier_path()).unwrap();
        let b = save_models(&settings).unwrap();
        let second = fs::read(settings.classifier_path()).unwrap();
        assert_eq!(a.accuracy, b.accuracy);
        assert_eq!(a.mse, b.mse);
        assert_eq!(first, second);
    }

    #[test]
    fn test_learning_data_is_counted_not_required() {
        let dir = tempdir().unwrap();
        let settings = TrainSettings::in_dir(dir.path());
        fs::write(
            &settings.learning_data,
            r#"{"projects": {"a": {}, "b": {}}, "patterns": []}"#,
        )
        .unwrap();
        let report = save_models(&settings).unwrap();
        assert_eq!(report.learning_projects, 2);
        assert_eq!(report.learning_patterns, 0);
    }

    #[test]
    fn test_unexpected_learning_data_shape_still_trains() {
        let dir = tempdir().unwrap();
        let settings = TrainSettings::in_dir(dir.path());
        fs::write(&settings.learning_data, r#"{"projects": [], "patterns": {"a": 1}}"#).unwrap();
        let report = save_models(&settings).unwrap();
        assert_eq!(report.learning_projects, 0);
        assert_eq!(report.learning_patterns, 0);
        assert!(settings.classifier_path().is_file());
        assert!(settings.regressor_path().is_file());
    }

    #[test]
    fn test_single_model_training_uses_settings_seed() {
        let dir = tempdir().unwrap();
        let mut settings = TrainSettings::in_dir(dir.path());
        settings.seed = 3;
        let (a, acc_a) = train_code_quality_model(&settings, &mut StdRng::seed_from_u64(1)).unwrap();
        let (b, acc_b) = train_code_quality_model(&settings, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(a, b);
        assert_eq!(acc_a, acc_b);
        assert_eq!(a.n_features, QUALITY_FEATURES);

        let (reg, mse) = train_performance_model(&settings, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(reg.n_features, PERFORMANCE_FEATURES);
        assert!(mse > 0.0);
        // Nothing is written by the single-model helpers
        assert!(!settings.classifier_path().exists());
    }

    #[test]
    fn test_broken_learning_data_fails_before_training() {
        let dir = tempdir().unwrap();
        let settings = TrainSettings::in_dir(dir.path());
        fs::write(&settings.learning_data, "[1, 2").unwrap();
        assert!(save_models(&settings).is_err());
        assert!(!settings.classifier_path().exists());
    }
}
