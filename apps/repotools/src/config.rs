//! Configuration discovery and effective settings resolution.
//!
//! repotools reads `repotools.toml|yaml|yml` from the repository root (or
//! closest ancestor) and merges it with CLI flags to produce the effective
//! settings for each subcommand.
//! Defaults:
//! - `check.warnOnly`: false
//! - `check.output` / `train.output`: `human`
//! - `train.modelDir`: `.quantum_models`
//! - `train.learningData`: `<modelDir>/learning_data.json`
//! - `train.seed`: 42; `train.dataSeed`: unset (fresh data each run)
//!
//! Overrides precedence: CLI > config file > defaults. Paths from the config
//! file are relative to the repository root; CLI paths are used as given.

use crate::error::{Error, Result};
use crate::train::{TrainSettings, DEFAULT_MODEL_DIR, DEFAULT_SEED, LEARNING_DATA_FILE};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize, Clone)]
/// Checker section under `[check]`.
pub struct CheckCfg {
    #[serde(rename = "warnOnly")]
    pub warn_only: Option<bool>,
    pub output: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Trainer section under `[train]`.
pub struct TrainCfg {
    #[serde(rename = "modelDir")]
    pub model_dir: Option<String>,
    #[serde(rename = "learningData")]
    pub learning_data: Option<String>,
    pub seed: Option<u64>,
    #[serde(rename = "dataSeed")]
    pub data_seed: Option<u64>,
    pub output: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `repotools.toml|yaml`.
pub struct RepoToolsConfig {
    #[serde(default)]
    pub check: Option<CheckCfg>,
    #[serde(default)]
    pub train: Option<TrainCfg>,
}

#[derive(Debug, Clone)]
/// Resolved settings for `repotools check`.
pub struct EffectiveCheck {
    pub repo_root: PathBuf,
    pub warn_only: bool,
    pub output: String,
}

#[derive(Debug, Clone)]
/// Resolved settings for `repotools train`.
pub struct EffectiveTrain {
    pub repo_root: PathBuf,
    pub settings: TrainSettings,
    pub output: String,
}

const CONFIG_FILES: [&str; 3] = ["repotools.toml", "repotools.yaml", "repotools.yml"];

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `repotools.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    // `.` has no useful parent; walk from the absolute form instead
    let start = std::path::absolute(start).unwrap_or_else(|_| start.to_path_buf());
    let start = start.as_path();
    let mut cur = start;
    loop {
        if CONFIG_FILES.iter().any(|f| cur.join(f).exists()) {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) if !p.as_os_str().is_empty() => cur = p,
            _ => return start.to_path_buf(),
        }
    }
}

/// Load `RepoToolsConfig` from `repotools.toml` or `repotools.yaml|yml` if present.
///
/// A file that cannot be read or parsed counts as absent; use `read_config`
/// to tell the two apart.
pub fn load_config(root: &Path) -> Option<RepoToolsConfig> {
    read_config(root).ok().flatten()
}

/// First config file found at `root`, TOML before YAML.
pub fn config_file(root: &Path) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|name| root.join(name))
        .find(|p| p.is_file())
}

/// Like `load_config`, but a config file that exists and fails to parse is
/// an `Error::Config`.
pub fn read_config(root: &Path) -> Result<Option<RepoToolsConfig>> {
    let Some(path) = config_file(root) else {
        return Ok(None);
    };
    let s = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
    let parsed = if path.extension().is_some_and(|e| e == "toml") {
        toml::from_str(&s).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str(&s).map_err(|e| e.to_string())
    };
    match parsed {
        Ok(cfg) => Ok(Some(cfg)),
        Err(message) => Err(Error::Config { path, message }),
    }
}

/// Resolve checker settings by merging CLI flags, discovered config, and defaults.
pub fn resolve_check(
    cli_repo_root: Option<&str>,
    cli_warn_only: Option<bool>,
    cli_output: Option<&str>,
) -> EffectiveCheck {
    let start = PathBuf::from(cli_repo_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let cfg = load_config(&repo_root).unwrap_or_default();
    let section = cfg.check.unwrap_or_default();

    let warn_only = cli_warn_only.or(section.warn_only).unwrap_or(false);
    let output = cli_output
        .map(|s| s.to_string())
        .or(section.output)
        .unwrap_or_else(|| "human".to_string());

    EffectiveCheck {
        repo_root,
        warn_only,
        output,
    }
}

/// Resolve trainer settings by merging CLI flags, discovered config, and defaults.
pub fn resolve_train(
    cli_repo_root: Option<&str>,
    cli_model_dir: Option<&str>,
    cli_data: Option<&str>,
    cli_seed: Option<u64>,
    cli_output: Option<&str>,
) -> EffectiveTrain {
    let start = PathBuf::from(cli_repo_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let cfg = load_config(&repo_root).unwrap_or_default();
    let section = cfg.train.unwrap_or_default();

    let model_dir = cli_model_dir
        .map(PathBuf::from)
        .or_else(|| section.model_dir.as_ref().map(|d| repo_root.join(d)))
        .unwrap_or_else(|| repo_root.join(DEFAULT_MODEL_DIR));
    let learning_data = cli_data
        .map(PathBuf::from)
        .or_else(|| section.learning_data.as_ref().map(|d| repo_root.join(d)))
        .unwrap_or_else(|| model_dir.join(LEARNING_DATA_FILE));
    let seed = cli_seed.or(section.seed).unwrap_or(DEFAULT_SEED);
    let output = cli_output
        .map(|s| s.to_string())
        .or(section.output)
        .unwrap_or_else(|| "human".to_string());

    EffectiveTrain {
        repo_root,
        settings: TrainSettings {
            model_dir,
            learning_data,
            seed,
            data_seed: section.data_seed,
        },
        output,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_detect_and_load_toml() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("repotools.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
[check]
warnOnly = true
output = "json"
[train]
modelDir = "out/models"
seed = 7
dataSeed = 99
    "#
        )
        .unwrap();

        // Resolve using explicit repo_root to avoid global CWD races
        let eff = resolve_check(root.to_str(), None, None);
        assert!(eff.warn_only);
        assert_eq!(eff.output, "json");

        let tr = resolve_train(root.to_str(), None, None, None, None);
        assert_eq!(tr.settings.model_dir, root.join("out/models"));
        assert_eq!(
            tr.settings.learning_data,
            root.join("out/models/learning_data.json")
        );
        assert_eq!(tr.settings.seed, 7);
        assert_eq!(tr.settings.data_seed, Some(99));
        assert_eq!(tr.output, "human");
    }

    #[test]
    fn test_load_yaml_from_nested_start() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("repotools.yaml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
check:
  warnOnly: false
  output: human
train:
  learningData: data/learning.json
            "#
        )
        .unwrap();
        let nested = root.join("a/b");
        fs::create_dir_all(&nested).unwrap();

        let tr = resolve_train(nested.to_str(), None, None, None, None);
        assert_eq!(tr.repo_root, root);
        assert_eq!(tr.settings.learning_data, root.join("data/learning.json"));
        assert_eq!(tr.settings.model_dir, root.join(DEFAULT_MODEL_DIR));
        assert_eq!(tr.settings.seed, DEFAULT_SEED);
        assert_eq!(tr.settings.data_seed, None);
    }

    #[test]
    fn test_cli_precedence_over_config() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join("repotools.toml"),
            "[check]\nwarnOnly = false\noutput = \"json\"\n[train]\nseed = 1\n",
        )
        .unwrap();

        let eff = resolve_check(root.to_str(), Some(true), Some("human"));
        assert!(eff.warn_only);
        assert_eq!(eff.output, "human");

        let tr = resolve_train(root.to_str(), Some("elsewhere"), Some("ld.json"), Some(5), Some("json"));
        assert_eq!(tr.settings.model_dir, PathBuf::from("elsewhere"));
        assert_eq!(tr.settings.learning_data, PathBuf::from("ld.json"));
        assert_eq!(tr.settings.seed, 5);
        assert_eq!(tr.output, "json");
    }

    #[test]
    fn test_defaults_without_config() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join(".git")).unwrap();
        assert!(load_config(root).is_none());
        let eff = resolve_check(root.to_str(), None, None);
        assert!(!eff.warn_only);
        assert_eq!(eff.output, "human");
        let tr = resolve_train(root.to_str(), None, None, None, None);
        assert_eq!(tr.settings.model_dir, root.join(".quantum_models"));
    }

    #[test]
    fn test_invalid_config_is_ignored() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("repotools.toml"), "[check\nwarnOnly = ").unwrap();
        assert!(load_config(root).is_none());
        let eff = resolve_check(root.to_str(), None, None);
        assert!(!eff.warn_only);
    }

    #[test]
    fn test_read_config_reports_parse_failure() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        assert!(matches!(read_config(root), Ok(None)));

        fs::write(root.join("repotools.yml"), "check: [1, 2\n").unwrap();
        match read_config(root) {
            Err(Error::Config { path, .. }) => assert_eq!(path, root.join("repotools.yml")),
            other => panic!("expected config error, got {other:?}"),
        }

        // TOML wins over YAML when both exist
        fs::write(root.join("repotools.toml"), "[check]\nwarnOnly = true\n").unwrap();
        assert_eq!(config_file(root), Some(root.join("repotools.toml")));
        let cfg = read_config(root).unwrap().unwrap();
        assert_eq!(cfg.check.and_then(|c| c.warn_only), Some(true));
    }
}
