//! Model files and the optional learning-data file.
//!
//! Models are written as JSON and replace whatever was at the path before.
//! Nothing about the file records a format version.

use super::forest::RandomForest;
use crate::error::{Error, Result};
use serde_json::{json, Value as Json};
use std::fs;
use std::path::Path;
use tracing::info;

/// Learning data as read from disk. Any valid JSON is accepted; the
/// counters only look at a `projects` object and a `patterns` array.
#[derive(Debug, Clone, PartialEq)]
pub struct LearningData {
    pub raw: Json,
}

impl Default for LearningData {
    fn default() -> Self {
        LearningData {
            raw: json!({"projects": {}, "patterns": []}),
        }
    }
}

impl LearningData {
    pub fn projects(&self) -> usize {
        self.raw
            .get("projects")
            .and_then(Json::as_object)
            .map_or(0, |m| m.len())
    }

    pub fn patterns(&self) -> usize {
        self.raw
            .get("patterns")
            .and_then(Json::as_array)
            .map_or(0, |a| a.len())
    }
}

pub fn save_model(path: &Path, model: &RandomForest) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
    }
    let bytes = serde_json::to_vec(model).map_err(|e| Error::json(path, e))?;
    fs::write(path, bytes).map_err(|e| Error::io(path, e))?;
    info!(path = %path.display(), trees = model.trees.len(), "model written");
    Ok(())
}

pub fn load_model(path: &Path) -> Result<RandomForest> {
    let s = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&s).map_err(|e| Error::json(path, e))
}

/// Read `path` when it exists; an absent file yields empty data.
/// Only syntactically invalid JSON is an error.
pub fn load_learning_data(path: &Path) -> Result<LearningData> {
    if !path.exists() {
        return Ok(LearningData::default());
    }
    let s = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let raw: Json = serde_json::from_str(&s).map_err(|e| Error::json(path, e))?;
    Ok(LearningData { raw })
}
