//! Architecture checker for project trees.
//!
//! Two rules run over a single walk of the project directory:
//! - `shared-types-import`: Swift files located under a `SharedTypes`
//!   directory must not import SwiftUI.
//! - `todo-markers`: lines carrying TODO/FIXME across Swift, Python and
//!   shell files are counted; a single project-wide issue is raised when
//!   the total exceeds `MARKER_THRESHOLD`.
//!
//! Unreadable files (permissions, invalid UTF-8, dangling links) are
//! skipped without being reported. The walk is sorted by file name so the
//! issue order is stable across platforms.

use crate::error::{Error, Result};
use crate::models::{CheckReport, Issue, Summary};
use crate::utils::has_suffix;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Directory marker for the restricted-import rule (case-sensitive).
pub const SHARED_TYPES_DIR: &str = "SharedTypes";
/// Import statement forbidden under `SHARED_TYPES_DIR`.
pub const FORBIDDEN_IMPORT: &str = "import SwiftUI";
pub const IMPORT_RULE_EXTENSIONS: &[&str] = &[".swift"];
pub const MARKER_EXTENSIONS: &[&str] = &[".swift", ".py", ".sh"];
pub const MARKERS: &[&str] = &["TODO", "FIXME"];
/// The marker issue fires only when the count is strictly greater.
pub const MARKER_THRESHOLD: usize = 50;

pub const RULE_SHARED_TYPES_IMPORT: &str = "shared-types-import";
pub const RULE_TODO_MARKERS: &str = "todo-markers";

/// Exit status when the project path is not a directory.
pub const EXIT_NOT_FOUND: i32 = 2;

/// Check `root`, failing when it is not a directory.
pub fn run_check(root: &Path) -> Result<CheckReport> {
    if !root.is_dir() {
        return Err(Error::ProjectNotFound(root.to_path_buf()));
    }
    Ok(check_project(root))
}

/// Scan every file under `root` and apply both rules.
///
/// Files are read in parallel; results keep walk order.
pub fn check_project(root: &Path) -> CheckReport {
    let files = collect_files(root);
    let scans: Vec<FileScan> = files.par_iter().map(|p| scan_file(p)).collect();

    let mut issues: Vec<Issue> = Vec::new();
    let mut markers = 0usize;
    let mut read = 0usize;
    for (path, scan) in files.iter().zip(scans.iter()) {
        if scan.read {
            read += 1;
        }
        markers += scan.markers;
        if scan.forbidden_import {
            let file = path.to_string_lossy().to_string();
            issues.push(Issue {
                message: format!("{}: SharedTypes must not import SwiftUI", file),
                file: Some(file),
                rule: RULE_SHARED_TYPES_IMPORT.into(),
            });
        }
    }
    if markers > MARKER_THRESHOLD {
        issues.push(Issue {
            file: None,
            rule: RULE_TODO_MARKERS.into(),
            message: format!(
                "Project has {} TODO/FIXME markers; consider cleaning up",
                markers
            ),
        });
    }

    let summary = Summary {
        files: read,
        markers,
        issues: issues.len(),
    };
    CheckReport { issues, summary }
}

/// Exit status for a finished scan: issues fail only in strict mode.
pub fn exit_code(report: &CheckReport, warn_only: bool) -> i32 {
    if report.is_clean() || warn_only {
        0
    } else {
        1
    }
}

#[derive(Default)]
struct FileScan {
    read: bool,
    forbidden_import: bool,
    markers: usize,
}

/// Collect regular files (and links to files) in sorted walk order.
fn collect_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                debug!(error = %err, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|e| {
            let ft = e.file_type();
            ft.is_file() || (ft.is_symlink() && e.path().is_file())
        })
        .map(|e| e.into_path())
        .collect()
}

fn scan_file(path: &Path) -> FileScan {
    let import_candidate = has_suffix(path, IMPORT_RULE_EXTENSIONS);
    let marker_candidate = has_suffix(path, MARKER_EXTENSIONS);
    if !import_candidate && !marker_candidate {
        return FileScan::default();
    }
    let text = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "skipping unreadable file");
            return FileScan::default();
        }
    };
    let in_shared_types = path
        .parent()
        .map(|dir| dir.to_string_lossy().contains(SHARED_TYPES_DIR))
        .unwrap_or(false);
    FileScan {
        read: true,
        forbidden_import: import_candidate && in_shared_types && text.contains(FORBIDDEN_IMPORT),
        markers: if marker_candidate {
            count_marker_lines(&text)
        } else {
            0
        },
    }
}

/// Count lines containing any marker; a line with several counts once.
pub fn count_marker_lines(text: &str) -> usize {
    text.split(|c| c == '\n' || c == '\r')
        .filter(|line| MARKERS.iter().any(|m| line.contains(m)))
        .count()
}
