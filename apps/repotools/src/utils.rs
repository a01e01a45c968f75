//! Small helpers for stderr prefixes and path display.

use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::path::Path;

/// Prefixes go to stderr; color them only when it is a terminal.
fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal()
}

pub fn error_prefix() -> String {
    if colors_enabled() {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

pub fn note_prefix() -> String {
    if colors_enabled() {
        "note:".yellow().bold().to_string()
    } else {
        "note:".to_string()
    }
}

pub fn info_prefix() -> String {
    if colors_enabled() {
        "info:".blue().bold().to_string()
    } else {
        "info:".to_string()
    }
}

/// Render `p` relative to the working directory when possible.
pub fn rel_to_wd(p: &Path) -> String {
    let wd = match std::env::current_dir() {
        Ok(d) => d,
        Err(_) => return p.to_string_lossy().to_string(),
    };
    let abs = if p.is_absolute() {
        p.to_path_buf()
    } else {
        wd.join(p)
    };
    match pathdiff::diff_paths(&abs, &wd) {
        Some(rel) if !rel.as_os_str().is_empty() => rel.to_string_lossy().to_string(),
        _ => p.to_string_lossy().to_string(),
    }
}

/// True when the file name ends with any of the given suffixes.
///
/// Matches on the whole name, so a file literally named `.swift` counts.
pub fn has_suffix(path: &Path, suffixes: &[&str]) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy())
        .map(|n| suffixes.iter().any(|s| n.ends_with(s)))
        .unwrap_or(false)
}
