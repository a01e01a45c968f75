//! Output rendering for the check and train commands.
//!
//! Supports `human` (default) and `json` outputs. The human form keeps the
//! plain line protocol CI scripts grep for; status lines are colored only
//! when stdout is a terminal.

use crate::models::{CheckReport, TrainReport};
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;
use std::io::IsTerminal;

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

/// Print check results in the requested format.
pub fn print_check(res: &CheckReport, output: &str, warn_only: bool) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_check_json(res, warn_only))
                .unwrap_or_default()
        ),
        _ => {
            let color = use_colors(output);
            for line in render_check_lines(res, warn_only) {
                if color && (line.starts_with("Architecture") || line.starts_with("Strict")) {
                    println!("{}", line.red().bold());
                } else if color && line.starts_with("Warn-only") {
                    println!("{}", line.yellow().bold());
                } else if color && line.starts_with("No architecture") {
                    println!("{}", line.green().bold());
                } else {
                    println!("{}", line);
                }
            }
        }
    }
}

/// Human lines for a finished check (pure) for testing purposes.
pub fn render_check_lines(res: &CheckReport, warn_only: bool) -> Vec<String> {
    if res.is_clean() {
        return vec!["No architecture issues detected".to_string()];
    }
    let mut lines = Vec::with_capacity(res.issues.len() + 2);
    lines.push("Architecture issues detected:".to_string());
    for is in &res.issues {
        lines.push(format!(" - {}", is.message));
    }
    if warn_only {
        lines.push("Warn-only mode: continuing with warnings".to_string());
    } else {
        lines.push("Strict mode: failing".to_string());
    }
    lines
}

/// Compose check JSON object (pure) for testing/snapshot purposes.
pub fn compose_check_json(res: &CheckReport, warn_only: bool) -> JsonVal {
    let status = if res.is_clean() {
        "ok"
    } else if warn_only {
        "warn"
    } else {
        "fail"
    };
    json!({
        "mode": if warn_only { "warn-only" } else { "strict" },
        "status": status,
        "issues": res.issues,
        "summary": res.summary,
    })
}

/// Print training results: one metric line per model, then a status line.
pub fn print_train(res: &TrainReport, output: &str) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_train_json(res)).unwrap_or_default()
        ),
        _ => {
            println!("Code Quality Model Accuracy: {:.2}", res.accuracy);
            println!("Performance Model MSE: {:.4}", res.mse);
            if use_colors(output) {
                println!("{}", "Models trained and saved successfully".green().bold());
            } else {
                println!("Models trained and saved successfully");
            }
        }
    }
}

/// Compose train JSON object (pure) for testing/snapshot purposes.
pub fn compose_train_json(res: &TrainReport) -> JsonVal {
    json!({
        "models": [
            {"name": "code_quality", "path": res.classifier_path, "metric": "accuracy", "value": res.accuracy},
            {"name": "performance", "path": res.regressor_path, "metric": "mse", "value": res.mse},
        ],
        "learningData": {
            "projects": res.learning_projects,
            "patterns": res.learning_patterns,
        },
    })
}
