//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "repotools",
    version,
    about = "Project architecture checks and model training",
    long_about = "repotools — a small CLI that checks project trees for architecture rule violations and trains the bundled quality/performance models.\n\nConfiguration precedence: CLI > repotools.toml > defaults.",
    after_help = "Examples:\n  repotools check --project Projects/CodingReviewer --warn-only\n  repotools check --project . --output json\n  repotools train --model-dir .quantum_models",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current repotools version.")]
    Version,
    /// Check a project for architecture rule violations
    #[command(
        about = "Run architecture checks",
        long_about = "Scan a project tree: Swift files under SharedTypes must not import SwiftUI, and TODO/FIXME markers must stay at or below 50. Exits 2 when the project path is missing, 1 on issues in strict mode.",
        after_help = "Examples:\n  repotools check --project Projects/PlannerApp\n  repotools check --project Projects/PlannerApp --warn-only"
    )]
    Check {
        #[arg(long, help = "Project directory to scan (required)")]
        project: String,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Report issues but exit 0")]
        warn_only: bool,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, help = "Repository root for config discovery (default: current dir)")]
        repo_root: Option<String>,
    },
    /// Train models on synthetic data
    #[command(
        about = "Train and save models",
        long_about = "Fit the code-quality classifier and performance regressor on synthetic data, print one metric per model, and overwrite the model files in the model directory.",
        after_help = "Examples:\n  repotools train\n  repotools train --model-dir build/models --seed 7"
    )]
    Train {
        #[arg(long, help = "Directory for model files (default: .quantum_models)")]
        model_dir: Option<String>,
        #[arg(long, help = "Learning data JSON (default: <model-dir>/learning_data.json)")]
        data: Option<String>,
        #[arg(long, help = "Forest seed (default: 42)")]
        seed: Option<u64>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, help = "Repository root for config discovery (default: current dir)")]
        repo_root: Option<String>,
    },
}
