//! repotools CLI binary entry point.
//! Delegates to the library for check/train and prints results.

use clap::Parser;
use repotools::check::{self, EXIT_NOT_FOUND};
use repotools::cli::{Cli, Commands};
use repotools::{config, output, train, utils};
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_env("REPOTOOLS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}

/// Tell the user when settings fall back to defaults.
fn config_note(root: &Path, note_missing: bool) {
    match config::read_config(root) {
        Ok(Some(_)) => {}
        Ok(None) if note_missing => {
            eprintln!("{} No repotools.toml found; using defaults.", utils::note_prefix());
        }
        Ok(None) => {}
        Err(e) => eprintln!("{} {}; using defaults.", utils::note_prefix(), e),
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Check {
            project,
            warn_only,
            output,
            repo_root,
        } => {
            let eff = config::resolve_check(
                repo_root.as_deref(),
                if warn_only { Some(true) } else { None },
                output.as_deref(),
            );
            if eff.output != "json" {
                config_note(&eff.repo_root, true);
            }
            let report = match check::run_check(Path::new(&project)) {
                Ok(r) => r,
                Err(e) => {
                    // Plain stdout line so CI logs match the strict/warn lines
                    println!("{}", e);
                    std::process::exit(EXIT_NOT_FOUND);
                }
            };
            output::print_check(&report, &eff.output, eff.warn_only);
            std::process::exit(check::exit_code(&report, eff.warn_only));
        }
        Commands::Train {
            model_dir,
            data,
            seed,
            output,
            repo_root,
        } => {
            let eff = config::resolve_train(
                repo_root.as_deref(),
                model_dir.as_deref(),
                data.as_deref(),
                seed,
                output.as_deref(),
            );
            if eff.output != "json" {
                config_note(&eff.repo_root, false);
                println!("Training ML models...");
            }
            match train::save_models(&eff.settings) {
                Ok(report) => {
                    output::print_train(&report, &eff.output);
                    if eff.output != "json" {
                        eprintln!(
                            "{} {}",
                            utils::info_prefix(),
                            format!(
                                "models written to {}",
                                utils::rel_to_wd(&eff.settings.model_dir)
                            )
                        );
                    }
                }
                Err(e) => {
                    eprintln!("{} {}", utils::error_prefix(), e);
                    std::process::exit(1);
                }
            }
        }
    }
}
