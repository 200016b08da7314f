//! The link command
//!
//! Resolves the project root and configuration, runs the [`LinkEngine`] and
//! prints its report.

use std::path::Path;

use colored::Colorize;

use asset_core::{LinkEngine, LinkReport, PlatformReport, PlatformStatus};
use asset_fs::NormalizedPath;
use asset_meta::{LinkConfig, Platform};

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// Config file names looked up in the project root, in order.
const CONFIG_FILES: [&str; 2] = ["link-assets.toml", "link-assets.json"];

/// Find the configuration in `root`.
pub fn find_config(root: &NormalizedPath) -> Option<NormalizedPath> {
    CONFIG_FILES
        .iter()
        .map(|name| root.join(name))
        .find(NormalizedPath::is_file)
}

fn resolve_root(path: &Path) -> Result<NormalizedPath> {
    let canonical = dunce::canonicalize(path).map_err(|e| {
        CliError::user(format!("Project root {} is not accessible: {}", path.display(), e))
    })?;
    Ok(NormalizedPath::new(canonical))
}

/// Run the link command.
pub async fn run_link(cli: &Cli) -> Result<()> {
    let root = resolve_root(&cli.project_root)?;
    let config_path = match &cli.config {
        Some(path) => NormalizedPath::new(std::env::current_dir()?.join(path)),
        None => find_config(&root).ok_or_else(|| {
            CliError::user(format!(
                "No {} or {} found in {}",
                CONFIG_FILES[0], CONFIG_FILES[1], root
            ))
        })?,
    };
    let config = LinkConfig::load(&config_path)?;
    tracing::debug!(root = %root, config = %config_path, "loaded configuration");

    println!("{} Linking assets in {}", "=>".blue().bold(), root.as_str().cyan());

    let mut engine = LinkEngine::new(root, config);
    if let Some(platform) = cli.platform {
        engine = engine.with_platforms(&[platform]);
    }
    let report = engine.run().await;

    print_report(&report, cli.verbose);

    if report.success() {
        Ok(())
    } else {
        let failed: Vec<&str> = report
            .platforms
            .iter()
            .filter(|r| r.is_failed())
            .map(|r| r.platform.as_str())
            .collect();
        Err(CliError::user(format!("Linking failed for {}", failed.join(", "))))
    }
}

fn platform_label(platform: Platform) -> String {
    format!("{:<8}", platform.as_str())
}

fn print_platform(report: &PlatformReport, verbose: bool) {
    let label = platform_label(report.platform);
    match &report.status {
        PlatformStatus::Linked => {
            println!(
                "{} {} {} added, {} removed, {} changed",
                "OK".green().bold(),
                label.bold(),
                report.added,
                report.removed,
                report.changed
            );
        }
        PlatformStatus::Skipped { reason } => {
            println!("{} {} {}", "SKIP".yellow().bold(), label.bold(), reason.dimmed());
        }
        PlatformStatus::Failed { error } => {
            println!("{} {} {}", "FAIL".red().bold(), label.bold(), error);
        }
    }

    if verbose {
        for action in &report.actions {
            println!("   {} {}", "-".dimmed(), action);
        }
    }
    for warning in &report.warnings {
        println!("   {} {}", "!".yellow(), warning);
    }
}

fn print_report(report: &LinkReport, verbose: bool) {
    for platform in &report.platforms {
        print_platform(platform, verbose);
    }

    let warnings = report.warning_count();
    if warnings > 0 {
        println!();
        println!("{} {} warning(s)", "!".yellow().bold(), warnings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn prefers_toml_over_json() {
        let temp = TempDir::new().unwrap();
        let root = NormalizedPath::new(temp.path());
        assert!(find_config(&root).is_none());

        fs::write(temp.path().join("link-assets.json"), "{}").unwrap();
        assert_eq!(find_config(&root), Some(root.join("link-assets.json")));

        fs::write(temp.path().join("link-assets.toml"), "").unwrap();
        assert_eq!(find_config(&root), Some(root.join("link-assets.toml")));
    }
}
