//! CLI argument parsing using clap derive

use std::path::PathBuf;

use asset_meta::Platform;
use clap::Parser;

/// Link fonts, images, audio and documents into Android and iOS projects
#[derive(Parser, Debug)]
#[command(name = "link-assets")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project root holding the asset folders and native projects
    #[arg(long, default_value = ".", env = "LINK_ASSETS_PROJECT_ROOT")]
    pub project_root: PathBuf,

    /// Configuration file (default: link-assets.toml or link-assets.json in the project root)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Link only this platform
    #[arg(short, long, value_parser = parse_platform)]
    pub platform: Option<Platform>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_platform(value: &str) -> Result<Platform, String> {
    value.parse().map_err(|e: asset_meta::Error| e.to_string())
}
