//! Asset model, font classification and configuration schema.
//!
//! This crate holds the pure data layer shared by the platform linkers and
//! the orchestration engine. Nothing in here touches native project files.

pub mod asset;
pub mod config;
pub mod error;
pub mod fonts;
pub mod platform;

pub use asset::{AssetKind, AssetRecord, sanitize_resource_name};
pub use config::{AndroidProjectConfig, IosProjectConfig, LinkConfig, ProjectConfig};
pub use error::{Error, Result};
pub use fonts::{FontClassifier, FontGroup, FontStyle, ParsedFontName, SuffixClassifier, group_fonts};
pub use platform::{MANIFEST_FILE_NAME, Platform};
