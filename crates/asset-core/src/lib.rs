//! Orchestration layer for the asset linker
//!
//! Discovers assets, diffs them against each platform's manifest, drives the
//! platform linkers and persists the manifests.
//!
//! ```rust,no_run
//! use asset_core::LinkEngine;
//! use asset_fs::NormalizedPath;
//! use asset_meta::LinkConfig;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let root = NormalizedPath::new("/path/to/app");
//! let config = LinkConfig::load(&root.join("link-assets.toml"))?;
//! let report = LinkEngine::new(root, config).run().await;
//! assert!(report.success());
//! # Ok(())
//! # }
//! ```

pub mod diff;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod manifest;
pub mod report;

pub use diff::AssetDiff;
pub use discovery::{DiscoveredAsset, discover, discover_async, resolve_roots};
pub use engine::LinkEngine;
pub use error::{Error, Result};
pub use manifest::{LinkManifest, ManifestEntry};
pub use report::{LinkReport, PlatformReport, PlatformStatus};
