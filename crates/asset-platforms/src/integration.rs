//! PlatformLinker trait and the values passed to and from it

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use asset_fs::NormalizedPath;
use asset_meta::{AssetRecord, FontClassifier, LinkConfig, Platform, SuffixClassifier};
use async_trait::async_trait;

use crate::Result;

/// Context for one platform's link step
#[derive(Debug, Clone)]
pub struct LinkContext {
    pub project_root: NormalizedPath,
    /// Resolved platform directory (`android/`, `ios/`)
    pub source_dir: NormalizedPath,
    pub config: LinkConfig,
    pub classifier: Arc<dyn FontClassifier>,
}

impl LinkContext {
    pub fn new(project_root: NormalizedPath, source_dir: NormalizedPath, config: LinkConfig) -> Self {
        Self {
            project_root,
            source_dir,
            config,
            classifier: Arc::new(SuffixClassifier),
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn FontClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Resolve a configured path against the platform directory.
    pub fn resolve(&self, path: &str) -> NormalizedPath {
        self.source_dir.join(path)
    }
}

/// Assets to apply, each list sorted by relative path.
#[derive(Debug, Clone, Default)]
pub struct PlatformChanges {
    /// Discovered now, absent from the manifest
    pub added: Vec<AssetRecord>,
    /// In the manifest, no longer discovered
    pub removed: Vec<AssetRecord>,
    /// Present in both with a different checksum
    pub changed: Vec<AssetRecord>,
    /// Every asset discovered for the platform in this run
    pub current: Vec<AssetRecord>,
}

impl PlatformChanges {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

/// A non-fatal problem hit while linking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetWarning {
    /// Relative path of the asset the warning is about, if any
    pub asset: Option<String>,
    pub message: String,
}

impl AssetWarning {
    pub fn for_asset(asset: &AssetRecord, message: impl Into<String>) -> Self {
        Self {
            asset: Some(asset.relative_path.clone()),
            message: message.into(),
        }
    }

    pub fn general(message: impl Into<String>) -> Self {
        Self {
            asset: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for AssetWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.asset {
            Some(asset) => write!(f, "{}: {}", asset, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Result of a successful link step.
#[derive(Debug, Clone, Default)]
pub struct LinkOutcome {
    pub actions: Vec<String>,
    pub warnings: Vec<AssetWarning>,
}

impl LinkOutcome {
    pub fn action(&mut self, action: impl Into<String>) {
        let action = action.into();
        tracing::debug!(%action, "link action");
        self.actions.push(action);
    }

    pub fn warn(&mut self, warning: AssetWarning) {
        tracing::warn!(%warning, "link warning");
        self.warnings.push(warning);
    }

    /// Assets that could not be applied and must not be recorded as linked.
    pub fn failed_assets(&self) -> BTreeSet<&str> {
        self.warnings
            .iter()
            .filter_map(|w| w.asset.as_deref())
            .collect()
    }
}

/// Applies asset changes to one native project.
#[async_trait]
pub trait PlatformLinker: Send + Sync {
    fn platform(&self) -> Platform;

    async fn link(&self, context: &LinkContext, changes: &PlatformChanges) -> Result<LinkOutcome>;
}
