//! Outcome of a link run

use std::fmt;

use asset_meta::Platform;
use asset_platforms::AssetWarning;

/// How one platform's link step ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformStatus {
    Linked,
    /// Not configured, or not selected for this run
    Skipped { reason: String },
    /// A fatal error; the manifest was left untouched
    Failed { error: String },
}

/// Report for a single platform.
#[derive(Debug, Clone)]
pub struct PlatformReport {
    pub platform: Platform,
    pub status: PlatformStatus,
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
    pub actions: Vec<String>,
    pub warnings: Vec<AssetWarning>,
}

impl PlatformReport {
    pub fn linked(platform: Platform) -> Self {
        Self {
            platform,
            status: PlatformStatus::Linked,
            added: 0,
            removed: 0,
            changed: 0,
            actions: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn skipped(platform: Platform, reason: impl Into<String>) -> Self {
        Self {
            status: PlatformStatus::Skipped {
                reason: reason.into(),
            },
            ..Self::linked(platform)
        }
    }

    /// A failed report keeps warnings collected before the failure.
    pub fn failed(platform: Platform, error: impl Into<String>, warnings: Vec<AssetWarning>) -> Self {
        Self {
            status: PlatformStatus::Failed {
                error: error.into(),
            },
            warnings,
            ..Self::linked(platform)
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, PlatformStatus::Failed { .. })
    }
}

impl fmt::Display for PlatformReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            PlatformStatus::Linked => write!(
                f,
                "{}: {} added, {} removed, {} changed",
                self.platform, self.added, self.removed, self.changed
            ),
            PlatformStatus::Skipped { reason } => write!(f, "{}: skipped ({})", self.platform, reason),
            PlatformStatus::Failed { error } => write!(f, "{}: failed ({})", self.platform, error),
        }
    }
}

/// Report for a whole run, one entry per platform in [`Platform::ALL`] order.
#[derive(Debug, Clone, Default)]
pub struct LinkReport {
    pub platforms: Vec<PlatformReport>,
}

impl LinkReport {
    /// True when no platform failed. Warnings do not count.
    pub fn success(&self) -> bool {
        !self.platforms.iter().any(PlatformReport::is_failed)
    }

    pub fn platform(&self, platform: Platform) -> Option<&PlatformReport> {
        self.platforms.iter().find(|r| r.platform == platform)
    }

    pub fn warning_count(&self) -> usize {
        self.platforms.iter().map(|r| r.warnings.len()).sum()
    }
}
