//! LinkEngine: discovery, diff, linking and manifest persistence
//!
//! Each platform runs independently: discover its roots, load its manifest,
//! diff, hand the changes to its linker and, only when the linker returns
//! without a fatal error, persist the new manifest. Android and iOS touch
//! disjoint trees and are linked concurrently.

use std::collections::BTreeMap;
use std::sync::Arc;

use asset_fs::NormalizedPath;
use asset_meta::{FontClassifier, LinkConfig, Platform, SuffixClassifier};
use asset_platforms::{AssetWarning, LinkContext, PlatformLinker, linker_for};

use crate::diff::AssetDiff;
use crate::discovery::{discover_async, resolve_roots};
use crate::manifest::LinkManifest;
use crate::report::{LinkReport, PlatformReport};
use crate::{Error, Result};

/// Orchestrates one link run over every configured platform.
pub struct LinkEngine {
    project_root: NormalizedPath,
    config: LinkConfig,
    classifier: Arc<dyn FontClassifier>,
    linkers: BTreeMap<Platform, Arc<dyn PlatformLinker>>,
    selected: Vec<Platform>,
}

impl LinkEngine {
    pub fn new(project_root: NormalizedPath, config: LinkConfig) -> Self {
        let linkers: BTreeMap<Platform, Arc<dyn PlatformLinker>> = Platform::ALL
            .into_iter()
            .map(|p| (p, Arc::from(linker_for(p))))
            .collect();
        Self {
            project_root,
            config,
            classifier: Arc::new(SuffixClassifier),
            linkers,
            selected: Platform::ALL.to_vec(),
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn FontClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Replace the linker used for its platform.
    pub fn with_linker(mut self, linker: Arc<dyn PlatformLinker>) -> Self {
        self.linkers.insert(linker.platform(), linker);
        self
    }

    /// Link only these platforms; the rest are reported as skipped.
    pub fn with_platforms(mut self, platforms: &[Platform]) -> Self {
        self.selected = platforms.to_vec();
        self
    }

    pub fn project_root(&self) -> &NormalizedPath {
        &self.project_root
    }

    /// The platform's source directory, which must exist.
    pub fn source_dir(&self, platform: Platform) -> Result<NormalizedPath> {
        let configured = self
            .config
            .source_dir(platform)
            .ok_or_else(|| Error::Configuration {
                platform,
                message: format!("no [project.{}] section", platform),
            })?;
        let source_dir = self.project_root.join(configured);
        if !source_dir.is_dir() {
            return Err(Error::Configuration {
                platform,
                message: format!("source directory {} does not exist", source_dir),
            });
        }
        Ok(source_dir)
    }

    /// Link every platform and report the result of each.
    pub async fn run(&self) -> LinkReport {
        let (android, ios) = tokio::join!(
            self.link_platform(Platform::Android),
            self.link_platform(Platform::Ios)
        );
        let report = LinkReport {
            platforms: vec![android, ios],
        };
        tracing::info!(
            success = report.success(),
            warnings = report.warning_count(),
            "link run finished"
        );
        report
    }

    /// Link one platform. Never fails: errors are folded into the report.
    pub async fn link_platform(&self, platform: Platform) -> PlatformReport {
        if !self.selected.contains(&platform) {
            return PlatformReport::skipped(platform, "not selected");
        }

        let mut warnings = Vec::new();
        match self.try_link(platform, &mut warnings).await {
            Ok(report) => report,
            Err(err) if err.is_configuration() => {
                tracing::info!(%platform, reason = %err, "skipping platform");
                PlatformReport::skipped(platform, err.to_string())
            }
            Err(err) => {
                tracing::error!(%platform, error = %err, "platform link failed, manifest not updated");
                PlatformReport::failed(platform, err.to_string(), warnings)
            }
        }
    }

    fn load_manifest(
        &self,
        source_dir: &NormalizedPath,
        warnings: &mut Vec<AssetWarning>,
    ) -> Result<LinkManifest> {
        match LinkManifest::load(source_dir) {
            Ok(manifest) => Ok(manifest),
            Err(err @ Error::ManifestParse { .. }) => {
                tracing::warn!(error = %err, "ignoring unreadable manifest");
                warnings.push(AssetWarning::general(format!(
                    "{}; starting from an empty manifest",
                    err
                )));
                Ok(LinkManifest::new())
            }
            Err(err) => Err(err),
        }
    }

    async fn try_link(
        &self,
        platform: Platform,
        warnings: &mut Vec<AssetWarning>,
    ) -> Result<PlatformReport> {
        let source_dir = self.source_dir(platform)?;
        let linker = self
            .linkers
            .get(&platform)
            .ok_or_else(|| Error::Configuration {
                platform,
                message: "no linker registered".into(),
            })?;

        let roots = resolve_roots(&self.project_root, &self.config.asset_roots(platform));
        let current = discover_async(self.project_root.clone(), roots.clone()).await?;
        let previous = self.load_manifest(&source_dir, warnings)?;

        let diff = AssetDiff::compute(&self.project_root, &roots, &previous, &current);
        tracing::debug!(
            %platform,
            added = diff.added.len(),
            removed = diff.removed.len(),
            changed = diff.changed.len(),
            unchanged = diff.unchanged.len(),
            "computed asset diff"
        );
        let changes = diff.into_changes(&current);

        let context = LinkContext::new(
            self.project_root.clone(),
            source_dir.clone(),
            self.config.clone(),
        )
        .with_classifier(self.classifier.clone());
        let outcome = linker.link(&context, &changes).await?;

        let mut report = PlatformReport::linked(platform);
        report.added = changes.added.len();
        report.removed = changes.removed.len();
        report.changed = changes.changed.len();

        let manifest = LinkManifest::after_link(&previous, &current, &outcome.failed_assets());
        let mut actions = outcome.actions;
        if manifest.save(&source_dir)? {
            actions.push(format!("wrote {}", LinkManifest::path_for(&source_dir)));
        }

        warnings.extend(outcome.warnings);
        report.actions = actions;
        report.warnings = std::mem::take(warnings);
        tracing::info!(%platform, "{}", report);
        Ok(report)
    }
}
