//! Android linker
//!
//! Layout under `<sourceDir>/<appName>/src/main`:
//!
//! | asset kind     | destination                          |
//! |----------------|--------------------------------------|
//! | font           | `res/font/<name>.<ext>` + family XML |
//! | image          | `res/drawable/<name>.<ext>`          |
//! | audio, other   | `res/raw/<name>.<ext>`               |
//! | document       | `assets/<sub-path>`                  |
//!
//! Font files are named after their stem, or `<stem>_regular` when the stem
//! is also the family name. Fonts left in `assets/fonts` by older linkers
//! are deleted once the same file is linked under `res/font`.

pub mod entry_point;
mod fonts;
pub mod resources;

use std::collections::{BTreeMap, BTreeSet};

use asset_fs::{NormalizedPath, io};
use asset_meta::{AssetRecord, Platform, group_fonts};
use async_trait::async_trait;

use crate::copy::{copy_assets, plan_copies};
use crate::integration::{AssetWarning, LinkContext, LinkOutcome, PlatformChanges, PlatformLinker};
use crate::{Error, Result};

use entry_point::{add_registrations, find_entry_point, remove_registrations};
use fonts::FamilySync;
use resources::{FONT_DIR, LEGACY_FONT_DIR, destination, resource_name, resource_slot};

/// Links assets into an Android application module.
#[derive(Debug, Default, Clone, Copy)]
pub struct AndroidLinker;

impl AndroidLinker {
    pub fn new() -> Self {
        Self
    }

    /// `app/src/main` of the configured application module.
    pub fn app_dir(context: &LinkContext) -> Result<NormalizedPath> {
        let android = context
            .config
            .project
            .android
            .as_ref()
            .ok_or_else(|| Error::Configuration {
                platform: Platform::Android,
                message: "no [project.android] section".into(),
            })?;
        Ok(context
            .source_dir
            .join(&android.app_name)
            .join("src/main"))
    }

    /// Delete a copied file. A failure is a warning on `record`.
    fn delete_copy(path: &NormalizedPath, record: &AssetRecord, outcome: &mut LinkOutcome) {
        match io::remove_file(path) {
            Ok(true) => outcome.action(format!("deleted {}", path)),
            Ok(false) => tracing::trace!(path = %path, "nothing to delete"),
            Err(err) => outcome.warn(AssetWarning::for_asset(
                record,
                format!("failed to delete {}: {}", path, err),
            )),
        }
    }

    fn update_entry_point(
        app_dir: &NormalizedPath,
        sync: &FamilySync,
        outcome: &mut LinkOutcome,
    ) -> Result<()> {
        let Some(entry) = find_entry_point(app_dir) else {
            if !sync.registered.is_empty() {
                outcome.warn(AssetWarning::general(format!(
                    "no MainApplication.kt or MainApplication.java under {}, fonts not registered",
                    app_dir.join("java")
                )));
            }
            return Ok(());
        };

        let source = io::read_text(&entry.path)?;
        let mut patched = remove_registrations(&source, &sync.deleted);
        match add_registrations(&patched, entry.language, &sync.registered) {
            Some(with_fonts) => patched = with_fonts,
            None => outcome.warn(AssetWarning::general(format!(
                "no super.onCreate() call in {}, fonts not registered",
                entry.path
            ))),
        }

        if io::write_text_if_changed(&entry.path, &patched)? {
            outcome.action(format!("updated font registration in {}", entry.path));
        }
        Ok(())
    }
}

#[async_trait]
impl PlatformLinker for AndroidLinker {
    fn platform(&self) -> Platform {
        Platform::Android
    }

    async fn link(&self, context: &LinkContext, changes: &PlatformChanges) -> Result<LinkOutcome> {
        let app_dir = Self::app_dir(context)?;
        if !app_dir.is_dir() {
            return Err(Error::ProjectNotFound {
                platform: Platform::Android,
                path: app_dir.to_native(),
            });
        }

        let mut outcome = LinkOutcome::default();
        let classifier = context.classifier.as_ref();
        let font_dir = app_dir.join(FONT_DIR);

        // Family descriptors own their names in res/font before any font file.
        let reserved: BTreeMap<NormalizedPath, String> = group_fonts(classifier, &changes.current)
            .into_iter()
            .map(|group| {
                (
                    font_dir.join(&group.resource_name),
                    format!("font family {}", group.family),
                )
            })
            .collect();
        let jobs = plan_copies(
            changes.added.iter().chain(&changes.changed),
            &changes.current,
            |record| resource_slot(&app_dir, record, classifier),
            |record| destination(&app_dir, record, classifier),
            &reserved,
            &mut outcome,
        );

        // An unwritable resource directory aborts the platform.
        let dirs: BTreeSet<NormalizedPath> =
            jobs.iter().filter_map(|job| job.destination.parent()).collect();
        for dir in &dirs {
            io::ensure_dir(dir)?;
        }

        copy_assets(jobs, &mut outcome).await;
        let failed: BTreeSet<String> = outcome
            .failed_assets()
            .into_iter()
            .map(str::to_string)
            .collect();

        let current_destinations: BTreeSet<NormalizedPath> = changes
            .current
            .iter()
            .map(|record| destination(&app_dir, record, classifier))
            .collect();
        let linked_fonts: Vec<AssetRecord> = changes
            .current
            .iter()
            .filter(|r| r.is_font() && !failed.contains(&r.relative_path))
            .cloned()
            .collect();
        let still_linked: BTreeSet<String> = linked_fonts
            .iter()
            .map(|record| resource_name(record, classifier))
            .collect();

        let mut sync = FamilySync::default();
        fonts::remove_fonts(
            &font_dir,
            classifier,
            &changes.removed,
            &still_linked,
            &mut outcome,
            &mut sync,
        )?;
        if !linked_fonts.is_empty() {
            io::ensure_dir(&font_dir)?;
            fonts::write_families(&font_dir, classifier, &linked_fonts, &mut outcome, &mut sync)?;
        }
        if !sync.registered.is_empty() || !sync.deleted.is_empty() {
            Self::update_entry_point(&app_dir, &sync, &mut outcome)?;
        }

        let legacy_dir = app_dir.join(LEGACY_FONT_DIR);
        for record in &linked_fonts {
            Self::delete_copy(&legacy_dir.join(record.file_name()), record, &mut outcome);
        }

        for record in &changes.removed {
            let target = destination(&app_dir, record, classifier);
            if !current_destinations.contains(&target) {
                Self::delete_copy(&target, record, &mut outcome);
            }
        }

        tracing::info!(
            added = changes.added.len(),
            removed = changes.removed.len(),
            changed = changes.changed.len(),
            warnings = outcome.warnings.len(),
            "linked android assets"
        );
        Ok(outcome)
    }
}
