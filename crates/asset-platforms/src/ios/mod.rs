//! iOS linker
//!
//! Files are copied into the folder behind the project's Resources group and
//! referenced from that group and the primary target's Copy Bundle Resources
//! phase. Fonts are also listed under `UIAppFonts` in `Info.plist`.
//!
//! The project file and the plist are each loaded once, edited in memory
//! after all copies finish, and written back only when their content changed.

pub mod info_plist;
pub mod project;

use std::collections::{BTreeMap, BTreeSet};

use asset_content::XcodeProject;
use asset_fs::{NormalizedPath, io};
use asset_meta::{AssetRecord, IosProjectConfig, Platform};
use async_trait::async_trait;
use walkdir::WalkDir;

use crate::copy::{copy_assets, plan_copies};
use crate::integration::{AssetWarning, LinkContext, LinkOutcome, PlatformChanges, PlatformLinker};
use crate::{Error, Result};

/// Links assets into an Xcode project.
#[derive(Debug, Default, Clone, Copy)]
pub struct IosLinker;

impl IosLinker {
    pub fn new() -> Self {
        Self
    }

    fn config(context: &LinkContext) -> Result<&IosProjectConfig> {
        context
            .config
            .project
            .ios
            .as_ref()
            .ok_or_else(|| Error::Configuration {
                platform: Platform::Ios,
                message: "no [project.ios] section".into(),
            })
    }

    /// The `.xcodeproj` bundle: configured, or the first one in `sourceDir`.
    pub fn find_xcodeproj(context: &LinkContext) -> Result<NormalizedPath> {
        let config = Self::config(context)?;
        if let Some(configured) = &config.project_path {
            return Ok(context.resolve(configured));
        }

        WalkDir::new(context.source_dir.to_native())
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .find(|e| {
                e.file_type().is_dir()
                    && e.path().extension().is_some_and(|ext| ext == "xcodeproj")
            })
            .map(|e| NormalizedPath::new(e.path()))
            .ok_or_else(|| Error::ProjectNotFound {
                platform: Platform::Ios,
                path: context.source_dir.join("*.xcodeproj").to_native(),
            })
    }

    fn info_plist_path(
        context: &LinkContext,
        xcodeproj: &NormalizedPath,
        project: &XcodeProject,
        target: &str,
    ) -> Result<NormalizedPath> {
        let config = Self::config(context)?;
        if let Some(configured) = &config.info_plist {
            return Ok(context.resolve(configured));
        }
        if let Some(setting) = project::info_plist_setting(project, target) {
            return Ok(context.resolve(&setting));
        }
        let name = xcodeproj.file_stem().unwrap_or_default();
        Ok(context.resolve(&format!("{}/Info.plist", name)))
    }
}

fn file_names(records: &[AssetRecord]) -> BTreeSet<&str> {
    records.iter().map(AssetRecord::file_name).collect()
}

#[async_trait]
impl PlatformLinker for IosLinker {
    fn platform(&self) -> Platform {
        Platform::Ios
    }

    async fn link(&self, context: &LinkContext, changes: &PlatformChanges) -> Result<LinkOutcome> {
        let xcodeproj = Self::find_xcodeproj(context)?;
        let pbxproj_path = xcodeproj.join("project.pbxproj");
        if !pbxproj_path.is_file() {
            return Err(Error::ProjectNotFound {
                platform: Platform::Ios,
                path: pbxproj_path.to_native(),
            });
        }

        // A project file that cannot be parsed aborts the platform.
        let mut project = XcodeProject::load(&pbxproj_path)?;
        let group = project::ensure_resources_group(&mut project)?;
        let target = project::primary_target(&project)?;
        let phase = project::ensure_resources_phase(&mut project, &target)?;
        let resource_dir = group.directory(&context.source_dir);
        let plist_path = Self::info_plist_path(context, &xcodeproj, &project, &target)?;

        let mut outcome = LinkOutcome::default();
        let in_resources = |record: &AssetRecord| resource_dir.join(record.file_name());
        let jobs = plan_copies(
            changes.added.iter().chain(&changes.changed),
            &changes.current,
            in_resources,
            in_resources,
            &BTreeMap::new(),
            &mut outcome,
        );
        if !jobs.is_empty() {
            io::ensure_dir(&resource_dir)?;
        }
        copy_assets(jobs, &mut outcome).await;

        let failed: BTreeSet<String> = outcome
            .failed_assets()
            .into_iter()
            .map(str::to_string)
            .collect();
        let linked: Vec<AssetRecord> = changes
            .current
            .iter()
            .filter(|r| !failed.contains(&r.relative_path))
            .cloned()
            .collect();
        let current_names = file_names(&changes.current);

        // Removals first, so an asset that moved between roots is re-added.
        let mut removed_fonts = Vec::new();
        for record in &changes.removed {
            let name = record.file_name();
            if current_names.contains(name) {
                continue;
            }
            if project::remove_resource(&mut project, &group, name) {
                outcome.action(format!("removed {} from the Resources group", name));
            }
            if record.is_font() {
                removed_fonts.push(name.to_string());
            }
        }

        let mut linked_fonts = Vec::new();
        for record in &linked {
            let name = record.file_name();
            if project::add_resource(&mut project, &group, &phase, name, &record.extension)? {
                outcome.action(format!("added {} to the Resources group", name));
            }
            if record.is_font() {
                linked_fonts.push(name.to_string());
            }
        }

        info_plist::update_fonts(&plist_path, &linked_fonts, &removed_fonts, &mut outcome)?;
        if project.save(&pbxproj_path)? {
            outcome.action(format!("wrote {}", pbxproj_path));
        }

        for record in &changes.removed {
            let name = record.file_name();
            if current_names.contains(name) {
                continue;
            }
            let copy = resource_dir.join(name);
            match io::remove_file(&copy) {
                Ok(true) => outcome.action(format!("deleted {}", copy)),
                Ok(false) => tracing::debug!(path = %copy, "already gone"),
                Err(err) => outcome.warn(AssetWarning::for_asset(
                    record,
                    format!("failed to delete {}: {}", copy, err),
                )),
            }
        }

        tracing::info!(
            added = changes.added.len(),
            removed = changes.removed.len(),
            changed = changes.changed.len(),
            warnings = outcome.warnings.len(),
            "linked ios assets"
        );
        Ok(outcome)
    }
}
