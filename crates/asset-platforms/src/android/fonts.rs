//! `res/font/<family>.xml` maintenance

use std::collections::BTreeSet;

use asset_content::{FontEntry, FontFamilyXml};
use asset_fs::{NormalizedPath, io};
use asset_meta::{AssetRecord, FontClassifier, group_fonts, sanitize_resource_name};

use super::entry_point::FontRegistration;
use super::resources::resource_name;
use crate::Result;
use crate::integration::{AssetWarning, LinkOutcome};

/// What happened to the family descriptors in one run.
#[derive(Debug, Default)]
pub(crate) struct FamilySync {
    /// Every family whose descriptor exists after the run
    pub registered: Vec<FontRegistration>,
    /// Family resources whose descriptor was deleted
    pub deleted: Vec<String>,
}

fn descriptor_path(font_dir: &NormalizedPath, family_resource: &str) -> NormalizedPath {
    font_dir.join(&format!("{}.xml", family_resource))
}

/// Drop removed fonts from their family descriptors.
///
/// `still_linked` holds font resource names that are still provided by a
/// current asset; those entries are kept.
pub(crate) fn remove_fonts(
    font_dir: &NormalizedPath,
    classifier: &dyn FontClassifier,
    removed: &[AssetRecord],
    still_linked: &BTreeSet<String>,
    outcome: &mut LinkOutcome,
    sync: &mut FamilySync,
) -> Result<()> {
    for record in removed.iter().filter(|r| r.is_font()) {
        let font = resource_name(record, classifier);
        if still_linked.contains(&font) {
            continue;
        }

        let family = sanitize_resource_name(&classifier.classify(record.file_stem()).family);
        let candidates = [family, font.clone()];
        for family in candidates.iter() {
            let path = descriptor_path(font_dir, family);
            let Some(content) = io::read_optional_text(&path)? else {
                continue;
            };
            let mut xml = match FontFamilyXml::parse(&content) {
                Ok(xml) => xml,
                Err(err) => {
                    outcome.warn(AssetWarning::for_asset(
                        record,
                        format!("cannot update {}: {}", path, err),
                    ));
                    break;
                }
            };
            if !xml.remove_font(&font) {
                continue;
            }

            if xml.is_empty() {
                io::remove_file(&path)?;
                outcome.action(format!("deleted font family {}", path));
                sync.deleted.push(family.clone());
            } else {
                xml.save(&path)?;
                outcome.action(format!("removed {} from {}", font, path));
            }
            break;
        }
    }
    Ok(())
}

/// Write a descriptor for every family among `fonts`, merging into existing
/// files.
pub(crate) fn write_families(
    font_dir: &NormalizedPath,
    classifier: &dyn FontClassifier,
    fonts: &[AssetRecord],
    outcome: &mut LinkOutcome,
    sync: &mut FamilySync,
) -> Result<()> {
    for group in group_fonts(classifier, fonts) {
        let path = descriptor_path(font_dir, &group.resource_name);
        let mut xml = match io::read_optional_text(&path)? {
            Some(content) => match FontFamilyXml::parse(&content) {
                Ok(xml) => xml,
                Err(err) => {
                    outcome.warn(AssetWarning::general(format!(
                        "replacing unreadable {}: {}",
                        path, err
                    )));
                    FontFamilyXml::new()
                }
            },
            None => FontFamilyXml::new(),
        };

        for (style, record) in &group.styles {
            xml.upsert(FontEntry::new(
                resource_name(record, classifier),
                style.weight,
                style.italic,
            ));
        }
        if xml.save(&path)? {
            outcome.action(format!(
                "wrote font family {} ({} styles)",
                path,
                xml.entries().len()
            ));
        }

        sync.registered.push(FontRegistration {
            family: group.family.clone(),
            resource: group.resource_name.clone(),
        });
    }
    Ok(())
}
