//! Asset Discoverer
//!
//! Walks the configured asset roots and returns one [`DiscoveredAsset`] per
//! file, sorted by relative path. Roots that do not exist are skipped.
//! Hidden files and directories (leading `.`) are ignored.

use std::collections::BTreeMap;

use asset_fs::{NormalizedPath, compute_file_checksum};
use asset_meta::AssetRecord;
use walkdir::{DirEntry, WalkDir};

use crate::{Error, Result};

/// An asset found on disk together with its content checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredAsset {
    pub record: AssetRecord,
    pub checksum: String,
}

/// Resolve configured roots against the project root.
pub fn resolve_roots(project_root: &NormalizedPath, roots: &[&str]) -> Vec<NormalizedPath> {
    roots.iter().map(|root| project_root.join(root)).collect()
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

/// Regular files, and symlinks that point to one. Symlinks are taken as-is,
/// not resolved to their targets.
fn is_asset_file(entry: &DirEntry) -> bool {
    if entry.file_type().is_file() {
        return true;
    }
    if entry.path_is_symlink() {
        if entry.path().is_file() {
            return true;
        }
        tracing::debug!(path = %entry.path().display(), "skipping symlink that is not a file");
    }
    false
}

/// Walk `roots` and collect every asset file.
///
/// When two roots yield the same relative path the first root wins.
pub fn discover(project_root: &NormalizedPath, roots: &[NormalizedPath]) -> Result<Vec<DiscoveredAsset>> {
    let mut found: BTreeMap<String, DiscoveredAsset> = BTreeMap::new();

    for root in roots {
        if !root.is_dir() {
            tracing::debug!(root = %root, "asset root does not exist, skipping");
            continue;
        }

        let walker = WalkDir::new(root.to_native())
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_hidden(e));
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(root = %root, error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            if !is_asset_file(&entry) {
                continue;
            }

            let record = AssetRecord::new(project_root, root, NormalizedPath::new(entry.path()));
            if found.contains_key(&record.relative_path) {
                continue;
            }
            let checksum = compute_file_checksum(entry.path())?;
            tracing::debug!(asset = %record.relative_path, kind = record.kind.as_str(), "discovered");
            found.insert(record.relative_path.clone(), DiscoveredAsset { record, checksum });
        }
    }

    Ok(found.into_values().collect())
}

/// [`discover`] on the blocking thread pool.
pub async fn discover_async(
    project_root: NormalizedPath,
    roots: Vec<NormalizedPath>,
) -> Result<Vec<DiscoveredAsset>> {
    tokio::task::spawn_blocking(move || discover(&project_root, &roots))
        .await
        .map_err(|e| Error::Discovery {
            message: e.to_string(),
        })?
}
