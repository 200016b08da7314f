//! Manifest Store
//!
//! One manifest per platform, at `<sourceDir>/link-assets-manifest.json`:
//!
//! ```json
//! {
//!   "version": 1,
//!   "assets": [
//!     { "path": "assets/shared/lato_regular.ttf", "checksum": "sha256:..." }
//!   ]
//! }
//! ```
//!
//! Older manifests written as a bare list of paths, a list of `{ "path" }`
//! objects, or a `{ "<path>": true }` map are still read.

use std::collections::{BTreeMap, BTreeSet};

use asset_fs::{NormalizedPath, io};
use asset_meta::MANIFEST_FILE_NAME;
use serde::{Deserialize, Serialize};

use crate::discovery::DiscoveredAsset;
use crate::{Error, Result};

const VERSION: u32 = 1;

/// One linked asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub path: String,
    /// Missing in manifests written before checksums were recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

/// Assets linked by the last successful run, sorted by path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkManifest {
    version: u32,
    assets: Vec<ManifestEntry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LegacyEntry {
    Path(String),
    Entry(ManifestEntry),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ManifestFile {
    Current(LinkManifest),
    List(Vec<LegacyEntry>),
    Map(BTreeMap<String, bool>),
}

impl Default for LinkManifest {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkManifest {
    /// An empty manifest
    pub fn new() -> Self {
        Self {
            version: VERSION,
            assets: Vec::new(),
        }
    }

    fn from_entries(entries: impl IntoIterator<Item = ManifestEntry>) -> Self {
        let mut by_path: BTreeMap<String, ManifestEntry> = BTreeMap::new();
        for entry in entries {
            let path = NormalizedPath::new(&entry.path).as_str().to_string();
            by_path.entry(path.clone()).or_insert(ManifestEntry { path, ..entry });
        }
        Self {
            version: VERSION,
            assets: by_path.into_values().collect(),
        }
    }

    /// Record every discovered asset.
    pub fn from_assets(assets: &[DiscoveredAsset]) -> Self {
        Self::from_entries(assets.iter().map(|asset| ManifestEntry {
            path: asset.record.relative_path.clone(),
            checksum: Some(asset.checksum.clone()),
        }))
    }

    /// The manifest to persist after a link in which `failed` assets could
    /// not be placed or removed.
    ///
    /// A failed asset that was linked before keeps its previous entry, so a
    /// failed update or removal is retried on the next run. A failed new
    /// asset is left out and will be added again.
    pub fn after_link(previous: &LinkManifest, current: &[DiscoveredAsset], failed: &BTreeSet<&str>) -> Self {
        let current_paths: BTreeSet<&str> =
            current.iter().map(|a| a.record.relative_path.as_str()).collect();
        let linked = current.iter().filter_map(|asset| {
            let path = asset.record.relative_path.as_str();
            if failed.contains(path) {
                return previous.entry(path).cloned();
            }
            Some(ManifestEntry {
                path: path.to_string(),
                checksum: Some(asset.checksum.clone()),
            })
        });
        let pending_removals = previous
            .assets
            .iter()
            .filter(|e| !current_paths.contains(e.path.as_str()) && failed.contains(e.path.as_str()))
            .cloned();
        Self::from_entries(linked.chain(pending_removals))
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.assets
    }

    pub fn entry(&self, path: &str) -> Option<&ManifestEntry> {
        self.assets
            .binary_search_by(|e| e.path.as_str().cmp(path))
            .ok()
            .map(|i| &self.assets[i])
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entry(path).is_some()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.assets.iter().map(|e| e.path.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Location of the manifest for a platform directory.
    pub fn path_for(source_dir: &NormalizedPath) -> NormalizedPath {
        source_dir.join(MANIFEST_FILE_NAME)
    }

    /// Parse manifest JSON in any supported shape.
    pub fn parse(content: &str, path: &NormalizedPath) -> Result<Self> {
        let parse_error = |message: String| Error::ManifestParse {
            path: path.to_native(),
            message,
        };

        let file: ManifestFile =
            serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?;
        match file {
            ManifestFile::Current(manifest) if manifest.version > VERSION => Err(parse_error(
                format!("unsupported manifest version {}", manifest.version),
            )),
            ManifestFile::Current(manifest) => Ok(Self::from_entries(manifest.assets)),
            ManifestFile::List(entries) => Ok(Self::from_entries(entries.into_iter().map(
                |entry| match entry {
                    LegacyEntry::Path(path) => ManifestEntry {
                        path,
                        checksum: None,
                    },
                    LegacyEntry::Entry(entry) => entry,
                },
            ))),
            ManifestFile::Map(map) => Ok(Self::from_entries(
                map.into_iter()
                    .filter(|(_, linked)| *linked)
                    .map(|(path, _)| ManifestEntry {
                        path,
                        checksum: None,
                    }),
            )),
        }
    }

    /// Load the platform's manifest; a missing file is an empty manifest.
    pub fn load(source_dir: &NormalizedPath) -> Result<Self> {
        let path = Self::path_for(source_dir);
        match io::read_optional_text(&path)? {
            Some(content) => Self::parse(&content, &path),
            None => Ok(Self::new()),
        }
    }

    /// Write the manifest atomically. Returns whether the file changed.
    pub fn save(&self, source_dir: &NormalizedPath) -> Result<bool> {
        let path = Self::path_for(source_dir);
        let mut content = serde_json::to_string_pretty(self)?;
        content.push('\n');
        let written = io::write_text_if_changed(&path, &content)?;
        if written {
            tracing::debug!(path = %path, assets = self.assets.len(), "saved manifest");
        }
        Ok(written)
    }
}
