//! Diff Engine
//!
//! Compares discovered assets with the previous manifest. Every output list
//! is sorted by relative path.

use std::collections::BTreeSet;

use asset_fs::NormalizedPath;
use asset_meta::AssetRecord;
use asset_platforms::PlatformChanges;

use crate::discovery::DiscoveredAsset;
use crate::manifest::LinkManifest;

/// Classification of every asset involved in one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetDiff {
    pub added: Vec<AssetRecord>,
    pub removed: Vec<AssetRecord>,
    /// Still present, with a checksum different from the recorded one
    pub changed: Vec<AssetRecord>,
    pub unchanged: Vec<AssetRecord>,
}

impl AssetDiff {
    /// Diff `current` against `previous`.
    ///
    /// Removed records are rebuilt from their manifest paths using `roots`.
    /// A manifest entry without a checksum counts as unchanged.
    pub fn compute(
        project_root: &NormalizedPath,
        roots: &[NormalizedPath],
        previous: &LinkManifest,
        current: &[DiscoveredAsset],
    ) -> Self {
        let mut diff = Self::default();

        for asset in current {
            let record = asset.record.clone();
            match previous.entry(&record.relative_path) {
                None => diff.added.push(record),
                Some(entry) => match &entry.checksum {
                    Some(checksum) if *checksum != asset.checksum => diff.changed.push(record),
                    _ => diff.unchanged.push(record),
                },
            }
        }

        let current_paths: BTreeSet<&str> =
            current.iter().map(|a| a.record.relative_path.as_str()).collect();
        diff.removed = previous
            .paths()
            .filter(|path| !current_paths.contains(path))
            .map(|path| AssetRecord::from_linked_path(project_root, path, roots))
            .collect();

        diff.added.sort();
        diff.removed.sort();
        diff.changed.sort();
        diff.unchanged.sort();
        diff
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }

    /// The linker input for this diff.
    pub fn into_changes(self, current: &[DiscoveredAsset]) -> PlatformChanges {
        PlatformChanges {
            added: self.added,
            removed: self.removed,
            changed: self.changed,
            current: current.iter().map(|a| a.record.clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn root() -> NormalizedPath {
        NormalizedPath::new("/project")
    }

    fn asset(path: &str, checksum: &str) -> DiscoveredAsset {
        DiscoveredAsset {
            record: AssetRecord::from_linked_path(&root(), path, &[]),
            checksum: checksum.to_string(),
        }
    }

    fn paths(records: &[AssetRecord]) -> Vec<&str> {
        records.iter().map(|r| r.relative_path.as_str()).collect()
    }

    #[test]
    fn first_run_adds_everything() {
        let current = [asset("assets/b.png", "1"), asset("assets/a.ttf", "2")];
        let diff = AssetDiff::compute(&root(), &[], &LinkManifest::new(), &current);

        assert_eq!(paths(&diff.added), vec!["assets/a.ttf", "assets/b.png"]);
        assert!(diff.removed.is_empty());
        assert!(!diff.is_empty());
    }

    #[test]
    fn splits_added_removed_changed_unchanged() {
        let previous = LinkManifest::from_assets(&[
            asset("assets/fonts/lato_regular.ttf", "old"),
            asset("assets/gone.mp3", "x"),
            asset("assets/same.png", "s"),
        ]);
        let current = [
            asset("assets/fonts/lato_regular.ttf", "new"),
            asset("assets/new.pdf", "n"),
            asset("assets/same.png", "s"),
        ];
        let roots = [root().join("assets")];

        let diff = AssetDiff::compute(&root(), &roots, &previous, &current);

        assert_eq!(paths(&diff.added), vec!["assets/new.pdf"]);
        assert_eq!(paths(&diff.removed), vec!["assets/gone.mp3"]);
        assert_eq!(paths(&diff.changed), vec!["assets/fonts/lato_regular.ttf"]);
        assert_eq!(paths(&diff.unchanged), vec!["assets/same.png"]);
        assert_eq!(diff.removed[0].subpath, "gone.mp3");
    }

    #[test]
    fn unchanged_input_is_empty() {
        let current = [asset("assets/a.ttf", "1")];
        let previous = LinkManifest::from_assets(&current);

        let diff = AssetDiff::compute(&root(), &[], &previous, &current);
        assert!(diff.is_empty());

        let changes = diff.into_changes(&current);
        assert!(changes.is_empty());
        assert_eq!(changes.current.len(), 1);
    }

    #[test]
    fn legacy_entries_without_checksum_are_unchanged() {
        let previous =
            LinkManifest::parse(r#"["assets/a.ttf"]"#, &NormalizedPath::new("m.json")).unwrap();
        let diff = AssetDiff::compute(&root(), &[], &previous, &[asset("assets/a.ttf", "1")]);

        assert!(diff.is_empty());
        assert_eq!(paths(&diff.unchanged), vec!["assets/a.ttf"]);
    }
}
