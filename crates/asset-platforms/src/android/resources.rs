//! Where each asset lands inside `app/src/main`

use asset_fs::NormalizedPath;
use asset_meta::{AssetKind, AssetRecord, FontClassifier, sanitize_resource_name};

pub(crate) const FONT_DIR: &str = "res/font";
pub(crate) const DRAWABLE_DIR: &str = "res/drawable";
pub(crate) const RAW_DIR: &str = "res/raw";
pub(crate) const ASSETS_DIR: &str = "assets";
/// Where fonts were copied before family descriptors were used
pub(crate) const LEGACY_FONT_DIR: &str = "assets/fonts";

/// Android resource name of an asset (sanitized stem, no extension).
///
/// A font without a style suffix would share its name with its family
/// descriptor, so it is named `<stem>_regular` instead.
pub fn resource_name(record: &AssetRecord, classifier: &dyn FontClassifier) -> String {
    let name = sanitize_resource_name(record.file_stem());
    if record.is_font() {
        let family = sanitize_resource_name(&classifier.classify(record.file_stem()).family);
        if family == name {
            return format!("{}_regular", name);
        }
    }
    name
}

fn resource_dir(record: &AssetRecord) -> &'static str {
    match record.kind {
        AssetKind::Font => FONT_DIR,
        AssetKind::Image => DRAWABLE_DIR,
        AssetKind::Audio | AssetKind::Other => RAW_DIR,
        AssetKind::Document => ASSETS_DIR,
    }
}

/// Destination of an asset under `app/src/main`.
///
/// Documents keep their sub-path and original name under `assets/`, since
/// they are opened through the asset manager rather than as resources.
pub fn destination(
    app_dir: &NormalizedPath,
    record: &AssetRecord,
    classifier: &dyn FontClassifier,
) -> NormalizedPath {
    if record.kind == AssetKind::Document {
        return app_dir.join(ASSETS_DIR).join(&record.subpath);
    }
    let name = resource_name(record, classifier);
    let file_name = if record.extension.is_empty() {
        name
    } else {
        format!("{}.{}", name, record.extension)
    };
    app_dir.join(resource_dir(record)).join(&file_name)
}

/// The slot an asset occupies: `<dir>/<resource name>` for resources, the
/// file path for documents.
///
/// Resources with the same name in one directory clash regardless of their
/// extensions.
pub fn resource_slot(
    app_dir: &NormalizedPath,
    record: &AssetRecord,
    classifier: &dyn FontClassifier,
) -> NormalizedPath {
    if record.kind == AssetKind::Document {
        return destination(app_dir, record, classifier);
    }
    app_dir
        .join(resource_dir(record))
        .join(&resource_name(record, classifier))
}
