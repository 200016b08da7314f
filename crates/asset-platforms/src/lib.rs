//! Platform linkers for the asset linker
//!
//! A [`PlatformLinker`] receives the assets added, removed and changed since
//! the previous run and applies them to one native project:
//!
//! - [`AndroidLinker`]: resource copies, `res/font` family descriptors and
//!   font registration in `MainApplication`
//! - [`IosLinker`]: resource copies, the Xcode project's Resources group and
//!   build phase, and `UIAppFonts` in `Info.plist`

pub mod android;
mod copy;
pub mod error;
pub mod integration;
pub mod ios;
pub mod logging;

pub use android::AndroidLinker;
pub use error::{Error, Result};
pub use integration::{AssetWarning, LinkContext, LinkOutcome, PlatformChanges, PlatformLinker};
pub use ios::IosLinker;

/// Linker for a platform.
pub fn linker_for(platform: asset_meta::Platform) -> Box<dyn PlatformLinker> {
    match platform {
        asset_meta::Platform::Android => Box::new(AndroidLinker::new()),
        asset_meta::Platform::Ios => Box::new(IosLinker::new()),
    }
}
