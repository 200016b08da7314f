//! Native project file formats for the asset linker
//!
//! Each format is loaded into an owned in-memory document, mutated, and
//! serialized back:
//!
//! - [`XcodeProject`]: the `project.pbxproj` OpenStep property list
//! - [`PlistDocument`]: XML property lists such as `Info.plist`
//! - [`FontFamilyXml`]: Android `res/font/<family>.xml` descriptors

pub mod error;
pub mod font_xml;
pub mod pbxproj;
pub mod plist;

pub use error::{Error, Result};
pub use font_xml::{FontEntry, FontFamilyXml};
pub use pbxproj::{Element, Entry, PbxObject, PbxString, Value, XcodeProject};
pub use plist::{PlistDocument, PlistValue};
