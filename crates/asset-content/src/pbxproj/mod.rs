//! Xcode `project.pbxproj` support
//!
//! Parses the OpenStep property list into a comment-preserving value tree and
//! writes it back in Xcode's own layout: one section per object class, build
//! files and file references on a single line.

mod parser;
mod project;
mod value;
mod writer;

pub use project::XcodeProject;
pub use value::{Element, Entry, PbxObject, PbxString, Value};
