//! Filesystem primitives for the asset linker
//!
//! Provides slash-normalized paths, atomic writes and content checksums.

pub mod checksum;
pub mod error;
pub mod io;
pub mod path;

pub use checksum::{compute_content_checksum, compute_file_checksum};
pub use error::{Error, Result};
pub use path::NormalizedPath;
