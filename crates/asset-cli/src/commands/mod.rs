//! Command implementations

mod link;

pub use link::{find_config, run_link};
