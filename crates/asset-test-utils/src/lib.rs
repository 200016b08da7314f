//! Shared test utilities for the asset linker workspace.
//!
//! [`TestProject`] copies the fixture app under `test-fixtures/projects/base`
//! into a temporary directory so each test can link into its own copy.

pub mod project;

pub use project::TestProject;
