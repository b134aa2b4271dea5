//! Shared test utilities for the stagecfg workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`fixtures`]: plain-data projects used across test suites
//! - [`project`]: [`TestProject`], a temporary project root with a context
//! - [`teardown`]: teardown hooks that record or fail

pub mod fixtures;
pub mod project;
pub mod teardown;

pub use project::TestProject;
pub use teardown::{FailingTeardown, RecordingTeardown};
