//! In-memory configuration model for multi-stage, multi-region projects
//!
//! This crate holds the typed entity graph of a deployment project and the
//! machinery that turns it into fully resolved configuration:
//!
//! - **Entity graph**: `Project` -> `Component` -> `Function` -> `Endpoint`/`Event`,
//!   and `Project` -> `Stage` -> `Region`, plus the project's `Resources` stacks
//! - **Scoped stores**: `Variables` at project, stage and region level, and the
//!   project's `Templates`
//! - **Population**: merges the three variable scopes and substitutes
//!   `${variable}` and `$${template}` placeholders through a plain-data snapshot
//! - **Serialization boundary**: `ProjectSerializer` implementations that move
//!   the plain data to and from durable storage
//!
//! # Architecture
//!
//! ```text
//!            caller (deploy step, CLI)
//!                        |
//!     ProjectContext (root, serializer, teardown)
//!                        |
//!     Project ---- populate::Populator
//!        |                 |
//!   model/* nodes    scope::{Variables, Templates}
//!                        |
//!                   stagecfg-fs
//! ```
//!
//! # Example
//!
//! ```ignore
//! use stagecfg_core::{PopulateOptions, Project, ProjectContext};
//!
//! let ctx = ProjectContext::new().with_root("/srv/billing");
//! let project = Project::load(&ctx)?;
//! let resolved = project.to_object_populated(&ctx, &PopulateOptions::for_target("prod", "us-east-1"))?;
//! ```

pub mod context;
pub mod error;
pub mod logging;
pub mod model;
pub mod populate;
pub mod scope;
pub mod serializer;

pub use context::{NoopTeardown, ProjectContext, ResourceTeardown};
pub use error::{Error, Result};
pub use model::{
    Component, DEFAULT_RESOURCES, Endpoint, Event, Function, Project, Region, Resources, Stage,
    TeardownFuture,
};
pub use populate::{PopulateOptions, Populator, populate};
pub use scope::{Templates, Variables, merge_scopes};
pub use serializer::{FileSystemSerializer, MemorySerializer, ProjectSerializer};
