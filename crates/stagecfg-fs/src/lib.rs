//! Filesystem access for stagecfg
//!
//! Provides normalized project-root paths, atomic locked writes, and a
//! format-agnostic store for the plain documents a project is persisted as.

pub mod error;
pub mod io;
pub mod path;
pub mod store;

pub use error::{Error, Result};
pub use path::NormalizedPath;
pub use store::{DocumentFormat, DocumentStore};
