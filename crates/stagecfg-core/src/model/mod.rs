//! Typed entity graph of a deployment project
//!
//! ```text
//! Project
//! ├── components{}  -> Component -> functions{} -> Function -> endpoints[], events[]
//! ├── stages{}      -> Stage -> regions{} -> Region (variables)
//! ├── resources{}   -> Resources
//! ├── variables
//! └── templates
//! ```
//!
//! Every node rebuilds itself and its subtree from plain data with
//! `from_object` and flattens back with `to_object`. Children are keyed by
//! their own name; inserting a child whose name is already present replaces
//! the previous one. Keys a node does not recognise are kept in its `extra`
//! map and written back out unchanged.

mod component;
mod endpoint;
mod event;
mod function;
mod keyed;
mod project;
mod region;
mod resources;
mod stage;

pub use component::Component;
pub use endpoint::Endpoint;
pub use event::Event;
pub use function::Function;
pub use project::Project;
pub use region::Region;
pub use resources::{DEFAULT_RESOURCES, Resources};
pub use stage::{Stage, TeardownFuture};
