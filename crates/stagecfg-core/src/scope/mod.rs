//! Scoped key/value stores
//!
//! Variables live at three scopes (project, stage, region); templates live on
//! the project only. Both are plain maps that serialize transparently as the
//! JSON object they wrap.

mod merge;
mod templates;
mod variables;

pub use merge::{deep_merge_value, merge_scopes};
pub use templates::Templates;
pub use variables::Variables;

use serde::{Deserialize, Deserializer};

/// Deserialize a value treating `null` the same as an absent key.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
