//! Deserialization of child collections keyed by the child's own name

use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

/// A node that is stored in its parent under its own name.
pub(crate) trait Keyed {
    fn key(&self) -> &str;

    /// Give the node a name when the plain data carried none.
    fn adopt_key(&mut self, key: &str);
}

/// Deserialize a `name -> child` map, re-keying every child by its own name.
///
/// A child without a `name` takes the map key it was stored under. Two
/// entries that resolve to the same name collapse into one, matching the
/// last-write-wins behaviour of the `set_*` methods. `null` reads as empty.
pub(crate) fn keyed_map<'de, D, T>(deserializer: D) -> Result<HashMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Keyed,
{
    let entries = Option::<HashMap<String, T>>::deserialize(deserializer)?.unwrap_or_default();
    let mut keyed = HashMap::with_capacity(entries.len());
    for (key, mut child) in entries {
        if child.key().is_empty() {
            child.adopt_key(&key);
        }
        keyed.insert(child.key().to_string(), child);
    }
    Ok(keyed)
}
