use super::keyed::Keyed;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the single resource stack a fresh project carries.
pub const DEFAULT_RESOURCES: &str = "defaultResources";

/// A named stack of deployable infrastructure resources.
///
/// The resource definitions themselves are provider-specific and are kept
/// as plain data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    #[serde(default)]
    name: String,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Default for Resources {
    fn default() -> Self {
        Self::new(DEFAULT_RESOURCES)
    }
}

impl Resources {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: Map::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    pub fn extra_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.extra
    }
}

impl Keyed for Resources {
    fn key(&self) -> &str {
        &self.name
    }

    fn adopt_key(&mut self, key: &str) {
        self.name = key.to_string();
    }
}
