use super::keyed::Keyed;
use crate::scope::{Variables, nullable};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A deployment region inside a stage.
///
/// Its variables are the narrowest scope and override both the stage's and
/// the project's for identical keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    #[serde(default)]
    name: String,

    #[serde(default, deserialize_with = "nullable")]
    variables: Variables,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Region {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Variables::new(),
            extra: Map::new(),
        }
    }

    pub fn from_object(data: &Value) -> Result<Self> {
        serde_json::from_value(data.clone()).map_err(|e| Error::invalid_data("region", e))
    }

    pub fn to_object(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn variables_mut(&mut self) -> &mut Variables {
        &mut self.variables
    }

    pub fn set_variables(&mut self, variables: Variables) {
        self.variables = variables;
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

impl Keyed for Region {
    fn key(&self) -> &str {
        &self.name
    }

    fn adopt_key(&mut self, key: &str) {
        self.name = key.to_string();
    }
}
