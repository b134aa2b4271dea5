use super::keyed::{Keyed, keyed_map};
use super::{Endpoint, Event, Function};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A group of functions sharing a runtime and code location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    #[serde(default)]
    name: String,

    #[serde(default, deserialize_with = "keyed_map")]
    functions: HashMap<String, Function>,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Component {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            functions: HashMap::new(),
            extra: Map::new(),
        }
    }

    /// Rebuild a component and all of its functions from plain data.
    pub fn from_object(data: &Value) -> Result<Self> {
        serde_json::from_value(data.clone()).map_err(|e| Error::invalid_data("component", e))
    }

    pub fn to_object(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All functions, in no particular order.
    pub fn all_functions(&self) -> Vec<&Function> {
        self.functions.values().collect()
    }

    pub fn get_function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn get_function_mut(&mut self, name: &str) -> Option<&mut Function> {
        self.functions.get_mut(name)
    }

    /// Insert a function under its own name, replacing any previous one.
    pub fn set_function(&mut self, function: Function) {
        self.functions.insert(function.name().to_string(), function);
    }

    pub fn validate_function_exists(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn all_endpoints(&self) -> Vec<&Endpoint> {
        self.functions
            .values()
            .flat_map(|f| f.all_endpoints())
            .collect()
    }

    pub fn all_events(&self) -> Vec<&Event> {
        self.functions.values().flat_map(|f| f.all_events()).collect()
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    pub fn extra_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.extra
    }
}

impl Keyed for Component {
    fn key(&self) -> &str {
        &self.name
    }

    fn adopt_key(&mut self, key: &str) {
        self.name = key.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn functions_are_keyed_by_their_own_name() {
        let component = Component::from_object(&json!({
            "name": "users",
            "runtime": "nodejs",
            "functions": {
                "legacy-key": {"name": "list"},
                "create": {}
            }
        }))
        .unwrap();

        assert!(component.validate_function_exists("list"));
        assert!(!component.validate_function_exists("legacy-key"));
        assert_eq!(component.get_function("create").unwrap().name(), "create");
        assert_eq!(component.extra()["runtime"], "nodejs");
    }

    #[test]
    fn flattening_collects_across_functions() {
        let mut component = Component::new("users");
        let mut list = Function::new("list");
        list.set_endpoint(Endpoint::new("users", "GET"));
        let mut create = Function::new("create");
        create.set_endpoint(Endpoint::new("users", "POST"));
        create.set_event(Event::new("audit"));
        component.set_function(list);
        component.set_function(create);

        assert_eq!(component.all_endpoints().len(), 2);
        assert_eq!(component.all_events().len(), 1);
    }
}
