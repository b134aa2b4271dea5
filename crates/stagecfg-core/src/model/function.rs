use super::keyed::Keyed;
use super::{Endpoint, Event};
use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A deployable function inside a component.
///
/// Endpoints are unique per `(path, method)` and events per name; setting
/// one that already exists replaces it in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    #[serde(default)]
    name: String,

    #[serde(default, deserialize_with = "unique_endpoints")]
    endpoints: Vec<Endpoint>,

    #[serde(default, deserialize_with = "unique_events")]
    events: Vec<Event>,

    /// Handler, runtime, memory size and any other provider settings
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Function {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoints: Vec::new(),
            events: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Rebuild a function and its endpoints/events from plain data.
    pub fn from_object(data: &Value) -> Result<Self> {
        serde_json::from_value(data.clone()).map_err(|e| Error::invalid_data("function", e))
    }

    pub fn to_object(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn all_endpoints(&self) -> Vec<&Endpoint> {
        self.endpoints.iter().collect()
    }

    pub fn get_endpoint(&self, path: &str, method: &str) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| e.matches(path, method))
    }

    pub fn set_endpoint(&mut self, endpoint: Endpoint) {
        insert_endpoint(&mut self.endpoints, endpoint);
    }

    pub fn validate_endpoint_exists(&self, path: &str, method: &str) -> bool {
        self.get_endpoint(path, method).is_some()
    }

    pub fn all_events(&self) -> Vec<&Event> {
        self.events.iter().collect()
    }

    pub fn get_event(&self, name: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.name() == name)
    }

    pub fn set_event(&mut self, event: Event) {
        insert_event(&mut self.events, event);
    }

    pub fn validate_event_exists(&self, name: &str) -> bool {
        self.get_event(name).is_some()
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    pub fn extra_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.extra
    }
}

impl Keyed for Function {
    fn key(&self) -> &str {
        &self.name
    }

    fn adopt_key(&mut self, key: &str) {
        self.name = key.to_string();
    }
}

fn insert_endpoint(endpoints: &mut Vec<Endpoint>, endpoint: Endpoint) {
    match endpoints
        .iter_mut()
        .find(|e| e.matches(endpoint.path(), endpoint.method()))
    {
        Some(existing) => *existing = endpoint,
        None => endpoints.push(endpoint),
    }
}

fn insert_event(events: &mut Vec<Event>, event: Event) {
    match events.iter_mut().find(|e| e.name() == event.name()) {
        Some(existing) => *existing = event,
        None => events.push(event),
    }
}

fn unique_endpoints<'de, D>(deserializer: D) -> std::result::Result<Vec<Endpoint>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Endpoint>>::deserialize(deserializer)?.unwrap_or_default();
    let mut endpoints = Vec::with_capacity(raw.len());
    for endpoint in raw {
        insert_endpoint(&mut endpoints, endpoint);
    }
    Ok(endpoints)
}

fn unique_events<'de, D>(deserializer: D) -> std::result::Result<Vec<Event>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Event>>::deserialize(deserializer)?.unwrap_or_default();
    let mut events = Vec::with_capacity(raw.len());
    for event in raw {
        insert_event(&mut events, event);
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn duplicate_endpoints_in_data_collapse_to_last() {
        let function = Function::from_object(&json!({
            "name": "list",
            "endpoints": [
                {"path": "users", "method": "GET", "authorizationType": "NONE"},
                {"path": "users", "method": "GET", "authorizationType": "AWS_IAM"},
                {"path": "users", "method": "POST"}
            ]
        }))
        .unwrap();

        assert_eq!(function.all_endpoints().len(), 2);
        let get = function.get_endpoint("users", "GET").unwrap();
        assert_eq!(get.extra()["authorizationType"], "AWS_IAM");
    }

    #[test]
    fn set_event_replaces_same_name() {
        let mut function = Function::new("sync");
        function.set_event(Event::new("nightly"));
        let mut replacement = Event::new("nightly");
        replacement
            .extra_mut()
            .insert("schedule".into(), json!("rate(1 day)"));
        function.set_event(replacement);

        assert_eq!(function.all_events().len(), 1);
        assert_eq!(function.get_event("nightly").unwrap().extra()["schedule"], "rate(1 day)");
        assert!(function.validate_event_exists("nightly"));
        assert!(!function.validate_event_exists("hourly"));
    }

    #[test]
    fn unknown_keys_survive_round_trip() {
        let data = json!({
            "name": "list",
            "handler": "users/list/handler.handler",
            "timeout": 6,
            "endpoints": [],
            "events": []
        });

        let function = Function::from_object(&data).unwrap();
        assert_eq!(function.extra()["handler"], "users/list/handler.handler");
        assert_eq!(function.to_object().unwrap(), data);
    }

    #[test]
    fn endpoint_without_method_is_invalid() {
        let err = Function::from_object(&json!({"name": "x", "endpoints": [{"path": "a"}]}))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidData { ref entity, .. } if entity == "function"));
    }
}
