use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An HTTP endpoint exposed by a function, identified by `(path, method)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    path: String,
    method: String,

    /// Provider-specific settings (authorization, request templates, ...)
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Endpoint {
    pub fn new(path: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
            extra: Map::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Whether this endpoint answers `method` on `path`.
    pub fn matches(&self, path: &str, method: &str) -> bool {
        self.path == path && self.method == method
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    pub fn extra_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.extra
    }
}
