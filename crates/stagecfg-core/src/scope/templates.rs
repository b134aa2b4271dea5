use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Named configuration fragments referenced from elsewhere in the graph
/// with `$${name}`.
///
/// Population always works on copies; the stored trees are never rewritten.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Templates {
    trees: Map<String, Value>,
}

impl Templates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.trees.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, tree: Value) -> Option<Value> {
        self.trees.insert(name.into(), tree)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.trees.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.trees.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.trees.keys()
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn to_object(&self) -> Map<String, Value> {
        self.trees.clone()
    }

    /// Replace the whole contents with `trees`.
    pub fn from_object(trees: Map<String, Value>) -> Self {
        Self { trees }
    }
}

impl From<Map<String, Value>> for Templates {
    fn from(trees: Map<String, Value>) -> Self {
        Self::from_object(trees)
    }
}
