use super::Region;
use super::keyed::{Keyed, keyed_map};
use crate::context::ResourceTeardown;
use crate::scope::{Variables, nullable};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

/// Completion handle of a stage teardown started by
/// [`Project::remove_stage`](super::Project::remove_stage).
///
/// It owns the detached stage, so it can be awaited, spawned or dropped
/// independently of the project it came from.
pub type TeardownFuture = Pin<Box<dyn Future<Output = Result<()>> + Send + 'static>>;

/// A deployment stage (e.g. `dev`, `prod`) and its regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    #[serde(default)]
    name: String,

    #[serde(default, deserialize_with = "keyed_map")]
    regions: HashMap<String, Region>,

    #[serde(default, deserialize_with = "nullable")]
    variables: Variables,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Stage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            regions: HashMap::new(),
            variables: Variables::new(),
            extra: Map::new(),
        }
    }

    /// Rebuild a stage and its regions from plain data.
    pub fn from_object(data: &Value) -> Result<Self> {
        serde_json::from_value(data.clone()).map_err(|e| Error::invalid_data("stage", e))
    }

    pub fn to_object(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All regions, in no particular order.
    pub fn all_regions(&self) -> Vec<&Region> {
        self.regions.values().collect()
    }

    pub fn get_region(&self, name: &str) -> Option<&Region> {
        self.regions.get(name)
    }

    pub fn get_region_mut(&mut self, name: &str) -> Option<&mut Region> {
        self.regions.get_mut(name)
    }

    /// Insert a region under its own name, replacing any previous one.
    pub fn set_region(&mut self, region: Region) {
        self.regions.insert(region.name().to_string(), region);
    }

    pub fn remove_region(&mut self, name: &str) -> Option<Region> {
        self.regions.remove(name)
    }

    pub fn validate_region_exists(&self, name: &str) -> bool {
        self.regions.contains_key(name)
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

    /// Release everything this stage owns: each region, then the stage itself.
    ///
    /// Stops at the first failure. Any error from the hook is reported as
    /// [`Error::Teardown`] naming this stage.
    pub async fn destroy(self, teardown: &dyn ResourceTeardown) -> Result<()> {
        let stage = self.name.clone();
        let as_teardown = |e: Error| match e {
            Error::Teardown { .. } => e,
            other => Error::Teardown {
                stage: stage.clone(),
                message: other.to_string(),
            },
        };

        for region in self.regions.values() {
            tracing::debug!(stage = %self.name, region = %region.name(), "Tearing down region");
            teardown
                .teardown_region(&self.name, region)
                .await
                .map_err(as_teardown)?;
        }

        teardown.teardown_stage(&self).await.map_err(as_teardown)?;
        tracing::info!(stage = %self.name, "Stage torn down");
        Ok(())
    }
}

impl Keyed for Stage {
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
    fn regions_take_map_key_when_unnamed() {
        let stage = Stage::from_object(&json!({
            "name": "prod",
            "variables": {"bucket": "prod-default"},
            "regions": {
                "us-east-1": {"variables": {"bucket": "prod-east"}},
                "eu-west-1": null
            }
        }));

        // A null region entry is malformed data rather than an empty region
        assert!(stage.is_err());

        let stage = Stage::from_object(&json!({
            "name": "prod",
            "regions": {"us-east-1": {"variables": {"bucket": "prod-east"}}}
        }))
        .unwrap();
        let region = stage.get_region("us-east-1").unwrap();
        assert_eq!(region.name(), "us-east-1");
        assert_eq!(region.variables().get("bucket"), Some(&json!("prod-east")));
    }

    #[test]
    fn null_variables_read_as_empty() {
        let stage = Stage::from_object(&json!({"name": "dev", "variables": null})).unwrap();
        assert!(stage.variables().is_empty());
    }
}
