use super::keyed::keyed_map;
use super::resources::DEFAULT_RESOURCES;
use super::stage::TeardownFuture;
use super::{Component, Endpoint, Event, Function, Region, Resources, Stage};
use crate::context::ProjectContext;
use crate::populate::{PopulateOptions, Populator};
use crate::scope::{Templates, Variables, merge_scopes, nullable};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

/// Snapshot keys holding raw population inputs for every target.
const SCOPE_STORES: [&str; 3] = ["variables", "stages", "templates"];

fn default_name() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("project-{}", &id[..6])
}

fn default_version() -> String {
    "0.0.1".to_string()
}

fn default_location() -> String {
    "https://github.com/...".to_string()
}

fn default_description() -> String {
    "A new multi-stage project".to_string()
}

/// Root of the entity graph.
///
/// A project owns its components, stages, resource stacks, the
/// project-scope [`Variables`] and the [`Templates`] referenced during
/// population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default = "default_location")]
    pub location: String,

    #[serde(default)]
    pub author: String,

    #[serde(default = "default_description")]
    pub description: String,

    /// Free-form settings for plugins and tooling
    #[serde(default, deserialize_with = "nullable")]
    pub custom: Map<String, Value>,

    #[serde(default, deserialize_with = "nullable")]
    plugins: Vec<String>,

    #[serde(default, deserialize_with = "keyed_map")]
    components: HashMap<String, Component>,

    #[serde(default, deserialize_with = "keyed_map")]
    stages: HashMap<String, Stage>,

    /// Keyed by stack name so more than one stack can exist later
    #[serde(default, deserialize_with = "keyed_map")]
    resources: HashMap<String, Resources>,

    #[serde(default, deserialize_with = "nullable")]
    variables: Variables,

    #[serde(default, deserialize_with = "nullable")]
    templates: Templates,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}

impl Project {
    /// A fresh project with default attributes and a single
    /// `defaultResources` stack.
    pub fn new() -> Self {
        let mut resources = HashMap::new();
        resources.insert(DEFAULT_RESOURCES.to_string(), Resources::default());

        Self {
            name: default_name(),
            version: default_version(),
            location: default_location(),
            author: String::new(),
            description: default_description(),
            custom: Map::new(),
            plugins: Vec::new(),
            components: HashMap::new(),
            stages: HashMap::new(),
            resources,
            variables: Variables::new(),
            templates: Templates::new(),
            extra: Map::new(),
        }
    }

    /// Rebuild a project and its whole subtree from plain data.
    ///
    /// Collections absent from `data` come back empty, including
    /// `resources`; only scalar attributes fall back to fresh-project
    /// defaults. Endpoints duplicated across functions are rejected.
    pub fn from_object(data: &Value) -> Result<Self> {
        let project: Self =
            serde_json::from_value(data.clone()).map_err(|e| Error::invalid_data("project", e))?;
        project.check_invariants()?;
        tracing::debug!(
            project = %project.name,
            components = project.components.len(),
            stages = project.stages.len(),
            "Rebuilt project from plain data"
        );
        Ok(project)
    }

    /// Deep plain-data snapshot of the project.
    pub fn to_object(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Read the project through the context's serializer.
    pub fn load(ctx: &ProjectContext) -> Result<Self> {
        let data = ctx.serializer().deserialize(ctx.root_path())?;
        let project = Self::from_object(&data)?;
        tracing::info!(project = %project.name, "Loaded project");
        Ok(project)
    }

    /// Write the current snapshot through the context's serializer.
    pub fn save(&self, ctx: &ProjectContext) -> Result<()> {
        let data = self.to_object()?;
        ctx.serializer().serialize(ctx.root_path(), &data)?;
        tracing::info!(project = %self.name, "Saved project");
        Ok(())
    }

    /// Snapshot with every placeholder resolved for one stage and region.
    ///
    /// `variables`, `stages` and `templates` are returned as stored. They
    /// hold the inputs for every target, so tokens meant for another stage
    /// or for an unused template do not fail this one.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] unless both stage and region are given
    /// - [`Error::ProjectRootNotSet`] when the context has no project root
    /// - [`Error::StageNotFound`] / [`Error::RegionNotFound`] for unknown targets
    /// - any population error (unresolved placeholder, template cycle)
    pub fn to_object_populated(
        &self,
        ctx: &ProjectContext,
        options: &PopulateOptions,
    ) -> Result<Value> {
        let mut object = self.to_object()?;
        let scopes = take_scope_stores(&mut object);
        let mut populated = self.populate_snapshot(ctx, options, &object)?;
        if let Value::Object(map) = &mut populated {
            map.extend(scopes);
        }
        Ok(populated)
    }

    /// Snapshot of a single function with every placeholder resolved,
    /// using the same scopes and templates as the whole project.
    pub fn function_populated(
        &self,
        ctx: &ProjectContext,
        name: &str,
        options: &PopulateOptions,
    ) -> Result<Value> {
        let function = self
            .get_function(name)
            .ok_or_else(|| Error::FunctionNotFound {
                function: name.to_string(),
            })?;
        let object = function.to_object()?;
        self.populate_snapshot(ctx, options, &object)
    }

    fn populate_snapshot(
        &self,
        ctx: &ProjectContext,
        options: &PopulateOptions,
        object: &Value,
    ) -> Result<Value> {
        let (stage, region) = options.require_target()?;
        if !ctx.has_project() {
            return Err(Error::ProjectRootNotSet);
        }

        let variables = self.variables_object(Some(stage), Some(region))?;
        Populator::new(&variables, &self.templates).populate(object, options)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    // Plugins

    pub fn plugins(&self) -> &[String] {
        &self.plugins
    }

    /// Register a plugin by name. Adding a name twice has no effect.
    pub fn add_plugin(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.plugins.contains(&name) {
            self.plugins.push(name);
        }
    }

    // Components and their subtree

    /// All components, in no particular order.
    pub fn all_components(&self) -> Vec<&Component> {
        self.components.values().collect()
    }

    pub fn get_component(&self, name: &str) -> Option<&Component> {
        self.components.get(name)
    }

    pub fn get_component_mut(&mut self, name: &str) -> Option<&mut Component> {
        self.components.get_mut(name)
    }

    /// Insert a component under its own name, replacing any previous one.
    pub fn set_component(&mut self, component: Component) {
        self.components
            .insert(component.name().to_string(), component);
    }

    pub fn validate_component_exists(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Every function of every component. Recomputed on each call.
    pub fn all_functions(&self) -> Vec<&Function> {
        self.components
            .values()
            .flat_map(|c| c.all_functions())
            .collect()
    }

    pub fn get_function(&self, name: &str) -> Option<&Function> {
        self.components.values().find_map(|c| c.get_function(name))
    }

    pub fn all_endpoints(&self) -> Vec<&Endpoint> {
        self.all_functions()
            .into_iter()
            .flat_map(|f| f.all_endpoints())
            .collect()
    }

    pub fn get_endpoint(&self, path: &str, method: &str) -> Option<&Endpoint> {
        self.all_functions()
            .into_iter()
            .find_map(|f| f.get_endpoint(path, method))
    }

    pub fn all_events(&self) -> Vec<&Event> {
        self.all_functions()
            .into_iter()
            .flat_map(|f| f.all_events())
            .collect()
    }

    pub fn get_event(&self, name: &str) -> Option<&Event> {
        self.all_functions()
            .into_iter()
            .find_map(|f| f.get_event(name))
    }

    /// Check graph-wide invariants that per-node insertion cannot enforce.
    ///
    /// Currently: `(path, method)` must be unique across all endpoints.
    pub fn check_invariants(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for endpoint in self.all_endpoints() {
            if !seen.insert((endpoint.path(), endpoint.method())) {
                return Err(Error::DuplicateEndpoint {
                    path: endpoint.path().to_string(),
                    method: endpoint.method().to_string(),
                });
            }
        }
        Ok(())
    }

    // Resources

    /// Insert a resource stack under its own name.
    pub fn set_resources(&mut self, resources: Resources) {
        self.resources
            .insert(resources.name().to_string(), resources);
    }

    /// Look up a resource stack, falling back to `defaultResources` and
    /// then to whichever stack is present when `name` is unknown or absent.
    pub fn get_resources(&self, name: Option<&str>) -> Option<&Resources> {
        name.and_then(|n| self.resources.get(n))
            .or_else(|| self.resources.get(DEFAULT_RESOURCES))
            .or_else(|| self.resources.values().next())
    }

    pub fn all_resources(&self) -> Vec<&Resources> {
        self.resources.values().collect()
    }

    // Stages and regions

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.keys().map(String::as_str).collect()
    }

    pub fn all_stages(&self) -> Vec<&Stage> {
        self.stages.values().collect()
    }

    pub fn get_stage(&self, name: &str) -> Option<&Stage> {
        self.stages.get(name)
    }

    pub fn get_stage_mut(&mut self, name: &str) -> Option<&mut Stage> {
        self.stages.get_mut(name)
    }

    /// Insert a stage under its own name, replacing any previous one.
    pub fn set_stage(&mut self, stage: Stage) {
        self.stages.insert(stage.name().to_string(), stage);
    }

    pub fn validate_stage_exists(&self, name: &str) -> bool {
        self.stages.contains_key(name)
    }

    /// Detach a stage from the project without tearing anything down.
    pub fn detach_stage(&mut self, name: &str) -> Option<Stage> {
        self.stages.remove(name)
    }

    /// Detach a stage, then tear down what it owns.
    ///
    /// The stage is gone from the project by the time this returns; the
    /// returned future only runs the teardown hook from `ctx`. A failed
    /// teardown is reported through the future and does not put the stage
    /// back. Removing an unknown stage resolves to `Ok(())`.
    pub fn remove_stage(&mut self, name: &str, ctx: &ProjectContext) -> TeardownFuture {
        let detached = self.detach_stage(name);
        let teardown = ctx.teardown();
        tracing::info!(stage = %name, found = detached.is_some(), "Detached stage");

        Box::pin(async move {
            let Some(stage) = detached else {
                return Ok(());
            };
            let name = stage.name().to_string();
            stage.destroy(teardown.as_ref()).await.inspect_err(|e| {
                tracing::warn!(stage = %name, error = %e, "Stage teardown failed after detach");
            })
        })
    }

    /// Look up a region inside a stage.
    ///
    /// # Errors
    ///
    /// [`Error::StageNotFound`] if the stage is missing,
    /// [`Error::RegionNotFound`] if the stage exists without the region.
    pub fn get_region(&self, stage: &str, region: &str) -> Result<&Region> {
        self.require_stage(stage)?
            .get_region(region)
            .ok_or_else(|| Error::RegionNotFound {
                stage: stage.to_string(),
                region: region.to_string(),
            })
    }

    pub fn all_regions(&self, stage: &str) -> Result<Vec<&Region>> {
        Ok(self.require_stage(stage)?.all_regions())
    }

    /// Insert a region into an existing stage.
    pub fn set_region(&mut self, stage: &str, region: Region) -> Result<()> {
        let target = self
            .stages
            .get_mut(stage)
            .ok_or_else(|| Error::StageNotFound {
                stage: stage.to_string(),
            })?;
        target.set_region(region);
        Ok(())
    }

    pub fn validate_region_exists(&self, stage: &str, region: &str) -> bool {
        self.stages
            .get(stage)
            .is_some_and(|s| s.validate_region_exists(region))
    }

    fn require_stage(&self, stage: &str) -> Result<&Stage> {
        self.stages.get(stage).ok_or_else(|| Error::StageNotFound {
            stage: stage.to_string(),
        })
    }

    // Variables and templates

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn variables_mut(&mut self) -> &mut Variables {
        &mut self.variables
    }

    pub fn set_variables(&mut self, variables: Variables) {
        self.variables = variables;
    }

    pub fn templates(&self) -> &Templates {
        &self.templates
    }

    pub fn templates_mut(&mut self) -> &mut Templates {
        &mut self.templates
    }

    pub fn set_templates(&mut self, templates: Templates) {
        self.templates = templates;
    }

    /// Effective variables for a target: project, overlaid by the stage,
    /// overlaid by the region.
    ///
    /// The result is computed fresh and never stored on the graph.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] for a region without a stage, and the
    /// not-found errors of [`get_region`](Self::get_region).
    pub fn variables_object(
        &self,
        stage: Option<&str>,
        region: Option<&str>,
    ) -> Result<Map<String, Value>> {
        let mut scopes = vec![&self.variables];
        match (stage, region) {
            (None, None) => {}
            (Some(stage), None) => scopes.push(self.require_stage(stage)?.variables()),
            (Some(stage), Some(region)) => {
                scopes.push(self.require_stage(stage)?.variables());
                scopes.push(self.get_region(stage, region)?.variables());
            }
            (None, Some(region)) => {
                return Err(Error::validation(format!(
                    "region {region} was given without a stage"
                )));
            }
        }
        Ok(merge_scopes(scopes))
    }
}

fn take_scope_stores(object: &mut Value) -> Vec<(String, Value)> {
    let Value::Object(map) = object else {
        return Vec::new();
    };
    SCOPE_STORES
        .iter()
        .filter_map(|key| map.remove_entry(*key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn fresh_project_has_defaults() {
        let project = Project::new();
        assert!(project.name.starts_with("project-"));
        assert_eq!(project.name.len(), "project-".len() + 6);
        assert_eq!(project.version, "0.0.1");
        assert!(project.get_resources(None).is_some());
        assert_eq!(project.get_resources(None).unwrap().name(), DEFAULT_RESOURCES);
    }

    #[test]
    fn from_object_does_not_leak_defaults() {
        let project = Project::from_object(&json!({"name": "billing"})).unwrap();
        assert_eq!(project.name, "billing");
        assert_eq!(project.version, "0.0.1");
        assert!(project.all_resources().is_empty());
        assert!(project.all_components().is_empty());
        assert!(project.variables().is_empty());
    }

    #[test]
    fn unknown_top_level_keys_are_kept() {
        let data = json!({"name": "billing", "cloudFormationTimeout": 40});
        let project = Project::from_object(&data).unwrap();
        assert_eq!(project.extra()["cloudFormationTimeout"], 40);
        assert_eq!(project.to_object().unwrap()["cloudFormationTimeout"], 40);
    }

    #[test]
    fn get_resources_falls_back() {
        let mut project = Project::from_object(&json!({"name": "p"})).unwrap();
        assert!(project.get_resources(Some("anything")).is_none());

        project.set_resources(Resources::new("network"));
        assert_eq!(project.get_resources(Some("missing")).unwrap().name(), "network");

        project.set_resources(Resources::new(DEFAULT_RESOURCES));
        assert_eq!(project.get_resources(None).unwrap().name(), DEFAULT_RESOURCES);
        assert_eq!(project.get_resources(Some("network")).unwrap().name(), "network");
    }

    #[test]
    fn add_plugin_ignores_duplicates() {
        let mut project = Project::new();
        project.add_plugin("warmup");
        project.add_plugin("warmup");
        project.add_plugin("prune");
        assert_eq!(project.plugins(), ["warmup", "prune"]);
    }

    #[test]
    fn duplicate_endpoint_across_functions_is_rejected() {
        let data = json!({
            "name": "p",
            "components": {
                "users": {
                    "functions": {
                        "a": {"endpoints": [{"path": "users", "method": "GET"}]},
                        "b": {"endpoints": [{"path": "users", "method": "GET"}]}
                    }
                }
            }
        });

        let err = Project::from_object(&data).unwrap_err();
        assert!(matches!(err, Error::DuplicateEndpoint { ref method, .. } if method == "GET"));
    }

    #[test]
    fn region_without_stage_is_a_validation_error() {
        let project = Project::new();
        let err = project.variables_object(None, Some("us-east-1")).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn set_region_requires_stage() {
        let mut project = Project::new();
        let err = project.set_region("prod", Region::new("us-east-1")).unwrap_err();
        assert!(matches!(err, Error::StageNotFound { ref stage } if stage == "prod"));

        project.set_stage(Stage::new("prod"));
        project.set_region("prod", Region::new("us-east-1")).unwrap();
        assert!(project.validate_region_exists("prod", "us-east-1"));
        assert!(!project.validate_region_exists("dev", "us-east-1"));
    }
}
