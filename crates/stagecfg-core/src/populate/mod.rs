//! Placeholder population
//!
//! Population takes a plain-data snapshot, the merged variables of one
//! stage/region target and the project templates, and returns a new value
//! in which every `${variable}` and `$${template}` token is resolved.
//!
//! # Substitution rules
//!
//! - A string that is exactly one token is replaced by the resolved value,
//!   keeping its JSON type: `"${TIMEOUT}"` with `TIMEOUT = 30` becomes `30`.
//! - Tokens inside a longer string are interpolated. String values are
//!   inserted verbatim, anything else as compact JSON.
//! - A variable value or template is copied and populated with the same
//!   rules before it is inserted, so either may reference the other.
//!   A name that leads back to itself is a cycle error.
//! - `stage` and `region` resolve to the target when no scope defines them.
//! - An unknown name is an error. Nothing is left half-resolved.

mod placeholder;

pub use placeholder::contains_placeholder;

use crate::scope::Templates;
use crate::{Error, Result};
use placeholder::{Token, TokenKind};
use serde_json::{Map, Value};

/// Stage/region target of a population call.
///
/// Both parts are required; they are optional here so that a missing one
/// is reported as [`Error::Validation`] rather than being impossible to
/// express.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulateOptions {
    pub stage: Option<String>,
    pub region: Option<String>,
}

impl PopulateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_target(stage: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            stage: Some(stage.into()),
            region: Some(region.into()),
        }
    }

    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Both target parts, or a validation error if either is missing or empty.
    pub fn require_target(&self) -> Result<(&str, &str)> {
        let stage = self.stage.as_deref().filter(|s| !s.is_empty());
        let region = self.region.as_deref().filter(|r| !r.is_empty());
        match (stage, region) {
            (Some(stage), Some(region)) => Ok((stage, region)),
            _ => Err(Error::validation(
                "both \"stage\" and \"region\" are required for population",
            )),
        }
    }
}

/// Resolves placeholders against one merged variable map and template set.
#[derive(Debug, Clone, Copy)]
pub struct Populator<'a> {
    variables: &'a Map<String, Value>,
    templates: &'a Templates,
}

impl<'a> Populator<'a> {
    pub fn new(variables: &'a Map<String, Value>, templates: &'a Templates) -> Self {
        Self {
            variables,
            templates,
        }
    }

    /// Populate a copy of `object`. The input and the templates are untouched.
    pub fn populate(&self, object: &Value, options: &PopulateOptions) -> Result<Value> {
        let (stage, region) = options.require_target()?;

        let mut pass = Pass {
            variables: self.variables,
            templates: self.templates,
            stage,
            region,
            expanding: Vec::new(),
            replaced: 0,
        };
        let mut output = object.clone();
        pass.resolve(&mut output, &mut String::new())?;

        tracing::debug!(
            stage,
            region,
            replaced = pass.replaced,
            variables = self.variables.len(),
            "Populated snapshot"
        );
        Ok(output)
    }
}

/// Populate `object` with `variables` and `templates` for a stage/region.
pub fn populate(
    variables: &Map<String, Value>,
    templates: &Templates,
    object: &Value,
    options: &PopulateOptions,
) -> Result<Value> {
    Populator::new(variables, templates).populate(object, options)
}

/// State of one population walk.
struct Pass<'a> {
    variables: &'a Map<String, Value>,
    templates: &'a Templates,
    stage: &'a str,
    region: &'a str,
    /// Placeholders currently being expanded, outermost first
    expanding: Vec<(TokenKind, String)>,
    replaced: usize,
}

impl Pass<'_> {
    /// Resolve `value` in place. `pointer` is its JSON-pointer location.
    fn resolve(&mut self, value: &mut Value, pointer: &mut String) -> Result<()> {
        let replacement = match value {
            Value::String(text) => self.resolve_string(text, pointer)?,
            Value::Array(items) => {
                for (index, item) in items.iter_mut().enumerate() {
                    let len = pointer.len();
                    pointer.push('/');
                    pointer.push_str(&index.to_string());
                    self.resolve(item, pointer)?;
                    pointer.truncate(len);
                }
                None
            }
            Value::Object(map) => {
                for (key, item) in map.iter_mut() {
                    let len = pointer.len();
                    pointer.push('/');
                    pointer.push_str(&key.replace('~', "~0").replace('/', "~1"));
                    self.resolve(item, pointer)?;
                    pointer.truncate(len);
                }
                None
            }
            _ => None,
        };

        if let Some(replacement) = replacement {
            *value = replacement;
        }
        Ok(())
    }

    /// The replacement for a string leaf, or `None` if it has no tokens.
    fn resolve_string(&mut self, text: &str, pointer: &str) -> Result<Option<Value>> {
        let tokens = placeholder::scan(text);
        if tokens.is_empty() {
            return Ok(None);
        }
        self.replaced += tokens.len();

        if let [token] = tokens.as_slice() {
            if token.span == (0..text.len()) {
                return self.lookup(token, pointer).map(Some);
            }
        }

        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for token in &tokens {
            out.push_str(&text[last..token.span.start]);
            match self.lookup(token, pointer)? {
                Value::String(s) => out.push_str(&s),
                other => out.push_str(&other.to_string()),
            }
            last = token.span.end;
        }
        out.push_str(&text[last..]);
        Ok(Some(Value::String(out)))
    }

    /// Resolve one token. The looked-up value is itself populated before it
    /// is inserted, so variables and templates may both nest.
    fn lookup(&mut self, token: &Token<'_>, pointer: &str) -> Result<Value> {
        if self
            .expanding
            .iter()
            .any(|(kind, name)| *kind == token.kind && name == token.name)
        {
            return Err(self.cycle(token));
        }

        let mut value = match token.kind {
            TokenKind::Variable => self.variable(token.name, pointer)?,
            TokenKind::Template => self.template(token.name, pointer)?,
        };

        self.expanding.push((token.kind, token.name.to_string()));
        let result = self.resolve(&mut value, &mut pointer.to_string());
        self.expanding.pop();
        result?;

        Ok(value)
    }

    fn variable(&self, name: &str, pointer: &str) -> Result<Value> {
        if let Some(value) = self.variables.get(name) {
            return Ok(value.clone());
        }
        match name {
            "stage" => Ok(Value::String(self.stage.to_string())),
            "region" => Ok(Value::String(self.region.to_string())),
            _ => Err(Error::UnresolvedVariable {
                name: name.to_string(),
                path: display_pointer(pointer),
            }),
        }
    }

    fn template(&self, name: &str, pointer: &str) -> Result<Value> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnresolvedTemplate {
                name: name.to_string(),
                path: display_pointer(pointer),
            })
    }

    fn cycle(&self, token: &Token<'_>) -> Error {
        let chain = self
            .expanding
            .iter()
            .map(|(_, name)| name.as_str())
            .chain([token.name])
            .collect::<Vec<_>>()
            .join(" -> ");
        let name = token.name.to_string();
        match token.kind {
            TokenKind::Variable => Error::VariableCycle { name, chain },
            TokenKind::Template => Error::TemplateCycle { name, chain },
        }
    }
}

fn display_pointer(pointer: &str) -> String {
    if pointer.is_empty() {
        "/".to_string()
    } else {
        pointer.to_string()
    }
}
