//! Format-agnostic document loading and saving

use crate::{Error, NormalizedPath, Result, io};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

/// On-disk encodings a project document may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
    Toml,
}

impl DocumentFormat {
    /// Detect the format from a path's extension (case-insensitive).
    pub fn from_path(path: &NormalizedPath) -> Result<Self> {
        let extension = path.extension().unwrap_or("");
        match extension.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            _ => Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Yaml => "YAML",
            Self::Toml => "TOML",
        }
    }
}

/// Loads and saves serde documents, picking the encoding from the file
/// extension.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentStore;

impl DocumentStore {
    pub fn new() -> Self {
        Self
    }

    /// Load a document from a file.
    ///
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    /// - `.toml` -> TOML
    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        let format = DocumentFormat::from_path(path)?;
        let content = io::read_text(path)?;

        let parse_error = |message: String| Error::DocumentParse {
            path: path.to_native(),
            format: format.name().into(),
            message,
        };

        match format {
            DocumentFormat::Json => {
                serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))
            }
            DocumentFormat::Yaml => {
                serde_yaml::from_str(&content).map_err(|e| parse_error(e.to_string()))
            }
            DocumentFormat::Toml => toml::from_str(&content).map_err(|e| parse_error(e.to_string())),
        }
    }

    /// Save a document atomically. The format is determined from the extension.
    ///
    /// TOML has no null, so a TOML document holding `null` anywhere fails
    /// with [`Error::NullValue`] before the file is touched.
    pub fn save<T: Serialize>(&self, path: &NormalizedPath, value: &T) -> Result<()> {
        let format = DocumentFormat::from_path(path)?;

        let serialize_error = |message: String| Error::DocumentSerialize {
            path: path.to_native(),
            format: format.name().into(),
            message,
        };

        let content = match format {
            DocumentFormat::Json => {
                serde_json::to_string_pretty(value).map_err(|e| serialize_error(e.to_string()))?
            }
            DocumentFormat::Yaml => {
                serde_yaml::to_string(value).map_err(|e| serialize_error(e.to_string()))?
            }
            DocumentFormat::Toml => {
                let tree = serde_json::to_value(value).map_err(|e| serialize_error(e.to_string()))?;
                if let Some(location) = first_null(&tree, "") {
                    return Err(Error::NullValue {
                        path: path.to_native(),
                        format: format.name().into(),
                        location,
                    });
                }
                toml::to_string_pretty(&tree).map_err(|e| serialize_error(e.to_string()))?
            }
        };

        io::write_atomic(path, content.as_bytes())
    }
}

/// JSON-pointer location of the first `null` in `value`.
fn first_null(value: &Value, pointer: &str) -> Option<String> {
    match value {
        Value::Null if pointer.is_empty() => Some("/".to_string()),
        Value::Null => Some(pointer.to_string()),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .find_map(|(index, item)| first_null(item, &format!("{pointer}/{index}"))),
        Value::Object(map) => map.iter().find_map(|(key, item)| {
            let key = key.replace('~', "~0").replace('/', "~1");
            first_null(item, &format!("{pointer}/{key}"))
        }),
        _ => None,
    }
}
