//! Error types for stagecfg-core

/// Result type for stagecfg-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in stagecfg-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A call was made with missing or contradictory parameters
    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// An operation needed the project root but none is configured
    #[error("No project root has been configured")]
    ProjectRootNotSet,

    #[error("Stage {stage} does not exist in this project")]
    StageNotFound { stage: String },

    #[error("Region {region} does not exist in stage {stage}")]
    RegionNotFound { stage: String, region: String },

    #[error("Function {function} does not exist in this project")]
    FunctionNotFound { function: String },

    /// Teardown of an already detached stage failed
    #[error("Teardown of stage {stage} failed: {message}")]
    Teardown { stage: String, message: String },

    #[error("Variable {name} referenced at {path} is not defined in any scope")]
    UnresolvedVariable { name: String, path: String },

    #[error("Template {name} referenced at {path} does not exist")]
    UnresolvedTemplate { name: String, path: String },

    #[error("Template {name} references itself through {chain}")]
    TemplateCycle { name: String, chain: String },

    #[error("Variable {name} references itself through {chain}")]
    VariableCycle { name: String, chain: String },

    #[error("Endpoint {method} {path} is defined more than once")]
    DuplicateEndpoint { path: String, method: String },

    /// Plain data could not be turned into an entity
    #[error("Invalid {entity} data: {message}")]
    InvalidData { entity: String, message: String },

    #[error("Serializer error: {message}")]
    Serializer { message: String },

    /// Filesystem error from stagecfg-fs
    #[error(transparent)]
    Fs(#[from] stagecfg_fs::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_data(entity: &str, source: impl std::fmt::Display) -> Self {
        Self::InvalidData {
            entity: entity.to_string(),
            message: source.to_string(),
        }
    }

    /// True for errors that report a missing stage or region.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::StageNotFound { .. } | Self::RegionNotFound { .. } | Self::FunctionNotFound { .. }
        )
    }

    /// True for errors raised before any work because the call itself was invalid.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::ProjectRootNotSet)
    }
}
