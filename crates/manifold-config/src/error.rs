use std::path::PathBuf;

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Error type for configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no targets configured")]
    NoTargets,

    #[error("duplicate target identifier '{0}'")]
    DuplicateTarget(String),

    #[error("target identifier cannot be empty")]
    EmptyTargetId,

    #[error("target '{id}' has no entry points")]
    EmptyEntries { id: String },

    #[error("target '{id}' declares no output descriptors")]
    NoOutputs { id: String },

    #[error("output path '{0}' is not a file path")]
    InvalidOutputPath(PathBuf),

    #[error("{message}")]
    SchemaValidation {
        message: String,
        hint: Option<String>,
    },
}

impl ConfigError {
    /// A hint for resolving the error, when one exists.
    pub fn hint(&self) -> Option<&str> {
        match self {
            ConfigError::SchemaValidation { hint, .. } => hint.as_deref(),
            ConfigError::NoTargets => Some("Add at least one target to `targets`"),
            ConfigError::EmptyEntries { .. } => {
                Some("Every target needs at least one entry specifier")
            }
            _ => None,
        }
    }
}
