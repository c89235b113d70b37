//! Caller-supplied extension stages.
//!
//! Extension stages are opaque transform capabilities contributed by the
//! project configuration. The plan compiler inserts them at two fixed
//! slots - before generic module resolution and after interop
//! normalization - preserving the order they were declared in.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One caller-supplied transform stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionStage {
    /// Name the stage is registered under.
    pub name: String,

    /// Stage-specific options, passed through uninterpreted.
    #[serde(default)]
    pub options: Value,
}

impl ExtensionStage {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Value::Null,
        }
    }
}

/// Extension stages grouped by insertion slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtensionStages {
    /// Inserted before the generic module-resolution stage.
    #[serde(default)]
    pub before: Vec<ExtensionStage>,

    /// Inserted after interop normalization.
    #[serde(default)]
    pub after: Vec<ExtensionStage>,
}
