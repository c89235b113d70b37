//! Physical output descriptors.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Module format of a written output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Esm,
    Cjs,
}

/// One physical output of a target.
///
/// A target may declare several descriptors (for example an ESM and a CJS
/// variant of the same artifact); the target runner writes all of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputDescriptor {
    /// Destination file path.
    pub path: PathBuf,

    #[serde(default)]
    pub format: OutputFormat,

    /// Text prepended to the written output.
    #[serde(default)]
    pub banner: Option<String>,
}

impl OutputDescriptor {
    pub fn esm(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            format: OutputFormat::Esm,
            banner: None,
        }
    }

    pub fn cjs(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            format: OutputFormat::Cjs,
            banner: None,
        }
    }
}
