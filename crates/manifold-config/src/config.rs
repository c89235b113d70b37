//! Top-level build configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::extensions::ExtensionStages;
use crate::resolve::{CjsInteropConfig, ResolveConfig};
use crate::target::TargetOptions;
use crate::validation::validate_schema;

/// Output directories prepared before any target is planned.
///
/// Directory clearing itself is delegated to the workspace host; the
/// config only names the directories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetupDirs {
    #[serde(default)]
    pub dirs: Vec<PathBuf>,
}

/// Project configuration for one build invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Project root; staged and output paths are relative to it.
    pub root_dir: PathBuf,

    /// Development build. Disables tree-shaking outside hydrate targets and
    /// selects the development value for environment substitution.
    #[serde(default)]
    pub dev_mode: bool,

    #[serde(default)]
    pub source_map: bool,

    /// Explicit tree-shake override. `Some(false)` disables tree-shaking
    /// for non-hydrate targets regardless of build mode.
    #[serde(default)]
    pub tree_shake: Option<bool>,

    /// Specifiers left external to every bundle.
    #[serde(default)]
    pub external: Vec<String>,

    /// Upper bound on the engine's concurrent file operations.
    #[serde(default)]
    pub max_parallel_file_ops: Option<u32>,

    #[serde(default)]
    pub resolve: ResolveConfig,

    #[serde(default)]
    pub commonjs: CjsInteropConfig,

    #[serde(default)]
    pub extensions: ExtensionStages,

    #[serde(default)]
    pub output: SetupDirs,

    /// Targets produced by this invocation.
    #[serde(default)]
    pub targets: Vec<TargetOptions>,
}

impl BuildConfig {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            dev_mode: false,
            source_map: false,
            tree_shake: None,
            external: Vec::new(),
            max_parallel_file_ops: None,
            resolve: ResolveConfig::default(),
            commonjs: CjsInteropConfig::default(),
            extensions: ExtensionStages::default(),
            output: SetupDirs::default(),
            targets: Vec::new(),
        }
    }

    pub fn target(mut self, target: TargetOptions) -> Self {
        self.targets.push(target);
        self
    }

    /// Schema validation for the whole configuration, including every
    /// target's preconditions.
    pub fn validate(&self) -> Result<()> {
        validate_schema(self)
    }

    /// Whether tree-shaking was explicitly disabled by the caller.
    pub fn tree_shake_disabled(&self) -> bool {
        self.tree_shake == Some(false)
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
