//! Per-target build options.
//!
//! A [`TargetOptions`] value describes one independently-distributable
//! output artifact: which platform it runs on, which entry modules it is
//! built from, and the policies that shape its plan. Options are immutable
//! once constructed; the plan compiler only reads them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::output::OutputDescriptor;

/// Platform a target's output executes on.
///
/// This is a closed set - every platform selects a distinct transform
/// pipeline in the plan compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    /// Browser output with lazy-loaded component chunks.
    BrowserLazy,
    /// Browser output with all components bundled eagerly.
    BrowserEager,
    /// Server-side rendering / hydrate output.
    Hydrate,
    /// Web worker output.
    Worker,
    /// Output loaded through a custom elements loader.
    CustomElementsLoader,
}

impl Platform {
    /// Whether this platform runs in a browser context.
    pub fn is_browser(self) -> bool {
        matches!(
            self,
            Platform::BrowserLazy | Platform::BrowserEager | Platform::CustomElementsLoader
        )
    }

    pub fn is_hydrate(self) -> bool {
        matches!(self, Platform::Hydrate)
    }
}

/// Entry point(s) for a target.
///
/// Named entries keep their insertion order; the bundling engine receives
/// them in the order they were declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryPoints {
    /// A single entry module.
    Single(String),
    /// Multiple entry modules, output names derived from the specifiers.
    Multiple(Vec<String>),
    /// Named entry modules: output name -> module specifier.
    Named(IndexMap<String, String>),
}

impl EntryPoints {
    pub fn is_empty(&self) -> bool {
        match self {
            EntryPoints::Single(entry) => entry.is_empty(),
            EntryPoints::Multiple(entries) => entries.is_empty(),
            EntryPoints::Named(entries) => entries.is_empty(),
        }
    }

    /// Entry specifiers in declaration order.
    pub fn specifiers(&self) -> Vec<&str> {
        match self {
            EntryPoints::Single(entry) => vec![entry.as_str()],
            EntryPoints::Multiple(entries) => entries.iter().map(String::as_str).collect(),
            EntryPoints::Named(entries) => entries.values().map(String::as_str).collect(),
        }
    }
}

/// Named feature conditionals injected by the app-constant stage.
///
/// `lazy_load` is first-class because the core resolution stage branches on
/// it; everything else rides in `named`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalFlags {
    #[serde(default)]
    pub lazy_load: bool,

    #[serde(default, flatten)]
    pub named: IndexMap<String, bool>,
}

impl ConditionalFlags {
    pub fn lazy() -> Self {
        Self {
            lazy_load: true,
            named: IndexMap::new(),
        }
    }
}

/// Loader-specific parameters for the platform loader-injection stage.
///
/// Maps virtual module ids to their loader source, mirroring how the
/// loader stage materializes platform glue modules that have no on-disk
/// counterpart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderOptions {
    #[serde(default)]
    pub modules: IndexMap<String, String>,
}

/// How strictly the engine must preserve entry-module export signatures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PreserveEntrySignatures {
    #[default]
    Strict,
    AllowExtension,
    ExportsOnly,
    False,
}

/// Options for one build target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetOptions {
    /// Unique target identifier. Stable across incremental builds of the
    /// same target - it keys the engine cache slot.
    pub id: String,

    pub platform: Platform,

    pub entries: EntryPoints,

    /// Inline dynamic imports into the entry chunk. Also disables
    /// background-worker extraction, which would otherwise split workers
    /// into their own outputs.
    #[serde(default)]
    pub inline_dynamic_imports: bool,

    /// The runtime is provided outside the bundle rather than inlined.
    #[serde(default)]
    pub external_runtime: bool,

    #[serde(default)]
    pub conditionals: ConditionalFlags,

    #[serde(default)]
    pub loader: Option<LoaderOptions>,

    /// Physical outputs for this target (e.g. ESM and CJS variants).
    pub outputs: Vec<OutputDescriptor>,

    #[serde(default)]
    pub preserve_entry_signatures: PreserveEntrySignatures,
}

impl TargetOptions {
    /// Create options for a single-entry target with one output.
    pub fn new(id: impl Into<String>, platform: Platform, entry: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            platform,
            entries: EntryPoints::Single(entry.into()),
            inline_dynamic_imports: false,
            external_runtime: false,
            conditionals: ConditionalFlags::default(),
            loader: None,
            outputs: Vec::new(),
            preserve_entry_signatures: PreserveEntrySignatures::default(),
        }
    }

    pub fn output(mut self, output: OutputDescriptor) -> Self {
        self.outputs.push(output);
        self
    }

    /// Precondition checks. A violation here is a programmer error in the
    /// target set, not a recoverable build diagnostic.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id.trim().is_empty() {
            return Err(ConfigError::EmptyTargetId);
        }
        if self.entries.is_empty() {
            return Err(ConfigError::EmptyEntries {
                id: self.id.clone(),
            });
        }
        if self.outputs.is_empty() {
            return Err(ConfigError::NoOutputs {
                id: self.id.clone(),
            });
        }
        for output in &self.outputs {
            if output.path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidOutputPath(output.path.clone()));
            }
        }
        Ok(())
    }
}
