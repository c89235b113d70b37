//! Transform-stage descriptors and their fixed ordering.
//!
//! A stage names a transform capability, not a concrete implementation;
//! the bundling engine maps each descriptor onto its own machinery. The
//! relative order is fixed because later stages assume invariants
//! established by earlier ones: application constants must be injected
//! before dead branches depending on them can be stripped, and every
//! internal-resolution stage must run before generic third-party
//! resolution so that internal names shadow third-party names.

use manifold_config::{CjsInteropConfig, ConditionalFlags, LoaderOptions, Platform};

/// Fixed slot of a stage within a plan. Lower slots run earlier.
///
/// Slots are assigned once here; plans are built in slot order and the
/// engine executes them sequentially.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum StageSlot {
    /// Internal module-specifier resolution (application-owned modules,
    /// staged files).
    CoreResolve = 1,
    /// Application-constant injection.
    AppData = 2,
    /// Lazy-loading-aware component wiring.
    LazyComponent = 3,
    /// Platform-specific loader injection.
    Loader = 4,
    /// User-space index/aggregation resolution.
    UserIndex = 5,
    /// Typed-source-to-executable transform.
    TypedTransform = 6,
    /// Output-format normalization.
    OutputFormat = 7,
    /// Platform-specific source transforms (post-transform).
    PlatformTransforms = 8,
    /// Background-worker extraction.
    WorkerExtraction = 9,
    /// Server/hydrate-specific stripping.
    ServerStrip = 10,
    /// Caller-supplied stages, "before" slot.
    ExtensionBefore = 11,
    /// Generic third-party module resolution.
    ModuleResolve = 12,
    /// Typed-source resolution fallback.
    TypedResolveFallback = 13,
    /// CommonJS-to-ESM interoperability normalization.
    CjsInterop = 14,
    /// Caller-supplied stages, "after" slot.
    ExtensionAfter = 15,
    /// JSON literal import support.
    JsonImport = 16,
    /// Environment-variable substitution.
    EnvSubstitute = 17,
    /// Staged-file materialization.
    StagedFileLoad = 18,
}

/// Which fixed slot a caller-supplied extension stage occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionPlacement {
    Before,
    After,
}

/// One transform-stage descriptor in a compiled plan.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    CoreResolve {
        platform: Platform,
        external_runtime: bool,
        lazy_load: bool,
    },
    AppData {
        conditionals: ConditionalFlags,
    },
    LazyComponent,
    Loader {
        options: LoaderOptions,
    },
    UserIndex,
    TypedTransform,
    OutputFormat,
    PlatformTransforms {
        platform: Platform,
    },
    WorkerExtraction,
    ServerStrip,
    Extension {
        name: String,
        placement: ExtensionPlacement,
    },
    ModuleResolve,
    TypedResolveFallback,
    CjsInterop {
        options: CjsInteropConfig,
    },
    JsonImport,
    EnvSubstitute {
        node_env: String,
    },
    StagedFileLoad,
}

impl Stage {
    pub fn slot(&self) -> StageSlot {
        match self {
            Stage::CoreResolve { .. } => StageSlot::CoreResolve,
            Stage::AppData { .. } => StageSlot::AppData,
            Stage::LazyComponent => StageSlot::LazyComponent,
            Stage::Loader { .. } => StageSlot::Loader,
            Stage::UserIndex => StageSlot::UserIndex,
            Stage::TypedTransform => StageSlot::TypedTransform,
            Stage::OutputFormat => StageSlot::OutputFormat,
            Stage::PlatformTransforms { .. } => StageSlot::PlatformTransforms,
            Stage::WorkerExtraction => StageSlot::WorkerExtraction,
            Stage::ServerStrip => StageSlot::ServerStrip,
            Stage::Extension {
                placement: ExtensionPlacement::Before,
                ..
            } => StageSlot::ExtensionBefore,
            Stage::Extension {
                placement: ExtensionPlacement::After,
                ..
            } => StageSlot::ExtensionAfter,
            Stage::ModuleResolve => StageSlot::ModuleResolve,
            Stage::TypedResolveFallback => StageSlot::TypedResolveFallback,
            Stage::CjsInterop { .. } => StageSlot::CjsInterop,
            Stage::JsonImport => StageSlot::JsonImport,
            Stage::EnvSubstitute { .. } => StageSlot::EnvSubstitute,
            Stage::StagedFileLoad => StageSlot::StagedFileLoad,
        }
    }

    pub fn is_extension(&self) -> bool {
        matches!(self, Stage::Extension { .. })
    }
}
