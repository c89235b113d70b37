//! # manifold-bundle
//!
//! Bundle plan compilation and multi-target build orchestration.
//!
//! One build invocation produces several independently-distributable
//! artifacts ("targets") from a shared source tree. For each target the
//! plan compiler assembles an ordered, mutually-consistent chain of
//! transform stages, resolution overrides, and policies; the target
//! runner hands that plan to the external bundling engine and translates
//! the engine's success, failure, and warning signals into the build's
//! own diagnostic model while keeping the engine's incremental cache
//! flowing between runs.
//!
//! The external collaborators - the bundling engine, the type-aware
//! transform engine, the generic module resolver, and the workspace
//! host - are consumed through the adapter traits in [`engine`]; this
//! crate contains no bundling machinery of its own.
//!
//! Typical flow:
//!
//! 1. construct a validated [`BuildConfig`] with one
//!    [`TargetOptions`] per artifact;
//! 2. create a [`BuildContext`] (and keep it across incremental builds
//!    to retain engine caches);
//! 3. call [`build_all`] with the collaborator handles in
//!    [`BuildServices`];
//! 4. inspect the returned artifacts and the context's diagnostics.

pub mod context;
pub mod diagnostics;
pub mod engine;
pub mod orchestrator;
pub mod plan;
pub mod resolve;
pub mod runner;
pub mod vfs;

// Logging utilities (optional, enabled with "logging" feature)
#[cfg(feature = "logging")]
pub mod logging;

#[cfg(feature = "logging")]
pub use logging::{LogLevel, init_logging, init_logging_from_env};

pub use context::BuildContext;
pub use diagnostics::{
    Diagnostic, DiagnosticsLog, Severity, WarningEvent, WarningMessage, WarningPayload,
    load_engine_diagnostics,
};
pub use engine::{
    BuildGraph, BuildServices, BundleEngine, EngineCache, EngineEvent, EngineFailure,
    ModuleResolver, ResolvedId, ResolvedModule, TransformFailure, TypedTransformEngine,
    WorkspaceHost, WriteFailure, WrittenOutput,
};
pub use orchestrator::build_all;
pub use plan::{
    BundlingPlan, ExtensionPlacement, Stage, StageSlot, TreeShake, TreeShakeOptions, compile_plan,
    tree_shake_policy,
};
pub use resolve::ResolverAdapter;
pub use runner::{Artifact, run_target};
pub use vfs::StagedFs;

// Re-export configuration types used throughout the public API.
pub use manifold_config::{
    BuildConfig, CjsInteropConfig, ConditionalFlags, ConfigError, EntryPoints, ExtensionStage,
    ExtensionStages, LoaderOptions, OutputDescriptor, OutputFormat, Platform,
    PreserveEntrySignatures, ResolveConfig, TargetOptions,
};

/// Error types for plan compilation and orchestration.
///
/// Only fatal conditions surface here; per-target engine and write
/// failures are recovered into diagnostics by the target runner.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed target options - a programmer error in the target set.
    #[error("invalid target '{id}': {source}")]
    InvalidTarget {
        id: String,
        #[source]
        source: ConfigError,
    },

    /// Invalid project configuration.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Directory or manifest preparation failed.
    #[error("build setup failed: {0}")]
    Setup(#[source] std::io::Error),

    /// Staged file path is not acceptable.
    #[error("invalid staged path: {0}")]
    InvalidStagedPath(String),

    /// Staged file exceeds the in-memory store limit.
    #[error("staged file too large: {path} ({size} bytes exceeds limit of {max_size} bytes)")]
    StagedFileTooLarge {
        path: String,
        size: usize,
        max_size: usize,
    },
}

/// Result type alias for manifold-bundle operations.
pub type Result<T> = std::result::Result<T, Error>;

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            Error::InvalidTarget { .. } => "INVALID_TARGET",
            Error::Config(_) => "INVALID_CONFIG",
            Error::Setup(_) => "SETUP_FAILED",
            Error::InvalidStagedPath(_) => "INVALID_STAGED_PATH",
            Error::StagedFileTooLarge { .. } => "STAGED_FILE_TOO_LARGE",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            Error::InvalidTarget { source, .. } | Error::Config(source) => source
                .hint()
                .map(|hint| Box::new(hint.to_string()) as Box<dyn std::fmt::Display>),
            Error::Setup(_) => Some(Box::new(
                "Check that the output directories are writable and the manifest path exists."
                    .to_string(),
            )),
            Error::StagedFileTooLarge { max_size, .. } => Some(Box::new(format!(
                "Staged files are capped at {max_size} bytes. Split the module or load it from disk."
            ))),
            _ => None,
        }
    }
}
