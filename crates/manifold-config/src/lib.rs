//! Build configuration for the manifold pipeline.
//!
//! A [`BuildConfig`] describes one build invocation: the project-wide
//! settings shared by every target (resolution, interop, externals,
//! extension stages) plus the list of [`TargetOptions`] to produce.
//! Configuration is plain data - it performs no I/O and holds no build
//! state. Validation is an explicit step via [`BuildConfig::validate`].

pub mod config;
pub mod error;
pub mod extensions;
pub mod output;
pub mod resolve;
pub mod target;
pub mod validation;

pub use config::{BuildConfig, SetupDirs};
pub use error::{ConfigError, Result};
pub use extensions::{ExtensionStage, ExtensionStages};
pub use output::{OutputDescriptor, OutputFormat};
pub use resolve::{CjsInteropConfig, ResolveConfig};
pub use target::{
    ConditionalFlags, EntryPoints, LoaderOptions, Platform, PreserveEntrySignatures, TargetOptions,
};
