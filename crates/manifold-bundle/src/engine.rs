//! Interfaces consumed from the external build collaborators.
//!
//! The bundling engine, the type-aware transform engine, the generic
//! module resolver, and the workspace host are all external to this
//! crate. Each is reached through a narrow adapter trait declared here;
//! nothing in the core touches a collaborator's internals, and
//! collaborator failures cross these seams as values, not panics.

use std::any::Any;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use manifold_config::{BuildConfig, OutputDescriptor, OutputFormat};
use serde::{Deserialize, Serialize};

use crate::plan::BundlingPlan;

/// Opaque reusable cache artifact produced by the bundling engine.
///
/// The core stores it keyed by target identifier and replays it verbatim
/// on the next build of the same target. Cache correctness is the
/// engine's responsibility; this type is never inspected here.
#[derive(Clone)]
pub struct EngineCache(Arc<dyn Any + Send + Sync>);

impl EngineCache {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Borrow the underlying value. Intended for engines reading back
    /// their own cache, and for tests.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.0).downcast_ref()
    }
}

impl fmt::Debug for EngineCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EngineCache(..)")
    }
}

/// One event reported by the bundling engine alongside a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineEvent {
    pub message: String,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl EngineEvent {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            file: None,
            line: None,
            column: None,
        }
    }
}

/// Failure raised by the bundling engine for one target.
///
/// Never propagated past the target runner - always converted into
/// diagnostics there.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineFailure {
    #[error("{}", .0.message)]
    Single(EngineEvent),

    #[error("bundling failed with {} diagnostics", .0.len())]
    Batched(Vec<EngineEvent>),
}

impl EngineFailure {
    /// The underlying events, one or many.
    pub fn events(&self) -> &[EngineEvent] {
        match self {
            EngineFailure::Single(event) => std::slice::from_ref(event),
            EngineFailure::Batched(events) => events,
        }
    }
}

/// Failure writing one physical output of an artifact.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct WriteFailure(pub String);

/// Failure transforming one typed source file.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct TransformFailure(pub String);

/// A physical output the engine has written to storage.
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenOutput {
    pub path: std::path::PathBuf,
    pub format: OutputFormat,
}

/// Result of resolving a module specifier.
///
/// Resolvers may answer with a bare module id or a structured
/// descriptor; both shapes flow through the resolution pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedId {
    Id(String),
    Module(ResolvedModule),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModule {
    pub id: String,
    pub external: bool,
}

impl ResolvedId {
    /// The resolved module id, whichever shape carries it.
    pub fn id(&self) -> &str {
        match self {
            ResolvedId::Id(id) => id,
            ResolvedId::Module(module) => &module.id,
        }
    }

    /// Reattach a query suffix the resolver never saw.
    pub(crate) fn with_suffix(self, suffix: Option<&str>) -> Self {
        let Some(suffix) = suffix else {
            return self;
        };
        match self {
            ResolvedId::Id(id) => ResolvedId::Id(format!("{id}?{suffix}")),
            ResolvedId::Module(module) => ResolvedId::Module(ResolvedModule {
                id: format!("{}?{suffix}", module.id),
                external: module.external,
            }),
        }
    }
}

/// The external module-bundling engine.
///
/// `build` consumes a compiled plan and either produces a build graph or
/// raises an [`EngineFailure`]. The engine is also the party that writes
/// artifacts, via [`BuildGraph::write`].
#[async_trait]
pub trait BundleEngine: Send + Sync {
    async fn build(&self, plan: &BundlingPlan) -> Result<Box<dyn BuildGraph>, EngineFailure>;
}

/// A successful engine run for one target.
#[async_trait]
pub trait BuildGraph: Send + Sync {
    /// The reusable cache artifact for this run.
    fn cache(&self) -> EngineCache;

    /// Write one declared output to storage.
    async fn write(&self, output: &OutputDescriptor) -> Result<WrittenOutput, WriteFailure>;
}

/// Generic third-party module resolution (package-manager-style lookup).
pub trait ModuleResolver: Send + Sync {
    fn resolve(&self, specifier: &str, importer: Option<&str>) -> Option<ResolvedId>;
}

/// The type-aware source transform engine.
pub trait TypedTransformEngine: Send + Sync {
    /// Fallback resolution source for files the generic resolver could
    /// not classify.
    fn resolve_module(&self, specifier: &str, importer: &str) -> Option<String>;

    fn transform(&self, source: &str, id: &str) -> Result<String, TransformFailure>;
}

/// Directory and manifest preparation collaborator.
///
/// Both operations are awaited before planning begins; either failing is
/// fatal for the whole build.
#[async_trait]
pub trait WorkspaceHost: Send + Sync {
    async fn empty_directory(&self, dir: &Path) -> std::io::Result<()>;

    async fn write_manifest(&self, config: &BuildConfig) -> std::io::Result<()>;
}

/// Handles to every external collaborator a build consumes.
#[derive(Clone)]
pub struct BuildServices {
    pub engine: Arc<dyn BundleEngine>,
    pub resolver: Arc<dyn ModuleResolver>,
    pub typed: Arc<dyn TypedTransformEngine>,
    pub host: Arc<dyn WorkspaceHost>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_cache_round_trips_through_any() {
        let cache = EngineCache::new(42_u64);
        assert_eq!(cache.downcast_ref::<u64>(), Some(&42));
        assert!(cache.downcast_ref::<String>().is_none());
    }

    #[test]
    fn suffix_reattaches_to_both_result_shapes() {
        let bare = ResolvedId::Id("/pkg/index.js".to_string()).with_suffix(Some("raw"));
        assert_eq!(bare.id(), "/pkg/index.js?raw");

        let module = ResolvedId::Module(ResolvedModule {
            id: "/pkg/index.js".to_string(),
            external: true,
        })
        .with_suffix(Some("raw"));
        assert_eq!(module.id(), "/pkg/index.js?raw");
        assert!(matches!(module, ResolvedId::Module(m) if m.external));
    }

    #[test]
    fn missing_suffix_leaves_id_untouched() {
        let bare = ResolvedId::Id("/pkg/index.js".to_string()).with_suffix(None);
        assert_eq!(bare.id(), "/pkg/index.js");
    }

    #[test]
    fn batched_failure_exposes_all_events() {
        let failure = EngineFailure::Batched(vec![
            EngineEvent::message("first"),
            EngineEvent::message("second"),
        ]);
        assert_eq!(failure.events().len(), 2);

        let single = EngineFailure::Single(EngineEvent::message("only"));
        assert_eq!(single.events().len(), 1);
    }
}
