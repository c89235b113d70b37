//! Shared test utilities for manifold-bundle tests.
//!
//! Provides mock implementations of the external collaborators (bundling
//! engine, module resolver, typed transform engine, workspace host) so
//! the orchestration pipeline can be exercised end-to-end without a real
//! engine.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use manifold_bundle::{
    BuildGraph, BuildServices, BundleEngine, BundlingPlan, EngineCache, EngineEvent,
    EngineFailure, ModuleResolver, OutputDescriptor, OutputFormat, Platform, ResolvedId,
    ResolvedModule, StageSlot, TargetOptions, TransformFailure, TypedTransformEngine,
    WarningEvent, WarningMessage, WarningPayload, WorkspaceHost, WriteFailure, WrittenOutput,
};
use manifold_config::BuildConfig;

/// Cache value the mock engine hands back; the stamp is the build's
/// sequence number, so round-trips are observable.
pub struct BuildStamp(pub usize);

/// Mock bundling engine.
///
/// Resolves every entry through the plan's resolver adapter and fails
/// the build when one is unresolvable, mirroring how a real engine
/// reports unresolved entry modules.
#[derive(Default)]
pub struct MockEngine {
    /// Emit one warning of each supported shape during every build.
    pub emit_warnings: bool,
    /// Output paths whose write fails.
    pub failing_writes: Mutex<Vec<PathBuf>>,
    /// Number of successful and failed builds started.
    pub builds: AtomicUsize,
    /// Per build: target id and the stamp of the cache handle the plan
    /// carried in, if any.
    pub cache_inputs: Mutex<Vec<(String, Option<usize>)>>,
    /// Target ids whose plan contained a worker-extraction stage.
    pub worker_split: Mutex<Vec<String>>,
}

impl MockEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_warnings() -> Arc<Self> {
        Arc::new(Self {
            emit_warnings: true,
            ..Self::default()
        })
    }
}

#[async_trait]
impl BundleEngine for MockEngine {
    async fn build(&self, plan: &BundlingPlan) -> Result<Box<dyn BuildGraph>, EngineFailure> {
        let stamp = self.builds.fetch_add(1, Ordering::SeqCst);

        self.cache_inputs.lock().push((
            plan.id.clone(),
            plan.cache
                .as_ref()
                .and_then(|cache| cache.downcast_ref::<BuildStamp>().map(|s| s.0)),
        ));

        if self.emit_warnings {
            plan.resolver
                .report_warning(WarningEvent::Literal("circular dependency".to_string()));
            plan.resolver.report_warning(WarningEvent::deferred(|| {
                WarningMessage::Text("chunk exceeds size budget".to_string())
            }));
            plan.resolver
                .report_warning(WarningEvent::Structured(WarningPayload {
                    message: "unused import".to_string(),
                    file: Some("src/app.ts".to_string()),
                    line: Some(3),
                    column: Some(1),
                }));
        }

        for entry in plan.entries.specifiers() {
            if plan.resolver.resolve(entry, None).is_none() {
                return Err(EngineFailure::Single(EngineEvent::message(format!(
                    "Cannot resolve entry module '{entry}'"
                ))));
            }
        }

        if plan.has_stage(StageSlot::WorkerExtraction) {
            self.worker_split.lock().push(plan.id.clone());
        }

        Ok(Box::new(MockGraph {
            cache: EngineCache::new(BuildStamp(stamp)),
            failing: self.failing_writes.lock().clone(),
        }))
    }
}

pub struct MockGraph {
    cache: EngineCache,
    failing: Vec<PathBuf>,
}

#[async_trait]
impl BuildGraph for MockGraph {
    fn cache(&self) -> EngineCache {
        self.cache.clone()
    }

    async fn write(&self, output: &OutputDescriptor) -> Result<WrittenOutput, WriteFailure> {
        if self.failing.contains(&output.path) {
            return Err(WriteFailure(format!(
                "permission denied: {}",
                output.path.display()
            )));
        }

        if let Some(parent) = output.path.parent() {
            fs::create_dir_all(parent).map_err(|e| WriteFailure(e.to_string()))?;
        }

        let mut code = String::new();
        if let Some(banner) = &output.banner {
            code.push_str(banner);
            code.push('\n');
        }
        code.push_str(match output.format {
            OutputFormat::Esm => "export {};\n",
            OutputFormat::Cjs => "module.exports = {};\n",
        });
        fs::write(&output.path, code).map_err(|e| WriteFailure(e.to_string()))?;

        Ok(WrittenOutput {
            path: output.path.clone(),
            format: output.format,
        })
    }
}

/// Mock generic resolver with a configurable set of unresolvable
/// specifiers.
#[derive(Default)]
pub struct MockResolver {
    pub unresolvable: Vec<String>,
    /// Answer with structured descriptors instead of bare ids.
    pub structured: bool,
}

impl ModuleResolver for MockResolver {
    fn resolve(&self, specifier: &str, _importer: Option<&str>) -> Option<ResolvedId> {
        if self.unresolvable.iter().any(|u| u == specifier) {
            return None;
        }
        let id = format!("/resolved/{specifier}");
        Some(if self.structured {
            ResolvedId::Module(ResolvedModule {
                id,
                external: false,
            })
        } else {
            ResolvedId::Id(id)
        })
    }
}

/// Mock typed transform engine; resolution and transform both succeed
/// trivially.
pub struct MockTyped;

impl TypedTransformEngine for MockTyped {
    fn resolve_module(&self, specifier: &str, _importer: &str) -> Option<String> {
        Some(format!("/typed/{specifier}"))
    }

    fn transform(&self, source: &str, _id: &str) -> Result<String, TransformFailure> {
        Ok(source.to_string())
    }
}

/// Mock workspace host recording setup calls.
#[derive(Default)]
pub struct MockHost {
    pub fail_setup: bool,
    pub emptied: Mutex<Vec<PathBuf>>,
    pub manifest_writes: AtomicUsize,
}

impl MockHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail_setup: true,
            ..Self::default()
        })
    }
}

#[async_trait]
impl WorkspaceHost for MockHost {
    async fn empty_directory(&self, dir: &Path) -> std::io::Result<()> {
        if self.fail_setup {
            return Err(std::io::Error::other("disk full"));
        }
        self.emptied.lock().push(dir.to_path_buf());
        Ok(())
    }

    async fn write_manifest(&self, _config: &BuildConfig) -> std::io::Result<()> {
        if self.fail_setup {
            return Err(std::io::Error::other("disk full"));
        }
        self.manifest_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Assemble services from mocks, with a default resolver.
pub fn mock_services(engine: Arc<MockEngine>, host: Arc<MockHost>) -> BuildServices {
    services_with_resolver(engine, Arc::new(MockResolver::default()), host)
}

pub fn services_with_resolver(
    engine: Arc<MockEngine>,
    resolver: Arc<MockResolver>,
    host: Arc<MockHost>,
) -> BuildServices {
    BuildServices {
        engine,
        resolver,
        typed: Arc::new(MockTyped),
        host,
    }
}

/// A single-entry target writing one ESM output under `dir`.
pub fn target_in(dir: &Path, id: &str, platform: Platform) -> TargetOptions {
    TargetOptions::new(id, platform, format!("./src/{id}.ts"))
        .output(OutputDescriptor::esm(dir.join(id).join("index.js")))
}
