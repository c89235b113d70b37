//! The bundle plan compiler.
//!
//! `compile_plan` is a pure function of the project configuration, the
//! build context, and one target's options. It reads the target's cache
//! slot and the staged file store but writes neither; all I/O belongs to
//! the engine and the target runner.

use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use manifold_config::{BuildConfig, EntryPoints, TargetOptions};
use path_clean::PathClean;

use crate::context::BuildContext;
use crate::engine::BuildServices;
use crate::plan::stages::{ExtensionPlacement, Stage};
use crate::plan::treeshake::tree_shake_policy;
use crate::plan::BundlingPlan;
use crate::resolve::ResolverAdapter;
use crate::{Error, Result};

/// Compile the executable bundling plan for one target.
///
/// Malformed target options are a fatal precondition violation: the
/// returned error aborts the whole build when propagated by the
/// orchestrator, and is never downgraded to a diagnostic.
pub fn compile_plan(
    config: &BuildConfig,
    ctx: &BuildContext,
    services: &BuildServices,
    target: &TargetOptions,
) -> Result<BundlingPlan> {
    target.validate().map_err(|source| Error::InvalidTarget {
        id: target.id.clone(),
        source,
    })?;

    let stages = assemble_stages(config, target);

    let resolver = ResolverAdapter::new(
        Arc::clone(&services.resolver),
        ctx.staged_store(),
        ctx.diagnostics_log(),
        config.resolve.experimental_dev_modules,
    );

    let tree_shake = tree_shake_policy(
        target.platform,
        config.dev_mode,
        config.tree_shake_disabled(),
    );

    // Pass-through keyed by target identity; cache correctness is the
    // engine's concern.
    let cache = ctx.engine_cache(&target.id);

    tracing::debug!(
        id = %target.id,
        platform = ?target.platform,
        stages = stages.len(),
        cached = cache.is_some(),
        "compiled bundling plan"
    );

    Ok(BundlingPlan {
        id: target.id.clone(),
        entries: normalize_entries(&target.entries),
        inline_dynamic_imports: target.inline_dynamic_imports,
        preserve_entry_signatures: target.preserve_entry_signatures,
        source_map: config.source_map,
        external: config.external.clone(),
        max_parallel_file_ops: config.max_parallel_file_ops,
        stages,
        resolver,
        resolve: config.resolve.clone(),
        typed: Arc::clone(&services.typed),
        tree_shake,
        outputs: target.outputs.clone(),
        cache,
    })
}

/// Build the stage list in canonical order.
///
/// The order is fixed, not configurable per call. Internal resolution
/// stages come before generic third-party resolution so internal names
/// shadow third-party ones; extension stages are pinned to their two
/// slots with their declared order preserved.
fn assemble_stages(config: &BuildConfig, target: &TargetOptions) -> Vec<Stage> {
    let extension_count = config.extensions.before.len() + config.extensions.after.len();
    let mut stages = Vec::with_capacity(16 + extension_count);

    stages.push(Stage::CoreResolve {
        platform: target.platform,
        external_runtime: target.external_runtime,
        lazy_load: target.conditionals.lazy_load,
    });
    stages.push(Stage::AppData {
        conditionals: target.conditionals.clone(),
    });
    stages.push(Stage::LazyComponent);
    stages.push(Stage::Loader {
        options: target.loader.clone().unwrap_or_default(),
    });
    stages.push(Stage::UserIndex);
    stages.push(Stage::TypedTransform);
    stages.push(Stage::OutputFormat);
    stages.push(Stage::PlatformTransforms {
        platform: target.platform,
    });

    // Inlined dynamic imports leave nothing to split into workers.
    if !target.inline_dynamic_imports {
        stages.push(Stage::WorkerExtraction);
    }
    if target.platform.is_hydrate() {
        stages.push(Stage::ServerStrip);
    }

    for extension in &config.extensions.before {
        stages.push(Stage::Extension {
            name: extension.name.clone(),
            placement: ExtensionPlacement::Before,
        });
    }

    stages.push(Stage::ModuleResolve);
    stages.push(Stage::TypedResolveFallback);
    stages.push(Stage::CjsInterop {
        options: config.commonjs.clone(),
    });

    for extension in &config.extensions.after {
        stages.push(Stage::Extension {
            name: extension.name.clone(),
            placement: ExtensionPlacement::After,
        });
    }

    stages.push(Stage::JsonImport);
    stages.push(Stage::EnvSubstitute {
        node_env: if config.dev_mode {
            "development".to_string()
        } else {
            "production".to_string()
        },
    });
    stages.push(Stage::StagedFileLoad);

    stages
}

/// Normalize path-like entry specifiers; bare specifiers pass through.
fn normalize_entries(entries: &EntryPoints) -> EntryPoints {
    match entries {
        EntryPoints::Single(entry) => EntryPoints::Single(normalize_entry(entry)),
        EntryPoints::Multiple(list) => {
            EntryPoints::Multiple(list.iter().map(|e| normalize_entry(e)).collect())
        }
        EntryPoints::Named(named) => EntryPoints::Named(
            named
                .iter()
                .map(|(name, entry)| (name.clone(), normalize_entry(entry)))
                .collect::<IndexMap<_, _>>(),
        ),
    }
}

fn normalize_entry(entry: &str) -> String {
    if entry.starts_with('.') || entry.starts_with('/') {
        Path::new(entry)
            .to_path_buf()
            .clean()
            .to_string_lossy()
            .into_owned()
    } else {
        entry.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_entries_are_cleaned() {
        assert_eq!(normalize_entry("./src/./index.ts"), "src/index.ts");
        assert_eq!(normalize_entry("./src/../src/cli.ts"), "src/cli.ts");
    }

    #[test]
    fn bare_specifiers_pass_through() {
        assert_eq!(normalize_entry("virtual:app"), "virtual:app");
        assert_eq!(normalize_entry("some-pkg/entry"), "some-pkg/entry");
    }
}
