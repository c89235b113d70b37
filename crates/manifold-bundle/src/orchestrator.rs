//! The build orchestrator.
//!
//! Fans out every configured target: directories and the dependency
//! manifest are prepared in parallel (fatal on failure), one plan is
//! compiled per target, and all targets then run concurrently as
//! cooperatively-scheduled tasks. One target's failure never cancels a
//! sibling; the caller reads diagnostics from the build context
//! afterwards.

use futures::future::{join_all, try_join_all};
use manifold_config::BuildConfig;

use crate::context::BuildContext;
use crate::engine::BuildServices;
use crate::plan::compile_plan;
use crate::runner::{Artifact, run_target};
use crate::{Error, Result};

/// Build every configured target.
///
/// Returns the artifacts of the targets that succeeded, in target
/// declaration order. Diagnostics are a side channel on `ctx`; any
/// error-severity diagnostic means the build did not fully succeed even
/// if some artifacts were written.
pub async fn build_all(
    config: &BuildConfig,
    ctx: &BuildContext,
    services: &BuildServices,
) -> Result<Vec<Artifact>> {
    config.validate()?;

    prepare_workspace(config, services).await?;

    tracing::info!(targets = config.targets.len(), "starting build");

    // All plans are compiled before any target runs; a precondition
    // violation in one target aborts the build before side effects.
    let mut plans = Vec::with_capacity(config.targets.len());
    for target in &config.targets {
        plans.push(compile_plan(config, ctx, services, target)?);
    }

    let runs = plans
        .into_iter()
        .map(|plan| run_target(ctx, services.engine.as_ref(), plan));
    let artifacts: Vec<Artifact> = join_all(runs).await.into_iter().flatten().collect();

    tracing::info!(
        built = artifacts.len(),
        diagnostics = ctx.diagnostics().len(),
        "build finished"
    );

    Ok(artifacts)
}

/// Clear output directories and refresh the dependency manifest, all in
/// parallel. No partial-success semantics: any failure aborts the build.
async fn prepare_workspace(config: &BuildConfig, services: &BuildServices) -> Result<()> {
    let host = &services.host;

    let empty_dirs = try_join_all(
        config
            .output
            .dirs
            .iter()
            .map(|dir| host.empty_directory(dir)),
    );

    futures::try_join!(empty_dirs, host.write_manifest(config)).map_err(Error::Setup)?;

    Ok(())
}
