//! The target runner.
//!
//! Hands a compiled plan to the bundling engine and absorbs the result.
//! Failures never escape this boundary as raised errors: an engine
//! failure becomes diagnostics (or is swallowed when the build already
//! failed), and the caller gets `None`.

use manifold_config::OutputDescriptor;

use crate::context::BuildContext;
use crate::diagnostics::{Diagnostic, load_engine_diagnostics};
use crate::engine::{BuildGraph, BundleEngine, WrittenOutput};
use crate::plan::BundlingPlan;

/// A successfully built target.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub target_id: String,
    /// Outputs actually written; may be fewer than the plan declared if
    /// individual writes failed.
    pub outputs: Vec<WrittenOutput>,
}

/// Run one target's plan through the bundling engine.
///
/// On success the engine's reusable cache is stored under the target's
/// identifier - the sole place the cache mapping is written - and every
/// declared output is written. `None` means "no artifact, check the
/// context's diagnostics"; it is not an error to propagate.
pub async fn run_target(
    ctx: &BuildContext,
    engine: &dyn BundleEngine,
    plan: BundlingPlan,
) -> Option<Artifact> {
    let target_id = plan.id.clone();
    tracing::debug!(id = %target_id, outputs = plan.outputs.len(), "running target");

    let graph = match engine.build(&plan).await {
        Ok(graph) => graph,
        Err(failure) => {
            if !ctx.has_failed() {
                ctx.mark_failed();
                load_engine_diagnostics(ctx, &failure);
            }
            tracing::warn!(id = %target_id, "bundling engine failed");
            return None;
        }
    };

    ctx.store_engine_cache(&target_id, graph.cache());

    let outputs = write_outputs(ctx, graph.as_ref(), &target_id, &plan.outputs).await;

    Some(Artifact { target_id, outputs })
}

/// Write every declared output. A failed write is surfaced as a
/// diagnostic and does not roll back or skip sibling outputs.
async fn write_outputs(
    ctx: &BuildContext,
    graph: &dyn BuildGraph,
    target_id: &str,
    outputs: &[OutputDescriptor],
) -> Vec<WrittenOutput> {
    let mut written = Vec::with_capacity(outputs.len());
    for output in outputs {
        match graph.write(output).await {
            Ok(result) => written.push(result),
            Err(failure) => {
                tracing::warn!(
                    id = %target_id,
                    path = %output.path.display(),
                    "output write failed"
                );
                ctx.push_diagnostic(Diagnostic::error(format!(
                    "failed to write output '{}' for target '{}': {}",
                    output.path.display(),
                    target_id,
                    failure
                )));
            }
        }
    }
    written
}
