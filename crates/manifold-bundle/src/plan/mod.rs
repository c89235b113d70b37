//! Bundling plans: the fully-resolved, ordered description of one
//! target's build.
//!
//! A plan is produced once per target by [`compile_plan`] and consumed
//! exactly once by the target runner. Plans and their transient working
//! state are dropped when the target's run completes; only the engine
//! cache survives, back in the build context.

mod compiler;
mod stages;
mod treeshake;

pub use compiler::compile_plan;
pub use stages::{ExtensionPlacement, Stage, StageSlot};
pub use treeshake::{TreeShake, TreeShakeOptions, tree_shake_policy};

use std::sync::Arc;

use manifold_config::{EntryPoints, OutputDescriptor, PreserveEntrySignatures, ResolveConfig};

use crate::engine::{EngineCache, TypedTransformEngine};
use crate::resolve::ResolverAdapter;

/// An executable bundling plan for one target.
pub struct BundlingPlan {
    /// Target identity; keys the engine cache slot.
    pub id: String,

    pub entries: EntryPoints,

    pub inline_dynamic_imports: bool,

    pub preserve_entry_signatures: PreserveEntrySignatures,

    pub source_map: bool,

    /// Specifiers left external to the bundle.
    pub external: Vec<String>,

    pub max_parallel_file_ops: Option<u32>,

    /// Transform stages in execution order.
    pub stages: Vec<Stage>,

    /// Resolution-override function for the generic resolution stage.
    pub resolver: ResolverAdapter,

    /// Lookup options for the generic resolution stage.
    pub resolve: ResolveConfig,

    /// Fallback resolution and typed-source transform collaborator.
    pub typed: Arc<dyn TypedTransformEngine>,

    pub tree_shake: TreeShake,

    /// Physical outputs to write, one or many.
    pub outputs: Vec<OutputDescriptor>,

    /// This target's reusable engine cache from a previous run, if any.
    /// Passed through unmodified; never inspected here.
    pub cache: Option<EngineCache>,
}

impl std::fmt::Debug for BundlingPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BundlingPlan")
            .field("id", &self.id)
            .field("inline_dynamic_imports", &self.inline_dynamic_imports)
            .field("source_map", &self.source_map)
            .field("external", &self.external)
            .field("max_parallel_file_ops", &self.max_parallel_file_ops)
            .field("stages", &self.stages)
            .field("tree_shake", &self.tree_shake)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl BundlingPlan {
    /// Slots of the plan's stages, in plan order.
    pub fn stage_slots(&self) -> Vec<StageSlot> {
        self.stages.iter().map(Stage::slot).collect()
    }

    pub fn has_stage(&self, slot: StageSlot) -> bool {
        self.stages.iter().any(|stage| stage.slot() == slot)
    }

    /// Names of the caller-supplied extension stages at one placement,
    /// in plan order.
    pub fn extension_names(&self, placement: ExtensionPlacement) -> Vec<&str> {
        self.stages
            .iter()
            .filter_map(|stage| match stage {
                Stage::Extension {
                    name,
                    placement: p,
                } if *p == placement => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}
