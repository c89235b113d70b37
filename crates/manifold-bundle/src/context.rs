//! Build-scoped shared state.
//!
//! A [`BuildContext`] is created when orchestration starts and passed by
//! reference into every target's plan compilation and run. It is the only
//! state shared across concurrently running targets: the engine cache
//! slots, the append-only diagnostics log, the staged file store, and the
//! build-wide failure flag. There is no process-wide singleton; dropping
//! the context drops everything build-scoped.
//!
//! The context may be reused across consecutive incremental invocations
//! so that a target's cache slot survives from one build to the next.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::diagnostics::{Diagnostic, DiagnosticsLog, WarningEvent};
use crate::engine::EngineCache;
use crate::vfs::StagedFs;

#[derive(Debug, Default)]
pub struct BuildContext {
    /// Engine cache slots, one per target identifier. Each slot has a
    /// single writer (its own target's runner), so a plain mutex is
    /// enough.
    caches: Mutex<FxHashMap<String, EngineCache>>,

    diagnostics: Arc<DiagnosticsLog>,

    staged: Arc<StagedFs>,

    /// Set when the first target fails; later same-root-cause failures
    /// are swallowed instead of re-reported. Coarse by design decision:
    /// one flag for the whole build, not per root cause.
    failed: AtomicBool,
}

impl BuildContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached engine artifact for a target, if a previous run of the
    /// same identifier stored one.
    pub fn engine_cache(&self, target_id: &str) -> Option<EngineCache> {
        self.caches.lock().get(target_id).cloned()
    }

    /// Store a target's reusable cache artifact, replacing any previous
    /// entry. Only the target runner calls this, after a successful run.
    pub(crate) fn store_engine_cache(&self, target_id: &str, cache: EngineCache) {
        self.caches.lock().insert(target_id.to_string(), cache);
    }

    /// Append a normalized diagnostic.
    pub fn push_diagnostic(&self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Normalize and append a warning, whatever shape it arrived in.
    pub fn note_warning(&self, event: WarningEvent) {
        self.diagnostics.push(event.into_diagnostic());
    }

    /// Snapshot of the diagnostics collection, in append order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.snapshot()
    }

    pub fn has_error_diagnostics(&self) -> bool {
        self.diagnostics.has_errors()
    }

    pub(crate) fn diagnostics_log(&self) -> Arc<DiagnosticsLog> {
        Arc::clone(&self.diagnostics)
    }

    /// The staged file store consulted during planning instead of the
    /// disk.
    pub fn staged(&self) -> &StagedFs {
        &self.staged
    }

    pub(crate) fn staged_store(&self) -> Arc<StagedFs> {
        Arc::clone(&self.staged)
    }

    pub fn has_failed(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }

    pub fn mark_failed(&self) {
        self.failed.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_slots_are_independent_per_target() {
        let ctx = BuildContext::new();
        assert!(ctx.engine_cache("cli").is_none());

        ctx.store_engine_cache("cli", EngineCache::new(1_u32));
        ctx.store_engine_cache("compiler", EngineCache::new(2_u32));

        assert_eq!(
            ctx.engine_cache("cli").unwrap().downcast_ref::<u32>(),
            Some(&1)
        );
        assert_eq!(
            ctx.engine_cache("compiler").unwrap().downcast_ref::<u32>(),
            Some(&2)
        );
    }

    #[test]
    fn storing_twice_overwrites_the_slot() {
        let ctx = BuildContext::new();
        ctx.store_engine_cache("cli", EngineCache::new(1_u32));
        ctx.store_engine_cache("cli", EngineCache::new(9_u32));

        assert_eq!(
            ctx.engine_cache("cli").unwrap().downcast_ref::<u32>(),
            Some(&9)
        );
    }

    #[test]
    fn failure_flag_latches() {
        let ctx = BuildContext::new();
        assert!(!ctx.has_failed());
        ctx.mark_failed();
        assert!(ctx.has_failed());
        ctx.mark_failed();
        assert!(ctx.has_failed());
    }

    #[test]
    fn warnings_are_normalized_on_append() {
        let ctx = BuildContext::new();
        ctx.note_warning(WarningEvent::Literal("check your imports".to_string()));

        let diagnostics = ctx.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert!(!diagnostics[0].is_error());
        assert!(!ctx.has_error_diagnostics());
    }
}
