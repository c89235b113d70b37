//! Adapter around the external module resolver.
//!
//! The adapter owns the two behaviors the core layers on top of generic
//! resolution, without ever reaching into the resolver itself:
//!
//! - query-suffix preservation: the resolver is asked about the bare
//!   specifier and the `?query` suffix is reattached to whatever it
//!   answers, bare string or structured descriptor;
//! - staged-module re-routing (experimental): a project-local lookup
//!   against the staged file store takes precedence over the generic
//!   answer when enabled.
//!
//! It also carries the warning sink for the resolution stage, so every
//! callback-supplied warning funnels through the normal diagnostic
//! normalization.

use std::sync::Arc;

use crate::diagnostics::{DiagnosticsLog, WarningEvent};
use crate::engine::{ModuleResolver, ResolvedId, ResolvedModule};
use crate::vfs::StagedFs;

#[derive(Clone)]
pub struct ResolverAdapter {
    inner: Arc<dyn ModuleResolver>,
    staged: Arc<StagedFs>,
    diagnostics: Arc<DiagnosticsLog>,
    staged_modules: bool,
}

impl ResolverAdapter {
    pub(crate) fn new(
        inner: Arc<dyn ModuleResolver>,
        staged: Arc<StagedFs>,
        diagnostics: Arc<DiagnosticsLog>,
        staged_modules: bool,
    ) -> Self {
        Self {
            inner,
            staged,
            diagnostics,
            staged_modules,
        }
    }

    /// Resolve a module specifier on behalf of the engine.
    pub fn resolve(&self, specifier: &str, importer: Option<&str>) -> Option<ResolvedId> {
        let (bare, suffix) = split_query(specifier);

        let resolved = self
            .inner
            .resolve(bare, importer)
            .map(|id| id.with_suffix(suffix));

        if self.staged_modules {
            if let Some(staged) = self.staged_lookup(bare, suffix) {
                return Some(staged);
            }
        }

        resolved
    }

    /// Report a warning from the resolution stage. All three supplied
    /// shapes converge to the diagnostic model here.
    pub fn report_warning(&self, event: WarningEvent) {
        self.diagnostics.push(event.into_diagnostic());
    }

    fn staged_lookup(&self, bare: &str, suffix: Option<&str>) -> Option<ResolvedId> {
        self.staged.contains(bare).then(|| {
            ResolvedId::Module(ResolvedModule {
                id: bare.to_string(),
                external: false,
            })
            .with_suffix(suffix)
        })
    }
}

/// Split a specifier into its bare part and query suffix (without `?`).
fn split_query(specifier: &str) -> (&str, Option<&str>) {
    match specifier.split_once('?') {
        Some((bare, query)) => (bare, Some(query)),
        None => (specifier, None),
    }
}
