//! The build's diagnostic model.
//!
//! Every error or warning signal - engine failures, resolver warnings,
//! partial write failures - converges to one [`Diagnostic`] shape before
//! it is stored. Warnings arrive in three forms (a plain string, a
//! deferred producer, a structured payload) and are normalized at a
//! single boundary: [`WarningEvent::into_diagnostic`].

use std::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::context::BuildContext;
use crate::engine::{EngineEvent, EngineFailure};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One normalized diagnostic record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            file: None,
            line: None,
            column: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            file: None,
            line: None,
            column: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Structured payload a warning producer may supply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WarningPayload {
    pub message: String,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl WarningPayload {
    fn into_diagnostic(self) -> Diagnostic {
        Diagnostic {
            severity: Severity::Warning,
            message: self.message,
            file: self.file,
            line: self.line,
            column: self.column,
        }
    }
}

/// What a deferred warning producer yields when invoked.
pub enum WarningMessage {
    Text(String),
    Payload(WarningPayload),
}

/// A warning as supplied by a diagnostic-producing callback.
///
/// Tagged union over the three shapes callbacks are allowed to hand us.
/// Nothing outside `into_diagnostic` branches on the variant.
pub enum WarningEvent {
    Literal(String),
    Deferred(Box<dyn FnOnce() -> WarningMessage + Send>),
    Structured(WarningPayload),
}

impl WarningEvent {
    pub fn deferred(produce: impl FnOnce() -> WarningMessage + Send + 'static) -> Self {
        WarningEvent::Deferred(Box::new(produce))
    }

    /// The single normalization boundary for warnings.
    pub fn into_diagnostic(self) -> Diagnostic {
        match self {
            WarningEvent::Literal(text) => Diagnostic::warning(text),
            WarningEvent::Structured(payload) => payload.into_diagnostic(),
            WarningEvent::Deferred(produce) => match produce() {
                WarningMessage::Text(text) => Diagnostic::warning(text),
                WarningMessage::Payload(payload) => payload.into_diagnostic(),
            },
        }
    }
}

impl fmt::Debug for WarningEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningEvent::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            WarningEvent::Deferred(_) => f.write_str("Deferred(..)"),
            WarningEvent::Structured(payload) => {
                f.debug_tuple("Structured").field(payload).finish()
            }
        }
    }
}

/// Ordered, append-only diagnostics collection for one build.
///
/// Never cleared mid-build. Appends from concurrently running targets may
/// interleave in any order.
#[derive(Debug, Default)]
pub struct DiagnosticsLog {
    entries: Mutex<Vec<Diagnostic>>,
}

impl DiagnosticsLog {
    pub fn push(&self, diagnostic: Diagnostic) {
        self.entries.lock().push(diagnostic);
    }

    /// Snapshot of all diagnostics appended so far, in append order.
    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.entries.lock().clone()
    }

    pub fn has_errors(&self) -> bool {
        self.entries.lock().iter().any(Diagnostic::is_error)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

/// Translate an engine failure into error diagnostics on the build
/// context. One diagnostic per reported event.
pub fn load_engine_diagnostics(ctx: &BuildContext, failure: &EngineFailure) {
    for event in failure.events() {
        ctx.push_diagnostic(engine_event_to_diagnostic(event));
    }
}

fn engine_event_to_diagnostic(event: &EngineEvent) -> Diagnostic {
    Diagnostic {
        severity: Severity::Error,
        message: event.message.clone(),
        file: event.file.clone(),
        line: event.line,
        column: event.column,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_warning_normalizes_to_warning_severity() {
        let diagnostic = WarningEvent::Literal("slow chunk".to_string()).into_diagnostic();
        assert_eq!(diagnostic.severity, Severity::Warning);
        assert_eq!(diagnostic.message, "slow chunk");
        assert!(diagnostic.file.is_none());
    }

    #[test]
    fn deferred_warning_is_invoked_lazily() {
        let event = WarningEvent::deferred(|| WarningMessage::Text("deferred text".to_string()));
        assert_eq!(event.into_diagnostic().message, "deferred text");

        let event = WarningEvent::deferred(|| {
            WarningMessage::Payload(WarningPayload {
                message: "deferred payload".to_string(),
                file: Some("src/a.ts".to_string()),
                line: Some(7),
                column: None,
            })
        });
        let diagnostic = event.into_diagnostic();
        assert_eq!(diagnostic.message, "deferred payload");
        assert_eq!(diagnostic.line, Some(7));
    }

    #[test]
    fn structured_warning_keeps_location() {
        let diagnostic = WarningEvent::Structured(WarningPayload {
            message: "unused import".to_string(),
            file: Some("src/app.ts".to_string()),
            line: Some(3),
            column: Some(1),
        })
        .into_diagnostic();

        assert_eq!(diagnostic.severity, Severity::Warning);
        assert_eq!(diagnostic.file.as_deref(), Some("src/app.ts"));
        assert_eq!(diagnostic.column, Some(1));
    }

    #[test]
    fn log_append_order_is_preserved() {
        let log = DiagnosticsLog::default();
        log.push(Diagnostic::warning("first"));
        log.push(Diagnostic::error("second"));

        let entries = log.snapshot();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "first");
        assert!(entries[1].is_error());
        assert!(log.has_errors());
    }
}
