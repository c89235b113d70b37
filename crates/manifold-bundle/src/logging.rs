//! Logging initialization helpers, available with the `logging` feature.
//!
//! As a library, manifold only emits `tracing` events; install your own
//! subscriber if you need different formatting. These helpers cover the
//! common application case.

use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Verbosity of manifold's log output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Silent,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
}

impl LogLevel {
    fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Silent => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

/// Install a global subscriber at the given level. Only the first call
/// in a process takes effect.
pub fn init_logging(level: LogLevel) {
    init_with_filter(EnvFilter::new(level.as_filter()));
}

/// Install a global subscriber configured from `RUST_LOG`, falling back
/// to info level.
pub fn init_logging_from_env() {
    init_with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));
}

fn init_with_filter(filter: EnvFilter) {
    INIT.call_once(|| {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_target(false).without_time())
            .init();
    });
}
