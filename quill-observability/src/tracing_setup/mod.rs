//! Tracing setup: structured logging and phase span definitions.

pub mod spans;

use std::sync::Once;

use quill_core::config::ObservabilityConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the tracing subscriber.
///
/// Respects the `QUILL_LOG` environment variable for filtering and defaults
/// to `info`. Idempotent.
pub fn init_tracing() {
    init_tracing_with_config(&ObservabilityConfig::default());
}

/// Initialize tracing from config. `QUILL_LOG` still wins over
/// `config.log_level`; `config.json_logs` selects JSON lines.
pub fn init_tracing_with_config(config: &ObservabilityConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("QUILL_LOG")
            .or_else(|_| EnvFilter::try_new(&config.log_level))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);

        let registry = tracing_subscriber::registry().with(filter);
        // A host may already have installed a subscriber.
        let _ = if config.json_logs {
            registry.with(layer.json()).try_init()
        } else {
            registry.with(layer).try_init()
        };
    });
}
