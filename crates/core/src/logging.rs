//! Logging and observability
//!
//! This module provides structured logging via tracing-subscriber, with text
//! or JSON formatting selected at runtime. All logging output goes to stderr:
//! stdout (and the configured output sink) is reserved for container-engine
//! output, which is never interleaved with structured logging.
//!
//! ## Environment variables
//!
//! * `MULTITEST_LOG` - logging filter specification (falls back to `RUST_LOG`,
//!   then to `info`)
//! * `MULTITEST_LOG_FORMAT` - `json` for structured JSON, anything else for
//!   human-readable text

use anyhow::Result;
use std::{io, sync::Once};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the logging system with an optional format specification
///
/// `format` accepts `"json"` for structured JSON output; `None`, `"text"`, or
/// any other value selects the text format. The `MULTITEST_LOG_FORMAT`
/// environment variable is consulted when `format` is `None`. Safe to call
/// multiple times - subsequent calls are no-ops.
pub fn init(format: Option<&str>) -> Result<()> {
    INIT.call_once(|| {
        let filter = create_env_filter();

        let env_format = std::env::var("MULTITEST_LOG_FORMAT").ok();
        let effective_format = format.or(env_format.as_deref()).unwrap_or("text");

        match effective_format {
            "json" => {
                tracing_subscriber::registry()
                    .with(
                        fmt::layer()
                            .json()
                            .with_target(true)
                            .with_writer(io::stderr),
                    )
                    .with(filter)
                    .init();
            }
            _ => {
                tracing_subscriber::registry()
                    .with(fmt::layer().with_target(true).with_writer(io::stderr))
                    .with(filter)
                    .init();
            }
        }

        tracing::debug!("Logging initialized with format: {}", effective_format);
    });

    Ok(())
}

/// Create an EnvFilter based on environment variables
fn create_env_filter() -> EnvFilter {
    if let Ok(multitest_log) = std::env::var("MULTITEST_LOG") {
        EnvFilter::try_new(&multitest_log).unwrap_or_else(|_| {
            tracing::warn!(
                "Invalid MULTITEST_LOG specification '{}', using default 'info'",
                multitest_log
            );
            EnvFilter::new("info")
        })
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Check if logging has been initialized
///
/// Primarily useful for testing scenarios where you need to know if the
/// logging system has already been set up.
pub fn is_initialized() -> bool {
    INIT.is_completed()
}
