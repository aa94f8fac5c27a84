//! # Observability
//!
//! Structured-logging bootstrap for binaries and test harnesses embedding
//! the core. Export pipelines (metrics, distributed tracing) belong to the
//! surrounding infrastructure, not to this crate.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::errors::{Error, Result};

/// Initialize the global tracing subscriber. `RUST_LOG` wins over the given
/// default directive. Fails if a subscriber is already installed.
pub fn init_logging(default_directive: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive.to_string()));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .try_init()
        .map_err(|err| Error::internal(format!("failed to install tracing subscriber: {}", err)))
}

/// Same as [`init_logging`] but silently keeps an already-installed
/// subscriber, for test harnesses that race to initialize.
pub fn try_init_logging(default_directive: &str) {
    let _ = init_logging(default_directive);
}
