//! Logging configuration using tracing
//!
//! Structured logging to stderr, filtered through the RUST_LOG environment
//! variable. Defaults to "warn" so the CLI stays quiet unless asked.
//!
//! # Example RUST_LOG values
//! - `RUST_LOG=debug` - Show debug and above
//! - `RUST_LOG=burnish=trace` - Trace level for the burnish crate only

use anyhow::Context;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber
///
/// # Errors
/// Returns an error if a subscriber has already been installed
pub fn init() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .try_init()
        .context("failed to initialize tracing")?;

    Ok(())
}

/// Initialize logging for tests (no-op if already initialized)
pub fn init_test() {
    let _ = init();
}
