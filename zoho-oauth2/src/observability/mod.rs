//! Logging setup
//!
//! The library only emits `tracing` events. Applications that have no
//! subscriber of their own can call [`init`].

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set
#[must_use]
pub const fn default_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "debug,zoho_oauth2=trace"
    } else {
        "info"
    }
}

/// Initialize the global tracing subscriber
///
/// Uses pretty output in debug builds and JSON output in release builds.
/// The level is taken from `RUST_LOG`, falling back to [`default_filter`].
///
/// # Example
///
/// ```rust,no_run
/// use zoho_oauth2::observability;
///
/// # fn main() -> anyhow::Result<()> {
/// observability::init()?;
/// tracing::info!("Application started");
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns error if a global subscriber is already installed
pub fn init() -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter()));

    #[cfg(debug_assertions)]
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().pretty())
        .try_init()?;

    #[cfg(not(debug_assertions))]
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()?;

    Ok(())
}
