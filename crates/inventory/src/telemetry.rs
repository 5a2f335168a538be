//! Tracing bootstrap for host processes.
//!
//! Nothing in this workspace installs a subscriber on its own; a shell that
//! wants the ledger's spans and events calls [`init_tracing`] once at
//! startup.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

use crate::Config;

/// Builds the filter for `config.log_level`, falling back to `info` when the
/// directive does not parse.
fn env_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs a global `fmt` subscriber filtered by `config.log_level`.
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(config: &Config) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}
