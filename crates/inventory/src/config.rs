//! Configuration loaded from environment variables.

use store::StoreConfig;

/// Inventory configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `DATABASE_URL`: Postgres connection string; unset selects the
///   in-memory store
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: `5`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store: Option<StoreConfig>,
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            store: StoreConfig::from_env(),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }

    /// Returns true if no database is configured.
    pub fn is_in_memory(&self) -> bool {
        self.store.is_none()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: None,
            log_level: "info".to_string(),
        }
    }
}
