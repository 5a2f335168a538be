//! Connection settings for the Postgres-backed store.

/// Default size of the connection pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Database connection configuration.
///
/// Reads from environment variables:
/// - `DATABASE_URL`: Postgres connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: `5`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub database_url: String,
    pub max_connections: u32,
}

impl StoreConfig {
    /// Creates a configuration for `database_url` with the default pool size.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Sets the pool size.
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Loads configuration from environment variables.
    ///
    /// Returns `None` when `DATABASE_URL` is unset or empty.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.is_empty())?;
        let max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .and_then(|value| value.parse().ok())
            .filter(|&n: &u32| n > 0)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        Some(Self {
            database_url,
            max_connections,
        })
    }
}
