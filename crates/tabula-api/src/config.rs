//! Runtime configuration and the per-instance context.

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::db::Database;
use crate::params::Validators;

/// Default database URL.
pub const DEFAULT_DATABASE: &str = "sqlite:tabula.db";
/// Default prefix of every API path.
pub const DEFAULT_BASE_PATH: &str = "/apid";
/// Default ceiling on the records returned by one request.
pub const DEFAULT_MAX_RECS: i64 = 1000;
/// Default listen address.
pub const DEFAULT_LISTEN: &str = "127.0.0.1:9000";

/// Configuration values of one API instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Database URL.
    pub database: String,
    /// Prefix of every API path.
    pub base_path: String,
    /// Ceiling substituted for omitted or out-of-range `limit` values.
    pub max_recs: i64,
    /// Address the HTTP server binds.
    pub listen: SocketAddr,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            database: DEFAULT_DATABASE.to_string(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            max_recs: DEFAULT_MAX_RECS,
            listen: SocketAddr::from(([127, 0, 0, 1], 9000)),
        }
    }
}

impl ApiConfig {
    /// Sets the base path.
    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Sets the max-records ceiling.
    #[must_use]
    pub const fn with_max_recs(mut self, max_recs: i64) -> Self {
        self.max_recs = max_recs;
        self
    }
}

/// Everything a handler needs: configuration plus the database handle.
///
/// Shared behind an `Arc` by every handler of one route table.
pub struct ApiContext {
    pub config: ApiConfig,
    pub db: Arc<dyn Database>,
    pub validators: Validators,
}

impl ApiContext {
    pub fn new(config: ApiConfig, db: Arc<dyn Database>) -> Self {
        let validators = Validators::new(config.max_recs);
        Self {
            config,
            db,
            validators,
        }
    }
}

impl fmt::Debug for ApiContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiContext")
            .field("config", &self.config)
            .field("validators", &self.validators)
            .finish_non_exhaustive()
    }
}
