// Application state module
// Shared route table, cached settings and lifecycle signals

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use super::types::Config;
use crate::error::ConfigError;
use crate::logger;
use crate::router::{RegexpHandler, SharedRouter};

/// Application state
pub struct AppState {
    pub config: Config,
    /// Path the configuration was loaded from, used on reload
    pub config_path: String,
    pub router: SharedRouter,

    // Cached config values for fast access without locks
    pub cached_access_log: AtomicBool,

    pub shutdown: Arc<Notify>,
}

impl AppState {
    pub fn new(config: Config, config_path: &str, table: RegexpHandler) -> Self {
        let cached_access_log = AtomicBool::new(config.logging.access_log);
        Self {
            config,
            config_path: config_path.to_string(),
            router: SharedRouter::new(table),
            cached_access_log,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Re-read the configuration file and swap in its routes.
    ///
    /// Server, performance and HTTP settings stay as they were at startup;
    /// only the route table and the access log switch are refreshed. If the
    /// new routes fail to build the current table keeps serving.
    pub fn reload_routes(&self) -> Result<usize, ConfigError> {
        let fresh = Config::load_from(&self.config_path)?;
        let table = fresh.build_router()?;
        let count = table.len();

        self.router.replace(table);
        self.cached_access_log
            .store(fresh.logging.access_log, Ordering::Relaxed);
        logger::log_routes_reloaded(count);
        Ok(count)
    }

    pub fn access_log_enabled(&self) -> bool {
        self.cached_access_log.load(Ordering::Relaxed)
    }
}
