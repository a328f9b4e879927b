// Configuration module entry point
// Loads configuration, builds the route table and holds runtime state

mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::{
    Config, HttpConfig, LoggingConfig, PerformanceConfig, RouteAction, RouteConfig, ServerConfig,
};

use crate::error::ConfigError;
use crate::handler::ActionHandler;
use crate::logger;
use crate::router::RegexpHandler;

/// Default config file name, resolved by the `config` crate without extension
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// A missing file is not an error: defaults and `SERVER_*` environment
    /// variables still apply
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SERVER"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "regexp_handler")?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|source| ConfigError::Address { addr, source })
    }

    /// Build the route table from `[[routes]]` in file order.
    ///
    /// Fails on the first invalid pattern; a partially built table is never
    /// returned.
    pub fn build_router(&self) -> Result<RegexpHandler, ConfigError> {
        let mut table = RegexpHandler::new();
        for (index, route) in self.routes.iter().enumerate() {
            table
                .add(&route.pattern, ActionHandler::new(route.action.clone()))
                .map_err(|source| ConfigError::Route { index, source })?;
            logger::log_route_registered(index, &route.pattern);
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(pattern: &str) -> RouteConfig {
        RouteConfig {
            pattern: pattern.to_string(),
            action: RouteAction::Echo,
        }
    }

    #[test]
    fn test_build_router_in_order() {
        let cfg = Config {
            routes: vec![route("/a"), route("/(a)"), route(".*")],
            ..Config::default()
        };
        let table = cfg.build_router().unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.find("/a").unwrap().route.expression(), "/a");
        assert_eq!(table.find("/zzz").unwrap().route.expression(), ".*");
    }

    #[test]
    fn test_build_router_reports_bad_route() {
        let cfg = Config {
            routes: vec![route("/ok"), route("/bad(")],
            ..Config::default()
        };
        match cfg.build_router() {
            Err(ConfigError::Route { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected route error, got {other:?}"),
        }
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::default();
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 8080);
        cfg.server.host = "not an ip".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let cfg = Config::load_from("definitely/missing/config").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.http.max_body_size, 10_485_760);
        assert!(cfg.routes.is_empty());
    }

    #[test]
    fn test_load_routes_from_file() {
        let dir = std::env::temp_dir().join(format!("regexp_handler_cfg_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("routes.toml");
        std::fs::write(
            &path,
            r#"
            [[routes]]
            pattern = "/user/([0-9]+)"
            action = { type = "direct", body = "user $1" }

            [[routes]]
            pattern = ".*"
            action = { type = "echo" }
            "#,
        )
        .unwrap();

        let base = dir.join("routes");
        let cfg = Config::load_from(base.to_str().unwrap()).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(cfg.routes.len(), 2);
        assert_eq!(cfg.routes[0].pattern, "/user/([0-9]+)");
        assert_eq!(cfg.build_router().unwrap().len(), 2);
    }
}
