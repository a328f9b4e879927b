// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    /// Routes in precedence order
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    #[serde(default = "default_backlog")]
    pub backlog: i32,
}

#[allow(clippy::missing_const_for_fn)]
fn default_backlog() -> i32 {
    128
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: None,
            backlog: default_backlog(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// `combined`, `common`, `json`, or a custom `$variable` pattern
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    #[serde(default)]
    pub access_log_file: Option<String>,
    #[serde(default)]
    pub error_log_file: Option<String>,
}

fn default_access_log_format() -> String {
    "combined".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            access_log: true,
            access_log_format: default_access_log_format(),
            access_log_file: None,
            error_log_file: None,
        }
    }
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            keep_alive_timeout: 75,
            read_timeout: 30,
            write_timeout: 30,
            max_connections: None,
        }
    }
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub max_body_size: u64,
    /// Body of the response sent when no route matches
    #[serde(default = "default_not_found_body")]
    pub not_found_body: String,
}

fn default_not_found_body() -> String {
    "404 Not Found".to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            server_name: "regexp_handler".to_string(),
            max_body_size: 10_485_760,
            not_found_body: default_not_found_body(),
        }
    }
}

/// One `[[routes]]` entry
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RouteConfig {
    /// Regular expression matched against the whole request path
    pub pattern: String,
    pub action: RouteAction,
}

/// Route action - what to do when a route matches
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RouteAction {
    /// Fixed response; `body` may reference captures as `$1` or `${1}`
    Direct {
        #[serde(default = "default_direct_status")]
        status: u16,
        #[serde(default)]
        body: Option<String>,
        #[serde(default)]
        content_type: Option<String>,
    },
    /// HTTP redirect; `target` may reference captures
    Redirect {
        target: String,
        #[serde(default = "default_redirect_code")]
        code: u16,
    },
    /// JSON document describing the path and captures
    Echo,
}

#[allow(clippy::missing_const_for_fn)]
fn default_direct_status() -> u16 {
    200
}

#[allow(clippy::missing_const_for_fn)]
fn default_redirect_code() -> u16 {
    302
}
