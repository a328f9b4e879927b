//! Error types
//!
//! Registration failures are the only errors the dispatch core can raise.
//! A request that matches no route is not an error.

use thiserror::Error;

/// Failure to register a route
#[derive(Debug, Error)]
pub enum RouteError {
    /// The expression is not a valid regular expression
    #[error("invalid route pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Failure to load configuration or build the route table from it
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid address '{addr}': {source}")]
    Address {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("route #{index} rejected: {source}")]
    Route {
        index: usize,
        #[source]
        source: RouteError,
    },
}
