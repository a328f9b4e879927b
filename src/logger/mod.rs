//! Logger module
//!
//! Provides logging utilities for the HTTP server including:
//! - Server lifecycle logging
//! - Route registration and dispatch logging
//! - Access logging with multiple formats
//! - Error and warning logging

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};

/// Set when `logging.level` is "debug"
static DEBUG: AtomicBool = AtomicBool::new(false);

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    DEBUG.store(
        config.logging.level.eq_ignore_ascii_case("debug"),
        Ordering::Relaxed,
    );
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_info(message),
        None => println!("{message}"),
    }
}

fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

pub fn debug_enabled() -> bool {
    DEBUG.load(Ordering::Relaxed)
}

pub fn log_server_start(addr: &SocketAddr, config: &Config, routes: usize) {
    write_info("======================================");
    write_info("Regexp handler started");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Log level: {}", config.logging.level));
    write_info(&format!("Routes: {routes}"));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================\n");
}

pub fn log_route_registered(index: usize, pattern: &str) {
    if debug_enabled() {
        write_info(&format!("[Route] #{index} {pattern}"));
    }
}

pub fn log_routes_reloaded(count: usize) {
    write_info(&format!("[Reload] Route table replaced ({count} routes)"));
}

pub fn log_unmatched(path: &str) {
    if debug_enabled() {
        write_info(&format!("[Route] No route for {path}"));
    }
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    if debug_enabled() {
        write_info(&format!("[Connection] Accepted from: {peer_addr}"));
    }
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_info(message: &str) {
    write_info(&format!("[INFO] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}
