//! Request handler module
//!
//! Connects the HTTP server to the route table and provides the handlers
//! behind configured routes.

pub mod actions;
pub mod request;

// Re-export main entry point
pub use actions::ActionHandler;
pub use request::handle_request;
