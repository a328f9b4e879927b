//! Regular-expression request dispatch for hyper servers.
//!
//! Routes are registered in order as (pattern, handler) pairs. A request is
//! served by the handler of the first route whose pattern matches the entire
//! request path; the pattern's capture groups are passed to the handler.
//! When no route matches nothing is invoked, and the caller decides what to
//! respond (the bundled server answers 404).
//!
//! ```
//! use hyper::body::Bytes;
//! use hyper::Request;
//! use regexp_handler::http::ResponseWriter;
//! use regexp_handler::router::{handler_fn, RegexpHandler};
//!
//! let mut router = RegexpHandler::new();
//! router
//!     .add("/user/([0-9]+)", handler_fn(|_req, w, caps| {
//!         w.write_str(&format!("user {}", caps[0]));
//!     }))?
//!     .add(".*", handler_fn(|_req, w, _caps| {
//!         w.set_status(hyper::StatusCode::NOT_FOUND);
//!     }))?;
//!
//! let req = Request::builder().uri("/user/42").body(Bytes::new())?;
//! let mut w = ResponseWriter::new();
//! assert!(router.serve(&req, &mut w));
//! assert_eq!(w.body(), b"user 42");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod router;
pub mod server;

pub use error::{ConfigError, RouteError};
pub use router::{handler_fn, Captures, Handler, RegexpHandler, SharedRouter};
