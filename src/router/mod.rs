//! Regular-expression router
//!
//! Provides ordered, first-match-wins dispatch of requests by path:
//! - Route table built with `RegexpHandler::add`
//! - Full-string (anchored) pattern matching
//! - Capture groups forwarded to the handler
//! - Atomically swappable snapshots for live reload

mod captures;
mod dispatch;
mod handler;
mod shared;
mod table;

pub use captures::Captures;
pub use dispatch::{request_path, Match};
pub use handler::{handler_fn, Handler, HandlerFn};
pub use shared::SharedRouter;
pub use table::{RegexpHandler, Route};
