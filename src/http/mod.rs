//! HTTP protocol layer module
//!
//! Response writer for route handlers and the few responses the server
//! builds itself.

pub mod response;
pub mod writer;

pub use response::{build_400_response, build_404_response, build_413_response};
pub use writer::ResponseWriter;
