//! Response writer handed to route handlers
//!
//! Handlers set a status, headers and append to the body; the server turns
//! the writer into a hyper response once the handler returns.

use std::io;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderMap, HeaderName, HeaderValue};
use hyper::{Response, StatusCode};

#[derive(Debug, Clone)]
pub struct ResponseWriter {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
    touched: bool,
}

impl ResponseWriter {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Vec::new(),
            touched: false,
        }
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.touched = true;
        self.status = status;
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        self.touched = true;
        &mut self.headers
    }

    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Set a header from strings, ignoring names or values that are not
    /// valid in HTTP
    pub fn insert_header(&mut self, name: &str, value: &str) -> bool {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers_mut().insert(name, value);
                true
            }
            _ => {
                crate::logger::log_warning(&format!("Dropping invalid header '{name}'"));
                false
            }
        }
    }

    pub fn write_bytes(&mut self, data: &[u8]) {
        self.touched = true;
        self.body.extend_from_slice(data);
    }

    pub fn write_str(&mut self, data: &str) {
        self.write_bytes(data.as_bytes());
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Whether a handler changed anything on this writer
    pub const fn is_touched(&self) -> bool {
        self.touched
    }

    /// Build the final response.
    ///
    /// `Content-Length` always reflects the body written, even when the body
    /// is dropped for a HEAD request.
    pub fn into_response(self, is_head: bool) -> Response<Full<Bytes>> {
        let content_length = self.body.len();
        let body = if is_head {
            Bytes::new()
        } else {
            Bytes::from(self.body)
        };

        let mut response = Response::new(Full::new(body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
            .headers_mut()
            .insert(hyper::header::CONTENT_LENGTH, HeaderValue::from(content_length));
        response
    }
}

impl Default for ResponseWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl io::Write for ResponseWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
