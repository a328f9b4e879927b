//! HTTP response building module
//!
//! Responses the server produces on its own, outside of any route handler.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Build 404 Not Found response, sent when no route matched
pub fn build_404_response(body: &str, is_head: bool) -> Response<Full<Bytes>> {
    build_plain_response(404, body, is_head)
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    build_plain_response(413, "413 Payload Too Large", false)
}

/// Build 400 Bad Request response, used when the request body can't be read
pub fn build_400_response() -> Response<Full<Bytes>> {
    build_plain_response(400, "400 Bad Request", false)
}

fn build_plain_response(status: u16, body: &str, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = body.len();
    let payload = if is_head {
        Bytes::new()
    } else {
        Bytes::from(body.to_string())
    };

    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Content-Length", content_length)
        .body(Full::new(payload))
        .unwrap_or_else(|e| {
            log_build_error(status, &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: u16, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
