//! Request entry point
//!
//! Reads the request body, runs the route table against the path and turns
//! the handler's writer (or the not-found fallback) into a response.

use crate::config::AppState;
use crate::http::{self, ResponseWriter};
use crate::logger::{self, AccessLogEntry};
use crate::router::request_path;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, REFERER, SERVER, USER_AGENT};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request details kept for the access log after the body is consumed
struct RequestContext {
    started: Instant,
    peer_addr: SocketAddr,
    method: Method,
    path: String,
    query: Option<String>,
    version: Version,
    referer: Option<String>,
    user_agent: Option<String>,
}

impl RequestContext {
    fn new<B>(req: &Request<B>, peer_addr: SocketAddr) -> Self {
        let header = |name: hyper::header::HeaderName| {
            req.headers()
                .get(name)
                .and_then(|v: &HeaderValue| v.to_str().ok())
                .map(ToString::to_string)
        };
        Self {
            started: Instant::now(),
            peer_addr,
            method: req.method().clone(),
            path: req.uri().path().to_string(),
            query: req.uri().query().map(ToString::to_string),
            version: req.version(),
            referer: header(REFERER),
            user_agent: header(USER_AGENT),
        }
    }

    fn access_entry(&self, status: u16, body_bytes: usize) -> AccessLogEntry {
        let mut entry = AccessLogEntry::new(
            self.peer_addr.ip().to_string(),
            self.method.to_string(),
            self.path.clone(),
        );
        entry.query.clone_from(&self.query);
        entry.http_version = version_label(self.version).to_string();
        entry.status = status;
        entry.body_bytes = body_bytes;
        entry.referer.clone_from(&self.referer);
        entry.user_agent.clone_from(&self.user_agent);
        entry.request_time_us = u64::try_from(self.started.elapsed().as_micros()).unwrap_or(u64::MAX);
        entry
    }
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let ctx = RequestContext::new(&req, peer_addr);
    let is_head = ctx.method == Method::HEAD;

    let response = match read_body(req, state.config.http.max_body_size).await {
        Ok(req) => dispatch(&req, &state, is_head),
        Err(resp) => resp,
    };
    let response = with_server_header(response, &state.config.http.server_name);

    if state.access_log_enabled() {
        let entry = ctx.access_entry(response.status().as_u16(), sent_body_bytes(&response));
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Collect the body under the configured size limit
async fn read_body<B>(
    req: Request<B>,
    max_body_size: u64,
) -> Result<Request<Bytes>, Response<Full<Bytes>>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let (parts, body) = req.into_parts();

    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(Request::from_parts(parts, collected.to_bytes())),
        Err(e) if e.is::<LengthLimitError>() => {
            logger::log_error(&format!(
                "Request body too large for {} (max: {max_body_size} bytes)",
                parts.uri.path()
            ));
            Err(http::build_413_response())
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            Err(http::build_400_response())
        }
    }
}

/// Run the route table; unmatched requests get the configured 404
fn dispatch(req: &Request<Bytes>, state: &AppState, is_head: bool) -> Response<Full<Bytes>> {
    let table = state.router.load();
    let mut w = ResponseWriter::new();

    if table.serve(req, &mut w) {
        w.into_response(is_head)
    } else {
        logger::log_unmatched(&request_path(req.uri()));
        http::build_404_response(&state.config.http.not_found_body, is_head)
    }
}

/// Payload bytes actually sent, which for HEAD is zero even though
/// `Content-Length` advertises the GET size
fn sent_body_bytes(response: &Response<Full<Bytes>>) -> usize {
    response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0)
}

fn with_server_header(mut response: Response<Full<Bytes>>, server_name: &str) -> Response<Full<Bytes>> {
    if let Ok(value) = HeaderValue::from_str(server_name) {
        response.headers_mut().entry(SERVER).or_insert(value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::router::{handler_fn, RegexpHandler};
    use hyper::StatusCode;

    fn state(table: RegexpHandler, max_body_size: u64) -> Arc<AppState> {
        let mut cfg = Config::default();
        cfg.logging.access_log = false;
        cfg.http.max_body_size = max_body_size;
        cfg.http.not_found_body = "no route".to_string();
        Arc::new(AppState::new(cfg, "unused", table))
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:50000".parse().unwrap()
    }

    async fn body_of(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    fn get(path: &str) -> Request<Full<Bytes>> {
        Request::builder().uri(path).body(Full::new(Bytes::new())).unwrap()
    }

    #[tokio::test]
    async fn test_matched_route_response() {
        let mut table = RegexpHandler::new();
        table
            .add("/user/([0-9]+)", handler_fn(|_req, w, caps| {
                w.write_str(&format!("user {}", caps[0]));
            }))
            .unwrap();

        let resp = handle_request(get("/user/42"), state(table, 1024), peer()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["server"], "regexp_handler");
        assert_eq!(&body_of(resp).await[..], b"user 42");
    }

    #[tokio::test]
    async fn test_unmatched_is_404() {
        let resp = handle_request(get("/nothing"), state(RegexpHandler::new(), 1024), peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(&body_of(resp).await[..], b"no route");
    }

    #[tokio::test]
    async fn test_silent_handler_is_empty_200() {
        let mut table = RegexpHandler::new();
        table.add(".*", handler_fn(|_req, _w, _caps| {})).unwrap();

        let resp = handle_request(get("/quiet"), state(table, 1024), peer()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_of(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_handler_sees_body() {
        let mut table = RegexpHandler::new();
        table
            .add("/upload", handler_fn(|req, w, _caps| {
                w.write_bytes(req.body());
            }))
            .unwrap();

        let req = Request::builder()
            .method(Method::POST)
            .uri("/upload")
            .body(Full::new(Bytes::from_static(b"payload")))
            .unwrap();
        let resp = handle_request(req, state(table, 1024), peer()).await.unwrap();
        assert_eq!(&body_of(resp).await[..], b"payload");
    }

    #[tokio::test]
    async fn test_body_over_limit_is_413() {
        let mut table = RegexpHandler::new();
        table.add(".*", handler_fn(|_req, _w, _caps| {})).unwrap();

        let req = Request::builder()
            .method(Method::POST)
            .uri("/upload")
            .body(Full::new(Bytes::from_static(b"too large for limit")))
            .unwrap();
        let resp = handle_request(req, state(table, 4), peer()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_handler_server_header_kept() {
        let mut table = RegexpHandler::new();
        table
            .add(".*", handler_fn(|_req, w, _caps| {
                w.insert_header("Server", "custom");
            }))
            .unwrap();

        let resp = handle_request(get("/"), state(table, 1024), peer()).await.unwrap();
        assert_eq!(resp.headers()["server"], "custom");
    }

    #[tokio::test]
    async fn test_sent_body_bytes_excludes_head_payload() {
        let mut table = RegexpHandler::new();
        table
            .add("/doc", handler_fn(|_req, w, _caps| {
                w.write_str("twelve bytes");
            }))
            .unwrap();
        let state = state(table, 1024);

        let resp = handle_request(get("/doc"), Arc::clone(&state), peer()).await.unwrap();
        assert_eq!(sent_body_bytes(&resp), 12);

        let head = Request::builder()
            .method(Method::HEAD)
            .uri("/doc")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let resp = handle_request(head, state, peer()).await.unwrap();
        assert_eq!(resp.headers()["content-length"], "12");
        assert_eq!(sent_body_bytes(&resp), 0);
    }

    #[tokio::test]
    async fn test_percent_encoded_path_dispatched() {
        let mut table = RegexpHandler::new();
        table
            .add("/user/([a-z ]+)", handler_fn(|_req, w, caps| {
                w.write_str(&caps[0]);
            }))
            .unwrap();

        let resp = handle_request(get("/user/jane%20doe"), state(table, 1024), peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(&body_of(resp).await[..], b"jane doe");
    }

    #[test]
    fn test_access_entry() {
        let req = Request::builder()
            .uri("/a?b=c")
            .header("User-Agent", "curl/8")
            .body(())
            .unwrap();
        let ctx = RequestContext::new(&req, peer());
        let entry = ctx.access_entry(404, 13);
        assert_eq!(entry.remote_addr, "127.0.0.1");
        assert_eq!(entry.path, "/a");
        assert_eq!(entry.query.as_deref(), Some("b=c"));
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8"));
        assert_eq!(entry.status, 404);
        assert_eq!(entry.http_version, "1.1");
    }
}
