//! Configured route actions
//!
//! Turns a `[[routes]]` action from the configuration file into a route
//! handler.

use hyper::body::Bytes;
use hyper::{Request, StatusCode};

use crate::config::RouteAction;
use crate::http::ResponseWriter;
use crate::logger;
use crate::router::{request_path, Captures, Handler};

/// Route handler driven by a configured [`RouteAction`]
#[derive(Debug, Clone)]
pub struct ActionHandler {
    action: RouteAction,
}

impl ActionHandler {
    pub const fn new(action: RouteAction) -> Self {
        Self { action }
    }
}

impl Handler for ActionHandler {
    fn handle(&self, req: &Request<Bytes>, w: &mut ResponseWriter, captures: Captures) {
        match &self.action {
            RouteAction::Direct {
                status,
                body,
                content_type,
            } => write_direct(w, *status, body.as_deref(), content_type.as_deref(), &captures),
            RouteAction::Redirect { target, code } => {
                write_redirect(w, &captures.expand(target), *code);
            }
            RouteAction::Echo => write_echo(req, w, captures),
        }
    }
}

fn status_or_500(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or_else(|_| {
        logger::log_error(&format!("Invalid status code in route action: {code}"));
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

fn write_direct(
    w: &mut ResponseWriter,
    status: u16,
    body: Option<&str>,
    content_type: Option<&str>,
    captures: &Captures,
) {
    w.set_status(status_or_500(status));
    if let Some(body) = body {
        w.insert_header(
            "Content-Type",
            content_type.unwrap_or("text/plain; charset=utf-8"),
        );
        w.write_str(&captures.expand(body));
    } else if let Some(content_type) = content_type {
        w.insert_header("Content-Type", content_type);
    }
}

fn write_redirect(w: &mut ResponseWriter, target: &str, code: u16) {
    let status = status_or_500(code);
    if !status.is_redirection() {
        logger::log_warning(&format!("Redirect route uses non-3xx status {code}"));
    }
    w.set_status(status);
    w.insert_header("Location", target);
    w.insert_header("Content-Type", "text/plain");
    w.write_str("Redirecting...");
}

fn write_echo(req: &Request<Bytes>, w: &mut ResponseWriter, captures: Captures) {
    let doc = serde_json::json!({
        "method": req.method().as_str(),
        "path": request_path(req.uri()),
        "query": req.uri().query(),
        "captures": captures.into_vec(),
    });
    w.insert_header("Content-Type", "application/json");
    w.write_str(&doc.to_string());
}
