//! Route handler abstraction

use hyper::body::Bytes;
use hyper::Request;

use super::Captures;
use crate::http::ResponseWriter;

/// Behavior bound to a route.
///
/// Invoked with the request, the response writer and the captures of the
/// matched pattern. Anything the handler raises (including a panic) is not
/// intercepted by the dispatcher.
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, req: &Request<Bytes>, w: &mut ResponseWriter, captures: Captures);
}

/// Handler built from a closure, see [`handler_fn`]
#[derive(Clone, Copy)]
pub struct HandlerFn<F> {
    f: F,
}

/// Wrap a closure as a [`Handler`].
///
/// ```
/// use regexp_handler::router::{handler_fn, RegexpHandler};
///
/// let mut router = RegexpHandler::new();
/// router
///     .add("/hello/(\\w+)", handler_fn(|_req, w, caps| {
///         w.write_str(&format!("hello {}", caps[0]));
///     }))
///     .unwrap();
/// ```
pub const fn handler_fn<F>(f: F) -> HandlerFn<F>
where
    F: Fn(&Request<Bytes>, &mut ResponseWriter, Captures) + Send + Sync + 'static,
{
    HandlerFn { f }
}

impl<F> Handler for HandlerFn<F>
where
    F: Fn(&Request<Bytes>, &mut ResponseWriter, Captures) + Send + Sync + 'static,
{
    fn handle(&self, req: &Request<Bytes>, w: &mut ResponseWriter, captures: Captures) {
        (self.f)(req, w, captures);
    }
}

impl<F> std::fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerFn").finish_non_exhaustive()
    }
}
