//! Route table and registration
//!
//! Routes are kept in a plain `Vec` because registration order is the only
//! precedence rule: the first registered route that matches a path wins.

use std::sync::Arc;

use regex::Regex;

use super::Handler;
use crate::error::RouteError;

/// A compiled pattern paired with its handler
#[derive(Clone)]
pub struct Route {
    expression: String,
    pub(super) re: Regex,
    pub(super) handler: Arc<dyn Handler>,
}

impl Route {
    fn compile(expression: &str, handler: Arc<dyn Handler>) -> Result<Self, RouteError> {
        let invalid = |source| RouteError::InvalidPattern {
            pattern: expression.to_string(),
            source,
        };

        // Validate the bare expression first so that input such as "a)(b",
        // which only parses once wrapped in a group, is still rejected.
        Regex::new(expression).map_err(invalid)?;
        // Under `(?x)` a trailing `# comment` would swallow the closing
        // anchor; the newline ends the comment and is ignored as whitespace.
        let re = Regex::new(&format!("^(?:{expression})$"))
            .or_else(|_| Regex::new(&format!("^(?:{expression}\n)$")))
            .map_err(invalid)?;

        Ok(Self {
            expression: expression.to_string(),
            re,
            handler,
        })
    }

    /// The expression as it was registered, without anchors
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Number of capture groups, excluding the whole match
    pub fn capture_count(&self) -> usize {
        self.re.captures_len() - 1
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("expression", &self.expression)
            .finish_non_exhaustive()
    }
}

/// Ordered route table that dispatches requests by regular expression.
///
/// Build it with [`RegexpHandler::add`] during startup, then share it
/// (`Arc<RegexpHandler>` or [`super::SharedRouter`]) with the serving side.
/// Registration needs `&mut self`, so a shared table can no longer change.
#[derive(Clone, Default, Debug)]
pub struct RegexpHandler {
    routes: Vec<Route>,
}

impl RegexpHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `expression` and `handler` as a new route.
    ///
    /// The expression must match the whole request path: it is anchored at
    /// both ends before compilation, so `foo` matches the path `foo` and
    /// never `foobar` or `xfoo`. An invalid expression is rejected and the
    /// table is left untouched.
    pub fn add<H: Handler>(&mut self, expression: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.add_shared(expression, Arc::new(handler))
    }

    /// Same as [`RegexpHandler::add`] for a handler that is already shared
    pub fn add_shared(
        &mut self,
        expression: &str,
        handler: Arc<dyn Handler>,
    ) -> Result<&mut Self, RouteError> {
        let route = Route::compile(expression, handler)?;
        self.routes.push(route);
        Ok(self)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
