//! Route table shared with the serving side
//!
//! Requests read an immutable snapshot; registration builds a new table and
//! swaps it in atomically. A request keeps the snapshot it loaded even if the
//! table is replaced while its handler runs.

use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;

use super::{Handler, RegexpHandler};
use crate::error::RouteError;

pub struct SharedRouter {
    current: ArcSwap<RegexpHandler>,
    // Serialises writers so that concurrent `add` calls do not lose routes
    write_lock: Mutex<()>,
}

impl SharedRouter {
    pub fn new(table: RegexpHandler) -> Self {
        Self {
            current: ArcSwap::from_pointee(table),
            write_lock: Mutex::new(()),
        }
    }

    /// Snapshot of the current table
    pub fn load(&self) -> Arc<RegexpHandler> {
        self.current.load_full()
    }

    /// Replace the whole table, returning the previous one
    pub fn replace(&self, table: RegexpHandler) -> Arc<RegexpHandler> {
        let _guard = self.write_lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        self.current.swap(Arc::new(table))
    }

    /// Append a route to a copy of the current table and publish the copy.
    ///
    /// On error the published table is unchanged.
    pub fn add<H: Handler>(&self, expression: &str, handler: H) -> Result<(), RouteError> {
        let _guard = self.write_lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut next = RegexpHandler::clone(&self.current.load());
        next.add(expression, handler)?;
        self.current.store(Arc::new(next));
        Ok(())
    }
}

impl Default for SharedRouter {
    fn default() -> Self {
        Self::new(RegexpHandler::new())
    }
}

impl From<RegexpHandler> for SharedRouter {
    fn from(table: RegexpHandler) -> Self {
        Self::new(table)
    }
}

impl std::fmt::Debug for SharedRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedRouter")
            .field("routes", &self.current.load().len())
            .finish()
    }
}
