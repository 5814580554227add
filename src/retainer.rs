//! Keeps generated code and its owners alive for the life of the process.
//!
//! Trampolines, dispatcher pages and shadow tables are reachable only through
//! raw code addresses once installed. Anything pushed here is never dropped.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Append-only set of type-erased owners.
#[derive(Default)]
pub struct ReferenceRetainer {
    items: boxcar::Vec<Arc<dyn Any + Send + Sync>>,
}

impl ReferenceRetainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retains `item` and hands it back.
    pub fn retain<T: Any + Send + Sync>(&self, item: Arc<T>) -> Arc<T> {
        self.items.push(item.clone());
        item
    }

    pub fn len(&self) -> usize {
        self.items.count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ReferenceRetainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReferenceRetainer").field("len", &self.len()).finish()
    }
}
