//! Key-value persistence capability
//!
//! The entity store only needs three primitives over whole JSON values, one
//! key per logical collection. Backends:
//! - MemoryStore (process-local, tests and dry runs)
//! - JsonFileStore (one JSON file per key in a directory)

use crate::errors::Result;
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Key-value backend trait
///
/// Implementations must make `set` and `remove` durable before returning:
/// a subsequent `get` (from this or another handle on the same backend)
/// observes either the old value or the new one, never a partial write.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` if absent
    fn get(&self, key: &str) -> Result<Option<JsonValue>>;

    /// Replace the value stored under `key`
    fn set(&self, key: &str, value: JsonValue) -> Result<()>;

    /// Remove `key`; removing an absent key succeeds
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<JsonValue>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: JsonValue) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<JsonValue>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: JsonValue) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
