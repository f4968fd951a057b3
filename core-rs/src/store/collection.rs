//! Generic whole-collection access shared by every record kind
//!
//! Each kind lives under one key as a JSON array. Every mutation is a single
//! read-modify-write of that key, committed through `KeyValueStore::set`
//! before returning.

use serde_json::Value as JsonValue;
use tracing::{debug, info};

use crate::errors::{Result, SwitchError};
use crate::model::Record;
use crate::storage::KeyValueStore;

use super::EntityStore;

impl<S: KeyValueStore> EntityStore<S> {
    /// All records of kind `R`, in persisted order
    pub fn all<R: Record>(&self) -> Result<Vec<R>> {
        let key = R::KIND.storage_key();
        match self.kv.get(key)? {
            None | Some(JsonValue::Null) => Ok(Vec::new()),
            Some(value) => serde_json::from_value(value).map_err(|e| {
                SwitchError::Storage(format!("Collection '{}' is corrupt: {}", key, e))
            }),
        }
    }

    /// Replace the whole collection of kind `R`
    pub(crate) fn replace_all<R: Record>(&self, records: &[R]) -> Result<()> {
        let value = serde_json::to_value(records)?;
        self.kv.set(R::KIND.storage_key(), value)
    }

    /// Look up one record; absence is not an error
    pub fn get<R: Record>(&self, id: &str) -> Result<Option<R>> {
        let found = self.all::<R>()?.into_iter().find(|r| r.id() == id);
        debug!(kind = %R::KIND, id, found = found.is_some(), "lookup");
        Ok(found)
    }

    /// Append a record whose id must not exist yet
    pub(crate) fn insert<R: Record>(&self, record: R) -> Result<R> {
        let mut records = self.all::<R>()?;

        if records.iter().any(|r| r.id() == record.id()) {
            return Err(SwitchError::duplicate(R::KIND, record.id()));
        }

        records.push(record.clone());
        self.replace_all(&records)?;

        info!(kind = %R::KIND, id = record.id(), "created");
        Ok(record)
    }

    /// Modify one record in place and persist the collection
    ///
    /// `mutate` receives the record and the rest of the collection; if it
    /// fails nothing is written.
    pub(crate) fn modify<R, F>(&self, id: &str, mutate: F) -> Result<R>
    where
        R: Record,
        F: FnOnce(&mut R, &[R]) -> Result<()>,
    {
        let mut records = self.all::<R>()?;
        let index = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| SwitchError::not_found(R::KIND, id))?;

        let mut record = records.remove(index);
        mutate(&mut record, &records)?;
        records.insert(index, record.clone());
        self.replace_all(&records)?;

        info!(kind = %R::KIND, id, "updated");
        Ok(record)
    }

    /// Remove a record; removing an absent id succeeds without writing
    pub fn delete<R: Record>(&self, id: &str) -> Result<()> {
        let mut records = self.all::<R>()?;
        let before = records.len();
        records.retain(|r| r.id() != id);

        if records.len() == before {
            debug!(kind = %R::KIND, id, "delete of absent id");
            return Ok(());
        }

        self.replace_all(&records)?;
        info!(kind = %R::KIND, id, "deleted");
        Ok(())
    }
}
