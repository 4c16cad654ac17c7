//! Whole-collection persistence for tasks and weeks.
//!
//! # Responsibility
//! - Read/write the `tasks` and `weeks` collections as JSON text.
//! - Degrade unreadable collection text to an empty list.
//!
//! # Invariants
//! - A missing key and a corrupted value both load as `[]`.
//! - Store transport failures are returned, never swallowed.

use crate::model::task::Task;
use crate::model::week::Week;
use crate::repo::kv_store::{KeyValueStore, StoreError, StoreResult};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Store key holding the serialized task collection.
pub const TASKS_KEY: &str = "tasks";
/// Store key holding the serialized week collection.
pub const WEEKS_KEY: &str = "weeks";

/// Typed access to the two planner collections.
pub struct CollectionRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> CollectionRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn load_tasks(&self) -> StoreResult<Vec<Task>> {
        self.load_collection(TASKS_KEY)
    }

    pub fn load_weeks(&self) -> StoreResult<Vec<Week>> {
        self.load_collection(WEEKS_KEY)
    }

    pub fn save_tasks(&self, tasks: &[Task]) -> StoreResult<()> {
        self.save_collection(TASKS_KEY, tasks)
    }

    pub fn save_weeks(&self, weeks: &[Week]) -> StoreResult<()> {
        self.save_collection(WEEKS_KEY, weeks)
    }

    fn load_collection<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Vec<T>> {
        let Some(raw) = self.store.get(key)? else {
            debug!("event=store_load module=repo status=ok key={key} items=0 reason=absent");
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(items) => {
                debug!(
                    "event=store_load module=repo status=ok key={key} items={}",
                    items.len()
                );
                Ok(items)
            }
            Err(err) => {
                warn!(
                    "event=store_load module=repo status=degraded key={key} bytes={} error_code=decode_failed error={}",
                    raw.len(),
                    err
                );
                Ok(Vec::new())
            }
        }
    }

    fn save_collection<T: Serialize>(&self, key: &str, items: &[T]) -> StoreResult<()> {
        let raw = serde_json::to_string(items).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key, &raw)?;
        debug!(
            "event=store_save module=repo status=ok key={key} items={}",
            items.len()
        );
        Ok(())
    }
}
