use inventory_common::{Error, Record, Result};
use std::marker::PhantomData;
use tokio::sync::Mutex;
use tracing::warn;

use crate::record_store::RecordStore;

/// Typed handle on one collection file.
///
/// Reads go straight to the store. Mutations hold the collection's write lock
/// across the whole load-modify-save cycle, so at most one mutation of a
/// collection is in flight per handle. Share the handle (or the repository
/// owning it) rather than opening a second one on the same directory.
#[derive(Debug)]
pub struct Collection<T> {
    store: RecordStore,
    write_lock: Mutex<()>,
    _records: PhantomData<fn() -> T>,
}

impl<T: Record> Collection<T> {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
            _records: PhantomData,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Current contents of the collection
    pub async fn read(&self) -> Result<Vec<T>> {
        self.store.load(T::COLLECTION).await
    }

    /// Run `f` over the freshly loaded collection and persist the result.
    ///
    /// The file is only rewritten when `f` succeeds.
    pub async fn mutate<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R>,
    {
        let _guard = tokio::time::timeout(self.store.write_timeout(), self.write_lock.lock())
            .await
            .map_err(|_| {
                warn!("Write lock on {} not acquired in time", T::COLLECTION);
                Error::WriteTimeout {
                    collection: T::COLLECTION,
                }
            })?;

        let mut records = self.store.load::<T>(T::COLLECTION).await?;
        let outcome = f(&mut records)?;
        self.store.save(T::COLLECTION, &records).await?;

        Ok(outcome)
    }
}
