//! Create/read/update/delete over a single collection.

use inventory_common::{Error, Record, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::collection::Collection;
use crate::record_store::RecordStore;

/// What `delete` does when the id is not in the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingPolicy {
    /// Fail with [`Error::NotFound`]
    Reject,
    /// Acknowledge as if the record had been removed
    Ignore,
}

/// Acknowledgement returned by a delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAck {
    pub success: bool,
    pub id: String,
    /// False when the policy was [`MissingPolicy::Ignore`] and nothing matched
    pub existed: bool,
}

pub struct Repository<T> {
    collection: Collection<T>,
    on_missing: MissingPolicy,
}

impl<T: Record> Repository<T> {
    pub fn new(store: RecordStore, on_missing: MissingPolicy) -> Self {
        Self {
            collection: Collection::new(store),
            on_missing,
        }
    }

    pub fn on_missing(&self) -> MissingPolicy {
        self.on_missing
    }

    pub async fn list(&self) -> Result<Vec<T>> {
        self.collection.read().await
    }

    pub async fn get(&self, id: &str) -> Result<T> {
        self.collection
            .read()
            .await?
            .into_iter()
            .find(|record| record.id() == id)
            .ok_or_else(|| Error::not_found(T::COLLECTION, id))
    }

    /// Append the record produced by `build` from the current contents.
    ///
    /// `build` runs inside the write critical section, so anything it derives
    /// from the existing records (such as the next inventory number) cannot be
    /// invalidated by a concurrent insert.
    pub async fn insert_with<F>(&self, build: F) -> Result<T>
    where
        F: FnOnce(&[T]) -> Result<T>,
    {
        let record = self
            .collection
            .mutate(|records| {
                let record = build(records)?;
                if records.iter().any(|existing| existing.id() == record.id()) {
                    return Err(Error::DuplicateId {
                        collection: T::COLLECTION,
                        id: record.id().to_string(),
                    });
                }
                records.push(record.clone());
                Ok(record)
            })
            .await?;

        info!("Created {} record {}", T::COLLECTION, record.id());
        Ok(record)
    }

    /// Modify the record with the given id in place.
    pub async fn update_with<F>(&self, id: &str, apply: F) -> Result<T>
    where
        F: FnOnce(&mut T),
    {
        let record = self
            .collection
            .mutate(|records| {
                let record = records
                    .iter_mut()
                    .find(|record| record.id() == id)
                    .ok_or_else(|| Error::not_found(T::COLLECTION, id))?;
                apply(record);
                Ok(record.clone())
            })
            .await?;

        info!("Updated {} record {}", T::COLLECTION, id);
        Ok(record)
    }

    pub async fn delete(&self, id: &str) -> Result<DeleteAck> {
        let on_missing = self.on_missing;

        let existed = self
            .collection
            .mutate(|records| {
                let Some(index) = records.iter().position(|record| record.id() == id) else {
                    return match on_missing {
                        MissingPolicy::Reject => Err(Error::not_found(T::COLLECTION, id)),
                        MissingPolicy::Ignore => Ok(false),
                    };
                };
                records.remove(index);
                Ok(true)
            })
            .await?;

        if existed {
            info!("Deleted {} record {}", T::COLLECTION, id);
        } else {
            debug!("Delete of absent {} record {} acknowledged", T::COLLECTION, id);
        }

        Ok(DeleteAck {
            success: true,
            id: id.to_string(),
            existed,
        })
    }
}
