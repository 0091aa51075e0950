use chrono::Utc;
use inventory_common::{new_record_id, License, LicenseDraft, LicensePatch, Result};

use crate::record_store::RecordStore;
use crate::repository::{DeleteAck, MissingPolicy, Repository};

/// Software licenses. `deviceId` is stored as given and never validated.
pub struct LicenseRepository {
    inner: Repository<License>,
}

impl LicenseRepository {
    pub fn new(store: RecordStore) -> Self {
        Self {
            inner: Repository::new(store, MissingPolicy::Reject),
        }
    }

    pub async fn list(&self) -> Result<Vec<License>> {
        self.inner.list().await
    }

    pub async fn get(&self, id: &str) -> Result<License> {
        self.inner.get(id).await
    }

    pub async fn create(&self, draft: LicenseDraft) -> Result<License> {
        draft.validate()?;
        self.inner
            .insert_with(|_| Ok(draft.into_license(new_record_id(), Utc::now())))
            .await
    }

    pub async fn update(&self, id: &str, patch: LicensePatch) -> Result<License> {
        self.inner
            .update_with(id, |license| license.apply(patch, Utc::now()))
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<DeleteAck> {
        self.inner.delete(id).await
    }

    /// Licenses currently pointing at the given device id
    pub async fn for_device(&self, device_id: &str) -> Result<Vec<License>> {
        Ok(self
            .inner
            .list()
            .await?
            .into_iter()
            .filter(|license| license.device_id.as_deref() == Some(device_id))
            .collect())
    }
}
