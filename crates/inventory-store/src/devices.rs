use chrono::Utc;
use inventory_common::{
    current_year, new_record_id, next_inventory_number, Device, DeviceDraft, DevicePatch,
    InventoryNumber, Result,
};

use crate::record_store::RecordStore;
use crate::repository::{DeleteAck, MissingPolicy, Repository};

/// Devices, numbered by the sequential inventory-number allocator
pub struct DeviceRepository {
    inner: Repository<Device>,
}

impl DeviceRepository {
    pub fn new(store: RecordStore) -> Self {
        Self {
            inner: Repository::new(store, MissingPolicy::Reject),
        }
    }

    pub async fn list(&self) -> Result<Vec<Device>> {
        self.inner.list().await
    }

    pub async fn get(&self, id: &str) -> Result<Device> {
        self.inner.get(id).await
    }

    /// Register a device, numbering it within the current year.
    pub async fn create(&self, draft: DeviceDraft) -> Result<Device> {
        self.create_in_year(draft, current_year()).await
    }

    /// Register a device, numbering it within the given two-digit year.
    pub async fn create_in_year(&self, draft: DeviceDraft, year: u8) -> Result<Device> {
        draft.validate()?;

        self.inner
            .insert_with(|existing| {
                let number = next_inventory_number(
                    existing.iter().map(|d| d.inventory_number.as_str()),
                    year,
                )?;
                Ok(draft.into_device(new_record_id(), number, Utc::now()))
            })
            .await
    }

    pub async fn update(&self, id: &str, patch: DevicePatch) -> Result<Device> {
        self.inner
            .update_with(id, |device| device.apply(patch, Utc::now()))
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<DeleteAck> {
        self.inner.delete(id).await
    }

    /// The number the next device of `year` would receive, without reserving it.
    pub async fn peek_next_number(&self, year: u8) -> Result<InventoryNumber> {
        let devices = self.inner.list().await?;
        next_inventory_number(devices.iter().map(|d| d.inventory_number.as_str()), year)
    }
}
