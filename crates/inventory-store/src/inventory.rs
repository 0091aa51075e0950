use inventory_common::Result;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::categories::CategoryRepository;
use crate::credentials::CredentialVerifier;
use crate::devices::DeviceRepository;
use crate::licenses::LicenseRepository;
use crate::record_store::{RecordStore, DEFAULT_WRITE_TIMEOUT};

/// All repositories over one data directory.
///
/// Open exactly one per directory and share it; the write locks that keep
/// mutations serialized live inside these repositories.
pub struct Inventory {
    store: RecordStore,
    pub devices: DeviceRepository,
    pub categories: CategoryRepository,
    pub licenses: LicenseRepository,
    pub credentials: CredentialVerifier,
}

impl Inventory {
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with_timeout(dir, DEFAULT_WRITE_TIMEOUT).await
    }

    pub async fn open_with_timeout(dir: impl Into<PathBuf>, write_timeout: Duration) -> Result<Self> {
        let store = RecordStore::open(dir)
            .await?
            .with_write_timeout(write_timeout);

        info!("Inventory data directory: {}", store.dir().display());

        Ok(Self {
            devices: DeviceRepository::new(store.clone()),
            categories: CategoryRepository::new(store.clone()),
            licenses: LicenseRepository::new(store.clone()),
            credentials: CredentialVerifier::new(store.clone()),
            store,
        })
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }
}
