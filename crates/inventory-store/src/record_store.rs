//! Whole-collection load and save against the data directory.

use anyhow::anyhow;
use inventory_common::{CollectionName, Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// How long a mutation waits for a collection's write lock
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// File-backed store for the four collections
#[derive(Debug, Clone)]
pub struct RecordStore {
    dir: PathBuf,
    write_timeout: Duration,
}

impl RecordStore {
    /// Open the store, creating the directory and any missing collection file.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;

        let store = Self {
            dir,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        };

        for collection in CollectionName::ALL {
            let path = store.path(collection);
            if !tokio::fs::try_exists(&path).await? {
                store.save::<serde_json::Value>(collection, &[]).await?;
                info!("Initialized empty collection file {}", path.display());
            }
        }

        Ok(store)
    }

    pub fn with_write_timeout(mut self, write_timeout: Duration) -> Self {
        self.write_timeout = write_timeout;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write_timeout(&self) -> Duration {
        self.write_timeout
    }

    /// Path of a collection's file
    pub fn path(&self, collection: CollectionName) -> PathBuf {
        self.dir.join(collection.file_name())
    }

    /// Load every record of a collection.
    ///
    /// A missing or blank file is an empty collection. Unparsable content is
    /// reported as [`Error::CollectionCorrupt`]; other IO failures propagate.
    pub async fn load<T: DeserializeOwned>(&self, collection: CollectionName) -> Result<Vec<T>> {
        let path = self.path(collection);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Collection file {} missing, treating as empty", path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&bytes).map_err(|e| Error::CollectionCorrupt {
            collection,
            reason: e.to_string(),
        })
    }

    /// Replace a collection's file with the given records, atomically.
    pub async fn save<T: Serialize>(&self, collection: CollectionName, records: &[T]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(records)?;
        let path = self.path(collection);
        let count = records.len();

        tokio::task::spawn_blocking(move || write_atomic(&path, &bytes))
            .await
            .map_err(|e| Error::Other(anyhow!("write task for {collection} failed: {e}")))??;

        debug!("Saved {} records to {}", count, collection);
        Ok(())
    }
}

/// Write to a temp file in the target directory, fsync, then rename over the target.
fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| io::Error::other("collection path has no parent directory"))?;

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    #[cfg(unix)]
    {
        if let Ok(dir) = std::fs::File::open(dir) {
            let _ = dir.sync_all();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventory_common::Device;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_open_initializes_every_collection() {
        let tmp = tempfile::tempdir().unwrap();
        let store = RecordStore::open(tmp.path().join("storage")).await.unwrap();

        for collection in CollectionName::ALL {
            let content = std::fs::read_to_string(store.path(collection)).unwrap();
            assert_eq!(content.trim(), "[]");
        }
    }

    #[tokio::test]
    async fn test_open_keeps_existing_files() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("categories.json");
        std::fs::write(&path, r#"[{"id":"1","name":"Keep","createdAt":"2024-01-01T00:00:00Z"}]"#)
            .unwrap();

        let store = RecordStore::open(tmp.path()).await.unwrap();
        let records: Vec<Value> = store.load(CollectionName::Categories).await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_and_blank_files_load_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let store = RecordStore::open(tmp.path()).await.unwrap();

        std::fs::remove_file(store.path(CollectionName::Devices)).unwrap();
        let devices: Vec<Value> = store.load(CollectionName::Devices).await.unwrap();
        assert!(devices.is_empty());

        std::fs::write(store.path(CollectionName::Licenses), "  \n").unwrap();
        let licenses: Vec<Value> = store.load(CollectionName::Licenses).await.unwrap();
        assert!(licenses.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let store = RecordStore::open(tmp.path()).await.unwrap();
        std::fs::write(store.path(CollectionName::Devices), "[{\"id\": ").unwrap();

        let err = store
            .load::<Value>(CollectionName::Devices)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::CollectionCorrupt {
                collection: CollectionName::Devices,
                ..
            }
        ));

        // The corrupt file must not be silently replaced
        let content = std::fs::read_to_string(store.path(CollectionName::Devices)).unwrap();
        assert_eq!(content, "[{\"id\": ");
    }

    #[tokio::test]
    async fn test_wrong_shape_is_corrupt() {
        let tmp = tempfile::tempdir().unwrap();
        let store = RecordStore::open(tmp.path()).await.unwrap();
        std::fs::write(store.path(CollectionName::Users), r#"{"users": []}"#).unwrap();

        let result = store.load::<Value>(CollectionName::Users).await;
        assert!(matches!(result, Err(Error::CollectionCorrupt { .. })));
    }

    #[tokio::test]
    async fn test_save_of_load_is_semantically_identity() {
        let tmp = tempfile::tempdir().unwrap();
        let store = RecordStore::open(tmp.path()).await.unwrap();

        let legacy = json!([
            {
                "id": "1718000000000",
                "inventoryNumber": "SMU240001",
                "name": "Printer",
                "category": "Peripherals",
                "serialNumber": "HP-77",
                "location": "Office",
                "status": "repair",
                "createdAt": "2024-06-10T08:00:00.000Z",
                "purchaseDate": "2024-05-30",
                "notes": {"warranty": true}
            }
        ]);
        std::fs::write(
            store.path(CollectionName::Devices),
            serde_json::to_vec_pretty(&legacy).unwrap(),
        )
        .unwrap();

        let before: Vec<Device> = store.load(CollectionName::Devices).await.unwrap();
        store.save(CollectionName::Devices, &before).await.unwrap();
        let after: Vec<Device> = store.load(CollectionName::Devices).await.unwrap();
        assert_eq!(before, after);

        let raw: Vec<Value> = store.load(CollectionName::Devices).await.unwrap();
        assert_eq!(raw[0]["purchaseDate"], "2024-05-30");
        assert_eq!(raw[0]["notes"]["warranty"], true);
    }

    #[tokio::test]
    async fn test_save_leaves_no_temp_files() {
        let tmp = tempfile::tempdir().unwrap();
        let store = RecordStore::open(tmp.path()).await.unwrap();
        store
            .save(CollectionName::Categories, &[json!({"id": "a"})])
            .await
            .unwrap();

        let names: Vec<String> = std::fs::read_dir(tmp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), CollectionName::ALL.len());
    }
}
