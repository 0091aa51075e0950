use chrono::Utc;
use inventory_common::{new_record_id, Category, CategoryDraft, CategoryPatch, Result};

use crate::record_store::RecordStore;
use crate::repository::{DeleteAck, MissingPolicy, Repository};

/// Categories. Deleting an unknown id is acknowledged rather than rejected.
pub struct CategoryRepository {
    inner: Repository<Category>,
}

impl CategoryRepository {
    pub fn new(store: RecordStore) -> Self {
        Self {
            inner: Repository::new(store, MissingPolicy::Ignore),
        }
    }

    pub async fn list(&self) -> Result<Vec<Category>> {
        self.inner.list().await
    }

    pub async fn get(&self, id: &str) -> Result<Category> {
        self.inner.get(id).await
    }

    pub async fn create(&self, draft: CategoryDraft) -> Result<Category> {
        draft.validate()?;
        self.inner
            .insert_with(|_| Ok(draft.into_category(new_record_id(), Utc::now())))
            .await
    }

    pub async fn update(&self, id: &str, patch: CategoryPatch) -> Result<Category> {
        self.inner
            .update_with(id, |category| category.apply(patch, Utc::now()))
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<DeleteAck> {
        self.inner.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventory_common::Error;

    async fn repository() -> (CategoryRepository, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let store = RecordStore::open(tmp.path()).await.unwrap();
        (CategoryRepository::new(store), tmp)
    }

    fn draft(name: &str) -> CategoryDraft {
        CategoryDraft {
            name: name.to_string(),
            description: format!("{name} description"),
        }
    }

    #[tokio::test]
    async fn test_create_and_update() {
        let (repo, _tmp) = repository().await;
        let category = repo.create(draft("Monitors")).await.unwrap();
        assert_eq!(category.icon, "box");

        let updated = repo
            .update(
                &category.id,
                CategoryPatch {
                    name: Some("Displays".to_string()),
                    description: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, category.id);
        assert_eq!(updated.name, "Displays");
        assert_eq!(updated.description, "Monitors description");
    }

    #[tokio::test]
    async fn test_duplicate_names_are_allowed() {
        let (repo, _tmp) = repository().await;
        repo.create(draft("Laptops")).await.unwrap();
        repo.create(draft("Laptops")).await.unwrap();
        assert_eq!(repo.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let (repo, _tmp) = repository().await;
        let err = repo.create(draft(" ")).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_absent_is_acknowledged() {
        let (repo, _tmp) = repository().await;
        let kept = repo.create(draft("Phones")).await.unwrap();

        let ack = repo.delete("does-not-exist").await.unwrap();
        assert!(ack.success);
        assert!(!ack.existed);
        assert_eq!(repo.list().await.unwrap(), vec![kept]);
    }

    #[tokio::test]
    async fn test_update_absent_is_not_found() {
        let (repo, _tmp) = repository().await;
        let err = repo
            .update("ghost", CategoryPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }
}
