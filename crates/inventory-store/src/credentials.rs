//! Username/password verification against the users collection.
//!
//! Passwords are stored as salted argon2id hashes. Records still holding
//! plaintext (from the legacy bootstrap file) are accepted until
//! [`CredentialVerifier::migrate_plaintext`] rewrites them.

use inventory_common::{
    hash_password, verify_password, Error, Result, User, UserSummary, BOOTSTRAP_PASSWORD,
};
use anyhow::anyhow;
use tracing::{info, warn};

use crate::collection::Collection;
use crate::record_store::RecordStore;

/// Runs argon2 on the blocking pool.
async fn hash_blocking(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| Error::Other(anyhow!("password hashing task failed: {e}")))?
}

pub struct CredentialVerifier {
    users: Collection<User>,
}

impl CredentialVerifier {
    pub fn new(store: RecordStore) -> Self {
        Self {
            users: Collection::new(store),
        }
    }

    /// Write the default administrator if no user exists yet.
    ///
    /// Returns `true` when the record was created.
    pub async fn bootstrap(&self) -> Result<bool> {
        if !self.users.read().await?.is_empty() {
            return Ok(false);
        }

        let hash = hash_blocking(BOOTSTRAP_PASSWORD.to_string()).await?;
        let created = self
            .users
            .mutate(move |users| {
                if !users.is_empty() {
                    return Ok(false);
                }
                users.push(User::bootstrap_admin(hash));
                Ok(true)
            })
            .await?;

        if created {
            warn!("Created default admin user; change its password before production use");
        }
        Ok(created)
    }

    /// Check a username/password pair.
    pub async fn verify(&self, username: &str, password: &str) -> Result<UserSummary> {
        let users = self.users.read().await?;
        let user = users
            .iter()
            .find(|user| user.username == username)
            .ok_or(Error::AuthFailure)?;

        let matches = if user.has_hashed_password() {
            let password = password.to_string();
            let hash = user.password.clone();
            tokio::task::spawn_blocking(move || verify_password(&password, &hash))
                .await
                .map_err(|e| Error::Other(anyhow!("password verification task failed: {e}")))?
        } else {
            warn!("User {} still has a plaintext password", user.username);
            user.password == password
        };

        if matches {
            Ok(user.summary())
        } else {
            Err(Error::AuthFailure)
        }
    }

    /// Replace every plaintext password with its hash. Returns how many were migrated.
    ///
    /// Hashing happens before the write lock is taken; a record whose password
    /// changed in the meantime is left for the next run.
    pub async fn migrate_plaintext(&self) -> Result<usize> {
        let pending: Vec<(String, String)> = self
            .users
            .read()
            .await?
            .into_iter()
            .filter(|user| !user.has_hashed_password())
            .map(|user| (user.id, user.password))
            .collect();

        if pending.is_empty() {
            return Ok(0);
        }

        let mut hashed = Vec::with_capacity(pending.len());
        for (id, plaintext) in pending {
            let hash = hash_blocking(plaintext.clone()).await?;
            hashed.push((id, plaintext, hash));
        }

        let migrated = self
            .users
            .mutate(move |users| {
                let mut migrated = 0;
                for (id, plaintext, hash) in hashed {
                    if let Some(user) = users
                        .iter_mut()
                        .find(|user| user.id == id && user.password == plaintext)
                    {
                        user.password = hash;
                        migrated += 1;
                    }
                }
                Ok(migrated)
            })
            .await?;

        if migrated > 0 {
            info!("Migrated {} plaintext passwords to argon2id", migrated);
        }
        Ok(migrated)
    }

    pub async fn list(&self) -> Result<Vec<UserSummary>> {
        Ok(self.users.read().await?.iter().map(User::summary).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventory_common::{CollectionName, Role, BOOTSTRAP_USERNAME};
    use serde_json::json;

    async fn verifier() -> (CredentialVerifier, RecordStore, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let store = RecordStore::open(tmp.path()).await.unwrap();
        (CredentialVerifier::new(store.clone()), store, tmp)
    }

    fn write_users(store: &RecordStore, users: serde_json::Value) {
        std::fs::write(store.path(CollectionName::Users), users.to_string()).unwrap();
    }

    #[tokio::test]
    async fn test_bootstrap_admin() {
        let (verifier, store, _tmp) = verifier().await;

        assert!(verifier.bootstrap().await.unwrap());
        assert!(!verifier.bootstrap().await.unwrap());

        let user = verifier.verify(BOOTSTRAP_USERNAME, "admin").await.unwrap();
        assert_eq!(user.id, "1");
        assert_eq!(user.role, Role::Admin);

        let raw = std::fs::read_to_string(store.path(CollectionName::Users)).unwrap();
        assert!(raw.contains("$argon2id$"));
        assert!(!raw.contains("\"password\": \"admin\""));
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user() {
        let (verifier, _store, _tmp) = verifier().await;
        verifier.bootstrap().await.unwrap();

        let err = verifier.verify("admin", "wrong").await.unwrap_err();
        assert!(matches!(err, Error::AuthFailure));

        let err = verifier.verify("nobody", "admin").await.unwrap_err();
        assert!(matches!(err, Error::AuthFailure));
    }

    #[tokio::test]
    async fn test_legacy_plaintext_then_migration() {
        let (verifier, store, _tmp) = verifier().await;
        write_users(
            &store,
            json!([
                {"id": "1", "username": "admin", "password": "admin", "role": "admin"},
                {"id": "2", "username": "ewa", "password": "tajne"}
            ]),
        );

        let user = verifier.verify("admin", "admin").await.unwrap();
        assert_eq!(user.username, "admin");
        assert!(verifier.verify("admin", "wrong").await.is_err());

        assert_eq!(verifier.migrate_plaintext().await.unwrap(), 2);
        assert_eq!(verifier.migrate_plaintext().await.unwrap(), 0);

        verifier.verify("admin", "admin").await.unwrap();
        let ewa = verifier.verify("ewa", "tajne").await.unwrap();
        assert_eq!(ewa.role, Role::User);

        let raw = std::fs::read_to_string(store.path(CollectionName::Users)).unwrap();
        assert!(!raw.contains("tajne"));
    }

    #[tokio::test]
    async fn test_list_hides_passwords() {
        let (verifier, _store, _tmp) = verifier().await;
        verifier.bootstrap().await.unwrap();

        let users = verifier.list().await.unwrap();
        let value = serde_json::to_value(&users).unwrap();
        assert_eq!(value, json!([{"id": "1", "username": "admin", "role": "admin"}]));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_logins_all_verify() {
        let (verifier, _store, _tmp) = verifier().await;
        verifier.bootstrap().await.unwrap();
        let verifier = std::sync::Arc::new(verifier);

        let mut tasks = tokio::task::JoinSet::new();
        for i in 0..8 {
            let verifier = verifier.clone();
            tasks.spawn(async move {
                let password = if i % 2 == 0 { "admin" } else { "wrong" };
                (i, verifier.verify("admin", password).await)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let (i, result) = joined.unwrap();
            if i % 2 == 0 {
                assert_eq!(result.unwrap().id, "1");
            } else {
                assert!(matches!(result, Err(Error::AuthFailure)));
            }
        }
    }

    #[tokio::test]
    async fn test_migration_keeps_existing_hashes() {
        let (verifier, store, _tmp) = verifier().await;
        let hash = hash_password("kept").unwrap();
        write_users(
            &store,
            json!([
                {"id": "1", "username": "admin", "password": hash, "role": "admin"},
                {"id": "2", "username": "ewa", "password": "tajne"}
            ]),
        );

        assert_eq!(verifier.migrate_plaintext().await.unwrap(), 1);

        let raw = std::fs::read_to_string(store.path(CollectionName::Users)).unwrap();
        assert!(raw.contains(&hash));
        verifier.verify("admin", "kept").await.unwrap();
        verifier.verify("ewa", "tajne").await.unwrap();
    }
}
