//! Credential records.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::password::is_password_hash;
use crate::record::{CollectionName, Record};

pub const BOOTSTRAP_USER_ID: &str = "1";
pub const BOOTSTRAP_USERNAME: &str = "admin";
pub const BOOTSTRAP_PASSWORD: &str = "admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

/// A stored user. `password` holds an argon2id PHC string, or plaintext for
/// legacy records that have not been migrated yet.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

impl Record for User {
    const COLLECTION: CollectionName = CollectionName::Users;

    fn id(&self) -> &str {
        &self.id
    }
}

impl User {
    /// The administrator written on first startup
    pub fn bootstrap_admin(password_hash: String) -> Self {
        Self {
            id: BOOTSTRAP_USER_ID.to_string(),
            username: BOOTSTRAP_USERNAME.to_string(),
            password: password_hash,
            role: Role::Admin,
        }
    }

    pub fn has_hashed_password(&self) -> bool {
        is_password_hash(&self.password)
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary::from(self)
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// The only user shape that leaves the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub role: Role,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_legacy_user_defaults_role() {
        let user: User = serde_json::from_value(json!({
            "id": "7",
            "username": "jan",
            "password": "plain"
        }))
        .unwrap();
        assert_eq!(user.role, Role::User);
        assert!(!user.has_hashed_password());
    }

    #[test]
    fn test_debug_redacts_password() {
        let user = User::bootstrap_admin("hunter2".to_string());
        let printed = format!("{:?}", user);
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_summary_has_no_password() {
        let user = User::bootstrap_admin("secret-hash".to_string());
        let value = serde_json::to_value(user.summary()).unwrap();
        assert_eq!(value, json!({"id": "1", "username": "admin", "role": "admin"}));
    }
}
