//! Collection naming and the trait every persisted record implements.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// Keys a client can never set through the free-form attribute map.
pub const RESERVED_FIELDS: &[&str] = &["id", "inventoryNumber", "createdAt", "updatedAt"];

/// One persisted collection, stored as a single JSON array file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionName {
    Devices,
    Categories,
    Licenses,
    Users,
}

impl CollectionName {
    pub const ALL: [CollectionName; 4] = [
        CollectionName::Devices,
        CollectionName::Categories,
        CollectionName::Licenses,
        CollectionName::Users,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Devices => "devices",
            Self::Categories => "categories",
            Self::Licenses => "licenses",
            Self::Users => "users",
        }
    }

    /// File name of the collection inside the data directory
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Devices => "devices.json",
            Self::Categories => "categories.json",
            Self::Licenses => "licenses.json",
            Self::Users => "users.json",
        }
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record owned by exactly one collection and addressed by an opaque id.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: CollectionName;

    fn id(&self) -> &str;
}

/// Generate a fresh opaque record id
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

/// Drop reserved keys from client-supplied extra attributes.
pub(crate) fn strip_reserved(extra: &mut Map<String, Value>) {
    for key in RESERVED_FIELDS {
        extra.remove(*key);
    }
}

/// Fail with a validation error when a required text field is blank.
pub(crate) fn require(field: &str, value: &str) -> crate::Result<()> {
    if value.trim().is_empty() {
        return Err(crate::Error::Validation(format!("{field} is required")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_file_names() {
        let names: Vec<_> = CollectionName::ALL.iter().map(|c| c.file_name()).collect();
        assert_eq!(
            names,
            vec!["devices.json", "categories.json", "licenses.json", "users.json"]
        );
    }

    #[test]
    fn test_new_record_ids_are_unique() {
        assert_ne!(new_record_id(), new_record_id());
    }

    #[test]
    fn test_strip_reserved() {
        let mut extra = json!({
            "id": "evil",
            "inventoryNumber": "SMU009999",
            "purchaseDate": "2024-05-01"
        })
        .as_object()
        .cloned()
        .unwrap();

        strip_reserved(&mut extra);

        assert_eq!(extra.len(), 1);
        assert!(extra.contains_key("purchaseDate"));
    }

    #[test]
    fn test_require_rejects_blank() {
        assert!(require("name", "Laptop").is_ok());
        let err = require("name", "   ").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: name is required");
    }
}
