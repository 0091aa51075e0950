//! Software licenses.
//!
//! `device_id` is a weak reference: it is stored as given and never checked
//! against the device collection, so it may outlive the device it names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::record::{require, strip_reserved, CollectionName, Record};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct License {
    pub id: String,

    #[serde(default)]
    pub software_name: String,

    #[serde(default)]
    pub license_key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,

    /// Free-text date as entered by the client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,

    #[serde(default)]
    pub description: String,

    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for License {
    const COLLECTION: CollectionName = CollectionName::Licenses;

    fn id(&self) -> &str {
        &self.id
    }
}

impl License {
    pub fn apply(&mut self, patch: LicensePatch, now: DateTime<Utc>) {
        let LicensePatch {
            software_name,
            license_key,
            device_id,
            expiration_date,
            description,
            mut extra,
        } = patch;

        if let Some(software_name) = software_name {
            self.software_name = software_name;
        }
        if let Some(license_key) = license_key {
            self.license_key = license_key;
        }
        if let Some(device_id) = device_id {
            self.device_id = Some(device_id);
        }
        if let Some(expiration_date) = expiration_date {
            self.expiration_date = Some(expiration_date);
        }
        if let Some(description) = description {
            self.description = description;
        }

        strip_reserved(&mut extra);
        self.extra.extend(extra);
        self.updated_at = Some(now);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseDraft {
    #[serde(default)]
    pub software_name: String,

    #[serde(default)]
    pub license_key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,

    #[serde(default)]
    pub description: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LicenseDraft {
    pub fn validate(&self) -> Result<()> {
        require("softwareName", &self.software_name)?;
        require("licenseKey", &self.license_key)?;
        Ok(())
    }

    pub fn into_license(self, id: String, now: DateTime<Utc>) -> License {
        let mut extra = self.extra;
        strip_reserved(&mut extra);

        License {
            id,
            software_name: self.software_name,
            license_key: self.license_key,
            device_id: self.device_id.filter(|d| !d.is_empty()),
            expiration_date: self.expiration_date.filter(|d| !d.is_empty()),
            description: self.description,
            created_at: now,
            updated_at: None,
            extra,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicensePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub software_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
