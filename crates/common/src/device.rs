//! Device records and the payloads that create and modify them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::inventory_number::InventoryNumber;
use crate::record::{require, strip_reserved, CollectionName, Record};
use crate::Result;

/// Lifecycle state of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    /// In service
    #[default]
    Active,
    /// Away for repair
    Repair,
    /// Withdrawn from use
    Retired,
}

/// A registered piece of hardware
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Opaque unique identifier, immutable
    pub id: String,

    /// Human-facing code such as `SMU250007`, immutable
    pub inventory_number: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub serial_number: String,

    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub status: DeviceStatus,

    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Additional client-supplied attributes, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Device {
    const COLLECTION: CollectionName = CollectionName::Devices;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Device {
    /// Merge a patch over this record. Identity fields are never touched.
    pub fn apply(&mut self, patch: DevicePatch, now: DateTime<Utc>) {
        let DevicePatch {
            name,
            category,
            serial_number,
            location,
            status,
            mut extra,
        } = patch;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(serial_number) = serial_number {
            self.serial_number = serial_number;
        }
        if let Some(location) = location {
            self.location = location;
        }
        if let Some(status) = status {
            self.status = status;
        }

        strip_reserved(&mut extra);
        self.extra.extend(extra);
        self.updated_at = Some(now);
    }
}

/// Caller-supplied fields for a new device
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDraft {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub serial_number: String,

    #[serde(default)]
    pub location: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DeviceStatus>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DeviceDraft {
    pub fn validate(&self) -> Result<()> {
        require("name", &self.name)?;
        require("category", &self.category)?;
        require("serialNumber", &self.serial_number)?;
        require("location", &self.location)?;
        Ok(())
    }

    /// Build the stored record once identity has been assigned
    pub fn into_device(
        self,
        id: String,
        inventory_number: InventoryNumber,
        now: DateTime<Utc>,
    ) -> Device {
        let mut extra = self.extra;
        strip_reserved(&mut extra);

        Device {
            id,
            inventory_number: inventory_number.to_string(),
            name: self.name,
            category: self.category,
            serial_number: self.serial_number,
            location: self.location,
            status: self.status.unwrap_or_default(),
            created_at: now,
            updated_at: None,
            extra,
        }
    }
}

/// Partial update; absent fields keep their stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DeviceStatus>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
