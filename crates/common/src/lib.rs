//! Shared data model for the SMU inventory tracker.
//!
//! Holds the record types persisted by `inventory-store`, the error taxonomy
//! every layer propagates, the inventory-number allocator and the password
//! hashing helpers used by the credential verifier.

pub mod category;
pub mod device;
pub mod error;
pub mod inventory_number;
pub mod license;
pub mod password;
pub mod record;
pub mod user;

pub use category::{Category, CategoryDraft, CategoryPatch, DEFAULT_CATEGORY_ICON};
pub use device::{Device, DeviceDraft, DevicePatch, DeviceStatus};
pub use error::{Error, Result};
pub use inventory_number::{current_year, next_inventory_number, InventoryNumber};
pub use license::{License, LicenseDraft, LicensePatch};
pub use password::{hash_password, is_password_hash, verify_password};
pub use record::{new_record_id, CollectionName, Record};
pub use user::{
    Role, User, UserSummary, BOOTSTRAP_PASSWORD, BOOTSTRAP_USERNAME, BOOTSTRAP_USER_ID,
};
