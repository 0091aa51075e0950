//! Persistence core of the SMU inventory tracker.
//!
//! Every collection lives in one JSON array file inside the data directory.
//! Operations re-read the whole collection and write it back in full, so the
//! store provides two guarantees on top of plain file IO:
//!
//! - **Atomic replace**: a save writes a temp file next to the target, fsyncs it
//!   and renames it into place. Readers see the old or the new file, never a
//!   partial one.
//! - **Single writer per collection**: load-modify-save cycles on one
//!   collection run inside that collection's critical section, so concurrent
//!   creates can neither lose updates nor hand out the same inventory number.
//!
//! **Components:**
//! - `record_store`: load/save of whole collections
//! - `collection`: typed handle owning the per-collection write lock
//! - `repository`: generic create/read/update/delete over one collection
//! - `devices`, `categories`, `licenses`: typed repositories
//! - `credentials`: user lookup, bootstrap and password migration
//! - `inventory`: the facade bundling all of the above for one data directory

pub mod categories;
pub mod collection;
pub mod credentials;
pub mod devices;
pub mod inventory;
pub mod licenses;
pub mod record_store;
pub mod repository;

pub use categories::CategoryRepository;
pub use collection::Collection;
pub use credentials::CredentialVerifier;
pub use devices::DeviceRepository;
pub use inventory::Inventory;
pub use licenses::LicenseRepository;
pub use record_store::{RecordStore, DEFAULT_WRITE_TIMEOUT};
pub use repository::{DeleteAck, MissingPolicy, Repository};
