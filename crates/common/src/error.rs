use thiserror::Error;

use crate::record::CollectionName;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{collection} record not found: {id}")]
    NotFound { collection: CollectionName, id: String },

    #[error("Invalid credentials")]
    AuthFailure,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Duplicate {collection} id: {id}")]
    DuplicateId { collection: CollectionName, id: String },

    #[error("Inventory sequence exhausted for year {year:02}")]
    SequenceExhausted { year: u8 },

    #[error("Collection {collection} is corrupt: {reason}")]
    CollectionCorrupt {
        collection: CollectionName,
        reason: String,
    },

    #[error("Timed out waiting for write access to {collection}")]
    WriteTimeout { collection: CollectionName },

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn not_found(collection: CollectionName, id: impl Into<String>) -> Self {
        Self::NotFound {
            collection,
            id: id.into(),
        }
    }

    /// True for failures of the durable storage itself rather than of the request.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            Self::CollectionCorrupt { .. }
                | Self::WriteTimeout { .. }
                | Self::JsonSerialization(_)
                | Self::Io(_)
                | Self::Other(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
