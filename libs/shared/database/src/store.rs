use thiserror::Error;

use crate::supabase::is_conflict;

/// Error surface shared by every storage collaborator, whatever the backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Duplicate record: {0}")]
    Duplicate(String),

    #[error("Malformed record: {0}")]
    Decode(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    /// Classifies a Supabase failure, keeping unique-constraint violations distinct.
    pub fn from_backend(err: anyhow::Error) -> Self {
        if is_conflict(&err) {
            StoreError::Duplicate(err.to_string())
        } else {
            StoreError::Backend(err)
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}
