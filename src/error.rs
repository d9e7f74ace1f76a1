use thiserror::Error;

/// Errors surfaced by the connection manager and the record store.
///
/// Kinds are kept distinct so the HTTP layer can pick a status code without
/// inspecting messages: [`StoreError::InvalidIdentifier`] is the client's fault,
/// [`StoreError::NotFound`] means the target is gone, everything else is ours.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Required configuration is missing. Fatal at startup.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The database could not be opened or did not answer.
    #[error("database at {location} is not reachable: {source}")]
    Connectivity {
        location: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("invalid {resource} id: {id:?}")]
    InvalidIdentifier { resource: &'static str, id: String },

    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: String },

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("database lock poisoned")]
    LockPoisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;
