#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage access failed for slot {slot}: {reason}")]
    Persistence { slot: &'static str, reason: String },

    #[error("failed to serialize slot {slot}: {source}")]
    Serialization {
        slot: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{0} must be greater than 0")]
    NotPositive(&'static str),

    #[error("{0} must not be negative")]
    Negative(&'static str),

    #[error("client {0} does not exist")]
    UnknownClient(String),

    #[error("{0} is out of range")]
    OutOfRange(&'static str),
}

/// Failure of a "save new" operation. Not-found lookups are `None`, never an error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("invoice has no valid line items")]
    NoValidItems,

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn sqlite_error_string(err: &rusqlite::Error) -> String {
    match err {
        rusqlite::Error::SqliteFailure(code, msg) => {
            let message = msg.clone().unwrap_or_default();
            format!(
                "sqlite(code={:?}, extended_code={}, msg={})",
                code.code, code.extended_code, message
            )
        }
        other => other.to_string(),
    }
}
