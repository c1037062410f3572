use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Stored date '{value}' does not match YYYY-MM-DD HH:MM:SS: {source}")]
    Parse {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Lock poisoned for {0}")]
    LockPoisoned(&'static str),
}
