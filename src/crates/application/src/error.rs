use thiserror::Error;

#[derive(Error, Debug)]
pub enum CartStorageError {
    #[error("Cart storage unavailable: {0}")]
    Unavailable(String),
    #[error("Stored cart data is corrupt: {0}")]
    Corrupt(String),
    #[error("Failed to encode cart: {0}")]
    Encode(String),
    #[error("Unknown error: {0}")]
    Other(#[from] anyhow::Error),
}
