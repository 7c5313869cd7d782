use thiserror::Error;

/// Tron chain operation errors.
#[derive(Debug, Error)]
pub enum TrxError {
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),
}
