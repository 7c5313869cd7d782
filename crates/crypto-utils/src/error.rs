use thiserror::Error;

/// Entropy and buffer handling errors.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("entropy source unavailable: {0}")]
    EntropyUnavailable(String),

    #[error("entropy too short: need at least {min} bytes, got {got}")]
    EntropyTooShort { min: usize, got: usize },

    #[error("entropy exhausted: requested {requested} bytes, {remaining} left")]
    EntropyExhausted { requested: usize, remaining: usize },
}
