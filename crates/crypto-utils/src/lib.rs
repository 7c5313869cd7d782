//! # crypto-utils
//!
//! Entropy sources and zero-on-drop buffers shared by the chain crates and
//! the wallet core.

pub mod error;
pub mod random;
pub mod zeroizing;

pub use error::CryptoError;
pub use random::{EntropySource, FixedEntropy, OsEntropy};
pub use zeroizing::{ZeroizingBytes, ZeroizingString};
