//! Tron chain support.
//!
//! Provides Base58Check address derivation (`T...`) from secp256k1 public
//! keys and address validation. Transaction building is not offered.

pub mod address;
pub mod error;
