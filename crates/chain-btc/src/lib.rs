//! Bitcoin chain support.
//!
//! Provides legacy P2PKH (Base58Check) address derivation and address
//! validation for mainnet and testnet. Transaction building is not offered.

pub mod address;
pub mod error;
pub mod network;
