//! EVM chain support (Ethereum and BNB Smart Chain).
//!
//! This crate provides:
//! - EIP-55 checksummed address derivation from secp256k1 keys
//! - Legacy (EIP-155) and EIP-1559 transaction building and signing
//! - ERC-20 / BEP-20 `transfer` call encoding
//! - The chain-id table for the supported networks and modes
//! - Decimal amount parsing into base units

pub mod abi;
pub mod address;
pub mod chains;
pub mod erc20;
pub mod error;
pub mod transaction;
pub mod units;
