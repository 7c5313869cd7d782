use sha3::{Digest, Keccak256};

use crate::error::EthError;

/// Returns the raw 20-byte account id for an uncompressed secp256k1 public key
/// (65 bytes, `0x04 || x || y`): the last 20 bytes of `keccak256(x || y)`.
///
/// Tron addresses carry the same 20 bytes; chain-trx hashes the key itself.
pub fn pubkey_to_account_id(uncompressed_pubkey: &[u8; 65]) -> Result<[u8; 20], EthError> {
    if uncompressed_pubkey[0] != 0x04 {
        return Err(EthError::InvalidPublicKey(
            "uncompressed key must start with 0x04".into(),
        ));
    }

    let hash = Keccak256::digest(&uncompressed_pubkey[1..]);
    let mut account = [0u8; 20];
    account.copy_from_slice(&hash[12..]);
    Ok(account)
}

/// Derives an EIP-55 checksummed address from an uncompressed public key.
pub fn pubkey_to_eth_address(uncompressed_pubkey: &[u8; 65]) -> Result<String, EthError> {
    let account = pubkey_to_account_id(uncompressed_pubkey)?;
    Ok(bytes_to_checksum_address(&account))
}

/// Parses a `0x`-prefixed 40-hex-digit address into its 20 raw bytes.
///
/// Casing is not checked here; use [`validate_address`] for EIP-55.
pub fn address_to_bytes(address: &str) -> Result<[u8; 20], EthError> {
    let hex_str = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or_else(|| EthError::InvalidAddress("address must start with 0x".into()))?;

    if hex_str.len() != 40 {
        return Err(EthError::InvalidAddress(format!(
            "expected 40 hex characters, got {}",
            hex_str.len()
        )));
    }

    let bytes =
        hex::decode(hex_str).map_err(|e| EthError::InvalidAddress(format!("invalid hex: {e}")))?;

    let mut addr = [0u8; 20];
    addr.copy_from_slice(&bytes);
    Ok(addr)
}

/// Validates an address string.
///
/// All-lowercase and all-uppercase forms carry no checksum and are accepted.
/// Mixed case must match the EIP-55 checksum, otherwise `Ok(false)`.
pub fn validate_address(address: &str) -> Result<bool, EthError> {
    let bytes = address_to_bytes(address)?;
    let hex_part = &address[2..];

    let is_all_lower = hex_part.chars().all(|c| !c.is_ascii_uppercase());
    let is_all_upper = hex_part.chars().all(|c| !c.is_ascii_lowercase());
    if is_all_lower || is_all_upper {
        return Ok(true);
    }

    Ok(bytes_to_checksum_address(&bytes) == address)
}

/// EIP-55: uppercase each hex letter whose nibble in
/// `keccak256(lowercase_hex)` is >= 8.
fn bytes_to_checksum_address(bytes: &[u8; 20]) -> String {
    let lower = hex::encode(bytes);
    let hash = Keccak256::digest(lower.as_bytes());

    let mut checksummed = String::with_capacity(42);
    checksummed.push_str("0x");

    for (i, c) in lower.chars().enumerate() {
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            checksummed.push(c.to_ascii_uppercase());
        } else {
            checksummed.push(c);
        }
    }

    checksummed
}
