use sha2::Sha256;
use sha3::{Digest, Keccak256};

use crate::error::TrxError;

/// Version byte of every Tron account address (mainnet and test networks).
pub const ADDRESS_PREFIX: u8 = 0x41;

/// Length of a decoded address: prefix + 20-byte account id + 4-byte checksum.
const DECODED_LEN: usize = 25;

/// Derive a Tron address from an uncompressed public key (65 bytes,
/// `0x04 || x || y`).
///
/// Steps:
/// 1. Keccak-256(x || y), keep the last 20 bytes
/// 2. Prepend the `0x41` version byte
/// 3. Base58Check encode (4-byte SHA-256d checksum)
pub fn pubkey_to_tron_address(uncompressed_pubkey: &[u8; 65]) -> Result<String, TrxError> {
    if uncompressed_pubkey[0] != 0x04 {
        return Err(TrxError::InvalidPublicKey(
            "uncompressed key must start with 0x04".into(),
        ));
    }

    let hash = Keccak256::digest(&uncompressed_pubkey[1..]);

    let mut payload = Vec::with_capacity(DECODED_LEN);
    payload.push(ADDRESS_PREFIX);
    payload.extend_from_slice(&hash[12..]);

    let checksum = double_sha256_checksum(&payload);
    payload.extend_from_slice(&checksum);

    Ok(bs58::encode(&payload).into_string())
}

/// Validate a Tron address string.
///
/// Malformed Base58 or a bad checksum is an error; a well-formed payload with
/// the wrong version byte returns `false`.
pub fn validate_address(address: &str) -> Result<bool, TrxError> {
    let decoded = decode_checked(address)?;
    Ok(decoded[0] == ADDRESS_PREFIX)
}

/// Extract the 20-byte account id from an address. This is the same id an
/// EVM chain derives for the same key.
pub fn address_to_account_id(address: &str) -> Result<[u8; 20], TrxError> {
    let decoded = decode_checked(address)?;
    if decoded[0] != ADDRESS_PREFIX {
        return Err(TrxError::InvalidAddress(format!(
            "unexpected version byte 0x{:02x}",
            decoded[0]
        )));
    }

    let mut account = [0u8; 20];
    account.copy_from_slice(&decoded[1..21]);
    Ok(account)
}

fn decode_checked(address: &str) -> Result<Vec<u8>, TrxError> {
    let decoded = bs58::decode(address)
        .into_vec()
        .map_err(|e| TrxError::InvalidAddress(format!("invalid base58: {e}")))?;

    if decoded.len() != DECODED_LEN {
        return Err(TrxError::InvalidAddress(format!(
            "expected {DECODED_LEN} bytes, got {}",
            decoded.len()
        )));
    }

    let expected = double_sha256_checksum(&decoded[..21]);
    if decoded[21..] != expected {
        return Err(TrxError::InvalidAddress("invalid checksum".into()));
    }

    Ok(decoded)
}

/// Double SHA-256 checksum (first 4 bytes).
fn double_sha256_checksum(data: &[u8]) -> [u8; 4] {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    let mut checksum = [0u8; 4];
    checksum.copy_from_slice(&second[..4]);
    checksum
}
