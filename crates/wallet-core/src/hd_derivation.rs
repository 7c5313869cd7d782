use bip32::{DerivationPath, XPrv};
use k256::ecdsa::SigningKey;
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::error::WalletError;
use crate::types::{Mode, Network};

/// Path label for keys that were not derived from a seed.
pub const NO_PATH: &str = "none";

/// BIP-44 derivation path: m/44'/coin_type'/account'/0/address_index
///
/// - ETH/BNB: m/44'/60'/0'/0/0
/// - BTC:     m/44'/0'/0'/0/0 (testnet coin type 1)
/// - TRX:     m/44'/195'/0'/0/0
pub fn derivation_path(network: Network, mode: Mode, account: u32, index: u32) -> String {
    format!("m/44'/{}'/{}'/0/{}", network.coin_type(mode), account, index)
}

/// Derive a secp256k1 key from a BIP-39 seed using BIP-32
pub fn derive_secp256k1_key(seed: &[u8], path_str: &str) -> Result<DerivedKey, WalletError> {
    let path: DerivationPath = path_str
        .parse()
        .map_err(|e: bip32::Error| WalletError::DerivationFailed(format!("{path_str}: {e}")))?;

    let xprv = XPrv::derive_from_path(seed, &path)
        .map_err(|e| WalletError::DerivationFailed(e.to_string()))?;

    let mut private_key_bytes: [u8; 32] = xprv.to_bytes().into();
    let key = key_from_bytes(&private_key_bytes, path_str);
    private_key_bytes.zeroize();
    key
}

/// Hash entropy straight into a key: scalar = SHA-256(entropy). No HD path.
///
/// A digest outside the curve order fails rather than being rehashed.
pub fn key_from_entropy(entropy: &[u8]) -> Result<DerivedKey, WalletError> {
    let mut scalar: [u8; 32] = Sha256::digest(entropy).into();
    let key = key_from_bytes(&scalar, NO_PATH);
    scalar.zeroize();
    key
}

/// Wrap an existing raw private key (e.g. a transaction sender's).
pub fn key_from_private_key(private_key: &[u8; 32]) -> Result<DerivedKey, WalletError> {
    key_from_bytes(private_key, NO_PATH).map_err(|e| match e {
        WalletError::DerivationFailed(msg) => WalletError::InvalidPrivateKey(msg),
        other => other,
    })
}

/// Parse a 64-hex-digit private key, with or without `0x`.
pub fn parse_private_key_hex(private_key: &str) -> Result<[u8; 32], WalletError> {
    let trimmed = private_key.trim();
    let hex_str = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let mut bytes = hex::decode(hex_str)
        .map_err(|_| WalletError::InvalidPrivateKey("private key is not valid hex".into()))?;

    if bytes.len() != 32 {
        let len = bytes.len();
        bytes.zeroize();
        return Err(WalletError::InvalidPrivateKey(format!(
            "expected 32 bytes, got {len}"
        )));
    }

    let mut key = [0u8; 32];
    key.copy_from_slice(&bytes);
    bytes.zeroize();
    Ok(key)
}

fn key_from_bytes(private_key: &[u8; 32], path: &str) -> Result<DerivedKey, WalletError> {
    let signing_key = SigningKey::from_bytes(private_key.into())
        .map_err(|_| WalletError::DerivationFailed("scalar is zero or exceeds the curve order".into()))?;

    let verifying_key = signing_key.verifying_key();
    let public_key_compressed: [u8; 33] = verifying_key
        .to_encoded_point(true)
        .as_bytes()
        .try_into()
        .map_err(|_| WalletError::DerivationFailed("Invalid public key length".into()))?;

    let public_key_uncompressed: [u8; 65] = verifying_key
        .to_encoded_point(false)
        .as_bytes()
        .try_into()
        .map_err(|_| WalletError::DerivationFailed("Invalid uncompressed public key".into()))?;

    Ok(DerivedKey {
        private_key: *private_key,
        public_key_compressed,
        public_key_uncompressed,
        derivation_path: path.to_string(),
    })
}

/// Derived secp256k1 key pair, shared by every supported network
pub struct DerivedKey {
    pub private_key: [u8; 32],
    pub public_key_compressed: [u8; 33],
    pub public_key_uncompressed: [u8; 65],
    pub derivation_path: String,
}

impl DerivedKey {
    /// Private key as lowercase hex without `0x`
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.private_key)
    }

    /// Compressed public key as lowercase hex
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key_compressed)
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.private_key.zeroize();
    }
}
