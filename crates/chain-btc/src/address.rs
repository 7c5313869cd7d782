use bitcoin::address::{Address, NetworkUnchecked};
use bitcoin::CompressedPublicKey;

use crate::error::BtcError;
use crate::network::BtcNetwork;

/// Derive a legacy P2PKH address from a compressed public key.
///
/// The address is `Base58Check(version || HASH160(pubkey))`: `1...` on
/// mainnet, `m...`/`n...` on testnet.
pub fn pubkey_to_p2pkh_address(
    pubkey_bytes: &[u8; 33],
    network: BtcNetwork,
) -> Result<String, BtcError> {
    let compressed_pk = CompressedPublicKey::from_slice(pubkey_bytes).map_err(|e| {
        BtcError::InvalidPublicKey(format!("failed to parse compressed public key: {e}"))
    })?;

    let address = Address::p2pkh(compressed_pk.pubkey_hash(), network.to_bitcoin_network());

    Ok(address.to_string())
}

/// Validate a Bitcoin address string for the given network.
///
/// Any standard script type parses. Returns `false` when the address is
/// well-formed but belongs to the other network.
pub fn validate_address(address: &str, network: BtcNetwork) -> Result<bool, BtcError> {
    let parsed = address
        .parse::<Address<NetworkUnchecked>>()
        .map_err(|e| BtcError::InvalidAddress(format!("failed to parse address: {e}")))?;

    Ok(parsed.is_valid_for_network(network.to_bitcoin_network()))
}
