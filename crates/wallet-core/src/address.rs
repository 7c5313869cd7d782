use crate::error::WalletError;
use crate::hd_derivation::DerivedKey;
use crate::types::{Mode, Network};

/// Encode the address of `key` for a network and mode
pub fn encode_address(network: Network, mode: Mode, key: &DerivedKey) -> Result<String, WalletError> {
    match network {
        #[cfg(feature = "evm")]
        Network::Ethereum | Network::Bnb => encode_evm_address(key),
        #[cfg(feature = "bitcoin")]
        Network::Bitcoin => encode_btc_address(key, mode),
        #[cfg(feature = "tron")]
        Network::Tron => encode_trx_address(key),
        #[allow(unreachable_patterns)]
        other => other.ensure_available().map(|_| String::new()),
    }
}

/// Validate an address for a given network.
///
/// `Ok(false)` means the string parses but does not belong to the network
/// or mode (wrong version byte, bad EIP-55 casing).
pub fn validate_address(network: Network, mode: Mode, address: &str) -> Result<bool, WalletError> {
    match network {
        #[cfg(feature = "evm")]
        Network::Ethereum | Network::Bnb => validate_evm_address(address),
        #[cfg(feature = "bitcoin")]
        Network::Bitcoin => validate_btc_address(address, mode),
        #[cfg(feature = "tron")]
        Network::Tron => validate_trx_address(address),
        #[allow(unreachable_patterns)]
        other => other.ensure_available().map(|_| false),
    }
}

#[cfg(feature = "evm")]
fn encode_evm_address(key: &DerivedKey) -> Result<String, WalletError> {
    Ok(chain_eth::address::pubkey_to_eth_address(&key.public_key_uncompressed)?)
}

#[cfg(feature = "evm")]
fn validate_evm_address(address: &str) -> Result<bool, WalletError> {
    Ok(chain_eth::address::validate_address(address)?)
}

#[cfg(feature = "bitcoin")]
fn btc_network(mode: Mode) -> chain_btc::network::BtcNetwork {
    match mode {
        Mode::Mainnet => chain_btc::network::BtcNetwork::Mainnet,
        Mode::Testnet => chain_btc::network::BtcNetwork::Testnet,
    }
}

#[cfg(feature = "bitcoin")]
fn encode_btc_address(key: &DerivedKey, mode: Mode) -> Result<String, WalletError> {
    Ok(chain_btc::address::pubkey_to_p2pkh_address(
        &key.public_key_compressed,
        btc_network(mode),
    )?)
}

#[cfg(feature = "bitcoin")]
fn validate_btc_address(address: &str, mode: Mode) -> Result<bool, WalletError> {
    Ok(chain_btc::address::validate_address(address, btc_network(mode))?)
}

#[cfg(feature = "tron")]
fn encode_trx_address(key: &DerivedKey) -> Result<String, WalletError> {
    Ok(chain_trx::address::pubkey_to_tron_address(&key.public_key_uncompressed)?)
}

#[cfg(feature = "tron")]
fn validate_trx_address(address: &str) -> Result<bool, WalletError> {
    Ok(chain_trx::address::validate_address(address)?)
}

#[cfg(all(test, feature = "evm", feature = "bitcoin", feature = "tron"))]
mod tests {
    use super::*;
    use crate::hd_derivation::{derivation_path, derive_secp256k1_key, key_from_private_key};
    use crate::mnemonic::mnemonic_to_seed;

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn key_at(network: Network, mode: Mode) -> DerivedKey {
        let seed = mnemonic_to_seed(TEST_MNEMONIC, "").unwrap();
        derive_secp256k1_key(&seed, &derivation_path(network, mode, 0, 0)).unwrap()
    }

    fn key_one() -> DerivedKey {
        let mut raw = [0u8; 32];
        raw[31] = 1;
        key_from_private_key(&raw).unwrap()
    }

    #[test]
    fn test_eth_abandon_vector() {
        let key = key_at(Network::Ethereum, Mode::Mainnet);
        let addr = encode_address(Network::Ethereum, Mode::Mainnet, &key).unwrap();
        assert_eq!(addr, "0x9858EfFD232B4033E47d90003D41EC34EcaEda94");
    }

    #[test]
    fn test_btc_abandon_vector() {
        let key = key_at(Network::Bitcoin, Mode::Mainnet);
        let addr = encode_address(Network::Bitcoin, Mode::Mainnet, &key).unwrap();
        assert_eq!(addr, "1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA");
    }

    #[test]
    fn test_btc_modes_differ_for_same_key() {
        let key = key_one();
        let main = encode_address(Network::Bitcoin, Mode::Mainnet, &key).unwrap();
        let test = encode_address(Network::Bitcoin, Mode::Testnet, &key).unwrap();
        assert_eq!(main, "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH");
        assert_ne!(main, test);
    }

    #[test]
    fn test_evm_networks_share_address() {
        let key = key_one();
        assert_eq!(
            encode_address(Network::Ethereum, Mode::Mainnet, &key).unwrap(),
            encode_address(Network::Bnb, Mode::Testnet, &key).unwrap()
        );
    }

    #[test]
    fn test_tron_payload_matches_evm_account() {
        let key = key_one();
        let tron = encode_address(Network::Tron, Mode::Mainnet, &key).unwrap();
        let evm = encode_address(Network::Ethereum, Mode::Mainnet, &key).unwrap();

        assert!(tron.starts_with('T'));
        assert_eq!(tron.len(), 34);
        assert_eq!(
            chain_trx::address::address_to_account_id(&tron).unwrap(),
            chain_eth::address::address_to_bytes(&evm).unwrap()
        );
    }

    #[test]
    fn test_validate_dispatch() {
        assert!(validate_address(
            Network::Ethereum,
            Mode::Mainnet,
            "0x9858EfFD232B4033E47d90003D41EC34EcaEda94"
        )
        .unwrap());
        assert!(validate_address(Network::Bitcoin, Mode::Mainnet, "1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA").unwrap());
        assert!(!validate_address(Network::Bitcoin, Mode::Testnet, "1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA").unwrap());
        assert!(validate_address(Network::Tron, Mode::Mainnet, "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t").unwrap());
        assert!(matches!(
            validate_address(Network::Tron, Mode::Mainnet, "0xnot-tron"),
            Err(WalletError::InvalidAddress(_))
        ));
    }
}
