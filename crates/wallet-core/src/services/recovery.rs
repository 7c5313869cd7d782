use tracing::info;

use super::MnemonicRecovery;
use crate::address::encode_address;
use crate::error::WalletError;
use crate::hd_derivation::{derivation_path, derive_secp256k1_key};
use crate::mnemonic::{check_mnemonic, mnemonic_to_seed};
use crate::types::{Network, RecoveryOptions, RecoveryRecord};

/// Mnemonic recovery for a single network
#[derive(Debug, Clone, Copy)]
pub struct RecoveryService {
    network: Network,
}

impl RecoveryService {
    pub fn new(network: Network) -> Self {
        Self { network }
    }
}

impl MnemonicRecovery for RecoveryService {
    fn network(&self) -> Network {
        self.network
    }

    fn recover(&self, mnemonic: &str, options: &RecoveryOptions) -> Result<RecoveryRecord, WalletError> {
        self.network.ensure_available()?;
        check_mnemonic(mnemonic)?;

        let seed = mnemonic_to_seed(mnemonic, &options.passphrase)?;
        let path = derivation_path(self.network, options.mode, options.account, options.index);
        let key = derive_secp256k1_key(&seed, &path)?;
        let address = encode_address(self.network, options.mode, &key)?;

        info!(network = %self.network, mode = %options.mode, %path, %address, "recovered wallet");

        Ok(RecoveryRecord {
            network: self.network,
            address,
            public_key: key.public_key_hex(),
            private_key: key.private_key_hex(),
            path,
        })
    }
}

#[cfg(all(test, feature = "evm", feature = "bitcoin"))]
mod tests {
    use super::*;
    use crate::types::Mode;

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn recovers_known_addresses() {
        let eth = RecoveryService::new(Network::Ethereum)
            .recover(ABANDON, &RecoveryOptions::default())
            .unwrap();
        assert_eq!(eth.address, "0x9858EfFD232B4033E47d90003D41EC34EcaEda94");
        assert_eq!(eth.path, "m/44'/60'/0'/0/0");
        assert_eq!(eth.public_key.len(), 66);

        let btc = RecoveryService::new(Network::Bitcoin)
            .recover(ABANDON, &RecoveryOptions::new(Mode::Mainnet))
            .unwrap();
        assert_eq!(btc.address, "1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA");
    }

    #[test]
    fn extra_whitespace_is_normalized() {
        let spaced = format!("  {}  ", ABANDON.replace(' ', "   "));
        let a = RecoveryService::new(Network::Bnb)
            .recover(&spaced, &RecoveryOptions::default())
            .unwrap();
        let b = RecoveryService::new(Network::Bnb)
            .recover(ABANDON, &RecoveryOptions::default())
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn recovery_is_idempotent() {
        let options = RecoveryOptions {
            passphrase: "TREZOR".into(),
            index: 2,
            ..RecoveryOptions::new(Mode::Testnet)
        };
        for network in [Network::Ethereum, Network::Bitcoin] {
            let service = RecoveryService::new(network);
            let first = service.recover(ABANDON, &options).unwrap();
            let second = service.recover(ABANDON, &options).unwrap();
            assert_eq!(first, second);
            assert_eq!(first.private_key, second.private_key);
        }
    }

    #[test]
    fn account_index_and_passphrase_move_the_key() {
        let service = RecoveryService::new(Network::Ethereum);
        let base = service.recover(ABANDON, &RecoveryOptions::default()).unwrap();

        let mut options = RecoveryOptions::default();
        options.index = 1;
        let next = service.recover(ABANDON, &options).unwrap();
        assert_eq!(next.path, "m/44'/60'/0'/0/1");
        assert_ne!(next.address, base.address);

        let mut options = RecoveryOptions::default();
        options.passphrase = "TREZOR".into();
        let protected = service.recover(ABANDON, &options).unwrap();
        assert_eq!(protected.path, base.path);
        assert_ne!(protected.address, base.address);
    }

    #[test]
    fn invalid_phrase_fails_before_derivation() {
        let err = RecoveryService::new(Network::Ethereum)
            .recover("invalid mnemonic phrase here", &RecoveryOptions::default())
            .unwrap_err();
        assert!(matches!(err, WalletError::InvalidMnemonic(_)));
    }
}
