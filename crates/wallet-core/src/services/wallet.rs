use crypto_utils::EntropySource;
use tracing::{debug, info};

use super::WalletCreator;
use crate::address::encode_address;
use crate::error::WalletError;
use crate::hd_derivation::{derivation_path, derive_secp256k1_key, key_from_entropy};
use crate::mnemonic::{
    entropy_to_bip39, entropy_to_mnemonic, mnemonic_to_seed, BIP39_ENTROPY_LEN, QUICK_ENTROPY_LEN,
};
use crate::types::{CreateWalletOptions, KeyOrigin, Network, WalletRecord};

/// Wallet creation for a single network
#[derive(Debug, Clone, Copy)]
pub struct WalletService {
    network: Network,
}

impl WalletService {
    pub fn new(network: Network) -> Self {
        Self { network }
    }
}

impl WalletCreator for WalletService {
    fn network(&self) -> Network {
        self.network
    }

    fn create_wallet(
        &self,
        options: &CreateWalletOptions,
        entropy: &mut dyn EntropySource,
    ) -> Result<WalletRecord, WalletError> {
        self.network.ensure_available()?;

        let (key, mnemonic) = match options.key_origin {
            KeyOrigin::Mnemonic => {
                let entropy = entropy.entropy(BIP39_ENTROPY_LEN)?;
                let mnemonic = entropy_to_bip39(&entropy)?;
                let seed = mnemonic_to_seed(&mnemonic, "")?;
                let path = derivation_path(self.network, options.mode, 0, 0);
                (derive_secp256k1_key(&seed, &path)?, mnemonic)
            }
            KeyOrigin::Entropy => {
                let entropy = entropy.entropy(QUICK_ENTROPY_LEN)?;
                (key_from_entropy(&entropy)?, entropy_to_mnemonic(&entropy)?)
            }
        };
        debug!(network = %self.network, path = %key.derivation_path, "derived wallet key");

        let address = encode_address(self.network, options.mode, &key)?;
        info!(
            network = %self.network,
            mode = %options.mode,
            origin = ?options.key_origin,
            %address,
            "created wallet"
        );

        Ok(WalletRecord {
            network: self.network,
            address,
            private_key: key.private_key_hex(),
            mnemonic: mnemonic.to_string(),
        })
    }
}
