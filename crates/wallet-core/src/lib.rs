pub mod address;
pub mod error;
pub mod factory;
pub mod hd_derivation;
pub mod metadata;
pub mod mnemonic;
pub mod services;
pub mod types;

#[cfg(feature = "http")]
pub mod config;
#[cfg(feature = "http")]
pub mod http;

use crypto_utils::{EntropySource, OsEntropy};

pub use crypto_utils::FixedEntropy;
pub use error::WalletError;
pub use factory::NetworkServiceFactory;
pub use metadata::{ChainMetadataProvider, FeeData, StaticMetadata};
pub use services::{MnemonicRecovery, TransactionBuilder, WalletCreator};
pub use types::{
    BuildTransactionRequest, CreateWalletOptions, KeyOrigin, Mode, Network, RecoveryOptions,
    RecoveryRecord, SignedTransactionRecord, TransactionType, WalletRecord,
};

// ─── Wallet creation ────────────────────────────────────────────────

/// Create a wallet with a fresh BIP-39 mnemonic from OS entropy
pub fn create_wallet(network: Network, mode: Mode) -> Result<WalletRecord, WalletError> {
    create_wallet_with(network, &CreateWalletOptions::new(mode), &mut OsEntropy)
}

/// Create a wallet with explicit options and entropy source
pub fn create_wallet_with(
    network: Network,
    options: &CreateWalletOptions,
    entropy: &mut dyn EntropySource,
) -> Result<WalletRecord, WalletError> {
    NetworkServiceFactory::wallet_creator(network)?.create_wallet(options, entropy)
}

// ─── Recovery ───────────────────────────────────────────────────────

/// Recover the first account's key and address from a mnemonic
pub fn recover_from_mnemonic(
    network: Network,
    mnemonic: &str,
    mode: Mode,
) -> Result<RecoveryRecord, WalletError> {
    recover_from_mnemonic_with(network, mnemonic, &RecoveryOptions::new(mode))
}

/// Recover with a passphrase or a non-default account/index
pub fn recover_from_mnemonic_with(
    network: Network,
    mnemonic: &str,
    options: &RecoveryOptions,
) -> Result<RecoveryRecord, WalletError> {
    NetworkServiceFactory::mnemonic_recovery(network)?.recover(mnemonic, options)
}

// ─── Transactions ───────────────────────────────────────────────────

/// Build and sign a transfer. Nonce and fees missing from the request come
/// from `metadata`, or from static defaults when no provider is given.
pub async fn build_transaction(
    network: Network,
    request: &BuildTransactionRequest,
    metadata: Option<&dyn ChainMetadataProvider>,
) -> Result<SignedTransactionRecord, WalletError> {
    NetworkServiceFactory::transaction_builder(network)?
        .build(request, metadata)
        .await
}

// ─── Utilities ──────────────────────────────────────────────────────

/// Check an address against a network's encoding
pub fn validate_address(network: Network, mode: Mode, address: &str) -> Result<bool, WalletError> {
    network.ensure_available()?;
    address::validate_address(network, mode, address)
}

/// Networks compiled into this build
pub fn supported_networks() -> Vec<Network> {
    NetworkServiceFactory::supported_networks()
}

/// Validate a BIP-39 mnemonic phrase
pub fn validate_mnemonic(phrase: &str) -> bool {
    mnemonic::validate_mnemonic(phrase)
}
