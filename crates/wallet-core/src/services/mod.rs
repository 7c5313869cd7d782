//! Per-network services behind the factory.
//!
//! Every network gets a creator and a recovery service. Only the EVM
//! networks sign transactions; Bitcoin and Tron builders validate input and
//! then report [`WalletError::NotImplemented`].

use async_trait::async_trait;
use crypto_utils::EntropySource;

use crate::error::WalletError;
use crate::metadata::ChainMetadataProvider;
use crate::types::{
    BuildTransactionRequest, CreateWalletOptions, Network, RecoveryOptions, RecoveryRecord,
    SignedTransactionRecord, WalletRecord,
};

pub mod builder;
pub mod recovery;
pub mod wallet;

pub use builder::UnimplementedTransactionBuilder;
#[cfg(feature = "evm")]
pub use builder::EvmTransactionBuilder;
pub use recovery::RecoveryService;
pub use wallet::WalletService;

/// Creates fresh wallets for one network
pub trait WalletCreator: Send + Sync {
    fn network(&self) -> Network;

    fn create_wallet(
        &self,
        options: &CreateWalletOptions,
        entropy: &mut dyn EntropySource,
    ) -> Result<WalletRecord, WalletError>;
}

/// Rebuilds a wallet from an existing BIP-39 phrase
pub trait MnemonicRecovery: Send + Sync {
    fn network(&self) -> Network;

    fn recover(&self, mnemonic: &str, options: &RecoveryOptions) -> Result<RecoveryRecord, WalletError>;
}

/// Assembles and signs a transfer, ready for broadcast
#[async_trait]
pub trait TransactionBuilder: Send + Sync {
    fn network(&self) -> Network;

    /// `metadata` is consulted only for values the request leaves out.
    async fn build(
        &self,
        request: &BuildTransactionRequest,
        metadata: Option<&dyn ChainMetadataProvider>,
    ) -> Result<SignedTransactionRecord, WalletError>;
}
