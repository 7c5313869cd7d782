use thiserror::Error;

use crate::types::Network;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Unsupported network: {0}")]
    UnsupportedNetwork(String),

    #[error("Dependency unavailable: {network} support requires the `{feature}` feature")]
    DependencyUnavailable {
        network: Network,
        feature: &'static str,
    },

    #[error("Not implemented: transaction building for {0}")]
    NotImplemented(Network),

    #[error("Key derivation failed: {0}")]
    DerivationFailed(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Entropy unavailable: {0}")]
    Entropy(String),

    #[error("Blockchain metadata unavailable: {0}")]
    Metadata(String),

    #[error("Transaction build failed: {0}")]
    TransactionFailed(String),
}

impl From<crypto_utils::CryptoError> for WalletError {
    fn from(e: crypto_utils::CryptoError) -> Self {
        WalletError::Entropy(e.to_string())
    }
}

#[cfg(feature = "bitcoin")]
impl From<chain_btc::error::BtcError> for WalletError {
    fn from(e: chain_btc::error::BtcError) -> Self {
        use chain_btc::error::BtcError;
        match e {
            BtcError::InvalidAddress(_) => WalletError::InvalidAddress(format!("BTC: {e}")),
            BtcError::InvalidPublicKey(_) => WalletError::DerivationFailed(format!("BTC: {e}")),
        }
    }
}

#[cfg(feature = "evm")]
impl From<chain_eth::error::EthError> for WalletError {
    fn from(e: chain_eth::error::EthError) -> Self {
        use chain_eth::error::EthError;
        match e {
            EthError::InvalidPrivateKey(_) => WalletError::InvalidPrivateKey(format!("ETH: {e}")),
            EthError::InvalidAddress(_) => WalletError::InvalidAddress(format!("ETH: {e}")),
            EthError::InvalidAmount(_) => WalletError::InvalidAmount(format!("ETH: {e}")),
            EthError::InvalidPublicKey(_) => WalletError::DerivationFailed(format!("ETH: {e}")),
            EthError::SigningError(_) | EthError::UnsupportedChain(_) => {
                WalletError::TransactionFailed(format!("ETH: {e}"))
            }
        }
    }
}

#[cfg(feature = "tron")]
impl From<chain_trx::error::TrxError> for WalletError {
    fn from(e: chain_trx::error::TrxError) -> Self {
        use chain_trx::error::TrxError;
        match e {
            TrxError::InvalidAddress(_) => WalletError::InvalidAddress(format!("TRX: {e}")),
            TrxError::InvalidPublicKey(_) => WalletError::DerivationFailed(format!("TRX: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_field_or_network() {
        assert_eq!(
            WalletError::MissingField("value").to_string(),
            "Missing required field: value"
        );
        assert_eq!(
            WalletError::NotImplemented(Network::Tron).to_string(),
            "Not implemented: transaction building for tron"
        );
        assert_eq!(
            WalletError::DependencyUnavailable {
                network: Network::Bitcoin,
                feature: "bitcoin",
            }
            .to_string(),
            "Dependency unavailable: bitcoin support requires the `bitcoin` feature"
        );
    }

    #[test]
    fn crypto_errors_become_entropy_errors() {
        let err: WalletError = crypto_utils::CryptoError::EntropyUnavailable("no rng".into()).into();
        assert!(matches!(err, WalletError::Entropy(_)));
    }

    #[cfg(feature = "evm")]
    #[test]
    fn eth_errors_keep_their_category() {
        let err: WalletError = chain_eth::error::EthError::InvalidAmount("x".into()).into();
        assert!(matches!(err, WalletError::InvalidAmount(ref m) if m.starts_with("ETH:")));
    }
}
