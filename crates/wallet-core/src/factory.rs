use crate::error::WalletError;
use crate::services::{
    MnemonicRecovery, RecoveryService, TransactionBuilder, UnimplementedTransactionBuilder,
    WalletCreator, WalletService,
};
use crate::types::Network;

/// Resolves the services for a network.
///
/// A network whose chain crate was compiled out yields
/// [`WalletError::DependencyUnavailable`] rather than a service.
pub struct NetworkServiceFactory;

impl NetworkServiceFactory {
    pub fn wallet_creator(network: Network) -> Result<Box<dyn WalletCreator>, WalletError> {
        network.ensure_available()?;
        Ok(Box::new(WalletService::new(network)))
    }

    pub fn mnemonic_recovery(network: Network) -> Result<Box<dyn MnemonicRecovery>, WalletError> {
        network.ensure_available()?;
        Ok(Box::new(RecoveryService::new(network)))
    }

    pub fn transaction_builder(network: Network) -> Result<Box<dyn TransactionBuilder>, WalletError> {
        network.ensure_available()?;
        match network {
            #[cfg(feature = "evm")]
            Network::Ethereum | Network::Bnb => {
                Ok(Box::new(crate::services::EvmTransactionBuilder::new(network)?))
            }
            Network::Bitcoin | Network::Tron => Ok(Box::new(UnimplementedTransactionBuilder::new(network))),
            #[allow(unreachable_patterns)]
            other => Err(WalletError::DependencyUnavailable {
                network: other,
                feature: other.feature(),
            }),
        }
    }

    /// Parses a network name (`"ethereum"`, `"bnb"`, `"bitcoin"`, `"tron"`)
    pub fn network(name: &str) -> Result<Network, WalletError> {
        name.parse()
    }

    /// Networks compiled into this build
    pub fn supported_networks() -> Vec<Network> {
        Network::ALL.into_iter().filter(Network::is_available).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_available_network_resolves() {
        for network in NetworkServiceFactory::supported_networks() {
            assert_eq!(NetworkServiceFactory::wallet_creator(network).unwrap().network(), network);
            assert_eq!(NetworkServiceFactory::mnemonic_recovery(network).unwrap().network(), network);
            assert_eq!(NetworkServiceFactory::transaction_builder(network).unwrap().network(), network);
        }
    }

    #[test]
    fn unknown_name_is_unsupported() {
        assert!(matches!(
            NetworkServiceFactory::network("solana"),
            Err(WalletError::UnsupportedNetwork(_))
        ));
        assert_eq!(NetworkServiceFactory::network("BNB").unwrap(), Network::Bnb);
    }

    #[cfg(all(feature = "evm", feature = "bitcoin", feature = "tron"))]
    #[test]
    fn default_build_supports_all_networks() {
        assert_eq!(NetworkServiceFactory::supported_networks(), Network::ALL.to_vec());
    }

    #[cfg(not(feature = "tron"))]
    #[test]
    fn compiled_out_network_is_unavailable() {
        assert!(matches!(
            NetworkServiceFactory::wallet_creator(Network::Tron),
            Err(WalletError::DependencyUnavailable { network: Network::Tron, .. })
        ));
    }
}
