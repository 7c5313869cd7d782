use async_trait::async_trait;
use tracing::warn;

use super::TransactionBuilder;
use crate::error::WalletError;
use crate::metadata::ChainMetadataProvider;
use crate::types::{BuildTransactionRequest, Network, SignedTransactionRecord};

#[cfg(feature = "evm")]
pub use evm::EvmTransactionBuilder;

/// Builder for networks without signing support: checks the request, then
/// reports [`WalletError::NotImplemented`].
#[derive(Debug, Clone, Copy)]
pub struct UnimplementedTransactionBuilder {
    network: Network,
}

impl UnimplementedTransactionBuilder {
    pub fn new(network: Network) -> Self {
        Self { network }
    }
}

#[async_trait]
impl TransactionBuilder for UnimplementedTransactionBuilder {
    fn network(&self) -> Network {
        self.network
    }

    async fn build(
        &self,
        request: &BuildTransactionRequest,
        _metadata: Option<&dyn ChainMetadataProvider>,
    ) -> Result<SignedTransactionRecord, WalletError> {
        request.validate()?;
        self.network.ensure_available()?;
        warn!(network = %self.network, "transaction building requested for unsupported network");
        Err(WalletError::NotImplemented(self.network))
    }
}

#[cfg(feature = "evm")]
mod evm {
    use async_trait::async_trait;
    use chain_eth::address::validate_address;
    use chain_eth::chains::{self, EvmChain, NATIVE_TRANSFER_GAS};
    use chain_eth::transaction::{FeeParams, UnsignedTransaction};
    use chain_eth::units::{format_ether, parse_amount, parse_ether};
    use tracing::{debug, info, warn};
    use zeroize::Zeroize;

    use crate::address::encode_address;
    use crate::error::WalletError;
    use crate::hd_derivation::{key_from_private_key, parse_private_key_hex};
    use crate::metadata::ChainMetadataProvider;
    use crate::services::TransactionBuilder;
    use crate::types::{BuildTransactionRequest, Mode, Network, SignedTransactionRecord, TransactionType};

    /// Legacy (EIP-155) or EIP-1559 transfers on Ethereum and BNB Smart Chain
    #[derive(Debug, Clone, Copy)]
    pub struct EvmTransactionBuilder {
        network: Network,
    }

    impl EvmTransactionBuilder {
        pub fn new(network: Network) -> Result<Self, WalletError> {
            if !network.is_evm() {
                return Err(WalletError::UnsupportedNetwork(format!(
                    "{network} is not an EVM network"
                )));
            }
            Ok(Self { network })
        }

        fn chain(&self, mode: Mode) -> &'static EvmChain {
            match (self.network, mode) {
                (Network::Bnb, Mode::Mainnet) => &chains::BSC,
                (Network::Bnb, Mode::Testnet) => &chains::BSC_TESTNET,
                (_, Mode::Mainnet) => &chains::ETHEREUM,
                (_, Mode::Testnet) => &chains::SEPOLIA,
            }
        }

        /// Mixed-case input must carry a valid EIP-55 checksum.
        fn check_address(&self, address: &str) -> Result<(), WalletError> {
            if validate_address(address)? {
                Ok(())
            } else {
                Err(WalletError::InvalidAddress(format!(
                    "{}: bad EIP-55 checksum in {address}",
                    self.network
                )))
            }
        }

        fn token_type(&self) -> TransactionType {
            match self.network {
                Network::Bnb => TransactionType::Bep20,
                _ => TransactionType::Erc20,
            }
        }

        async fn resolve_nonce(
            &self,
            request: &BuildTransactionRequest,
            metadata: Option<&dyn ChainMetadataProvider>,
            sender: &str,
        ) -> Result<u64, WalletError> {
            if let Some(nonce) = request.nonce {
                return Ok(nonce);
            }
            match metadata {
                Some(provider) => {
                    let nonce = provider.get_nonce(self.network, sender, request.mode).await?;
                    debug!(network = %self.network, %sender, nonce, "fetched nonce");
                    Ok(nonce)
                }
                None => {
                    warn!(network = %self.network, %sender, "no nonce or metadata provider, using 0");
                    Ok(0)
                }
            }
        }

        async fn resolve_fees(
            &self,
            request: &BuildTransactionRequest,
            metadata: Option<&dyn ChainMetadataProvider>,
            chain: &EvmChain,
        ) -> Result<FeeParams, WalletError> {
            // A zero fee field counts as not supplied.
            if let (Some(max_fee_per_gas), Some(max_priority_fee_per_gas)) = (
                request.max_fee_per_gas.filter(|fee| *fee > 0),
                request.max_priority_fee_per_gas,
            )
            {
                if max_priority_fee_per_gas > max_fee_per_gas {
                    return Err(WalletError::InvalidAmount(
                        "max priority fee exceeds max fee per gas".into(),
                    ));
                }
                return Ok(FeeParams::Eip1559 {
                    max_fee_per_gas,
                    max_priority_fee_per_gas,
                });
            }
            if let Some(gas_price) = request.gas_price.filter(|price| *price > 0) {
                return Ok(FeeParams::Legacy { gas_price });
            }
            match metadata {
                Some(provider) => {
                    let fee_data = provider.get_fee_data(self.network, request.mode).await?;
                    debug!(network = %self.network, gas_price = fee_data.gas_price, "fetched fee data");
                    Ok(FeeParams::Legacy {
                        gas_price: fee_data.gas_price,
                    })
                }
                None => {
                    warn!(
                        network = %self.network,
                        gas_price = chain.default_gas_price,
                        "no gas price or metadata provider, using chain default"
                    );
                    Ok(FeeParams::Legacy {
                        gas_price: chain.default_gas_price,
                    })
                }
            }
        }
    }

    #[async_trait]
    impl TransactionBuilder for EvmTransactionBuilder {
        fn network(&self) -> Network {
            self.network
        }

        async fn build(
            &self,
            request: &BuildTransactionRequest,
            metadata: Option<&dyn ChainMetadataProvider>,
        ) -> Result<SignedTransactionRecord, WalletError> {
            request.validate()?;
            self.check_address(&request.receiver)?;
            if let Some(contract) = &request.contract_address {
                self.check_address(contract)?;
            }

            let mut raw_key = parse_private_key_hex(&request.private_key)?;
            let sender = key_from_private_key(&raw_key);
            raw_key.zeroize();
            let sender = sender?;
            let from = encode_address(self.network, request.mode, &sender)?;

            let chain = self.chain(request.mode);
            let requested_gas_limit = request.gas_limit.filter(|limit| *limit > 0);
            let nonce = self.resolve_nonce(request, metadata, &from).await?;
            let fees = self.resolve_fees(request, metadata, chain).await?;

            let (tx, to, tx_type) = match (&request.contract_address, request.contract_decimal) {
                (Some(contract), Some(decimals)) => {
                    let amount = parse_amount(&request.value, decimals)?;
                    let gas_limit = requested_gas_limit.unwrap_or(chain.token_gas_limit);
                    let tx = UnsignedTransaction::token_transfer(
                        chain.chain_id,
                        nonce,
                        contract,
                        &request.receiver,
                        amount,
                        fees,
                        gas_limit,
                    )?;
                    (tx, contract.clone(), self.token_type())
                }
                (Some(_), None) => return Err(WalletError::MissingField("contract_decimal")),
                (None, _) => {
                    let value = parse_ether(&request.value)?;
                    let gas_limit = requested_gas_limit.unwrap_or(NATIVE_TRANSFER_GAS);
                    let tx = UnsignedTransaction::transfer(
                        chain.chain_id,
                        nonce,
                        &request.receiver,
                        value,
                        fees,
                        gas_limit,
                    )?;
                    (tx, request.receiver.clone(), TransactionType::Native)
                }
            };

            let signed = tx.sign(&sender.private_key)?;
            let estimated_fee = format_ether(tx.max_fee())?;

            info!(
                network = %self.network,
                chain_id = chain.chain_id,
                %from,
                %to,
                nonce,
                tx_type = tx_type.as_str(),
                tx_hash = %signed.tx_hash,
                "signed transaction"
            );

            Ok(SignedTransactionRecord {
                network: self.network,
                from,
                to,
                value: request.value.clone(),
                raw_tx: signed.raw_tx_hex(),
                tx_hash: signed.tx_hash,
                gas_price: tx.gas_price_cap().to_string(),
                gas_limit: tx.gas_limit().to_string(),
                estimated_fee,
                nonce: nonce.to_string(),
                chain_id: tx.chain_id().to_string(),
                tx_type,
            })
        }
    }
}
