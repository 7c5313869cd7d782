//! Chain metadata the transaction builders need from outside: the sender's
//! nonce and current fee data.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::WalletError;
use crate::types::{Mode, Network};

/// Current network fees, in wei
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeData {
    pub gas_price: u128,
    #[serde(default)]
    pub max_fee_per_gas: Option<u128>,
    #[serde(default)]
    pub max_priority_fee_per_gas: Option<u128>,
}

impl FeeData {
    pub fn legacy(gas_price: u128) -> Self {
        Self {
            gas_price,
            ..Self::default()
        }
    }
}

/// Source of nonce and fee data.
///
/// Each builder call awaits each method at most once. Retrying is up to the
/// implementation.
#[async_trait]
pub trait ChainMetadataProvider: Send + Sync {
    async fn get_nonce(&self, network: Network, address: &str, mode: Mode) -> Result<u64, WalletError>;

    async fn get_fee_data(&self, network: Network, mode: Mode) -> Result<FeeData, WalletError>;
}

/// Fixed answers, for offline callers and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StaticMetadata {
    pub nonce: u64,
    pub fee_data: FeeData,
}

impl StaticMetadata {
    pub fn new(nonce: u64, fee_data: FeeData) -> Self {
        Self { nonce, fee_data }
    }
}

#[async_trait]
impl ChainMetadataProvider for StaticMetadata {
    async fn get_nonce(&self, _network: Network, _address: &str, _mode: Mode) -> Result<u64, WalletError> {
        Ok(self.nonce)
    }

    async fn get_fee_data(&self, _network: Network, _mode: Mode) -> Result<FeeData, WalletError> {
        Ok(self.fee_data)
    }
}
