use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WalletError;

/// Supported blockchain networks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Ethereum,
    Bnb,
    Bitcoin,
    Tron,
}

impl Network {
    pub const ALL: [Network; 4] = [
        Network::Ethereum,
        Network::Bnb,
        Network::Bitcoin,
        Network::Tron,
    ];

    /// Wire name (`"ethereum"`, `"bnb"`, `"bitcoin"`, `"tron"`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Ethereum => "ethereum",
            Network::Bnb => "bnb",
            Network::Bitcoin => "bitcoin",
            Network::Tron => "tron",
        }
    }

    /// BIP-44 coin type for this network in the given mode
    pub fn coin_type(&self, mode: Mode) -> u32 {
        match (self, mode) {
            (Network::Ethereum | Network::Bnb, _) => 60,
            (Network::Bitcoin, Mode::Mainnet) => 0,
            (Network::Bitcoin, Mode::Testnet) => 1,
            (Network::Tron, _) => 195,
        }
    }

    /// Whether transactions are signed with the EVM builder
    pub fn is_evm(&self) -> bool {
        matches!(self, Network::Ethereum | Network::Bnb)
    }

    /// Cargo feature that compiles in this network's chain crate
    pub fn feature(&self) -> &'static str {
        match self {
            Network::Ethereum | Network::Bnb => "evm",
            Network::Bitcoin => "bitcoin",
            Network::Tron => "tron",
        }
    }

    /// Whether this build carries the chain crate for the network
    pub fn is_available(&self) -> bool {
        match self {
            Network::Ethereum | Network::Bnb => cfg!(feature = "evm"),
            Network::Bitcoin => cfg!(feature = "bitcoin"),
            Network::Tron => cfg!(feature = "tron"),
        }
    }

    /// Fails with `DependencyUnavailable` when the network is compiled out
    pub fn ensure_available(&self) -> Result<(), WalletError> {
        if self.is_available() {
            Ok(())
        } else {
            Err(WalletError::DependencyUnavailable {
                network: *self,
                feature: self.feature(),
            })
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ethereum" => Ok(Network::Ethereum),
            "bnb" => Ok(Network::Bnb),
            "bitcoin" => Ok(Network::Bitcoin),
            "tron" => Ok(Network::Tron),
            _ => Err(WalletError::UnsupportedNetwork(s.to_string())),
        }
    }
}

/// Mainnet or the network's public testnet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Mainnet,
    Testnet,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Mainnet => "mainnet",
            Mode::Testnet => "testnet",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a freshly created wallet obtains its key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyOrigin {
    /// BIP-39 mnemonic first, key derived at the network's BIP-44 path.
    /// The returned mnemonic recovers the returned key.
    #[default]
    Mnemonic,
    /// Key hashed directly from entropy, with a word rendering of the same
    /// entropy. The words are not a BIP-39 phrase and do not recover the key.
    Entropy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWalletOptions {
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub key_origin: KeyOrigin,
}

impl CreateWalletOptions {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            key_origin: KeyOrigin::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryOptions {
    #[serde(default)]
    pub mode: Mode,
    /// Optional BIP-39 passphrase ("25th word")
    #[serde(default)]
    pub passphrase: String,
    #[serde(default)]
    pub account: u32,
    #[serde(default)]
    pub index: u32,
}

impl RecoveryOptions {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }
}

/// Freshly created wallet
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletRecord {
    pub network: Network,
    pub address: String,
    /// Hex, no `0x` prefix
    pub private_key: String,
    pub mnemonic: String,
}

/// Key material recovered from a mnemonic
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryRecord {
    pub network: Network,
    pub address: String,
    /// Compressed SEC1 public key, hex
    pub public_key: String,
    /// Hex, no `0x` prefix
    pub private_key: String,
    pub path: String,
}

// Records carry secrets, so Debug only shows the public parts.
impl fmt::Debug for WalletRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletRecord")
            .field("network", &self.network)
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for RecoveryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecoveryRecord")
            .field("network", &self.network)
            .field("address", &self.address)
            .field("public_key", &self.public_key)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Native,
    Erc20,
    Bep20,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Native => "native",
            TransactionType::Erc20 => "erc20",
            TransactionType::Bep20 => "bep20",
        }
    }
}

/// Input to a transaction builder.
///
/// `value` is a decimal string in whole native units (ether, BNB) or, when
/// a contract is given, in whole token units scaled by `contract_decimal`.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildTransactionRequest {
    /// Hex, with or without `0x`
    pub private_key: String,
    pub receiver: String,
    pub value: String,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub contract_address: Option<String>,
    #[serde(default)]
    pub contract_decimal: Option<u8>,
    #[serde(default)]
    pub nonce: Option<u64>,
    /// Wei
    #[serde(default)]
    pub gas_price: Option<u128>,
    #[serde(default)]
    pub gas_limit: Option<u64>,
    /// Wei; together with `max_priority_fee_per_gas` selects an EIP-1559 envelope
    #[serde(default)]
    pub max_fee_per_gas: Option<u128>,
    #[serde(default)]
    pub max_priority_fee_per_gas: Option<u128>,
}

impl BuildTransactionRequest {
    pub fn new(
        private_key: impl Into<String>,
        receiver: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            private_key: private_key.into(),
            receiver: receiver.into(),
            value: value.into(),
            ..Self::default()
        }
    }

    /// Checks required fields, in order, before any crypto or network work.
    pub fn validate(&self) -> Result<(), WalletError> {
        if self.private_key.trim().is_empty() {
            return Err(WalletError::MissingField("private_key"));
        }
        if self.receiver.trim().is_empty() {
            return Err(WalletError::MissingField("receiver"));
        }
        if self.value.trim().is_empty() {
            return Err(WalletError::MissingField("value"));
        }
        match (&self.contract_address, self.contract_decimal) {
            (Some(contract), _) if contract.trim().is_empty() => {
                Err(WalletError::MissingField("contract_address"))
            }
            (Some(_), None) => Err(WalletError::MissingField("contract_decimal")),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for BuildTransactionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildTransactionRequest")
            .field("private_key", &"[REDACTED]")
            .field("receiver", &self.receiver)
            .field("value", &self.value)
            .field("mode", &self.mode)
            .field("contract_address", &self.contract_address)
            .field("contract_decimal", &self.contract_decimal)
            .field("nonce", &self.nonce)
            .field("gas_price", &self.gas_price)
            .field("gas_limit", &self.gas_limit)
            .finish_non_exhaustive()
    }
}

/// A signed transaction and the values it was built from.
///
/// Integer fields are decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedTransactionRecord {
    pub network: Network,
    pub from: String,
    pub to: String,
    /// Echo of the requested amount
    pub value: String,
    /// 0x-prefixed hex
    pub raw_tx: String,
    pub tx_hash: String,
    /// Wei; the max fee per gas for EIP-1559 envelopes
    pub gas_price: String,
    pub gas_limit: String,
    /// `gas_price * gas_limit` in whole native units
    pub estimated_fee: String,
    pub nonce: String,
    pub chain_id: String,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_parses_case_insensitively() {
        assert_eq!("ethereum".parse::<Network>().unwrap(), Network::Ethereum);
        assert_eq!("BNB".parse::<Network>().unwrap(), Network::Bnb);
        assert_eq!(" Tron ".parse::<Network>().unwrap(), Network::Tron);
    }

    #[test]
    fn unknown_network_is_unsupported() {
        let err = "solana".parse::<Network>().unwrap_err();
        assert!(matches!(err, WalletError::UnsupportedNetwork(ref n) if n == "solana"));
    }

    #[test]
    fn network_name_roundtrips_through_display() {
        for network in Network::ALL {
            assert_eq!(network.to_string().parse::<Network>().unwrap(), network);
        }
    }

    #[test]
    fn coin_types() {
        assert_eq!(Network::Ethereum.coin_type(Mode::Mainnet), 60);
        assert_eq!(Network::Bnb.coin_type(Mode::Testnet), 60);
        assert_eq!(Network::Bitcoin.coin_type(Mode::Mainnet), 0);
        assert_eq!(Network::Bitcoin.coin_type(Mode::Testnet), 1);
        assert_eq!(Network::Tron.coin_type(Mode::Testnet), 195);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Network::Bnb).unwrap(), "\"bnb\"");
        assert_eq!(serde_json::to_string(&Mode::Testnet).unwrap(), "\"testnet\"");
        assert_eq!(serde_json::to_string(&TransactionType::Bep20).unwrap(), "\"bep20\"");
    }

    #[test]
    fn request_validation_names_first_missing_field() {
        let mut req = BuildTransactionRequest::new("", "0xabc", "1");
        assert!(matches!(req.validate(), Err(WalletError::MissingField("private_key"))));

        req.private_key = "01".into();
        req.receiver = "  ".into();
        assert!(matches!(req.validate(), Err(WalletError::MissingField("receiver"))));

        req.receiver = "0xabc".into();
        req.value = String::new();
        assert!(matches!(req.validate(), Err(WalletError::MissingField("value"))));

        req.value = "1".into();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn contract_without_decimals_is_missing_field() {
        let mut req = BuildTransactionRequest::new("01", "0xabc", "1");
        req.contract_address = Some("0xdef".into());
        assert!(matches!(
            req.validate(),
            Err(WalletError::MissingField("contract_decimal"))
        ));

        req.contract_decimal = Some(6);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn request_deserializes_from_camel_case() {
        let json = r#"{
            "privateKey": "0x01",
            "receiver": "0xabc",
            "value": "0.5",
            "mode": "testnet",
            "contractAddress": "0xdef",
            "contractDecimal": 6,
            "gasPrice": 1000
        }"#;
        let req: BuildTransactionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.mode, Mode::Testnet);
        assert_eq!(req.contract_decimal, Some(6));
        assert_eq!(req.gas_price, Some(1000));
        assert_eq!(req.nonce, None);
    }

    #[test]
    fn debug_output_hides_secrets() {
        let req = BuildTransactionRequest::new("deadbeef", "0xabc", "1");
        assert!(!format!("{req:?}").contains("deadbeef"));

        let record = WalletRecord {
            network: Network::Ethereum,
            address: "0xabc".into(),
            private_key: "deadbeef".into(),
            mnemonic: "secret words".into(),
        };
        let debug = format!("{record:?}");
        assert!(!debug.contains("deadbeef"));
        assert!(!debug.contains("secret words"));
    }
}
