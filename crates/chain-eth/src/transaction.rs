use alloy_primitives::U256;
use alloy_rlp::{Encodable, RlpEncodable};
use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{RecoveryId, Signature, SigningKey};
use sha3::{Digest, Keccak256};
use zeroize::Zeroize;

use crate::address::address_to_bytes;
use crate::erc20;
use crate::error::EthError;

/// An unsigned legacy transaction, signed with EIP-155 replay protection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTransaction {
    pub chain_id: u64,
    pub nonce: u64,
    pub gas_price: u128,
    pub gas_limit: u64,
    /// Recipient address as a 0x-prefixed hex string.
    pub to: String,
    /// Transfer value in wei.
    pub value: U256,
    /// Calldata (empty for native transfers).
    pub data: Vec<u8>,
}

/// An unsigned EIP-1559 (type 2) transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthTransaction {
    pub chain_id: u64,
    pub nonce: u64,
    pub max_priority_fee_per_gas: u128,
    pub max_fee_per_gas: u128,
    pub gas_limit: u64,
    /// Recipient address as a 0x-prefixed hex string.
    pub to: String,
    /// Transfer value in wei.
    pub value: U256,
    /// Calldata (empty for native transfers).
    pub data: Vec<u8>,
}

/// Fee fields of a transaction, selecting its envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeParams {
    Legacy {
        gas_price: u128,
    },
    Eip1559 {
        max_fee_per_gas: u128,
        max_priority_fee_per_gas: u128,
    },
}

/// Either envelope, ready for signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsignedTransaction {
    Legacy(LegacyTransaction),
    Eip1559(EthTransaction),
}

/// A signed transaction ready for broadcast.
pub struct SignedEthTransaction {
    /// Serialized signed transaction (type prefix included for EIP-1559).
    pub raw_tx: Vec<u8>,
    /// Transaction hash as a 0x-prefixed hex string.
    pub tx_hash: String,
}

impl SignedEthTransaction {
    /// The raw transaction as 0x-prefixed hex, the form RPC nodes accept.
    pub fn raw_tx_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.raw_tx))
    }
}

impl UnsignedTransaction {
    /// Assembles a native-currency transfer.
    pub fn transfer(
        chain_id: u64,
        nonce: u64,
        to: &str,
        value_wei: U256,
        fees: FeeParams,
        gas_limit: u64,
    ) -> Result<Self, EthError> {
        address_to_bytes(to)?;
        Ok(Self::assemble(chain_id, nonce, to, value_wei, Vec::new(), fees, gas_limit))
    }

    /// Assembles a token `transfer(recipient, amount)` call against
    /// `token_contract`. The transaction carries no native value.
    pub fn token_transfer(
        chain_id: u64,
        nonce: u64,
        token_contract: &str,
        recipient: &str,
        amount: U256,
        fees: FeeParams,
        gas_limit: u64,
    ) -> Result<Self, EthError> {
        address_to_bytes(token_contract)?;
        let calldata = erc20::encode_transfer(recipient, amount)?;
        Ok(Self::assemble(chain_id, nonce, token_contract, U256::ZERO, calldata, fees, gas_limit))
    }

    fn assemble(
        chain_id: u64,
        nonce: u64,
        to: &str,
        value: U256,
        data: Vec<u8>,
        fees: FeeParams,
        gas_limit: u64,
    ) -> Self {
        match fees {
            FeeParams::Legacy { gas_price } => Self::Legacy(LegacyTransaction {
                chain_id,
                nonce,
                gas_price,
                gas_limit,
                to: to.to_string(),
                value,
                data,
            }),
            FeeParams::Eip1559 {
                max_fee_per_gas,
                max_priority_fee_per_gas,
            } => Self::Eip1559(EthTransaction {
                chain_id,
                nonce,
                max_priority_fee_per_gas,
                max_fee_per_gas,
                gas_limit,
                to: to.to_string(),
                value,
                data,
            }),
        }
    }

    pub fn chain_id(&self) -> u64 {
        match self {
            Self::Legacy(tx) => tx.chain_id,
            Self::Eip1559(tx) => tx.chain_id,
        }
    }

    pub fn gas_limit(&self) -> u64 {
        match self {
            Self::Legacy(tx) => tx.gas_limit,
            Self::Eip1559(tx) => tx.gas_limit,
        }
    }

    /// Highest price per gas the sender can be charged.
    pub fn gas_price_cap(&self) -> u128 {
        match self {
            Self::Legacy(tx) => tx.gas_price,
            Self::Eip1559(tx) => tx.max_fee_per_gas,
        }
    }

    /// `gas_price_cap * gas_limit`, in wei.
    pub fn max_fee(&self) -> U256 {
        U256::from(self.gas_price_cap()) * U256::from(self.gas_limit())
    }

    pub fn sign(&self, private_key: &[u8; 32]) -> Result<SignedEthTransaction, EthError> {
        match self {
            Self::Legacy(tx) => sign_legacy_transaction(tx, private_key),
            Self::Eip1559(tx) => sign_transaction(tx, private_key),
        }
    }
}

/// Keccak-256 of the EIP-155 signing payload
/// `rlp([nonce, gasPrice, gasLimit, to, value, data, chainId, 0, 0])`.
pub fn legacy_signing_hash(tx: &LegacyTransaction) -> Result<[u8; 32], EthError> {
    let unsigned_rlp = encode_unsigned_legacy_tx(tx)?;
    Ok(Keccak256::digest(&unsigned_rlp).into())
}

/// RLP of the EIP-155 signing payload.
pub fn encode_unsigned_legacy_tx(tx: &LegacyTransaction) -> Result<Vec<u8>, EthError> {
    let fields = UnsignedLegacyFields {
        nonce: tx.nonce,
        gas_price: tx.gas_price,
        gas_limit: tx.gas_limit,
        to: parse_to_bytes(&tx.to)?,
        value: RlpU256(tx.value.to_be_bytes::<32>()),
        data: RlpData(tx.data.clone()),
        chain_id: tx.chain_id,
        empty_r: 0,
        empty_s: 0,
    };

    let mut rlp_buf = Vec::new();
    fields.encode(&mut rlp_buf);
    Ok(rlp_buf)
}

/// Signs a legacy transaction with EIP-155 replay protection:
/// `v = chain_id * 2 + 35 + y_parity`.
pub fn sign_legacy_transaction(
    tx: &LegacyTransaction,
    private_key: &[u8; 32],
) -> Result<SignedEthTransaction, EthError> {
    let msg_hash = legacy_signing_hash(tx)?;
    let (r, s, y_parity) = sign_hash(&msg_hash, private_key)?;

    let v = tx
        .chain_id
        .checked_mul(2)
        .and_then(|v| v.checked_add(35 + u64::from(y_parity)))
        .ok_or(EthError::UnsupportedChain(tx.chain_id))?;

    let signed_fields = SignedLegacyFields {
        nonce: tx.nonce,
        gas_price: tx.gas_price,
        gas_limit: tx.gas_limit,
        to: parse_to_bytes(&tx.to)?,
        value: RlpU256(tx.value.to_be_bytes::<32>()),
        data: RlpData(tx.data.clone()),
        v,
        r: RlpU256(r),
        s: RlpU256(s),
    };

    let mut raw_tx = Vec::new();
    signed_fields.encode(&mut raw_tx);

    let tx_hash = format!("0x{}", hex::encode(Keccak256::digest(&raw_tx)));
    Ok(SignedEthTransaction { raw_tx, tx_hash })
}

/// Signs an EIP-1559 transaction with the given secp256k1 private key.
///
/// The signed form is `0x02 || rlp([...unsigned fields, y_parity, r, s])`.
pub fn sign_transaction(
    tx: &EthTransaction,
    private_key: &[u8; 32],
) -> Result<SignedEthTransaction, EthError> {
    let unsigned_payload = encode_unsigned_tx(tx)?;
    let msg_hash: [u8; 32] = Keccak256::digest(&unsigned_payload).into();
    let (r, s, y_parity) = sign_hash(&msg_hash, private_key)?;

    let signed_fields = SignedTxFields {
        chain_id: tx.chain_id,
        nonce: tx.nonce,
        max_priority_fee_per_gas: tx.max_priority_fee_per_gas,
        max_fee_per_gas: tx.max_fee_per_gas,
        gas_limit: tx.gas_limit,
        to: parse_to_bytes(&tx.to)?,
        value: RlpU256(tx.value.to_be_bytes::<32>()),
        data: RlpData(tx.data.clone()),
        access_list: Vec::new(),
        signature_y_parity: y_parity,
        signature_r: RlpU256(r),
        signature_s: RlpU256(s),
    };

    let mut rlp_buf = Vec::new();
    signed_fields.encode(&mut rlp_buf);

    let mut raw_tx = Vec::with_capacity(1 + rlp_buf.len());
    raw_tx.push(0x02);
    raw_tx.extend_from_slice(&rlp_buf);

    let tx_hash = format!("0x{}", hex::encode(Keccak256::digest(&raw_tx)));
    Ok(SignedEthTransaction { raw_tx, tx_hash })
}

/// Encodes the unsigned EIP-1559 transaction as `0x02 || rlp(fields)`.
///
/// The RLP-encoded fields are:
/// `[chain_id, nonce, max_priority_fee_per_gas, max_fee_per_gas, gas_limit, to,
///   value, data, access_list]`
pub fn encode_unsigned_tx(tx: &EthTransaction) -> Result<Vec<u8>, EthError> {
    let unsigned_fields = UnsignedTxFields {
        chain_id: tx.chain_id,
        nonce: tx.nonce,
        max_priority_fee_per_gas: tx.max_priority_fee_per_gas,
        max_fee_per_gas: tx.max_fee_per_gas,
        gas_limit: tx.gas_limit,
        to: parse_to_bytes(&tx.to)?,
        value: RlpU256(tx.value.to_be_bytes::<32>()),
        data: RlpData(tx.data.clone()),
        access_list: Vec::new(),
    };

    let mut rlp_buf = Vec::new();
    unsigned_fields.encode(&mut rlp_buf);

    let mut payload = Vec::with_capacity(1 + rlp_buf.len());
    payload.push(0x02);
    payload.extend_from_slice(&rlp_buf);

    Ok(payload)
}

/// Signs a 32-byte prehash, returning `(r, s, y_parity)`. The private key
/// copy is wiped before returning.
fn sign_hash(msg_hash: &[u8; 32], private_key: &[u8; 32]) -> Result<([u8; 32], [u8; 32], u8), EthError> {
    let mut key_bytes = *private_key;
    let signing_key = SigningKey::from_bytes((&key_bytes).into())
        .map_err(|e| EthError::InvalidPrivateKey(e.to_string()));
    key_bytes.zeroize();
    let signing_key = signing_key?;

    let (signature, recovery_id): (Signature, RecoveryId) = signing_key
        .sign_prehash(msg_hash)
        .map_err(|e| EthError::SigningError(e.to_string()))?;

    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&signature.r().to_bytes());
    s.copy_from_slice(&signature.s().to_bytes());

    Ok((r, s, recovery_id.is_y_odd() as u8))
}

// ---------------------------------------------------------------------------
// RLP-encodable structures
// ---------------------------------------------------------------------------

#[derive(RlpEncodable)]
struct UnsignedLegacyFields {
    nonce: u64,
    gas_price: u128,
    gas_limit: u64,
    to: RlpAddress,
    value: RlpU256,
    data: RlpData,
    chain_id: u64,
    empty_r: u8,
    empty_s: u8,
}

#[derive(RlpEncodable)]
struct SignedLegacyFields {
    nonce: u64,
    gas_price: u128,
    gas_limit: u64,
    to: RlpAddress,
    value: RlpU256,
    data: RlpData,
    v: u64,
    r: RlpU256,
    s: RlpU256,
}

#[derive(RlpEncodable)]
struct UnsignedTxFields {
    chain_id: u64,
    nonce: u64,
    max_priority_fee_per_gas: u128,
    max_fee_per_gas: u128,
    gas_limit: u64,
    to: RlpAddress,
    value: RlpU256,
    data: RlpData,
    access_list: Vec<AccessListItem>,
}

#[derive(RlpEncodable)]
struct SignedTxFields {
    chain_id: u64,
    nonce: u64,
    max_priority_fee_per_gas: u128,
    max_fee_per_gas: u128,
    gas_limit: u64,
    to: RlpAddress,
    value: RlpU256,
    data: RlpData,
    access_list: Vec<AccessListItem>,
    signature_y_parity: u8,
    signature_r: RlpU256,
    signature_s: RlpU256,
}

/// An EIP-2930 access list entry. Transactions built here always carry an
/// empty list.
#[derive(Debug, Clone, RlpEncodable)]
struct AccessListItem {
    address: RlpAddress,
    storage_keys: Vec<RlpFixedBytes<32>>,
}

/// 20-byte address encoded as an RLP string.
#[derive(Debug, Clone)]
struct RlpAddress([u8; 20]);

impl Encodable for RlpAddress {
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        self.0.as_slice().encode(out);
    }

    fn length(&self) -> usize {
        self.0.as_slice().length()
    }
}

/// 256-bit big-endian integer, leading zeros stripped (RLP integer form).
#[derive(Debug, Clone)]
struct RlpU256([u8; 32]);

impl RlpU256 {
    fn trimmed(&self) -> &[u8] {
        let start = self.0.iter().position(|&b| b != 0).unwrap_or(32);
        &self.0[start..]
    }
}

impl Encodable for RlpU256 {
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        self.trimmed().encode(out);
    }

    fn length(&self) -> usize {
        self.trimmed().length()
    }
}

/// Calldata encoded as a single RLP byte string.
#[derive(Debug, Clone)]
struct RlpData(Vec<u8>);

impl Encodable for RlpData {
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        self.0.as_slice().encode(out);
    }

    fn length(&self) -> usize {
        self.0.as_slice().length()
    }
}

#[derive(Debug, Clone)]
struct RlpFixedBytes<const N: usize>([u8; N]);

impl<const N: usize> Encodable for RlpFixedBytes<N> {
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        self.0.as_slice().encode(out);
    }

    fn length(&self) -> usize {
        self.0.as_slice().length()
    }
}

fn parse_to_bytes(address: &str) -> Result<RlpAddress, EthError> {
    address_to_bytes(address).map(RlpAddress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chains::GWEI;

    const ONE_ETHER: u128 = 1_000_000_000_000_000_000;

    /// Well-known test private key (DO NOT use on mainnet).
    const TEST_PRIVKEY: [u8; 32] = {
        let mut key = [0u8; 32];
        key[31] = 1;
        key
    };

    const TEST_ADDRESS: &str = "0x000000000000000000000000000000000000dEaD";

    const LEGACY_20_GWEI: FeeParams = FeeParams::Legacy {
        gas_price: 20 * GWEI,
    };

    const EIP1559_FEES: FeeParams = FeeParams::Eip1559 {
        max_fee_per_gas: 50 * GWEI,
        max_priority_fee_per_gas: GWEI,
    };

    /// The worked example from EIP-155.
    fn eip155_example() -> LegacyTransaction {
        LegacyTransaction {
            chain_id: 1,
            nonce: 9,
            gas_price: 20 * GWEI,
            gas_limit: 21_000,
            to: "0x3535353535353535353535353535353535353535".into(),
            value: U256::from(ONE_ETHER),
            data: Vec::new(),
        }
    }

    #[test]
    fn eip155_signing_payload_matches_reference() {
        let tx = eip155_example();
        assert_eq!(
            hex::encode(encode_unsigned_legacy_tx(&tx).unwrap()),
            "ec098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a764000080018080"
        );
        assert_eq!(
            hex::encode(legacy_signing_hash(&tx).unwrap()),
            "daf5a779ae972f972197303d7b574746c7ef83eadac0f2791ad23db92e4c8e53"
        );
    }

    #[test]
    fn eip155_signed_transaction_matches_reference() {
        let key = [0x46u8; 32];
        let signed = sign_legacy_transaction(&eip155_example(), &key).unwrap();

        assert_eq!(
            signed.raw_tx_hex(),
            "0xf86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83"
        );
        assert!(signed.tx_hash.starts_with("0x"));
        assert_eq!(signed.tx_hash.len(), 66);
    }

    #[test]
    fn transfer_assembles_legacy_envelope() {
        let tx = UnsignedTransaction::transfer(
            1,
            0,
            TEST_ADDRESS,
            U256::from(ONE_ETHER),
            LEGACY_20_GWEI,
            21_000,
        )
        .unwrap();

        let UnsignedTransaction::Legacy(inner) = &tx else {
            panic!("expected legacy envelope");
        };
        assert_eq!(inner.gas_price, 20 * GWEI);
        assert!(inner.data.is_empty());
        assert_eq!(tx.max_fee(), U256::from(420_000_000_000_000u128));
    }

    #[test]
    fn transfer_assembles_eip1559_envelope() {
        let tx = UnsignedTransaction::transfer(1, 0, TEST_ADDRESS, U256::ZERO, EIP1559_FEES, 21_000)
            .unwrap();

        assert!(matches!(tx, UnsignedTransaction::Eip1559(_)));
        assert_eq!(tx.gas_price_cap(), 50 * GWEI);

        let signed = tx.sign(&TEST_PRIVKEY).unwrap();
        assert_eq!(signed.raw_tx[0], 0x02);
    }

    #[test]
    fn transfer_invalid_address() {
        let result = UnsignedTransaction::transfer(1, 0, "bad-address", U256::ZERO, LEGACY_20_GWEI, 21_000);
        assert!(matches!(result, Err(EthError::InvalidAddress(_))));
    }

    #[test]
    fn token_transfer_targets_contract_with_zero_value() {
        let token = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
        let tx = UnsignedTransaction::token_transfer(
            1,
            5,
            token,
            TEST_ADDRESS,
            U256::from(100u64),
            LEGACY_20_GWEI,
            100_000,
        )
        .unwrap();

        let UnsignedTransaction::Legacy(inner) = tx else {
            panic!("expected legacy envelope");
        };
        assert_eq!(inner.to, token);
        assert_eq!(inner.value, U256::ZERO);
        assert_eq!(inner.data.len(), 68);
        assert_eq!(&inner.data[..4], &erc20::TRANSFER_SELECTOR);
    }

    #[test]
    fn token_transfer_rejects_bad_contract_or_recipient() {
        assert!(UnsignedTransaction::token_transfer(
            1, 0, "not-an-address", TEST_ADDRESS, U256::ZERO, LEGACY_20_GWEI, 100_000
        )
        .is_err());
        assert!(UnsignedTransaction::token_transfer(
            1, 0, TEST_ADDRESS, "bad", U256::ZERO, LEGACY_20_GWEI, 100_000
        )
        .is_err());
    }

    #[test]
    fn token_calldata_is_a_single_rlp_string() {
        let tx = UnsignedTransaction::token_transfer(
            56,
            0,
            TEST_ADDRESS,
            TEST_ADDRESS,
            U256::from(1u64),
            LEGACY_20_GWEI,
            60_000,
        )
        .unwrap();
        let UnsignedTransaction::Legacy(inner) = tx else {
            panic!("expected legacy envelope");
        };

        let encoded = encode_unsigned_legacy_tx(&inner).unwrap();
        // 68 bytes of calldata: string header 0xb8 0x44, then the selector.
        let calldata_header = [0xb8, 0x44, 0xa9, 0x05, 0x9c, 0xbb];
        assert!(encoded
            .windows(calldata_header.len())
            .any(|w| w == calldata_header));
    }

    #[test]
    fn legacy_v_depends_on_chain_id() {
        // Chain 56: v is 147 or 148, which RLP-encodes as 0x81 0x93 / 0x81 0x94.
        let mut tx = eip155_example();
        tx.chain_id = 56;
        let signed = sign_legacy_transaction(&tx, &TEST_PRIVKEY).unwrap();

        assert!(signed
            .raw_tx
            .windows(2)
            .any(|w| w == [0x81, 147] || w == [0x81, 148]));
    }

    #[test]
    fn encode_unsigned_tx_starts_with_type_byte() {
        let tx = EthTransaction {
            chain_id: 1,
            nonce: 0,
            max_priority_fee_per_gas: 0,
            max_fee_per_gas: 0,
            gas_limit: 21_000,
            to: TEST_ADDRESS.into(),
            value: U256::ZERO,
            data: Vec::new(),
        };
        let encoded = encode_unsigned_tx(&tx).unwrap();
        assert_eq!(encoded[0], 0x02);
        assert!(encoded.len() > 1);
    }

    #[test]
    fn signing_is_deterministic() {
        let tx = UnsignedTransaction::transfer(1, 0, TEST_ADDRESS, U256::ZERO, LEGACY_20_GWEI, 21_000)
            .unwrap();

        let signed1 = tx.sign(&TEST_PRIVKEY).unwrap();
        let signed2 = tx.sign(&TEST_PRIVKEY).unwrap();

        assert_eq!(signed1.raw_tx, signed2.raw_tx);
        assert_eq!(signed1.tx_hash, signed2.tx_hash);
    }

    #[test]
    fn different_nonces_and_chains_differ() {
        let base = UnsignedTransaction::transfer(1, 0, TEST_ADDRESS, U256::ZERO, LEGACY_20_GWEI, 21_000)
            .unwrap();
        let next = UnsignedTransaction::transfer(1, 1, TEST_ADDRESS, U256::ZERO, LEGACY_20_GWEI, 21_000)
            .unwrap();
        let bsc = UnsignedTransaction::transfer(56, 0, TEST_ADDRESS, U256::ZERO, LEGACY_20_GWEI, 21_000)
            .unwrap();

        let signed = base.sign(&TEST_PRIVKEY).unwrap();
        assert_ne!(signed.raw_tx, next.sign(&TEST_PRIVKEY).unwrap().raw_tx);
        assert_ne!(signed.raw_tx, bsc.sign(&TEST_PRIVKEY).unwrap().raw_tx);
    }

    #[test]
    fn invalid_private_key_is_rejected() {
        let tx = UnsignedTransaction::transfer(1, 0, TEST_ADDRESS, U256::ZERO, EIP1559_FEES, 21_000)
            .unwrap();
        assert!(matches!(
            tx.sign(&[0u8; 32]),
            Err(EthError::InvalidPrivateKey(_))
        ));
    }

    #[test]
    fn rlp_u256_zero_encodes_as_empty() {
        let mut buf = Vec::new();
        RlpU256([0u8; 32]).encode(&mut buf);
        assert_eq!(buf, vec![0x80]);
    }

    #[test]
    fn rlp_u256_small_value_encodes_as_single_byte() {
        let mut value = [0u8; 32];
        value[31] = 42;
        let mut buf = Vec::new();
        RlpU256(value).encode(&mut buf);
        assert_eq!(buf, vec![42]);
    }

    #[test]
    fn rlp_address_encodes_20_bytes() {
        let mut buf = Vec::new();
        RlpAddress([0xde; 20]).encode(&mut buf);
        assert_eq!(buf.len(), 21);
        assert_eq!(buf[0], 0x94);
        assert_eq!(&buf[1..], &[0xde; 20]);
    }
}
