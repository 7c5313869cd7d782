use alloy_primitives::U256;

use crate::abi::{encode_function_call, AbiParam};
use crate::address::address_to_bytes;
use crate::error::EthError;

/// Function selector for `transfer(address,uint256)`: `0xa9059cbb`.
pub const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

/// Encodes a token `transfer(address,uint256)` call. BEP-20 uses the same
/// selector and layout as ERC-20.
///
/// Returns the complete calldata (4-byte selector + 64 bytes of params).
pub fn encode_transfer(to: &str, amount: U256) -> Result<Vec<u8>, EthError> {
    let addr = address_to_bytes(to)?;
    let params = [AbiParam::Address(addr), AbiParam::Uint256(amount)];
    Ok(encode_function_call(TRANSFER_SELECTOR, &params))
}
