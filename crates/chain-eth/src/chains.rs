/// One gwei in wei.
pub const GWEI: u128 = 1_000_000_000;

/// Gas limit for a plain value transfer.
pub const NATIVE_TRANSFER_GAS: u64 = 21_000;

/// Signing parameters of an EVM network the builder can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvmChain {
    pub chain_id: u64,
    /// Gas price used when neither the caller nor a metadata provider
    /// supplies one.
    pub default_gas_price: u128,
    /// Default gas limit for a token `transfer` call.
    pub token_gas_limit: u64,
}

/// Ethereum Mainnet (chain ID 1).
pub const ETHEREUM: EvmChain = EvmChain {
    chain_id: 1,
    default_gas_price: 20 * GWEI,
    token_gas_limit: 100_000,
};

/// Sepolia Testnet (chain ID 11155111).
pub const SEPOLIA: EvmChain = EvmChain {
    chain_id: 11_155_111,
    default_gas_price: 20 * GWEI,
    token_gas_limit: 100_000,
};

/// BNB Smart Chain (chain ID 56).
pub const BSC: EvmChain = EvmChain {
    chain_id: 56,
    default_gas_price: 5 * GWEI,
    token_gas_limit: 60_000,
};

/// BNB Smart Chain Testnet (chain ID 97).
pub const BSC_TESTNET: EvmChain = EvmChain {
    chain_id: 97,
    default_gas_price: 5 * GWEI,
    token_gas_limit: 60_000,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_ids() {
        assert_eq!(ETHEREUM.chain_id, 1);
        assert_eq!(SEPOLIA.chain_id, 11_155_111);
        assert_eq!(BSC.chain_id, 56);
        assert_eq!(BSC_TESTNET.chain_id, 97);
    }

    #[test]
    fn testnets_share_mainnet_defaults() {
        for (main, test) in [(ETHEREUM, SEPOLIA), (BSC, BSC_TESTNET)] {
            assert_eq!(main.default_gas_price, test.default_gas_price);
            assert_eq!(main.token_gas_limit, test.token_gas_limit);
        }
    }

    #[test]
    fn default_fees() {
        assert_eq!(ETHEREUM.default_gas_price, 20_000_000_000);
        assert_eq!(ETHEREUM.token_gas_limit, 100_000);
        assert_eq!(BSC.default_gas_price, 5_000_000_000);
        assert_eq!(BSC.token_gas_limit, 60_000);
        assert!(ETHEREUM.token_gas_limit > NATIVE_TRANSFER_GAS);
        assert!(BSC.token_gas_limit > NATIVE_TRANSFER_GAS);
    }
}
