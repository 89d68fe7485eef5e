//! Static registry of the fungible tokens we watch for.
//!
//! Only transfers of recognized assets are threshold-eligible; everything
//! else coming through the token query is silently ignored. The table is
//! immutable for the process lifetime.

use std::collections::HashMap;

/// Symbol used for plain-value transfers of the chain's native currency.
pub const NATIVE_SYMBOL: &str = "ETH";

/// The wrapped form of the native currency. Transfers of this token are
/// measured against the native threshold, not the stable one.
pub const WRAPPED_NATIVE_SYMBOL: &str = "WETH";

/// A recognized fungible token: contract address, symbol, decimal precision.
#[derive(Debug, Clone)]
pub struct AssetDefinition {
    pub contract: String,
    pub symbol: String,
    pub decimals: u32,
}

/// Contract address → asset definition, keyed by lowercase address.
#[derive(Debug, Clone)]
pub struct AssetRegistry {
    assets: HashMap<String, AssetDefinition>,
}

impl AssetRegistry {
    /// The mainnet assets the watcher cares about: WETH, USDC, USDT.
    pub fn mainnet() -> Self {
        Self::from_definitions(vec![
            AssetDefinition {
                contract: "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2".to_string(),
                symbol: "WETH".to_string(),
                decimals: 18,
            },
            AssetDefinition {
                contract: "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48".to_string(),
                symbol: "USDC".to_string(),
                decimals: 6,
            },
            AssetDefinition {
                contract: "0xdac17f958d2ee523a2206206994597c13d831ec7".to_string(),
                symbol: "USDT".to_string(),
                decimals: 6,
            },
        ])
    }

    pub fn from_definitions(definitions: Vec<AssetDefinition>) -> Self {
        let assets = definitions
            .into_iter()
            .map(|mut def| {
                def.contract = def.contract.to_lowercase();
                (def.contract.clone(), def)
            })
            .collect();
        Self { assets }
    }

    /// Look up a token by contract address, case-insensitively.
    pub fn get(&self, contract: &str) -> Option<&AssetDefinition> {
        self.assets.get(&contract.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mainnet_table_has_the_three_assets() {
        let registry = AssetRegistry::mainnet();
        assert_eq!(registry.len(), 3);

        let usdc = registry
            .get("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48")
            .unwrap();
        assert_eq!(usdc.symbol, "USDC");
        assert_eq!(usdc.decimals, 6);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let registry = AssetRegistry::mainnet();
        let weth = registry
            .get("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2")
            .unwrap();
        assert_eq!(weth.symbol, WRAPPED_NATIVE_SYMBOL);
        assert_eq!(weth.decimals, 18);
    }

    #[test]
    fn unknown_contract_returns_none() {
        let registry = AssetRegistry::mainnet();
        assert!(registry.get("0x0000000000000000000000000000000000000001").is_none());
    }
}
