//! Transfer normalization and threshold classification.
//!
//! Raw records arrive in two shapes — native-currency transactions and
//! ERC-20 token transfers — and are reduced here to a single
//! `NormalizedTransfer` carrying an exact decimal amount, a symbol, and
//! the threshold category that decides which omen applies. Amount
//! arithmetic is exact (integer base units scaled by 10^decimals via
//! `rust_decimal`), so boundary comparisons never suffer float error.

use crate::assets::{AssetRegistry, NATIVE_SYMBOL, WRAPPED_NATIVE_SYMBOL};
use crate::config::ThresholdSettings;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Decimal precision of the native currency (wei per ETH).
const NATIVE_DECIMALS: u32 = 18;

/// A transfer record as consumed by the core, with the native/token
/// distinction decided once at ingestion.
#[derive(Debug, Clone)]
pub struct TransferRecord {
    pub hash: String,
    pub from: String,
    pub to: String,
    /// Integer amount in base units, as the data source reports it.
    pub value: String,
    pub kind: TransferKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferKind {
    Native,
    Token { contract: String },
}

/// Which configured threshold a transfer is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdCategory {
    /// Native currency and its wrapped form — compared to `eth_omen`.
    EthLike,
    /// Registered stablecoins — compared to `stable_omen`.
    StableLike,
    /// No applicable threshold; never notifies.
    Unknown,
}

/// Alert thresholds held as exact decimals.
#[derive(Debug, Clone)]
pub struct ThresholdConfig {
    pub eth_omen: Decimal,
    pub stable_omen: Decimal,
}

impl ThresholdConfig {
    pub fn from_settings(settings: &ThresholdSettings) -> Result<Self, rust_decimal::Error> {
        Ok(Self {
            eth_omen: Decimal::try_from(settings.eth_omen)?,
            stable_omen: Decimal::try_from(settings.stable_omen)?,
        })
    }
}

impl ThresholdCategory {
    /// The threshold this category is measured against, if any.
    pub fn threshold(&self, config: &ThresholdConfig) -> Option<Decimal> {
        match self {
            ThresholdCategory::EthLike => Some(config.eth_omen),
            ThresholdCategory::StableLike => Some(config.stable_omen),
            ThresholdCategory::Unknown => None,
        }
    }
}

/// A transfer reduced to the uniform model the scheduler evaluates.
#[derive(Debug, Clone)]
pub struct NormalizedTransfer {
    pub hash: String,
    pub amount: Decimal,
    pub symbol: String,
    pub category: ThresholdCategory,
}

/// Outcome of classifying one record.
#[derive(Debug, Clone)]
pub enum Classification {
    Eligible(NormalizedTransfer),
    /// Unrecognized token contract or malformed amount. Not an error —
    /// the caller must still mark the hash seen so the record is not
    /// reclassified every cycle.
    Rejected,
}

/// Classify a raw record against the asset registry.
///
/// Native transfers always classify as `EthLike`. Token transfers
/// classify by registry lookup: the wrapped-native symbol is `EthLike`,
/// every other registered token is `StableLike`, and unknown contracts
/// are `Rejected`.
pub fn classify(record: &TransferRecord, registry: &AssetRegistry) -> Classification {
    let (amount, symbol, category) = match &record.kind {
        TransferKind::Native => {
            let Some(amount) = base_units_to_amount(&record.value, NATIVE_DECIMALS) else {
                return Classification::Rejected;
            };
            (amount, NATIVE_SYMBOL.to_string(), ThresholdCategory::EthLike)
        }
        TransferKind::Token { contract } => {
            let Some(asset) = registry.get(contract) else {
                return Classification::Rejected;
            };
            let Some(amount) = base_units_to_amount(&record.value, asset.decimals) else {
                return Classification::Rejected;
            };
            let category = if asset.symbol == WRAPPED_NATIVE_SYMBOL {
                ThresholdCategory::EthLike
            } else {
                ThresholdCategory::StableLike
            };
            (amount, asset.symbol.clone(), category)
        }
    };

    Classification::Eligible(NormalizedTransfer {
        hash: record.hash.clone(),
        amount,
        symbol,
        category,
    })
}

/// Exact conversion of an integer base-unit string into a decimal amount.
///
/// Returns None for non-integer input or values past Decimal's 96-bit
/// mantissa; such records are rejected rather than approximated.
fn base_units_to_amount(value: &str, decimals: u32) -> Option<Decimal> {
    let mut amount = Decimal::from_str(value).ok()?;
    if amount.scale() != 0 {
        return None;
    }
    amount.set_scale(decimals).ok()?;
    Some(amount.normalize())
}
