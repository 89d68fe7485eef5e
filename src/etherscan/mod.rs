//! Etherscan transfer history client.
//!
//! Fetches the recent token-transfer (`tokentx`) and native-transaction
//! (`txlist`) histories for an address and merges them into one record
//! list, most recent first. Each query is bounded to a small recent
//! window; the scheduler's dedup logic is ordering-independent, so the
//! merge order carries no meaning.
//!
//! Etherscan wraps every response in a `{status, message, result}`
//! envelope where `result` is usually an array but degrades to a bare
//! string on errors ("Max rate limit reached") — both shapes are handled
//! here and surfaced as a typed `SourceError` rather than a panic.

use crate::classify::{TransferKind, TransferRecord};
use crate::config::EtherscanConfig;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("etherscan api error: {0}")]
    Api(String),
    #[error("malformed response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The data source the scheduler polls. Seam for tests and for swapping
/// in a different explorer backend.
#[async_trait]
pub trait TransferSource {
    /// All recent transfers touching `address`, token and native combined.
    async fn fetch_transfers(&self, address: &str) -> Result<Vec<TransferRecord>, SourceError>;
}

/// Raw row shape shared by `tokentx` and `txlist` responses. Native rows
/// simply lack `tokenSymbol` (and carry an empty `contractAddress`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTransfer {
    #[serde(default)]
    hash: String,
    #[serde(default)]
    from: String,
    #[serde(default)]
    to: String,
    #[serde(default)]
    value: String,
    #[serde(default)]
    contract_address: Option<String>,
    #[serde(default)]
    token_symbol: Option<String>,
}

impl RawTransfer {
    /// Decide native vs. token once, at ingestion. Rows without a usable
    /// hash are discarded.
    fn into_record(self) -> Option<TransferRecord> {
        if self.hash.is_empty() {
            return None;
        }
        let kind = match self.token_symbol.as_deref() {
            Some(symbol) if !symbol.is_empty() => TransferKind::Token {
                contract: self.contract_address.unwrap_or_default().to_lowercase(),
            },
            _ => TransferKind::Native,
        };
        Some(TransferRecord {
            hash: self.hash,
            from: self.from,
            to: self.to,
            value: self.value,
            kind,
        })
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
    result: serde_json::Value,
}

/// Parse one Etherscan envelope into transfer records.
///
/// Individual malformed rows are skipped (logged at debug), not fatal:
/// one bad row must not discard the rest of the window.
fn parse_envelope(body: &str) -> Result<Vec<TransferRecord>, SourceError> {
    let envelope: Envelope = serde_json::from_str(body)?;

    match envelope.result {
        serde_json::Value::Array(rows) => {
            let mut records = Vec::with_capacity(rows.len());
            for row in rows {
                match serde_json::from_value::<RawTransfer>(row) {
                    Ok(raw) => {
                        if let Some(record) = raw.into_record() {
                            records.push(record);
                        }
                    }
                    Err(e) => debug!(error = %e, "skipping malformed transfer row"),
                }
            }
            Ok(records)
        }
        // Empty history is reported as status 0, not as an error.
        serde_json::Value::String(s) => {
            if envelope.status == "0" && envelope.message.contains("No transactions") {
                Ok(Vec::new())
            } else {
                Err(SourceError::Api(s))
            }
        }
        _ => Err(SourceError::Api(envelope.message)),
    }
}

pub struct EtherscanClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    page_size: u32,
}

impl EtherscanClient {
    pub fn new(config: &EtherscanConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("http client");
        Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            page_size: config.page_size,
        }
    }

    async fn query(&self, action: &str, address: &str) -> Result<Vec<TransferRecord>, SourceError> {
        let offset = self.page_size.to_string();
        let resp = self
            .client
            .get(&self.api_url)
            .query(&[
                ("module", "account"),
                ("action", action),
                ("address", address),
                ("page", "1"),
                ("offset", offset.as_str()),
                ("sort", "desc"),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::Api(format!("{status} - {body}")));
        }

        let body = resp.text().await?;
        let records = parse_envelope(&body)?;
        debug!(action = action, address = address, records = records.len(), "fetched transfers");
        Ok(records)
    }
}

#[async_trait]
impl TransferSource for EtherscanClient {
    async fn fetch_transfers(&self, address: &str) -> Result<Vec<TransferRecord>, SourceError> {
        let mut records = self.query("tokentx", address).await?;
        records.extend(self.query("txlist", address).await?);
        Ok(records)
    }
}
