//! The vigil loop.
//!
//! Drives the endless poll over the watchlist: fetch each entity's recent
//! transfers, drop anything already seen, keep inbound records only,
//! classify, and alert when an amount meets its threshold. Strictly
//! sequential — one entity at a time, one record at a time — with a short
//! pause between entities and a longer one between cycles so the data
//! source is never hammered. Every observed hash is marked seen exactly
//! once whether or not it alerted.
//!
//! Cancellation is cooperative: the token is checked at every sleep and
//! loop boundary, and the loop returns cleanly rather than erroring.

use crate::assets::AssetRegistry;
use crate::classify::{classify, Classification, ThresholdConfig, TransferRecord};
use crate::config::PollConfig;
use crate::dedup::SeenSet;
use crate::etherscan::TransferSource;
use crate::notify::Notifier;
use crate::watchlist::WatchedEntity;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Pacing for the poll loop.
#[derive(Debug, Clone)]
pub struct PollTiming {
    /// Pause after each watched entity within a cycle.
    pub entity_delay: Duration,
    /// Pause after each full pass over the watchlist.
    pub cycle_delay: Duration,
}

impl PollTiming {
    pub fn from_config(config: &PollConfig) -> Self {
        Self {
            entity_delay: Duration::from_secs(config.entity_delay_secs),
            cycle_delay: Duration::from_secs(config.cycle_delay_secs),
        }
    }
}

pub struct VigilScheduler<S, N> {
    source: S,
    notifier: N,
    watchlist: Vec<WatchedEntity>,
    registry: AssetRegistry,
    thresholds: ThresholdConfig,
    timing: PollTiming,
    /// Base URL for the transaction link in alert bodies.
    tx_url: String,
    seen: SeenSet,
    cycles: u64,
}

impl<S: TransferSource, N: Notifier> VigilScheduler<S, N> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source: S,
        notifier: N,
        watchlist: Vec<WatchedEntity>,
        registry: AssetRegistry,
        thresholds: ThresholdConfig,
        timing: PollTiming,
        tx_url: String,
    ) -> Self {
        Self {
            source,
            notifier,
            watchlist,
            registry,
            thresholds,
            timing,
            tx_url,
            seen: SeenSet::new(),
            cycles: 0,
        }
    }

    /// Run until the token is cancelled, then return cleanly.
    pub async fn run(mut self, cancel: CancellationToken) {
        info!(
            entities = self.watchlist.len(),
            eth_omen = %self.thresholds.eth_omen,
            stable_omen = %self.thresholds.stable_omen,
            "vigil starting"
        );

        loop {
            if cancel.is_cancelled() {
                break;
            }
            self.run_cycle(&cancel).await;
            if cancel.is_cancelled() {
                break;
            }
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.timing.cycle_delay) => {}
            }
        }

        info!(cycles = self.cycles, "vigil stopped");
    }

    /// One full pass over the watchlist, followed by the (at most one)
    /// dedup eviction for this cycle.
    async fn run_cycle(&mut self, cancel: &CancellationToken) {
        self.cycles += 1;
        let mut alerts = 0usize;

        for i in 0..self.watchlist.len() {
            if cancel.is_cancelled() {
                return;
            }
            let entity = self.watchlist[i].clone();

            match self.source.fetch_transfers(&entity.address).await {
                Ok(records) => {
                    alerts += self.process_records(&entity, records).await;
                }
                // Per-address failures are recoverable: the next cycle's
                // delay doubles as the retry interval.
                Err(e) => warn!(
                    entity = %entity.name,
                    address = %entity.address,
                    error = %e,
                    "transfer fetch failed, moving on"
                ),
            }

            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(self.timing.entity_delay) => {}
            }
        }

        self.seen.maybe_evict();
        debug!(
            cycle = self.cycles,
            alerts = alerts,
            seen = self.seen.len(),
            "cycle complete"
        );
    }

    /// Dedup, filter, classify, and alert on one entity's record list.
    /// Returns the number of alerts raised.
    async fn process_records(
        &mut self,
        entity: &WatchedEntity,
        records: Vec<TransferRecord>,
    ) -> usize {
        let mut alerts = 0usize;

        for record in records {
            if self.seen.seen(&record.hash) {
                continue;
            }

            // Outbound transfers never alert, but their hashes are
            // remembered so they are not re-examined next cycle.
            if !record.to.eq_ignore_ascii_case(&entity.address) {
                self.seen.mark_seen(&record.hash);
                continue;
            }

            let classification = classify(&record, &self.registry);
            self.seen.mark_seen(&record.hash);

            let Classification::Eligible(transfer) = classification else {
                continue;
            };
            let Some(threshold) = transfer.category.threshold(&self.thresholds) else {
                continue;
            };

            if transfer.amount >= threshold {
                info!(
                    entity = %entity.name,
                    address = %short_address(&entity.address),
                    amount = %format!("{:.2}", transfer.amount),
                    symbol = %transfer.symbol,
                    tx = %transfer.hash,
                    "large inbound transfer"
                );

                let title = format!("Large transfer to {}", entity.name);
                let body = format!(
                    "{:.2} {} received\n{}/{}",
                    transfer.amount, transfer.symbol, self.tx_url, transfer.hash
                );
                if let Err(e) = self.notifier.notify(&title, &body).await {
                    warn!(error = %e, tx = %transfer.hash, "alert delivery failed");
                }
                alerts += 1;
            }
        }

        alerts
    }
}

/// `0x1234…abcd` rendering for log lines.
fn short_address(address: &str) -> String {
    if address.len() > 10 {
        format!("{}…{}", &address[..6], &address[address.len() - 4..])
    } else {
        address.to_string()
    }
}
