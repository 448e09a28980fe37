use std::sync::Arc;

use alloy::primitives::TxHash;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::portal::{PendingWave, WaveContract};

use super::state::WaveLedger;

pub type SharedLedger = Arc<RwLock<WaveLedger>>;

/// Async orchestration over the ledger state: the three input events of the
/// view (bulk fetch, count refresh, user submission). The live feed writes
/// through the same [`SharedLedger`] from the subscriber task.
#[derive(Clone)]
pub struct LedgerView<C> {
    contract: C,
    ledger: SharedLedger,
}

impl<C: WaveContract> LedgerView<C> {
    pub fn new(contract: C, ledger: SharedLedger) -> Self {
        Self { contract, ledger }
    }

    pub fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    /// Reads the aggregate count and overwrites the local value.
    pub async fn refresh_count(&self) -> Result<u64> {
        let count = self.contract.total_waves().await?;
        self.ledger.write().await.set_count(count);
        tracing::debug!(count, "wave count refreshed");
        Ok(count)
    }

    /// Reads the full history and folds it into the list by identity, so a
    /// fetch racing the live feed neither drops nor duplicates entries.
    /// Returns the total list length after the merge.
    pub async fn fetch_all(&self) -> Result<usize> {
        let batch = self.contract.all_waves().await?;
        let fetched = batch.len();
        let mut ledger = self.ledger.write().await;
        let added = ledger.merge_fetched(batch);
        tracing::debug!(fetched, added, "wave history merged");
        Ok(ledger.waves().len())
    }

    /// Submits one wave and waits for confirmation.
    ///
    /// Idle -> Pending on entry (a second submit while one is pending is
    /// rejected), then Confirmed plus a single count refresh on success, or
    /// Failed with the underlying cause re-raised on any fault between
    /// broadcast and confirmation. A confirmed wave always resolves with its
    /// hash even if the follow-up count read fails.
    pub async fn submit(&self, message: &str) -> Result<TxHash> {
        self.ledger.write().await.begin_submission()?;

        let tx_hash = match self.broadcast_and_wait(message).await {
            Ok(tx_hash) => tx_hash,
            Err(e) => {
                self.ledger.write().await.fail_submission(e.to_string());
                return Err(e);
            }
        };

        self.ledger.write().await.confirm_submission();
        tracing::info!(%tx_hash, "wave confirmed");
        // The wave is confirmed at this point; a failed follow-up read must
        // not turn the submission into a failure. The count stays stale
        // until the next refresh.
        if let Err(e) = self.refresh_count().await {
            tracing::warn!(%tx_hash, "count refresh after confirmation failed: {e}");
        }
        Ok(tx_hash)
    }

    async fn broadcast_and_wait(&self, message: &str) -> Result<TxHash> {
        let pending = self.contract.broadcast_wave(message).await?;
        let tx_hash = pending.tx_hash();
        self.ledger.write().await.note_broadcast(tx_hash);
        tracing::info!(%tx_hash, "wave broadcast, awaiting confirmation");
        pending.confirmed().await?;
        Ok(tx_hash)
    }
}
