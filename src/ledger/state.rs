use std::collections::HashSet;

use alloy::primitives::{Address, TxHash};
use serde::Serialize;

use crate::error::{GatewayError, Result};

/// A single wave as materialized locally, in chain units mapped to
/// millisecond timestamps. Identity is the full (address, timestamp, message)
/// triple; `getAllWaves` carries no transaction hash to key on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct WaveRecord {
    pub address: Address,
    pub timestamp_ms: u64,
    pub message: String,
}

impl WaveRecord {
    pub fn from_chain(address: Address, timestamp_secs: u64, message: String) -> Self {
        Self {
            address,
            timestamp_ms: timestamp_secs.saturating_mul(1000),
            message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    Pending {
        #[serde(skip_serializing_if = "Option::is_none")]
        tx_hash: Option<TxHash>,
    },
    Confirmed,
    Failed {
        reason: String,
    },
}

/// Locally materialized view of the portal: the wave list, the aggregate
/// count and the submission state machine. Purely synchronous; callers
/// hold it behind a lock.
///
/// The list is reconciled by identity union, so the bulk fetch and the live
/// event feed commute: whichever delivers a wave first wins its position,
/// later deliveries of the same wave are no-ops.
#[derive(Debug, Default)]
pub struct WaveLedger {
    waves: Vec<WaveRecord>,
    seen: HashSet<WaveRecord>,
    count: u64,
    submission: SubmissionState,
}

impl WaveLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn waves(&self) -> &[WaveRecord] {
        &self.waves
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn submission(&self) -> &SubmissionState {
        &self.submission
    }

    pub fn is_submission_pending(&self) -> bool {
        matches!(self.submission, SubmissionState::Pending { .. })
    }

    /// The count is a read of external state: overwrite, never merge.
    pub fn set_count(&mut self, count: u64) {
        self.count = count;
    }

    /// Appends one live event in arrival order. Returns false if the wave
    /// was already delivered through the bulk fetch or an earlier event.
    pub fn observe(&mut self, record: WaveRecord) -> bool {
        if self.seen.contains(&record) {
            return false;
        }
        self.seen.insert(record.clone());
        self.waves.push(record);
        true
    }

    /// Folds a bulk-fetched batch into the list: existing entries keep their
    /// position, unseen entries are appended in fetch order. Returns the
    /// number of entries added.
    pub fn merge_fetched(&mut self, batch: Vec<WaveRecord>) -> usize {
        let mut added = 0;
        for record in batch {
            if self.observe(record) {
                added += 1;
            }
        }
        added
    }

    /// Starts a submission. At most one may be in flight; a second attempt
    /// is rejected here rather than relying on caller-side gating.
    pub fn begin_submission(&mut self) -> Result<()> {
        if self.is_submission_pending() {
            return Err(GatewayError::SubmissionInFlight);
        }
        self.submission = SubmissionState::Pending { tx_hash: None };
        Ok(())
    }

    /// Records the broadcast transaction hash while waiting for inclusion.
    pub fn note_broadcast(&mut self, tx_hash: TxHash) {
        if self.is_submission_pending() {
            self.submission = SubmissionState::Pending {
                tx_hash: Some(tx_hash),
            };
        }
    }

    pub fn confirm_submission(&mut self) {
        self.submission = SubmissionState::Confirmed;
    }

    pub fn fail_submission(&mut self, reason: String) {
        self.submission = SubmissionState::Failed { reason };
    }
}
