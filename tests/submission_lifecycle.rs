//! Submission lifecycle and list reconciliation, driven against a mock
//! contract so no chain is needed.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{Address, TxHash, U256};
use tokio::sync::RwLock;

use waveportal_gateway::error::{GatewayError, Result};
use waveportal_gateway::ledger::{LedgerView, SubmissionState, WaveLedger, WaveRecord};
use waveportal_gateway::portal::{PendingWave, WaveContract};

const MOCK_TX: u8 = 0xab;

#[derive(Clone)]
struct MockPortal {
    count: Arc<AtomicU64>,
    count_reads: Arc<AtomicUsize>,
    history: Arc<Mutex<Vec<WaveRecord>>>,
    reject_broadcast: bool,
    revert_on_confirm: bool,
    fail_count_reads: bool,
    confirm_delay: Duration,
}

impl MockPortal {
    fn with_count(count: u64) -> Self {
        Self {
            count: Arc::new(AtomicU64::new(count)),
            count_reads: Arc::new(AtomicUsize::new(0)),
            history: Arc::new(Mutex::new(Vec::new())),
            reject_broadcast: false,
            revert_on_confirm: false,
            fail_count_reads: false,
            confirm_delay: Duration::ZERO,
        }
    }

    fn with_history(history: Vec<WaveRecord>) -> Self {
        let portal = Self::with_count(history.len() as u64);
        *portal.history.lock().unwrap() = history;
        portal
    }
}

struct MockPending {
    hash: TxHash,
    revert: bool,
    delay: Duration,
    count: Arc<AtomicU64>,
}

impl PendingWave for MockPending {
    fn tx_hash(&self) -> TxHash {
        self.hash
    }

    async fn confirmed(self) -> Result<()> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.revert {
            return Err(GatewayError::Reverted(self.hash));
        }
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl WaveContract for MockPortal {
    type Pending = MockPending;

    async fn total_waves(&self) -> Result<u64> {
        self.count_reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_count_reads {
            return Err(GatewayError::CountOverflow(U256::MAX));
        }
        Ok(self.count.load(Ordering::SeqCst))
    }

    async fn all_waves(&self) -> Result<Vec<WaveRecord>> {
        Ok(self.history.lock().unwrap().clone())
    }

    async fn broadcast_wave(&self, _message: &str) -> Result<MockPending> {
        if self.reject_broadcast {
            return Err(GatewayError::Wallet("user rejected the transaction".into()));
        }
        Ok(MockPending {
            hash: TxHash::repeat_byte(MOCK_TX),
            revert: self.revert_on_confirm,
            delay: self.confirm_delay,
            count: self.count.clone(),
        })
    }
}

fn view_over(portal: MockPortal) -> LedgerView<MockPortal> {
    LedgerView::new(portal, Arc::new(RwLock::new(WaveLedger::new())))
}

fn record(byte: u8, secs: u64, message: &str) -> WaveRecord {
    WaveRecord::from_chain(Address::repeat_byte(byte), secs, message.to_owned())
}

#[tokio::test]
async fn confirmed_wave_refreshes_count_exactly_once() {
    let mut portal = MockPortal::with_count(3);
    portal.confirm_delay = Duration::from_millis(50);
    let view = view_over(portal.clone());

    let handle = tokio::spawn({
        let view = view.clone();
        async move { view.submit("gm").await }
    });

    // The pending window: the broadcast hash is visible while waiting.
    tokio::time::sleep(Duration::from_millis(10)).await;
    {
        let ledger = view.ledger().read().await;
        assert!(ledger.is_submission_pending());
        assert_eq!(
            *ledger.submission(),
            SubmissionState::Pending {
                tx_hash: Some(TxHash::repeat_byte(MOCK_TX))
            }
        );
    }

    let tx_hash = handle.await.unwrap().unwrap();
    assert_eq!(tx_hash, TxHash::repeat_byte(MOCK_TX));

    let ledger = view.ledger().read().await;
    assert!(!ledger.is_submission_pending());
    assert_eq!(*ledger.submission(), SubmissionState::Confirmed);
    assert_eq!(ledger.count(), 4);
    assert_eq!(portal.count_reads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn reverted_wave_fails_and_surfaces_the_fault() {
    let mut portal = MockPortal::with_count(3);
    portal.revert_on_confirm = true;
    let view = view_over(portal.clone());

    let err = view.submit("gm").await.unwrap_err();
    assert!(matches!(err, GatewayError::Reverted(_)));

    let ledger = view.ledger().read().await;
    assert!(matches!(
        ledger.submission(),
        SubmissionState::Failed { reason } if reason.contains("reverted")
    ));
    // No count refresh on the failure path.
    assert_eq!(portal.count_reads.load(Ordering::SeqCst), 0);
    assert_eq!(ledger.count(), 0);
}

#[tokio::test]
async fn rejected_broadcast_fails_before_a_hash_exists() {
    let mut portal = MockPortal::with_count(3);
    portal.reject_broadcast = true;
    let view = view_over(portal);

    let err = view.submit("gm").await.unwrap_err();
    assert!(matches!(err, GatewayError::Wallet(_)));

    let ledger = view.ledger().read().await;
    assert!(matches!(
        ledger.submission(),
        SubmissionState::Failed { reason } if reason.contains("user rejected")
    ));
}

#[tokio::test]
async fn second_submission_while_pending_is_rejected() {
    let mut portal = MockPortal::with_count(3);
    portal.confirm_delay = Duration::from_millis(100);
    let view = view_over(portal);

    let first = tokio::spawn({
        let view = view.clone();
        async move { view.submit("first").await }
    });
    tokio::time::sleep(Duration::from_millis(10)).await;

    let err = view.submit("second").await.unwrap_err();
    assert!(matches!(err, GatewayError::SubmissionInFlight));

    // The in-flight submission is unaffected by the rejected attempt.
    first.await.unwrap().unwrap();
    let ledger = view.ledger().read().await;
    assert_eq!(*ledger.submission(), SubmissionState::Confirmed);
    assert_eq!(ledger.count(), 4);
}

#[tokio::test]
async fn submission_allowed_again_after_failure() {
    let mut portal = MockPortal::with_count(3);
    portal.revert_on_confirm = true;
    let view = view_over(portal.clone());

    view.submit("gm").await.unwrap_err();

    // User-initiated retry of the action; this time confirmation succeeds.
    let retried = MockPortal {
        revert_on_confirm: false,
        ..portal.clone()
    };
    let view = LedgerView::new(retried, view.ledger().clone());
    view.submit("gm").await.unwrap();

    let ledger = view.ledger().read().await;
    assert_eq!(*ledger.submission(), SubmissionState::Confirmed);
    assert_eq!(ledger.count(), 4);
}

#[tokio::test]
async fn count_refresh_failure_does_not_fail_a_confirmed_wave() {
    let mut portal = MockPortal::with_count(3);
    portal.fail_count_reads = true;
    let view = view_over(portal.clone());

    // Confirmation succeeded, so the hash comes back even though the
    // follow-up count read fails; the count is simply stale.
    let tx_hash = view.submit("gm").await.unwrap();
    assert_eq!(tx_hash, TxHash::repeat_byte(MOCK_TX));

    let ledger = view.ledger().read().await;
    assert_eq!(*ledger.submission(), SubmissionState::Confirmed);
    assert_eq!(ledger.count(), 0);
    assert_eq!(portal.count_reads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn fetch_all_maps_every_entry_and_is_idempotent() {
    let history = vec![record(1, 10, "a"), record(2, 20, "b"), record(3, 30, "")];
    let view = view_over(MockPortal::with_history(history.clone()));

    assert_eq!(view.fetch_all().await.unwrap(), 3);
    assert_eq!(view.fetch_all().await.unwrap(), 3);

    let ledger = view.ledger().read().await;
    assert_eq!(ledger.waves(), &history[..]);
}

#[tokio::test]
async fn live_event_appends_alongside_the_fetched_batch() {
    let history = vec![record(1, 10, "a"), record(2, 20, "b")];
    let view = view_over(MockPortal::with_history(history));
    view.fetch_all().await.unwrap();

    // A wave pushed by the live feed that the fetch did not carry.
    let fresh = record(3, 30, "c");
    assert!(view.ledger().write().await.observe(fresh.clone()));

    // Re-fetching afterwards must not drop the appended entry.
    assert_eq!(view.fetch_all().await.unwrap(), 3);
    let ledger = view.ledger().read().await;
    assert_eq!(ledger.waves().last(), Some(&fresh));
}
