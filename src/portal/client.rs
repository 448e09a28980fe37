use std::future::Future;

use alloy::network::Ethereum;
use alloy::primitives::{Address, TxHash};
use alloy::providers::{PendingTransactionBuilder, Provider};
use alloy::transports::http::{Client, Http};

use crate::error::{GatewayError, Result};
use crate::ledger::WaveRecord;

use super::bindings::WavePortal;

/// Read/write seam over the deployed portal contract.
///
/// Faults on every method follow the surface-and-rethrow policy: they are
/// wrapped into [`GatewayError`] and re-raised so callers can distinguish a
/// failed submission from a confirmed one.
pub trait WaveContract: Send + Sync + 'static {
    type Pending: PendingWave;

    /// Reads the aggregate wave count.
    fn total_waves(&self) -> impl Future<Output = Result<u64>> + Send;

    /// Reads the full historical wave list, mapped into [`WaveRecord`]s.
    fn all_waves(&self) -> impl Future<Output = Result<Vec<WaveRecord>>> + Send;

    /// Broadcasts a wave transaction and returns once it is in the mempool.
    fn broadcast_wave(&self, message: &str) -> impl Future<Output = Result<Self::Pending>> + Send;
}

/// A broadcast-but-unconfirmed wave: the external client's `{hash, wait()}`
/// transaction handle.
pub trait PendingWave: Send {
    fn tx_hash(&self) -> TxHash;

    /// Suspends until the transaction is included and finalized. Duration is
    /// externally governed; no cancellation path is exposed.
    fn confirmed(self) -> impl Future<Output = Result<()>> + Send;
}

#[derive(Clone)]
pub struct PortalContract<P> {
    instance: WavePortal::WavePortalInstance<Http<Client>, P>,
    gas_limit: u64,
}

impl<P> PortalContract<P>
where
    P: Provider<Http<Client>> + Clone + Send + Sync + 'static,
{
    pub fn new(address: Address, provider: P, gas_limit: u64) -> Self {
        Self {
            instance: WavePortal::new(address, provider),
            gas_limit,
        }
    }
}

impl<P> WaveContract for PortalContract<P>
where
    P: Provider<Http<Client>> + Clone + Send + Sync + 'static,
{
    type Pending = PendingPortalWave;

    async fn total_waves(&self) -> Result<u64> {
        let raw = self.instance.getTotalWaves().call().await?._0;
        u64::try_from(raw).map_err(|_| GatewayError::CountOverflow(raw))
    }

    async fn all_waves(&self) -> Result<Vec<WaveRecord>> {
        let raw = self.instance.getAllWaves().call().await?._0;
        Ok(raw.iter().filter_map(map_wave).collect())
    }

    async fn broadcast_wave(&self, message: &str) -> Result<PendingPortalWave> {
        let pending = self
            .instance
            .wave(message.to_owned())
            .gas(self.gas_limit)
            .send()
            .await?;
        Ok(PendingPortalWave { inner: pending })
    }
}

pub struct PendingPortalWave {
    inner: PendingTransactionBuilder<Http<Client>, Ethereum>,
}

impl PendingWave for PendingPortalWave {
    fn tx_hash(&self) -> TxHash {
        *self.inner.tx_hash()
    }

    async fn confirmed(self) -> Result<()> {
        let receipt = self.inner.get_receipt().await?;
        if receipt.status() {
            Ok(())
        } else {
            Err(GatewayError::Reverted(receipt.transaction_hash))
        }
    }
}

fn map_wave(raw: &WavePortal::Wave) -> Option<WaveRecord> {
    let secs = u64::try_from(raw.timestamp).ok()?;
    Some(WaveRecord::from_chain(raw.waver, secs, raw.message.clone()))
}

#[cfg(test)]
mod tests {
    use alloy::primitives::U256;

    use super::*;

    #[test]
    fn map_wave_converts_fields() {
        let raw = WavePortal::Wave {
            waver: Address::repeat_byte(0x42),
            message: "gm".into(),
            timestamp: U256::from(1_700_000_000u64),
        };
        let rec = map_wave(&raw).unwrap();
        assert_eq!(rec.address, Address::repeat_byte(0x42));
        assert_eq!(rec.message, "gm");
        assert_eq!(rec.timestamp_ms, 1_700_000_000_000);
    }

    #[test]
    fn map_wave_rejects_absurd_timestamps() {
        let raw = WavePortal::Wave {
            waver: Address::repeat_byte(0x42),
            message: "gm".into(),
            timestamp: U256::MAX,
        };
        assert!(map_wave(&raw).is_none());
    }
}
