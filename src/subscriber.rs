use std::time::Duration;

use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder, WsConnect};
use alloy::rpc::types::{Filter, Log};
use alloy::sol_types::SolEvent;
use tokio::sync::watch;

use crate::error::{GatewayError, Result};
use crate::ledger::{SharedLedger, WaveRecord};
use crate::portal::WavePortal::NewWave;

pub async fn subscribe_with_reconnect(
    ws_url: String,
    contract_address: Address,
    ledger: SharedLedger,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut backoff = Duration::from_secs(1);

    loop {
        if *shutdown.borrow() {
            tracing::info!("Subscriber received shutdown signal");
            break;
        }

        match connect_and_subscribe(&ws_url, contract_address, &ledger, &mut shutdown).await {
            Ok(()) => {
                tracing::info!("Subscriber shut down gracefully");
                break;
            }
            Err(e) => {
                tracing::warn!("Subscriber error: {e}, reconnecting in {:?}", backoff);
                tokio::select! {
                    _ = tokio::time::sleep(backoff) => {}
                    _ = shutdown.changed() => {
                        if *shutdown.borrow() {
                            break;
                        }
                    }
                }
                backoff = (backoff * 2).min(Duration::from_secs(60));
            }
        }
    }
}

async fn connect_and_subscribe(
    ws_url: &str,
    contract_address: Address,
    ledger: &SharedLedger,
    shutdown: &mut watch::Receiver<bool>,
) -> Result<()> {
    tracing::info!("Connecting to WebSocket: {}", ws_url);

    let ws = WsConnect::new(ws_url);
    let provider = ProviderBuilder::new().on_ws(ws).await?;

    let filter = Filter::new()
        .address(contract_address)
        .event_signature(NewWave::SIGNATURE_HASH);

    let sub = provider.subscribe_logs(&filter).await?;
    let mut stream = sub.into_stream();

    tracing::info!("Subscribed to NewWave events");

    // Returning drops the subscription, which unsubscribes server-side; the
    // handler is released even if teardown happens before any event arrives.
    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    return Ok(());
                }
            }
            log_opt = futures_lite::StreamExt::next(&mut stream) => {
                let log = match log_opt {
                    Some(log) => log,
                    None => {
                        tracing::warn!("WebSocket stream ended");
                        return Err(GatewayError::Config("Stream ended".into()));
                    }
                };

                let Some(record) = decode_new_wave(&log) else {
                    tracing::debug!("Undecodable log at block {:?}", log.block_number);
                    continue;
                };

                let appended = ledger.write().await.observe(record.clone());
                if appended {
                    tracing::info!(address = %record.address, "new wave observed");
                } else {
                    tracing::debug!(address = %record.address, "duplicate wave delivery ignored");
                }
            }
        }
    }
}

fn decode_new_wave(log: &Log) -> Option<WaveRecord> {
    let decoded = NewWave::decode_log(log.inner.as_ref(), true).ok()?;
    let secs = u64::try_from(decoded.timestamp).ok()?;
    Some(WaveRecord::from_chain(
        decoded.from,
        secs,
        decoded.message.clone(),
    ))
}
