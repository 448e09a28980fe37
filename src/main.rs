use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use alloy::network::EthereumWallet;
use alloy::providers::ProviderBuilder;
use alloy::signers::local::PrivateKeySigner;
use tokio::sync::{watch, RwLock};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use waveportal_gateway::api::{self, AppState};
use waveportal_gateway::config::Config;
use waveportal_gateway::error::{GatewayError, Result};
use waveportal_gateway::ledger::{LedgerView, WaveLedger};
use waveportal_gateway::portal::{PortalContract, WaveContract};
use waveportal_gateway::session::{LocalKeyProvider, WalletSession};
use waveportal_gateway::subscriber;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting WavePortal Gateway v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Contract: {}", config.contract_address);
    tracing::info!("Gas allowance per wave: {}", config.wave_gas_limit);

    let rpc_url = config
        .rpc_http_url
        .parse()
        .map_err(|e| GatewayError::Config(format!("Invalid RPC URL: {e}")))?;

    let signer = match &config.wallet_private_key {
        Some(raw) => Some(
            PrivateKeySigner::from_str(raw)
                .map_err(|e| GatewayError::Config(format!("Invalid WALLET_PRIVATE_KEY: {e}")))?,
        ),
        None => None,
    };

    // The write path needs a signing provider; without a key the gateway
    // still serves reads and the live feed.
    match signer {
        Some(signer) => {
            let provider = ProviderBuilder::new()
                .with_recommended_fillers()
                .wallet(EthereumWallet::from(signer.clone()))
                .on_http(rpc_url);
            let contract =
                PortalContract::new(config.contract_address, provider, config.wave_gas_limit);
            run(config, contract, Some(LocalKeyProvider::new(signer))).await
        }
        None => {
            let provider = ProviderBuilder::new().on_http(rpc_url);
            let contract =
                PortalContract::new(config.contract_address, provider, config.wave_gas_limit);
            run(config, contract, None).await
        }
    }
}

async fn run<C: WaveContract + Clone>(
    config: Config,
    contract: C,
    wallet: Option<LocalKeyProvider>,
) -> Result<()> {
    let ledger = Arc::new(RwLock::new(WaveLedger::new()));
    let view = LedgerView::new(contract, ledger.clone());

    let mut session = WalletSession::new(wallet);
    session.check_existing_connection();

    // Startup reads are best-effort: a manual refresh can retry them later.
    let (count, fetched) = tokio::join!(view.refresh_count(), view.fetch_all());
    match count {
        Ok(count) => tracing::info!(count, "wave count loaded"),
        Err(e) => tracing::warn!("initial count refresh failed: {e}"),
    }
    match fetched {
        Ok(total) => tracing::info!(total, "wave history loaded"),
        Err(e) => tracing::warn!("initial wave fetch failed: {e}"),
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let subscriber_handle = {
        let ws_url = config.rpc_ws_url.clone();
        let contract_address = config.contract_address;
        let ledger = ledger.clone();

        tokio::spawn(async move {
            subscriber::subscribe_with_reconnect(ws_url, contract_address, ledger, shutdown_rx)
                .await;
        })
    };

    let state = AppState::new(view, Arc::new(RwLock::new(session)), config);

    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| GatewayError::Config(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("API server listening on {}", addr);

    let router = api::create_router(state);

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal(shutdown_tx))
            .await
            .ok();
    });

    tokio::select! {
        _ = subscriber_handle => {
            tracing::info!("Subscriber task finished");
        }
        _ = server_handle => {
            tracing::info!("Server task finished");
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal(shutdown_tx: watch::Sender<bool>) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }

    let _ = shutdown_tx.send(true);
}
