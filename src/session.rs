use std::future::Future;

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;

use crate::error::Result;

/// The external signing boundary: whatever agent holds key material and
/// mediates authorization.
pub trait WalletProvider: Send + Sync {
    /// Non-suspending probe for already-authorized accounts.
    fn authorized_accounts(&self) -> Vec<Address>;

    /// Requests authorization; may suspend on external consent and may be
    /// refused.
    fn request_accounts(&self) -> impl Future<Output = Result<Vec<Address>>> + Send;
}

/// Production provider backed by a locally configured key. A configured key
/// is an already-authorized account, so the probe and the request resolve to
/// the same set.
#[derive(Clone)]
pub struct LocalKeyProvider {
    signer: PrivateKeySigner,
}

impl LocalKeyProvider {
    pub fn new(signer: PrivateKeySigner) -> Self {
        Self { signer }
    }
}

impl WalletProvider for LocalKeyProvider {
    fn authorized_accounts(&self) -> Vec<Address> {
        vec![self.signer.address()]
    }

    async fn request_accounts(&self) -> Result<Vec<Address>> {
        Ok(vec![self.signer.address()])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    Connected(Address),
    NoProvider,
    Refused,
}

/// Tracks whether a user-controlled address is available.
///
/// Every provider fault is swallowed and logged at this boundary: it never
/// propagates to the caller, and the current address is left unchanged.
pub struct WalletSession<P> {
    provider: Option<P>,
    current: Option<Address>,
}

impl<P: WalletProvider> WalletSession<P> {
    pub fn new(provider: Option<P>) -> Self {
        Self {
            provider,
            current: None,
        }
    }

    pub fn current_address(&self) -> Option<Address> {
        self.current
    }

    pub fn is_connected(&self) -> bool {
        self.current.is_some()
    }

    /// Startup probe: adopts the first already-authorized address if there is
    /// one. Idempotent, and a no-op when no provider is configured.
    pub fn check_existing_connection(&mut self) {
        let Some(provider) = &self.provider else {
            tracing::info!("no wallet provider configured");
            return;
        };
        match provider.authorized_accounts().first() {
            Some(address) => {
                tracing::info!(%address, "found an authorized account");
                self.current = Some(*address);
            }
            None => tracing::info!("no authorized account found"),
        }
    }

    /// Prompts the provider for authorization and waits for it to resolve
    /// before adopting the returned address.
    pub async fn request_connection(&mut self) -> ConnectOutcome {
        let Some(provider) = &self.provider else {
            tracing::warn!("wallet provider is not available");
            return ConnectOutcome::NoProvider;
        };
        match provider.request_accounts().await {
            Ok(accounts) => match accounts.first() {
                Some(address) => {
                    tracing::info!(%address, "wallet connected");
                    self.current = Some(*address);
                    ConnectOutcome::Connected(*address)
                }
                None => {
                    tracing::info!("authorization returned no accounts");
                    ConnectOutcome::Refused
                }
            },
            Err(e) => {
                tracing::warn!("wallet authorization failed: {e}");
                ConnectOutcome::Refused
            }
        }
    }
}
