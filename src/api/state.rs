use std::sync::Arc;
use std::time::Instant;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::ledger::LedgerView;
use crate::session::{LocalKeyProvider, WalletSession};

pub type SharedSession = Arc<RwLock<WalletSession<LocalKeyProvider>>>;

pub struct AppState<C> {
    pub view: LedgerView<C>,
    pub session: SharedSession,
    pub config: Arc<Config>,
    pub start_time: Instant,
}

impl<C: Clone> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            view: self.view.clone(),
            session: self.session.clone(),
            config: self.config.clone(),
            start_time: self.start_time,
        }
    }
}

impl<C> AppState<C> {
    pub fn new(view: LedgerView<C>, session: SharedSession, config: Config) -> Self {
        Self {
            view,
            session,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
