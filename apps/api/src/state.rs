use std::sync::Arc;

use crate::config::Config;
use crate::gateway::GatewayClient;
use crate::recovery::RecoveryController;
use crate::session::SessionRegistry;
use crate::store::RecordStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub gateway: GatewayClient,
    pub recovery: RecoveryController,
    /// Feedback and analysis records. Postgres or in-memory, chosen at startup.
    pub store: Arc<dyn RecordStore>,
    pub sessions: SessionRegistry,
}

#[cfg(test)]
impl AppState {
    /// State wired to a fake upstream at `backend_url`, an in-memory store and
    /// a short recovery policy.
    pub fn for_backend(backend_url: &str) -> (Self, Arc<crate::store::MemoryRecordStore>) {
        use std::time::Duration;

        use crate::recovery::RecoveryPolicy;
        use crate::store::MemoryRecordStore;

        let config = Config::for_backend(backend_url);
        let store = Arc::new(MemoryRecordStore::new());
        let policy = RecoveryPolicy {
            timeout: Duration::from_millis(500),
            settle_delay: Duration::from_millis(10),
        };
        let state = AppState {
            gateway: GatewayClient::new(config.clone()).unwrap(),
            recovery: RecoveryController::new(config.clone(), policy).unwrap(),
            config,
            store: store.clone(),
            sessions: SessionRegistry::default(),
        };
        (state, store)
    }
}
