use std::sync::Arc;

use cryptotasks_infra::persistence::{JsonFileGateway, PersistenceGateway};
use cryptotasks_infra::{BalanceLedger, SessionSweeper, SessionSweeperHandle, VisitorRegistry};

use crate::config::AppConfig;

/// Long-lived state shared by every handler.
#[derive(Debug)]
pub struct AppServices {
    config: AppConfig,
    ledger: Arc<BalanceLedger>,
    visitors: Arc<VisitorRegistry>,
}

impl AppServices {
    pub fn new(config: AppConfig, gateway: Arc<dyn PersistenceGateway>) -> Self {
        let visitors = Arc::new(VisitorRegistry::new(config.registry));
        Self {
            ledger: Arc::new(BalanceLedger::open(gateway)),
            visitors,
            config,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn ledger(&self) -> &BalanceLedger {
        &self.ledger
    }

    pub fn visitors(&self) -> &VisitorRegistry {
        &self.visitors
    }

    /// Start the background sweeper for this instance's registry and logins.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_sweeper(&self) -> SessionSweeperHandle {
        SessionSweeper::for_registry(&self.visitors)
            .with_ledger(self.ledger.clone())
            .spawn(self.visitors.clone())
    }
}

/// Production wiring: JSON file persistence + running sweeper.
pub fn build_services(config: AppConfig) -> (Arc<AppServices>, SessionSweeperHandle) {
    let gateway = Arc::new(JsonFileGateway::new(config.data_file.clone()));
    if config.admins.is_empty() {
        tracing::warn!("CRYPTOTASKS_ADMINS not set; pool reset endpoint is disabled");
    }

    let services = Arc::new(AppServices::new(config, gateway));
    let sweeper = services.spawn_sweeper();
    (services, sweeper)
}
