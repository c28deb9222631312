use std::sync::Arc;

use hireline_analyzer::Analyzer;
use hireline_core::config::RelayConfig;
use hireline_core::session::SessionRegistry;

use crate::store::ApplicationStore;

/// Shared server state
#[derive(Clone)]
pub struct AppState {
    /// Open sessions
    pub registry: Arc<SessionRegistry>,
    /// Registered application contexts
    pub applications: Arc<ApplicationStore>,
    /// Analyzer collaborator
    pub analyzer: Arc<dyn Analyzer>,
    /// Relay behavior settings
    pub relay: RelayConfig,
    /// Whether the analyzer has credentials
    pub analyzer_configured: bool,
}

impl AppState {
    /// Create server state around an analyzer
    pub fn new(analyzer: Arc<dyn Analyzer>, relay: RelayConfig, analyzer_configured: bool) -> Self {
        Self {
            registry: Arc::new(SessionRegistry::new()),
            applications: Arc::new(ApplicationStore::new()),
            analyzer,
            relay,
            analyzer_configured,
        }
    }
}
