use crate::config::UpstreamConfig;
use crate::error::ConfigError;
use crate::observability::AppMetrics;
use crate::upstream::PropertiesClient;
use std::sync::Arc;

/// Shared, read-only handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub client: Arc<PropertiesClient>,
    pub metrics: Arc<AppMetrics>,
}

impl AppState {
    pub fn new(client: PropertiesClient) -> Self {
        Self {
            client: Arc::new(client),
            metrics: Arc::new(AppMetrics::new()),
        }
    }

    pub fn from_config(config: &UpstreamConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(PropertiesClient::new(config)?))
    }
}
