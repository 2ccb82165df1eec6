use std::sync::Arc;
use std::time::Duration;

use crate::config::AutosalesConfig;
use crate::error::Result;
use crate::gateway::{DataService, HttpDataService};
use crate::generate::Generators;
use crate::llm::{CompletionClient, OpenAiClient};
use crate::router::IntentRouter;
use crate::storage::ContextStore;

/// Everything a request handler needs. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ContextStore>,
    pub generators: Arc<Generators>,
    pub router: Arc<IntentRouter>,
    pub gateway: Option<Arc<dyn DataService>>,
}

impl AppState {
    /// Wires the service around the given collaborators.
    pub fn new(
        llm: Arc<dyn CompletionClient>,
        gateway: Option<Arc<dyn DataService>>,
        config: &AutosalesConfig,
    ) -> Self {
        let store = Arc::new(ContextStore::new());
        let generators = Arc::new(Generators::new(
            llm,
            store.clone(),
            gateway.clone(),
            Duration::from_secs(config.llm.timeout_secs),
        ));
        let router = Arc::new(IntentRouter::new(
            generators.clone(),
            store.clone(),
            gateway.clone(),
            config.router.classifier,
        ));
        Self {
            store,
            generators,
            router,
            gateway,
        }
    }

    /// Production wiring: OpenAI-compatible completions and, when a base URL
    /// is configured, the REST data service.
    pub fn from_config(config: &AutosalesConfig) -> Result<Self> {
        let llm = OpenAiClient::new(&config.llm)?;
        tracing::debug!(model = llm.model_name(), "Configured completion client");
        if config.llm.api_key.is_none() {
            tracing::warn!("OPENAI_API_KEY is not set; every generation will use its fallback");
        }
        let gateway = HttpDataService::from_settings(&config.data_service)?
            .map(|service| Arc::new(service) as Arc<dyn DataService>);
        if gateway.is_none() {
            tracing::info!("No data service configured; using the local context store only");
        }
        Ok(Self::new(Arc::new(llm), gateway, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClassifierMode;

    #[test]
    fn test_from_config_without_data_service() {
        let mut config = AutosalesConfig::default();
        config.router.classifier = ClassifierMode::Keyword;
        let state = AppState::from_config(&config).unwrap();

        assert!(state.gateway.is_none());
        assert!(state.store.is_empty());
        assert_eq!(state.router.classifier(), ClassifierMode::Keyword);
    }

    #[test]
    fn test_from_config_with_data_service() {
        let mut config = AutosalesConfig::default();
        config.data_service.base_url = Some("http://localhost:8080".to_string());
        let state = AppState::from_config(&config).unwrap();
        assert!(state.gateway.is_some());
    }

    #[test]
    fn test_invalid_data_service_url_is_error() {
        let mut config = AutosalesConfig::default();
        config.data_service.base_url = Some("::not a url::".to_string());
        assert!(AppState::from_config(&config).is_err());
    }
}
