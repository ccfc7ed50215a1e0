use crate::shared::config::Config;
use crate::shared::llm::LlmProvider;
use std::sync::Arc;

/// Общее состояние обработчиков: конфигурация и провайдер, созданные в `main`
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub provider: Arc<dyn LlmProvider>,
}

impl AppState {
    pub fn new(config: Config, provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            config: Arc::new(config),
            provider,
        }
    }
}
