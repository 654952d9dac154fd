use crate::config::ServerConfig;
use crate::conversation::ConversationStore;
use std::sync::Arc;
use swingcoach_llm::ChatCompletion;
use swingcoach_vision::VideoAnalyzer;
use tokio::sync::Semaphore;

/// Shared handler state
pub struct AppState {
    pub config: ServerConfig,
    pub analyzer: Arc<dyn VideoAnalyzer>,
    pub llm: Arc<dyn ChatCompletion>,
    pub conversations: ConversationStore,
    analysis_slots: Arc<Semaphore>,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        analyzer: Arc<dyn VideoAnalyzer>,
        llm: Arc<dyn ChatCompletion>,
    ) -> Self {
        let slots = config.max_concurrent_analyses.max(1);
        Self {
            config,
            analyzer,
            llm,
            conversations: ConversationStore::new(),
            analysis_slots: Arc::new(Semaphore::new(slots)),
        }
    }

    pub fn analysis_slots(&self) -> Arc<Semaphore> {
        Arc::clone(&self.analysis_slots)
    }
}
