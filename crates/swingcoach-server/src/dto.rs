use serde::{Deserialize, Serialize};
use swingcoach_core::SwingSummary;
use swingcoach_llm::ChatTurn;

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub initial_message: String,
    /// Same text as `initial_message`; the bundled web client reads this key
    pub analysis: String,
    pub metrics: SwingSummary,
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "chatHistory")]
    pub chat_history: Option<Vec<ChatTurn>>,
    #[serde(default, rename = "sessionId")]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
