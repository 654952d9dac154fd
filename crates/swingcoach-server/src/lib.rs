//! HTTP façade: swing upload analysis and coaching chat

mod config;
mod conversation;
mod dto;
mod error;
mod handlers;
mod routes;
mod state;

pub use config::{ServerConfig, DEFAULT_CONTENT_SECURITY_POLICY};
pub use conversation::{ConversationStore, DEFAULT_SESSION};
pub use error::ApiError;
pub use handlers::{NO_MESSAGE, NO_VIDEO};
pub use routes::{router, serve};
pub use state::AppState;
