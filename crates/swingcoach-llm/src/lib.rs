//! Chat-completion client and swing feedback composition

pub mod client;
mod feedback;
mod types;

pub use client::{ChatClient, ChatCompletion, ChatFuture, LlmConfig, LlmError};
pub use feedback::{build_feedback_prompt, compose_feedback, wrap_feedback, FEEDBACK_PREAMBLE};
pub use types::{ChatTurn, Role};
