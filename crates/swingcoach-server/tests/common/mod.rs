#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use swingcoach_core::{AnalysisError, ClubPath, DecodeError, SwingSummary};
use swingcoach_llm::{ChatCompletion, ChatFuture, ChatTurn, LlmError};
use swingcoach_server::{AppState, ServerConfig};
use swingcoach_vision::VideoAnalyzer;
use tokio_util::sync::CancellationToken;

pub const BOUNDARY: &str = "swingcoach-test-boundary";

pub fn sample_summary() -> SwingSummary {
    SwingSummary {
        hip_rotation: 45.0,
        shoulder_tilt: 8.5,
        club_path: ClubPath::Straight,
        detected_frames: 2,
        total_frames: 3,
    }
}

pub enum AnalyzerMode {
    Succeed,
    DecodeFailure,
    /// Spin until cancelled
    Hang,
}

pub struct StubAnalyzer {
    pub mode: AnalyzerMode,
    pub calls: AtomicUsize,
    pub saw_cancel: AtomicBool,
    pub staged_bytes: Mutex<Vec<u8>>,
}

impl StubAnalyzer {
    pub fn new(mode: AnalyzerMode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            calls: AtomicUsize::new(0),
            saw_cancel: AtomicBool::new(false),
            staged_bytes: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl VideoAnalyzer for StubAnalyzer {
    fn analyze(
        &self,
        video: &Path,
        cancel: &CancellationToken,
    ) -> Result<SwingSummary, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.staged_bytes.lock().unwrap() = std::fs::read(video).unwrap_or_default();
        match self.mode {
            AnalyzerMode::Succeed => Ok(sample_summary()),
            AnalyzerMode::DecodeFailure => {
                Err(AnalysisError::Decode(DecodeError::TruncatedFrame { index: 4 }))
            }
            AnalyzerMode::Hang => {
                while !cancel.is_cancelled() {
                    std::thread::sleep(Duration::from_millis(5));
                }
                self.saw_cancel.store(true, Ordering::SeqCst);
                Err(AnalysisError::Cancelled)
            }
        }
    }
}

/// Answers "reply N" and records every transcript it was sent
pub struct StubLlm {
    pub fail_with: Option<String>,
    pub transcripts: Mutex<Vec<Vec<ChatTurn>>>,
}

impl StubLlm {
    pub fn replying() -> Arc<Self> {
        Arc::new(Self {
            fail_with: None,
            transcripts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            fail_with: Some(message.to_string()),
            transcripts: Mutex::new(Vec::new()),
        })
    }

    pub fn last_transcript(&self) -> Vec<ChatTurn> {
        self.transcripts
            .lock()
            .unwrap()
            .last()
            .cloned()
            .unwrap_or_default()
    }
}

impl ChatCompletion for StubLlm {
    fn complete<'a>(&'a self, turns: &'a [ChatTurn]) -> ChatFuture<'a> {
        Box::pin(async move {
            let n = {
                let mut seen = self.transcripts.lock().unwrap();
                seen.push(turns.to_vec());
                seen.len()
            };
            match &self.fail_with {
                Some(message) => Err(LlmError::Api {
                    status: 503,
                    message: message.clone(),
                }),
                None => Ok(ChatTurn::assistant(format!("reply {}", n))),
            }
        })
    }
}

pub fn test_state(
    config: ServerConfig,
    analyzer: Arc<StubAnalyzer>,
    llm: Arc<StubLlm>,
) -> Arc<AppState> {
    Arc::new(AppState::new(config, analyzer, llm))
}

pub fn multipart_body(fields: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename, data) in fields {
        body.extend(format!("--{}\r\n", BOUNDARY).into_bytes());
        match filename {
            Some(filename) => body.extend(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                     Content-Type: video/webm\r\n\r\n",
                    name, filename
                )
                .into_bytes(),
            ),
            None => body.extend(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                    .into_bytes(),
            ),
        }
        body.extend_from_slice(data);
        body.extend(b"\r\n");
    }
    body.extend(format!("--{}--\r\n", BOUNDARY).into_bytes());
    body
}

pub fn multipart_request(fields: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/analyze")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(fields)))
        .unwrap()
}

pub fn chat_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
