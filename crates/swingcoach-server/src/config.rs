//! HTTP service configuration

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CONTENT_SECURITY_POLICY: &str = "script-src 'self' 'unsafe-eval'";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,

    /// Largest accepted request body (the uploaded video)
    pub max_upload_bytes: usize,

    /// Wall-clock limit for decode + pose extraction of one upload
    pub analysis_timeout: Duration,

    /// Analyses allowed to run at once; further uploads wait for a slot
    pub max_concurrent_analyses: usize,

    /// Where uploads are staged; system temp dir when unset
    pub scratch_dir: Option<PathBuf>,

    pub content_security_policy: String,
}

impl ServerConfig {
    pub fn new() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            max_upload_bytes: 100 * 1024 * 1024,
            analysis_timeout: Duration::from_secs(300),
            max_concurrent_analyses: 2,
            scratch_dir: None,
            content_security_policy: DEFAULT_CONTENT_SECURITY_POLICY.to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new()
    }
}
