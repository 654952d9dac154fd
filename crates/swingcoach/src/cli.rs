use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use swingcoach_core::{AnalysisConfig, DEFAULT_CLUB_PATH_THRESHOLD};
use swingcoach_llm::client::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use swingcoach_llm::LlmConfig;
use swingcoach_server::{ServerConfig, DEFAULT_CONTENT_SECURITY_POLICY};
use swingcoach_vision::{DecoderConfig, HttpPoseExtractor, PoseConfig, PosePipeline};

#[derive(Parser)]
#[command(name = "swingcoach")]
#[command(version)]
#[command(about = "Golf swing analysis and coaching service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP service
    Serve(ServeArgs),

    /// Analyze a local swing video and print its metrics
    Analyze(AnalyzeArgs),

    /// Print version information
    Version,
}

/// Frame decoding and pose extraction
#[derive(Args, Debug, Clone)]
pub struct PipelineArgs {
    /// Pose sidecar endpoint accepting JPEG frames
    #[arg(
        long,
        env = "SWINGCOACH_POSE_URL",
        default_value = "http://127.0.0.1:8501/landmarks"
    )]
    pub pose_url: String,

    /// ffmpeg executable
    #[arg(long, env = "SWINGCOACH_FFMPEG", default_value = "ffmpeg")]
    pub ffmpeg: PathBuf,

    /// Mean wrist offset beyond which the club path is hook or slice
    #[arg(
        long,
        env = "SWINGCOACH_CLUB_PATH_THRESHOLD",
        default_value_t = DEFAULT_CLUB_PATH_THRESHOLD
    )]
    pub club_path_threshold: f64,
}

impl PipelineArgs {
    pub fn build(&self) -> PosePipeline<HttpPoseExtractor> {
        let decoder = DecoderConfig {
            ffmpeg: self.ffmpeg.clone(),
        };
        let extractor = HttpPoseExtractor::new(PoseConfig::new(self.pose_url.clone()));
        let analysis = AnalysisConfig::new().with_club_path_threshold(self.club_path_threshold);
        PosePipeline::new(decoder, extractor, analysis)
    }
}

/// Chat-completion backend; the key comes from GROQ_API_KEY
#[derive(Args, Debug, Clone)]
pub struct LlmArgs {
    #[arg(long, env = "SWINGCOACH_LLM_URL", default_value = DEFAULT_ENDPOINT)]
    pub llm_url: String,

    #[arg(long, env = "SWINGCOACH_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    #[arg(long, env = "SWINGCOACH_LLM_TIMEOUT", default_value_t = 60)]
    pub llm_timeout_secs: u64,
}

impl LlmArgs {
    pub fn llm_config(&self) -> LlmConfig {
        LlmConfig {
            endpoint: self.llm_url.clone(),
            model: self.model.clone(),
            timeout: Duration::from_secs(self.llm_timeout_secs),
            ..LlmConfig::from_env()
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, env = "SWINGCOACH_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    #[arg(long, env = "SWINGCOACH_MAX_UPLOAD_MB", default_value_t = 100)]
    pub max_upload_mb: usize,

    #[arg(long, env = "SWINGCOACH_ANALYSIS_TIMEOUT", default_value_t = 300)]
    pub analysis_timeout_secs: u64,

    #[arg(long, env = "SWINGCOACH_MAX_ANALYSES", default_value_t = 2)]
    pub max_concurrent_analyses: usize,

    /// Where uploads are staged (system temp dir if omitted)
    #[arg(long, env = "SWINGCOACH_SCRATCH_DIR")]
    pub scratch_dir: Option<PathBuf>,

    #[command(flatten)]
    pub pipeline: PipelineArgs,

    #[command(flatten)]
    pub llm: LlmArgs,
}

impl ServeArgs {
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: self.bind,
            max_upload_bytes: self.max_upload_mb.saturating_mul(1024 * 1024),
            analysis_timeout: Duration::from_secs(self.analysis_timeout_secs),
            max_concurrent_analyses: self.max_concurrent_analyses,
            scratch_dir: self.scratch_dir.clone(),
            content_security_policy: DEFAULT_CONTENT_SECURITY_POLICY.to_string(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Video file to analyze
    pub file: PathBuf,

    /// Also request coaching feedback from the LLM
    #[arg(long)]
    pub feedback: bool,

    #[command(flatten)]
    pub pipeline: PipelineArgs,

    #[command(flatten)]
    pub llm: LlmArgs,
}
