use thiserror::Error;

/// Failure while turning a video file into frames
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid frame {index}: {reason}")]
    InvalidFrame { index: usize, reason: String },

    #[error("decoder exited with {status}: {stderr}")]
    Decoder { status: String, stderr: String },

    #[error("frame {index} truncated: stream ended mid-frame")]
    TruncatedFrame { index: usize },

    #[error("I/O error while decoding: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure talking to the pose-estimation collaborator
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to encode frame {index}: {message}")]
    Encode { index: usize, message: String },

    #[error("pose service unreachable: {0}")]
    Transport(String),

    #[error("pose service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid pose service response: {0}")]
    InvalidResponse(String),
}

/// Failure of a whole swing analysis
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("analysis cancelled")]
    Cancelled,
}
