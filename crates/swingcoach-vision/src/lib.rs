//! Video decoding, pose extraction and the end-to-end swing analysis pipeline

mod decoder;
mod pipeline;
mod pose;

pub use decoder::{DecoderConfig, FrameDecoder, PpmFrameReader};
pub use pipeline::{PosePipeline, VideoAnalyzer};
pub use pose::{HttpPoseExtractor, PoseConfig};
