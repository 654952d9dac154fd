//! Video file → SwingSummary

use crate::decoder::{DecoderConfig, FrameDecoder};
use std::path::Path;
use std::time::Instant;
use swingcoach_core::{
    aggregate, AnalysisConfig, AnalysisError, DecodeError, Frame, LandmarkExtractor, SwingSummary,
};
use tokio_util::sync::CancellationToken;

/// Blocking analysis of one staged video file
pub trait VideoAnalyzer: Send + Sync {
    /// Stops at the next frame boundary once `cancel` fires
    fn analyze(&self, video: &Path, cancel: &CancellationToken)
        -> Result<SwingSummary, AnalysisError>;
}

/// Decoder + pose extractor + aggregator
pub struct PosePipeline<E> {
    decoder: DecoderConfig,
    extractor: E,
    analysis: AnalysisConfig,
}

impl<E: LandmarkExtractor> PosePipeline<E> {
    pub fn new(decoder: DecoderConfig, extractor: E, analysis: AnalysisConfig) -> Self {
        Self {
            decoder,
            extractor,
            analysis,
        }
    }

    pub fn analysis_config(&self) -> AnalysisConfig {
        self.analysis
    }

    /// Aggregate an already-decoded frame sequence
    pub fn analyze_frames<I>(
        &self,
        frames: I,
        cancel: &CancellationToken,
    ) -> Result<SwingSummary, AnalysisError>
    where
        I: IntoIterator<Item = Result<Frame, DecodeError>>,
    {
        aggregate(frames, &self.extractor, self.analysis, || cancel.is_cancelled())
    }
}

impl<E: LandmarkExtractor> VideoAnalyzer for PosePipeline<E> {
    fn analyze(
        &self,
        video: &Path,
        cancel: &CancellationToken,
    ) -> Result<SwingSummary, AnalysisError> {
        let started = Instant::now();
        let frames = FrameDecoder::open(&self.decoder, video)?;
        let summary = self.analyze_frames(frames, cancel)?;

        tracing::info!(
            frames = summary.total_frames,
            detected = summary.detected_frames,
            hip_rotation = summary.hip_rotation,
            shoulder_tilt = summary.shoulder_tilt,
            club_path = %summary.club_path,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "swing analysis complete"
        );
        if !summary.has_detections() {
            tracing::warn!(video = %video.display(), "no pose detected in any frame");
        }
        Ok(summary)
    }
}
