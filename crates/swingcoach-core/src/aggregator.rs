//! Frame-by-frame swing metric aggregation

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, DecodeError, ExtractionError};
use crate::landmarks::{Frame, LandmarkSet};
use crate::metrics::{AngleSample, SwingSamples, SwingSummary};

/// Pose-estimation collaborator: one frame in, landmarks or nothing out
pub trait LandmarkExtractor: Send + Sync {
    /// `Ok(None)` means no person was detected in the frame
    fn extract(&self, frame: &Frame) -> Result<Option<LandmarkSet>, ExtractionError>;
}

/// Accumulates angle samples across a frame sequence
#[derive(Debug, Clone, Default)]
pub struct SwingAggregator {
    config: AnalysisConfig,
    samples: SwingSamples,
    frames_seen: usize,
}

impl SwingAggregator {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            samples: SwingSamples::new(),
            frames_seen: 0,
        }
    }

    /// Record one frame's detection result; misses only bump the frame count
    pub fn observe(&mut self, landmarks: Option<&LandmarkSet>) {
        self.frames_seen += 1;
        if let Some(landmarks) = landmarks {
            self.samples.push(AngleSample::from_landmarks(landmarks));
        }
    }

    pub fn samples(&self) -> &SwingSamples {
        &self.samples
    }

    pub fn frames_seen(&self) -> usize {
        self.frames_seen
    }

    pub fn summary(&self) -> SwingSummary {
        SwingSummary::from_samples(
            &self.samples,
            self.frames_seen,
            self.config.club_path_threshold,
        )
    }
}

/// Run every frame through the extractor and reduce to a summary.
///
/// The first decode or extraction error aborts the whole analysis.
/// `is_cancelled` is polled before each frame.
pub fn aggregate<I, E, C>(
    frames: I,
    extractor: &E,
    config: AnalysisConfig,
    is_cancelled: C,
) -> Result<SwingSummary, AnalysisError>
where
    I: IntoIterator<Item = Result<Frame, DecodeError>>,
    E: LandmarkExtractor + ?Sized,
    C: Fn() -> bool,
{
    let mut aggregator = SwingAggregator::new(config);
    for frame in frames {
        if is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }
        let frame = frame?;
        let landmarks = extractor.extract(&frame)?;
        if landmarks.is_none() {
            tracing::debug!(frame = frame.index, "no pose detected");
        }
        aggregator.observe(landmarks.as_ref());
    }
    Ok(aggregator.summary())
}
