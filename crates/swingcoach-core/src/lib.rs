//! Pose-derived swing metrics: landmarks, angle math and temporal aggregation

mod aggregator;
mod config;
mod error;
mod landmarks;
mod metrics;

pub use aggregator::{aggregate, LandmarkExtractor, SwingAggregator};
pub use config::{AnalysisConfig, DEFAULT_CLUB_PATH_THRESHOLD};
pub use error::{AnalysisError, DecodeError, ExtractionError};
pub use landmarks::{Frame, Joint, LandmarkSet, Point};
pub use metrics::{round2, AngleSample, ClubPath, SwingSamples, SwingSummary};
