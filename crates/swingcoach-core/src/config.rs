//! Configuration for swing analysis

use serde::{Deserialize, Serialize};

/// Mean wrist x-difference (normalized image units) beyond which the club
/// path is no longer "Straight".
pub const DEFAULT_CLUB_PATH_THRESHOLD: f64 = 0.02;

/// Analysis configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Hook/slice threshold on the mean wrist x-difference (exclusive)
    pub club_path_threshold: f64,
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self {
            club_path_threshold: DEFAULT_CLUB_PATH_THRESHOLD,
        }
    }

    pub fn with_club_path_threshold(mut self, threshold: f64) -> Self {
        self.club_path_threshold = threshold.abs();
        self
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::new()
    }
}
