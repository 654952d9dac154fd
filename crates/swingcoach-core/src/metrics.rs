//! Per-frame swing angles and their reduction to a summary

use crate::landmarks::{Joint, LandmarkSet, Point};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Angles derived from a single detected frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleSample {
    /// |angle| of the left→right hip line, degrees
    pub hip_rotation: f64,
    /// |angle| of the left→right shoulder line, degrees
    pub shoulder_tilt: f64,
    /// right_wrist.x - left_wrist.x, signed
    pub wrist_x_difference: f64,
}

impl AngleSample {
    pub fn from_landmarks(landmarks: &LandmarkSet) -> Self {
        Self {
            hip_rotation: line_angle_degrees(
                landmarks.get(Joint::LeftHip),
                landmarks.get(Joint::RightHip),
            ),
            shoulder_tilt: line_angle_degrees(
                landmarks.get(Joint::LeftShoulder),
                landmarks.get(Joint::RightShoulder),
            ),
            wrist_x_difference: landmarks.get(Joint::RightWrist).x
                - landmarks.get(Joint::LeftWrist).x,
        }
    }
}

fn line_angle_degrees(left: Point, right: Point) -> f64 {
    (right.y - left.y).atan2(right.x - left.x).to_degrees().abs()
}

/// Parallel per-frame sequences, one entry per detected frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwingSamples {
    hip_angles: Vec<f64>,
    shoulder_tilts: Vec<f64>,
    club_positions: Vec<f64>,
}

impl SwingSamples {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: AngleSample) {
        self.hip_angles.push(sample.hip_rotation);
        self.shoulder_tilts.push(sample.shoulder_tilt);
        self.club_positions.push(sample.wrist_x_difference);
    }

    pub fn len(&self) -> usize {
        self.hip_angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hip_angles.is_empty()
    }

    pub fn hip_angles(&self) -> &[f64] {
        &self.hip_angles
    }

    pub fn shoulder_tilts(&self) -> &[f64] {
        &self.shoulder_tilts
    }

    pub fn club_positions(&self) -> &[f64] {
        &self.club_positions
    }
}

/// Empty input averages to 0, which doubles as the no-detection sentinel
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Round to two decimal places, halves away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Lateral hand path through the swing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClubPath {
    #[serde(rename = "Inside-to-outside (hook)")]
    InsideToOutside,
    #[serde(rename = "Outside-to-inside (slice)")]
    OutsideToInside,
    #[serde(rename = "Straight")]
    Straight,
}

impl ClubPath {
    /// Classify a mean wrist x-difference; values exactly on ±threshold are Straight
    pub fn classify(mean_wrist_difference: f64, threshold: f64) -> Self {
        if mean_wrist_difference > threshold {
            ClubPath::InsideToOutside
        } else if mean_wrist_difference < -threshold {
            ClubPath::OutsideToInside
        } else {
            ClubPath::Straight
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ClubPath::InsideToOutside => "Inside-to-outside (hook)",
            ClubPath::OutsideToInside => "Outside-to-inside (slice)",
            ClubPath::Straight => "Straight",
        }
    }
}

impl fmt::Display for ClubPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reduction of one analyzed video
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingSummary {
    /// Mean hip rotation, degrees, 2 dp
    pub hip_rotation: f64,
    /// Mean shoulder tilt, degrees, 2 dp
    pub shoulder_tilt: f64,
    pub club_path: ClubPath,
    /// Frames that produced a detection; 0 means the angles are the fallback
    pub detected_frames: usize,
    pub total_frames: usize,
}

impl SwingSummary {
    pub fn from_samples(samples: &SwingSamples, total_frames: usize, threshold: f64) -> Self {
        Self {
            hip_rotation: round2(mean(samples.hip_angles())),
            shoulder_tilt: round2(mean(samples.shoulder_tilts())),
            club_path: ClubPath::classify(mean(samples.club_positions()), threshold),
            detected_frames: samples.len(),
            total_frames,
        }
    }

    pub fn has_detections(&self) -> bool {
        self.detected_frames > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn landmarks(left_hip: Point, right_hip: Point) -> LandmarkSet {
        let mut map: HashMap<Joint, Point> =
            Joint::ALL.iter().map(|&j| (j, Point::new(0.5, 0.5))).collect();
        map.insert(Joint::LeftHip, left_hip);
        map.insert(Joint::RightHip, right_hip);
        LandmarkSet::from_map(&map).unwrap()
    }

    #[test]
    fn test_level_hips_are_zero_degrees() {
        let sample =
            AngleSample::from_landmarks(&landmarks(Point::new(0.4, 0.5), Point::new(0.6, 0.5)));
        assert_eq!(sample.hip_rotation, 0.0);
    }

    #[test]
    fn test_vertical_hips_are_ninety_degrees() {
        let sample =
            AngleSample::from_landmarks(&landmarks(Point::new(0.5, 0.4), Point::new(0.5, 0.6)));
        assert!((sample.hip_rotation - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_angles_are_absolute() {
        // right hip above and left of the left hip: atan2 is negative
        let sample =
            AngleSample::from_landmarks(&landmarks(Point::new(0.6, 0.6), Point::new(0.4, 0.4)));
        assert!((sample.hip_rotation - 135.0).abs() < 1e-9);
    }

    #[test]
    fn test_wrist_difference_is_signed() {
        let mut map: HashMap<Joint, Point> =
            Joint::ALL.iter().map(|&j| (j, Point::new(0.5, 0.5))).collect();
        map.insert(Joint::LeftWrist, Point::new(0.55, 0.7));
        map.insert(Joint::RightWrist, Point::new(0.45, 0.7));
        let sample = AngleSample::from_landmarks(&LandmarkSet::from_map(&map).unwrap());
        assert!((sample.wrist_x_difference + 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_club_path_thresholds() {
        assert_eq!(ClubPath::classify(0.03, 0.02), ClubPath::InsideToOutside);
        assert_eq!(ClubPath::classify(-0.03, 0.02), ClubPath::OutsideToInside);
        assert_eq!(ClubPath::classify(0.0, 0.02), ClubPath::Straight);
    }

    #[test]
    fn test_club_path_boundaries_are_straight() {
        assert_eq!(ClubPath::classify(0.02, 0.02), ClubPath::Straight);
        assert_eq!(ClubPath::classify(-0.02, 0.02), ClubPath::Straight);
    }

    #[test]
    fn test_club_path_labels() {
        assert_eq!(ClubPath::InsideToOutside.to_string(), "Inside-to-outside (hook)");
        assert_eq!(ClubPath::OutsideToInside.to_string(), "Outside-to-inside (slice)");
        assert_eq!(
            serde_json::to_value(ClubPath::Straight).unwrap(),
            serde_json::json!("Straight")
        );
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(44.995), 45.0);
        assert_eq!(round2(12.344), 12.34);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_empty_samples_summarize_to_sentinel() {
        let summary = SwingSummary::from_samples(&SwingSamples::new(), 7, 0.02);
        assert_eq!(summary.hip_rotation, 0.0);
        assert_eq!(summary.shoulder_tilt, 0.0);
        assert_eq!(summary.club_path, ClubPath::Straight);
        assert_eq!(summary.total_frames, 7);
        assert!(!summary.has_detections());
    }
}
