//! Body landmarks and decoded frames

use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Joints the pose collaborator must report for a detection to count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    Nose,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl Joint {
    pub const COUNT: usize = 13;

    pub const ALL: [Joint; Joint::COUNT] = [
        Joint::Nose,
        Joint::LeftShoulder,
        Joint::RightShoulder,
        Joint::LeftElbow,
        Joint::RightElbow,
        Joint::LeftWrist,
        Joint::RightWrist,
        Joint::LeftHip,
        Joint::RightHip,
        Joint::LeftKnee,
        Joint::RightKnee,
        Joint::LeftAnkle,
        Joint::RightAnkle,
    ];

    /// Position of this joint in the 33-point MediaPipe Pose output
    pub fn mediapipe_index(self) -> usize {
        match self {
            Joint::Nose => 0,
            Joint::LeftShoulder => 11,
            Joint::RightShoulder => 12,
            Joint::LeftElbow => 13,
            Joint::RightElbow => 14,
            Joint::LeftWrist => 15,
            Joint::RightWrist => 16,
            Joint::LeftHip => 23,
            Joint::RightHip => 24,
            Joint::LeftKnee => 25,
            Joint::RightKnee => 26,
            Joint::LeftAnkle => 27,
            Joint::RightAnkle => 28,
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Normalized image coordinate, (0, 0) top-left and (1, 1) bottom-right
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Complete set of joint positions for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "HashMap<Joint, Point>",
    into = "HashMap<Joint, Point>"
)]
pub struct LandmarkSet {
    points: [Point; Joint::COUNT],
}

impl LandmarkSet {
    /// Build from a joint mapping; `None` if any joint is missing
    pub fn from_map(map: &HashMap<Joint, Point>) -> Option<Self> {
        let mut points = [Point::default(); Joint::COUNT];
        for joint in Joint::ALL {
            points[joint.slot()] = *map.get(&joint)?;
        }
        Some(Self { points })
    }

    /// Build from MediaPipe Pose index order; `None` if the list is too short
    pub fn from_mediapipe(points: &[Point]) -> Option<Self> {
        let mut out = [Point::default(); Joint::COUNT];
        for joint in Joint::ALL {
            out[joint.slot()] = *points.get(joint.mediapipe_index())?;
        }
        Some(Self { points: out })
    }

    pub fn get(&self, joint: Joint) -> Point {
        self.points[joint.slot()]
    }
}

impl TryFrom<HashMap<Joint, Point>> for LandmarkSet {
    type Error = String;

    fn try_from(map: HashMap<Joint, Point>) -> Result<Self, Self::Error> {
        LandmarkSet::from_map(&map).ok_or_else(|| {
            let missing: Vec<String> = Joint::ALL
                .iter()
                .filter(|j| !map.contains_key(*j))
                .map(|j| format!("{:?}", j))
                .collect();
            format!("missing joints: {}", missing.join(", "))
        })
    }
}

impl From<LandmarkSet> for HashMap<Joint, Point> {
    fn from(set: LandmarkSet) -> Self {
        Joint::ALL.iter().map(|&j| (j, set.get(j))).collect()
    }
}

/// One decoded video frame
#[derive(Debug, Clone)]
pub struct Frame {
    /// Position in the decoded sequence, starting at 0
    pub index: usize,
    pub image: RgbImage,
}

impl Frame {
    pub fn new(index: usize, image: RgbImage) -> Self {
        Self { index, image }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_map() -> HashMap<Joint, Point> {
        Joint::ALL
            .iter()
            .enumerate()
            .map(|(i, &j)| (j, Point::new(i as f64 / 20.0, 0.5)))
            .collect()
    }

    #[test]
    fn test_from_map_requires_every_joint() {
        let mut map = full_map();
        assert!(LandmarkSet::from_map(&map).is_some());

        map.remove(&Joint::LeftWrist);
        assert!(LandmarkSet::from_map(&map).is_none());
    }

    #[test]
    fn test_from_mediapipe_picks_pose_indices() {
        let points: Vec<Point> = (0..33).map(|i| Point::new(i as f64, 0.0)).collect();
        let set = LandmarkSet::from_mediapipe(&points).unwrap();
        assert_eq!(set.get(Joint::LeftHip).x, 23.0);
        assert_eq!(set.get(Joint::RightWrist).x, 16.0);
        assert_eq!(set.get(Joint::Nose).x, 0.0);

        assert!(LandmarkSet::from_mediapipe(&points[..20]).is_none());
    }

    #[test]
    fn test_deserialize_named_joints() {
        let json = serde_json::to_string(&full_map()).unwrap();
        let set: LandmarkSet = serde_json::from_str(&json).unwrap();
        assert_eq!(set.get(Joint::RightHip), full_map()[&Joint::RightHip]);
    }

    #[test]
    fn test_deserialize_incomplete_names_missing_joint() {
        let json = r#"{"left_hip": {"x": 0.4, "y": 0.5}}"#;
        let err = serde_json::from_str::<LandmarkSet>(json).unwrap_err();
        assert!(err.to_string().contains("RightHip"), "{}", err);
    }
}
