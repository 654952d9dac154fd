//! Landmark extraction through an HTTP pose-estimation sidecar
//!
//! Each frame is JPEG-encoded and POSTed to the sidecar, which answers with
//! `{"landmarks": ...}`: `null`/`[]` for no person, an object keyed by joint
//! name, or a MediaPipe-ordered array of 33 points.

use image::codecs::jpeg::JpegEncoder;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use swingcoach_core::{ExtractionError, Frame, Joint, LandmarkExtractor, LandmarkSet, Point};

/// Pose sidecar configuration
#[derive(Debug, Clone)]
pub struct PoseConfig {
    /// URL accepting `image/jpeg` bodies
    pub endpoint: String,
    /// Per-frame request timeout
    pub timeout: Duration,
    pub jpeg_quality: u8,
}

impl PoseConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(10),
            jpeg_quality: 85,
        }
    }
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self::new("http://127.0.0.1:8501/landmarks")
    }
}

#[derive(Deserialize)]
struct PoseResponse {
    #[serde(default)]
    landmarks: Option<LandmarkPayload>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LandmarkPayload {
    Indexed(Vec<Point>),
    Named(HashMap<String, Point>),
}

/// Parse a sidecar response body; incomplete skeletons count as no detection
fn parse_landmarks(body: &str) -> Result<Option<LandmarkSet>, ExtractionError> {
    let response: PoseResponse =
        serde_json::from_str(body).map_err(|e| ExtractionError::InvalidResponse(e.to_string()))?;

    let landmarks = match response.landmarks {
        None => None,
        Some(LandmarkPayload::Indexed(points)) if points.is_empty() => None,
        Some(LandmarkPayload::Indexed(points)) => LandmarkSet::from_mediapipe(&points),
        Some(LandmarkPayload::Named(named)) => {
            // names outside the tracked joint set are ignored
            let joints: HashMap<Joint, Point> = named
                .into_iter()
                .filter_map(|(name, point)| {
                    let joint = serde_json::from_value(serde_json::Value::String(name)).ok()?;
                    Some((joint, point))
                })
                .collect();
            LandmarkSet::from_map(&joints)
        }
    };
    Ok(landmarks)
}

/// Blocking client for the pose sidecar
pub struct HttpPoseExtractor {
    agent: ureq::Agent,
    config: PoseConfig,
}

impl HttpPoseExtractor {
    pub fn new(config: PoseConfig) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        Self { agent, config }
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    fn encode(&self, frame: &Frame) -> Result<Vec<u8>, ExtractionError> {
        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, self.config.jpeg_quality)
            .encode_image(&frame.image)
            .map_err(|e| ExtractionError::Encode {
                index: frame.index,
                message: e.to_string(),
            })?;
        Ok(jpeg)
    }
}

impl LandmarkExtractor for HttpPoseExtractor {
    fn extract(&self, frame: &Frame) -> Result<Option<LandmarkSet>, ExtractionError> {
        let jpeg = self.encode(frame)?;

        let request = self
            .agent
            .post(&self.config.endpoint)
            .set("Content-Type", "image/jpeg")
            .set("Accept", "application/json")
            .set("X-Frame-Index", &frame.index.to_string());

        let response = match request.send_bytes(&jpeg) {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                return Err(ExtractionError::Status { status, body });
            }
            Err(ureq::Error::Transport(err)) => {
                return Err(ExtractionError::Transport(err.to_string()));
            }
        };

        let body = response
            .into_string()
            .map_err(|e| ExtractionError::InvalidResponse(e.to_string()))?;
        let landmarks = parse_landmarks(&body)?;
        if landmarks.is_none() {
            tracing::debug!(frame = frame.index, "pose service found no complete skeleton");
        }
        Ok(landmarks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_and_empty_mean_no_detection() {
        assert!(parse_landmarks(r#"{"landmarks": null}"#).unwrap().is_none());
        assert!(parse_landmarks(r#"{"landmarks": []}"#).unwrap().is_none());
        assert!(parse_landmarks(r#"{}"#).unwrap().is_none());
    }

    #[test]
    fn test_named_landmarks() {
        let mut named = serde_json::Map::new();
        for joint in Joint::ALL {
            let name = serde_json::to_value(joint).unwrap();
            named.insert(
                name.as_str().unwrap().to_string(),
                serde_json::json!({"x": 0.5, "y": 0.5, "visibility": 0.9}),
            );
        }
        named.insert("left_hip".into(), serde_json::json!({"x": 0.4, "y": 0.55}));
        named.insert("left_eye".into(), serde_json::json!({"x": 0.1, "y": 0.1}));
        let body = serde_json::json!({ "landmarks": named }).to_string();

        let set = parse_landmarks(&body).unwrap().unwrap();
        assert_eq!(set.get(Joint::LeftHip), Point::new(0.4, 0.55));
    }

    #[test]
    fn test_incomplete_named_landmarks_are_a_miss() {
        let body = r#"{"landmarks": {"left_hip": {"x": 0.4, "y": 0.5}}}"#;
        assert!(parse_landmarks(body).unwrap().is_none());
    }

    #[test]
    fn test_mediapipe_array() {
        let points: Vec<serde_json::Value> = (0..33)
            .map(|i| serde_json::json!({"x": i as f64 / 100.0, "y": 0.5, "z": -0.1}))
            .collect();
        let body = serde_json::json!({ "landmarks": points }).to_string();

        let set = parse_landmarks(&body).unwrap().unwrap();
        assert_eq!(set.get(Joint::RightHip).x, 0.24);
        assert_eq!(set.get(Joint::LeftWrist).x, 0.15);
    }

    #[test]
    fn test_garbage_is_invalid_response() {
        assert!(matches!(
            parse_landmarks("<html>bad gateway</html>"),
            Err(ExtractionError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_unreachable_service_is_transport_error() {
        let mut config = PoseConfig::new("http://127.0.0.1:9/landmarks");
        config.timeout = Duration::from_millis(500);
        let extractor = HttpPoseExtractor::new(config);
        let frame = Frame::new(0, image::RgbImage::new(4, 4));

        assert!(matches!(
            extractor.extract(&frame),
            Err(ExtractionError::Transport(_))
        ));
    }
}
