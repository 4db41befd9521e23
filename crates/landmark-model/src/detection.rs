//! Detector output contracts.
//!
//! A `DetectionResult` is produced once per inference call and is never
//! mutated afterwards. Recordings store one result per line (JSONL), with
//! `#` comment lines allowed for headers.

use serde::{Deserialize, Serialize};

use crate::hand::HandLandmarks;
use crate::point::Point3D;

/// A classification label with its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "categoryName")]
    pub category_name: String,
    pub score: f64,
}

impl Category {
    pub fn new(name: impl Into<String>, score: f64) -> Self {
        Self {
            category_name: name.into(),
            score,
        }
    }
}

/// What the detector is asked to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMode {
    /// Landmarks only.
    #[default]
    Landmarks,
    /// Landmarks plus gesture classification.
    Gesture,
}

/// Result of one inference call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Whether the detector found a subject at all.
    #[serde(default)]
    pub detected: bool,

    /// Overall detection confidence.
    #[serde(default)]
    pub confidence: f64,

    /// Ordered landmarks of the tracked subject(s). The order is semantic:
    /// index 0 of a hand skeleton is always the wrist.
    #[serde(default)]
    pub landmarks: Vec<Point3D>,

    /// Gesture classifications (gesture mode only).
    #[serde(default)]
    pub gestures: Vec<Category>,

    #[serde(default)]
    pub handedness: Option<Category>,
}

impl DetectionResult {
    /// A result with nothing detected.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A positive detection of a single landmark set.
    pub fn with_landmarks(landmarks: Vec<Point3D>, confidence: f64) -> Self {
        Self {
            detected: true,
            confidence,
            landmarks,
            gestures: Vec::new(),
            handedness: None,
        }
    }

    /// Flatten a multi-hand batch into one ordered landmark sequence.
    ///
    /// Hands keep their detector order. The handedness of the first hand
    /// is kept as the primary subject's handedness.
    pub fn from_hands(hands: &[HandLandmarks], confidence: f64) -> Self {
        let landmarks: Vec<Point3D> = hands
            .iter()
            .flat_map(|h| h.landmarks.iter().copied())
            .collect();
        Self {
            detected: !landmarks.is_empty(),
            confidence,
            landmarks,
            gestures: Vec::new(),
            handedness: hands.first().and_then(|h| h.handedness.clone()),
        }
    }

    /// Attach gesture classifications.
    pub fn with_gestures(mut self, gestures: Vec<Category>) -> Self {
        self.gestures = gestures;
        self
    }

    /// Landmarks inside the unit square, in detector order. Empty when the
    /// detector reported no subject.
    pub fn valid_landmarks(&self) -> impl Iterator<Item = &Point3D> + '_ {
        let points: &[Point3D] = if self.detected { &self.landmarks } else { &[] };
        points.iter().filter(|p| p.is_valid())
    }

    /// The highest-scoring gesture, if any.
    pub fn top_gesture(&self) -> Option<&Category> {
        self.gestures
            .iter()
            .filter(|c| !c.score.is_nan())
            .max_by(|a, b| a.score.total_cmp(&b.score))
    }
}

/// A recording line that could not be parsed.
#[derive(Debug, thiserror::Error)]
#[error("line {line}: {source}")]
pub struct DetectionParseError {
    /// One-based line number in the input.
    pub line: usize,
    #[source]
    pub source: serde_json::Error,
}

/// Parse detections from JSONL content (one JSON object per line).
pub fn parse_detections(jsonl: &str) -> Result<Vec<DetectionResult>, DetectionParseError> {
    jsonl
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, text)| {
            serde_json::from_str(text).map_err(|source| DetectionParseError { line, source })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_landmarks_filters_out_of_range() {
        let result = DetectionResult::with_landmarks(
            vec![
                Point3D::new(0.5, 0.5, 0.0),
                Point3D::new(1.5, 0.5, 0.0),
                Point3D::new(0.2, 0.8, 0.1),
            ],
            0.9,
        );
        let valid: Vec<_> = result.valid_landmarks().copied().collect();
        assert_eq!(
            valid,
            vec![Point3D::new(0.5, 0.5, 0.0), Point3D::new(0.2, 0.8, 0.1)]
        );
    }

    #[test]
    fn test_not_detected_has_no_valid_landmarks() {
        let mut result = DetectionResult::with_landmarks(vec![Point3D::new(0.5, 0.5, 0.0)], 0.2);
        result.detected = false;
        assert_eq!(result.valid_landmarks().count(), 0);
    }

    #[test]
    fn test_top_gesture_picks_highest_score() {
        let result = DetectionResult::empty().with_gestures(vec![
            Category::new("Open_Palm", 0.4),
            Category::new("Thumb_Up", 0.8),
            Category::new("Victory", 0.1),
        ]);
        assert_eq!(result.top_gesture().unwrap().category_name, "Thumb_Up");
        assert!(DetectionResult::empty().top_gesture().is_none());
    }

    #[test]
    fn test_from_hands_preserves_order() {
        let left = HandLandmarks {
            landmarks: vec![Point3D::new(0.1, 0.1, 0.0)],
            handedness: Some(Category::new("Left", 0.97)),
        };
        let right = HandLandmarks::new(vec![Point3D::new(0.9, 0.9, 0.0)]);
        let result = DetectionResult::from_hands(&[left, right], 0.8);

        assert!(result.detected);
        assert_eq!(result.landmarks.len(), 2);
        assert_eq!(result.landmarks[0].x, 0.1);
        assert_eq!(result.landmarks[1].x, 0.9);
        assert_eq!(result.handedness.unwrap().category_name, "Left");

        assert!(!DetectionResult::from_hands(&[], 0.0).detected);
    }

    #[test]
    fn test_parse_detections_skips_comments() {
        let jsonl = r#"
# {"recording": "test"}
{"detected": true, "confidence": 0.9, "landmarks": [{"x": 0.5, "y": 0.5, "z": 0.0}]}

{"detected": false}
{"detected": true, "landmarks": [], "gestures": [{"categoryName": "Pointing_Up", "score": 0.7}]}
"#;
        let results = parse_detections(jsonl).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].landmarks.len(), 1);
        assert!(!results[1].detected);
        assert_eq!(results[2].gestures[0].category_name, "Pointing_Up");
    }

    #[test]
    fn test_parse_error_reports_line() {
        let jsonl = "{\"detected\": true}\n{not json}\n";
        let err = parse_detections(jsonl).unwrap_err();
        assert_eq!(err.line, 2);
    }
}
