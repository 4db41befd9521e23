//! Detector seam and the detectors that ship without an inference runtime.
//!
//! A real deployment plugs a model-backed detector in behind [`Detector`].
//! The two implementations here replay recorded output or synthesize a
//! jittery hand, which is enough to drive the pipeline end to end.

use std::path::Path;

use handlens_common::error::{HandlensError, HandlensResult};
use handlens_landmark_model::detection::{parse_detections, Category, DetectionResult};
use handlens_landmark_model::hand::HandLandmarks;
use handlens_landmark_model::point::Point3D;
use handlens_landmark_model::HAND_LANDMARK_COUNT;

use crate::frame::Frame;

/// Turns a frame into landmarks and, optionally, gesture categories.
#[async_trait::async_trait]
pub trait Detector: Send {
    fn name(&self) -> &str;

    /// Whether the model is loaded and `detect` may be called.
    fn is_ready(&self) -> bool;

    /// Run inference on one frame.
    async fn detect(&mut self, frame: &Frame) -> HandlensResult<DetectionResult>;
}

#[derive(Debug, Clone)]
enum ScriptStep {
    Detection(DetectionResult),
    Failure(String),
}

/// Replays recorded detector output.
///
/// Step `n` answers the frame numbered `n`, so frames the session never
/// submits (throttled or dropped) skip their step instead of shifting the
/// rest of the recording onto later frames.
#[derive(Debug, Clone)]
pub struct ScriptedDetector {
    name: String,
    steps: Vec<ScriptStep>,
    ready: bool,
}

impl ScriptedDetector {
    pub fn new(detections: Vec<DetectionResult>) -> Self {
        Self {
            name: "scripted".to_string(),
            steps: detections.into_iter().map(ScriptStep::Detection).collect(),
            ready: true,
        }
    }

    /// Load a JSONL detection recording.
    pub fn from_jsonl(path: &Path) -> HandlensResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let detections = parse_detections(&content).map_err(|e| {
            HandlensError::invalid_argument(format!("{}: {e}", path.display()))
        })?;

        tracing::debug!(
            path = %path.display(),
            count = detections.len(),
            "Loaded detection recording"
        );
        let mut detector = Self::new(detections);
        detector.name = format!("replay:{}", path.display());
        Ok(detector)
    }

    /// Script a runtime failure for the next frame number.
    pub fn push_failure(&mut self, message: impl Into<String>) {
        self.steps.push(ScriptStep::Failure(message.into()));
    }

    pub fn push_detection(&mut self, detection: DetectionResult) {
        self.steps.push(ScriptStep::Detection(detection));
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// Number of frames the script covers.
    pub fn frame_count(&self) -> u64 {
        self.steps.len() as u64
    }
}

#[async_trait::async_trait]
impl Detector for ScriptedDetector {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    async fn detect(&mut self, frame: &Frame) -> HandlensResult<DetectionResult> {
        let step = usize::try_from(frame.frame_number)
            .ok()
            .and_then(|n| self.steps.get(n));

        match step {
            Some(ScriptStep::Detection(detection)) => Ok(detection.clone()),
            Some(ScriptStep::Failure(message)) => Err(HandlensError::inference(message.clone())),
            None => Err(HandlensError::inference(format!(
                "no recorded detection for frame {}",
                frame.frame_number
            ))),
        }
    }
}

/// Rest pose of an open right hand, wrist at the bottom.
fn open_hand_pose() -> Vec<Point3D> {
    const SPREAD: [f64; 5] = [-0.15, -0.08, -0.02, 0.04, 0.10];
    const REACH: [f64; 5] = [0.20, 0.35, 0.38, 0.35, 0.28];

    let mut pose = Vec::with_capacity(HAND_LANDMARK_COUNT);
    pose.push(Point3D::new(0.5, 0.8, 0.0));
    for finger in 0..5 {
        for joint in 1..=4 {
            let t = joint as f64 / 4.0;
            pose.push(Point3D::new(
                0.5 + SPREAD[finger] * t * 1.5,
                0.8 - REACH[finger] * t,
                -0.02 * t,
            ));
        }
    }
    pose
}

/// Deterministic stand-in for a hand model.
///
/// Emits the open-hand pose with per-landmark sinusoidal jitter keyed on
/// the frame number, and a small gesture distribution that drifts between
/// "Open_Palm" and "Victory". With a dropout period `k`, every `k`-th frame
/// reports no hand.
#[derive(Debug, Clone)]
pub struct SyntheticHandDetector {
    pose: Vec<Point3D>,
    jitter: f64,
    dropout_every: Option<u64>,
    calls: u64,
}

impl Default for SyntheticHandDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticHandDetector {
    pub fn new() -> Self {
        Self {
            pose: open_hand_pose(),
            jitter: 0.01,
            dropout_every: None,
            calls: 0,
        }
    }

    /// Jitter amplitude in normalized units.
    pub fn with_jitter(mut self, amplitude: f64) -> Self {
        self.jitter = amplitude;
        self
    }

    /// Report no hand on every `period`-th frame. Zero disables dropout.
    pub fn with_dropout(mut self, period: u64) -> Self {
        self.dropout_every = (period > 0).then_some(period);
        self
    }

    pub fn calls(&self) -> u64 {
        self.calls
    }

    /// The detection this detector produces for `frame_number`.
    pub fn detection_for(&self, frame_number: u64) -> DetectionResult {
        if let Some(period) = self.dropout_every {
            if frame_number % period == period - 1 {
                return DetectionResult::empty();
            }
        }

        let f = frame_number as f64;
        let landmarks = self
            .pose
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let i = i as f64;
                Point3D::new(
                    p.x + self.jitter * (f * 1.7 + i * 0.9).sin(),
                    p.y + self.jitter * (f * 2.3 + i * 1.3).cos(),
                    p.z,
                )
            })
            .collect();

        let mut hand = HandLandmarks::new(landmarks);
        hand.handedness = Some(Category::new("Right", 0.97));

        let palm = 0.6 + 0.3 * (f * 0.21).sin();
        DetectionResult::from_hands(&[hand], 0.9).with_gestures(vec![
            Category::new("Open_Palm", palm),
            Category::new("Victory", 0.9 - palm),
            Category::new("None", 0.1),
        ])
    }
}

#[async_trait::async_trait]
impl Detector for SyntheticHandDetector {
    fn name(&self) -> &str {
        "synthetic-hand"
    }

    fn is_ready(&self) -> bool {
        true
    }

    async fn detect(&mut self, frame: &Frame) -> HandlensResult<DetectionResult> {
        self.calls += 1;
        Ok(self.detection_for(frame.frame_number))
    }
}
