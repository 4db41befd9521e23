//! One inference-plus-stabilize cycle per frame.

use std::sync::atomic::{AtomicBool, Ordering};

use handlens_common::error::{FrameErrorKind, HandlensError, HandlensResult};
use handlens_landmark_model::detection::DetectionMode;
use handlens_landmark_model::point_set::StablePointSet;
use handlens_platform_core::DisplayGeometry;
use handlens_stabilizer::SharedStabilizer;
use parking_lot::Mutex;

use crate::detector::Detector;
use crate::frame::Frame;

/// What became of a submitted frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Stabilized points ready to draw.
    Rendered(StablePointSet),
    /// Another cycle was still running; the frame was discarded untouched.
    Dropped,
    /// The detector failed on this frame. Stabilizer state is unchanged.
    Skipped { reason: String },
    /// The display has not been measured yet. Stabilizer state is unchanged.
    AwaitingDisplay,
}

/// Clears the in-flight flag when the cycle ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs frames through the detector and stabilizer, at most one at a time.
///
/// Frames that arrive while a cycle is in flight are dropped, not queued.
pub struct FrameProcessor {
    detector: tokio::sync::Mutex<Box<dyn Detector>>,
    detector_name: String,
    stabilizer: SharedStabilizer,
    mode: Mutex<DetectionMode>,
    in_flight: AtomicBool,
}

impl FrameProcessor {
    pub fn new(detector: Box<dyn Detector>, mode: DetectionMode) -> Self {
        let detector_name = detector.name().to_string();
        Self {
            detector: tokio::sync::Mutex::new(detector),
            detector_name,
            stabilizer: SharedStabilizer::new(),
            mode: Mutex::new(mode),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn detector_name(&self) -> &str {
        &self.detector_name
    }

    pub fn mode(&self) -> DetectionMode {
        *self.mode.lock()
    }

    pub fn stabilizer(&self) -> &SharedStabilizer {
        &self.stabilizer
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Switch detection mode. Returns whether the mode changed; a change
    /// resets the stabilizer.
    pub fn set_mode(&self, mode: DetectionMode) -> bool {
        let previous = std::mem::replace(&mut *self.mode.lock(), mode);
        if previous == mode {
            return false;
        }

        tracing::info!(?previous, ?mode, "Detection mode switched");
        self.reset();
        true
    }

    /// Forget all cross-frame state. A cycle already past inference when
    /// this runs does not write its result.
    pub fn reset(&self) {
        self.stabilizer.reset();
    }

    /// Process one frame.
    ///
    /// Errors are returned only for frames rejected before inference
    /// (malformed frame, detector not ready). Neither touches the
    /// stabilizer.
    pub async fn submit(
        &self,
        frame: &Frame,
        display: Option<&DisplayGeometry>,
    ) -> HandlensResult<FrameOutcome> {
        let Some(_in_flight) = InFlight::acquire(&self.in_flight) else {
            tracing::debug!(frame = frame.frame_number, "Cycle in flight, dropping frame");
            return Ok(FrameOutcome::Dropped);
        };

        frame.validate()?;

        let generation = self.stabilizer.generation();
        let mode = self.mode();

        let detection = {
            let mut detector = self.detector.lock().await;
            if !detector.is_ready() {
                return Err(HandlensError::model_not_loaded(detector.name()));
            }

            match detector.detect(frame).await {
                Ok(detection) => detection,
                Err(e) if e.kind() == FrameErrorKind::InferenceRuntime => {
                    tracing::warn!(
                        frame = frame.frame_number,
                        error = %e,
                        "Detection failed, skipping frame"
                    );
                    return Ok(FrameOutcome::Skipped {
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        };

        let display = match display {
            Some(display) if display.is_measured() => display,
            _ => {
                tracing::debug!(frame = frame.frame_number, "Display not measured yet");
                return Ok(FrameOutcome::AwaitingDisplay);
            }
        };

        let Some(points) = self
            .stabilizer
            .stabilize_detection_if(generation, &detection, display)
        else {
            return Ok(FrameOutcome::Skipped {
                reason: "stabilizer was reset during inference".to_string(),
            });
        };
        tracing::debug!(
            frame = frame.frame_number,
            detected = detection.detected,
            points = points.len(),
            "Frame stabilized"
        );

        let mut set = StablePointSet::new(frame.frame_number, points);
        if mode == DetectionMode::Gesture {
            set.gesture = detection.top_gesture().cloned();
        }
        Ok(FrameOutcome::Rendered(set))
    }
}

impl std::fmt::Debug for FrameProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameProcessor")
            .field("detector", &self.detector_name)
            .field("mode", &self.mode())
            .field("busy", &self.is_busy())
            .finish()
    }
}
