//! Frame-to-frame landmark stabilization.
//!
//! A single-pole low-pass filter over the whole landmark sequence. Each
//! output point is `0.7 * current + 0.3 * previous`, applied per axis, as
//! long as the current and previous sequences have the same length. A
//! change in length means index `i` no longer names the same joint, so the
//! new sequence passes through unsmoothed and becomes the new reference.
//!
//! The filter is total: every input, including an empty or mismatched
//! sequence, has a defined output.

use handlens_landmark_model::detection::DetectionResult;
use handlens_landmark_model::point::{Point3D, ScreenPoint};
use handlens_platform_core::DisplayGeometry;

use crate::transform::transform;

/// Weight of the current frame.
pub const CURRENT_WEIGHT: f64 = 0.7;

/// Weight of the previous output.
pub const HISTORY_WEIGHT: f64 = 0.3;

/// Per-axis weighted combination of two points.
///
/// Implementations must combine each axis independently.
pub trait Blend: Copy {
    fn blend(&self, self_weight: f64, other: &Self, other_weight: f64) -> Self;
}

impl Blend for ScreenPoint {
    fn blend(&self, self_weight: f64, other: &Self, other_weight: f64) -> Self {
        ScreenPoint {
            x: self.x * self_weight + other.x * other_weight,
            y: self.y * self_weight + other.y * other_weight,
        }
    }
}

impl Blend for Point3D {
    fn blend(&self, self_weight: f64, other: &Self, other_weight: f64) -> Self {
        Point3D {
            x: self.x * self_weight + other.x * other_weight,
            y: self.y * self_weight + other.y * other_weight,
            z: self.z * self_weight + other.z * other_weight,
        }
    }
}

/// Cross-frame state of the stabilizer.
#[derive(Debug, Clone, PartialEq)]
pub enum StabilizerState<P> {
    /// No previous output held.
    Empty,
    /// The previous frame's output. Never empty.
    Tracking(Vec<P>),
}

/// Exponential smoothing over successive landmark sequences.
///
/// Holds nothing but the previous output. Not thread-safe on its own; see
/// [`crate::SharedStabilizer`] for concurrent callers.
#[derive(Debug, Clone)]
pub struct LandmarkStabilizer<P = ScreenPoint> {
    state: StabilizerState<P>,
}

impl<P: Blend> Default for LandmarkStabilizer<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Blend> LandmarkStabilizer<P> {
    pub fn new() -> Self {
        Self {
            state: StabilizerState::Empty,
        }
    }

    /// Feed one frame's points and return the stabilized output.
    ///
    /// - empty input: state is cleared, output is empty
    /// - no previous output, or a length change: input passes through
    /// - same length as the previous output: per-index weighted blend
    ///
    /// In every non-empty case the output becomes the new reference.
    pub fn stabilize(&mut self, current: Vec<P>) -> Vec<P> {
        if current.is_empty() {
            self.reset();
            return current;
        }

        let output = match &self.state {
            StabilizerState::Tracking(previous) if previous.len() == current.len() => current
                .iter()
                .zip(previous)
                .map(|(c, p)| c.blend(CURRENT_WEIGHT, p, HISTORY_WEIGHT))
                .collect(),
            StabilizerState::Tracking(previous) => {
                tracing::trace!(
                    previous = previous.len(),
                    current = current.len(),
                    "Landmark count changed, skipping smoothing"
                );
                current
            }
            StabilizerState::Empty => current,
        };

        self.state = StabilizerState::Tracking(output.clone());
        output
    }

    /// Drop the previous output. Called on stop, pause, and mode switch.
    pub fn reset(&mut self) {
        self.state = StabilizerState::Empty;
    }

    pub fn state(&self) -> &StabilizerState<P> {
        &self.state
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self.state, StabilizerState::Tracking(_))
    }

    /// Number of points held from the previous frame.
    pub fn len(&self) -> usize {
        match &self.state {
            StabilizerState::Empty => 0,
            StabilizerState::Tracking(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LandmarkStabilizer<ScreenPoint> {
    /// Transform a detection's valid landmarks into display space and
    /// stabilize them.
    ///
    /// Landmarks outside the unit square are dropped before smoothing. A
    /// detection flagged as not detected counts as empty.
    pub fn stabilize_detection(
        &mut self,
        detection: &DetectionResult,
        display: &DisplayGeometry,
    ) -> Vec<ScreenPoint> {
        let current = detection
            .valid_landmarks()
            .map(|p| transform(p, display.display_width, &display.platform))
            .collect();
        self.stabilize(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handlens_platform_core::PlatformGeometry;

    fn p(x: f64, y: f64) -> Point3D {
        Point3D::new(x, y, 0.0)
    }

    fn assert_close(a: &[Point3D], b: &[Point3D]) {
        assert_eq!(a.len(), b.len());
        for (l, r) in a.iter().zip(b) {
            assert!((l.x - r.x).abs() < 1e-9, "x {} vs {}", l.x, r.x);
            assert!((l.y - r.y).abs() < 1e-9, "y {} vs {}", l.y, r.y);
            assert!((l.z - r.z).abs() < 1e-9, "z {} vs {}", l.z, r.z);
        }
    }

    #[test]
    fn test_empty_stays_empty() {
        let mut stabilizer = LandmarkStabilizer::<Point3D>::new();
        assert!(stabilizer.stabilize(vec![]).is_empty());
        assert_eq!(stabilizer.state(), &StabilizerState::Empty);
    }

    #[test]
    fn test_first_frame_passes_through() {
        let mut stabilizer = LandmarkStabilizer::<Point3D>::new();
        let input = vec![p(0.1, 0.2), p(0.3, 0.4), p(0.5, 0.6)];
        let out = stabilizer.stabilize(input.clone());
        assert_eq!(out, input);
        assert_eq!(stabilizer.len(), 3);
    }

    #[test]
    fn test_same_length_blends() {
        let mut stabilizer = LandmarkStabilizer::<Point3D>::new();
        stabilizer.stabilize(vec![Point3D::new(0.0, 1.0, 2.0)]);
        let out = stabilizer.stabilize(vec![Point3D::new(1.0, 0.0, 4.0)]);
        assert_close(&out, &[Point3D::new(0.7, 0.3, 3.4)]);
    }

    #[test]
    fn test_length_change_bypasses_smoothing() {
        let mut stabilizer = LandmarkStabilizer::<Point3D>::new();
        stabilizer.stabilize(vec![p(0.5, 0.5), p(0.5, 0.5)]);
        let input = vec![p(0.9, 0.9), p(0.1, 0.1), p(0.2, 0.2)];
        let out = stabilizer.stabilize(input.clone());
        assert_eq!(out, input);
        assert_eq!(stabilizer.len(), 3);
    }

    #[test]
    fn test_empty_after_tracking_resets() {
        let mut stabilizer = LandmarkStabilizer::<Point3D>::new();
        stabilizer.stabilize(vec![p(0.5, 0.5)]);
        assert!(stabilizer.is_tracking());
        assert!(stabilizer.stabilize(vec![]).is_empty());
        assert!(!stabilizer.is_tracking());

        // The next frame starts fresh rather than blending with stale state.
        let out = stabilizer.stabilize(vec![p(0.9, 0.9)]);
        assert_eq!(out, vec![p(0.9, 0.9)]);
    }

    #[test]
    fn test_explicit_reset() {
        let mut stabilizer = LandmarkStabilizer::<Point3D>::new();
        stabilizer.stabilize(vec![p(0.2, 0.2)]);
        stabilizer.reset();
        assert!(stabilizer.is_empty());
        assert_eq!(stabilizer.stabilize(vec![p(0.8, 0.8)]), vec![p(0.8, 0.8)]);
    }

    #[test]
    fn test_detection_pipeline_in_screen_space() {
        let display = DisplayGeometry::new(400.0, PlatformGeometry::new(true, 1.0));
        let mut stabilizer: LandmarkStabilizer = LandmarkStabilizer::new();

        let first = DetectionResult::with_landmarks(vec![p(0.3, 0.4)], 0.9);
        let out = stabilizer.stabilize_detection(&first, &display);
        assert_eq!(out.len(), 1);
        assert!((out[0].x - 280.0).abs() < 1e-9);
        assert!((out[0].y - 160.0).abs() < 1e-9);

        let second = DetectionResult::with_landmarks(vec![p(0.4, 0.4)], 0.9);
        let out = stabilizer.stabilize_detection(&second, &display);
        // current x = 240, previous x = 280
        assert!((out[0].x - (0.7 * 240.0 + 0.3 * 280.0)).abs() < 1e-9);
        assert!((out[0].y - 160.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_landmarks_are_dropped_before_smoothing() {
        let display = DisplayGeometry::new(100.0, PlatformGeometry::new(false, 1.0));
        let mut stabilizer: LandmarkStabilizer = LandmarkStabilizer::new();

        let all_invalid = DetectionResult::with_landmarks(vec![p(1.2, 0.5), p(0.5, -0.1)], 0.9);
        assert!(stabilizer
            .stabilize_detection(&all_invalid, &display)
            .is_empty());
        assert!(!stabilizer.is_tracking());

        let partial = DetectionResult::with_landmarks(vec![p(0.5, 0.5), p(2.0, 0.5)], 0.9);
        let out = stabilizer.stabilize_detection(&partial, &display);
        assert_eq!(out, vec![ScreenPoint::new(50.0, 50.0)]);
    }

    #[test]
    fn test_undetected_result_resets() {
        let display = DisplayGeometry::new(100.0, PlatformGeometry::new(false, 1.0));
        let mut stabilizer: LandmarkStabilizer = LandmarkStabilizer::new();
        stabilizer.stabilize_detection(
            &DetectionResult::with_landmarks(vec![p(0.5, 0.5)], 0.9),
            &display,
        );

        let mut lost = DetectionResult::with_landmarks(vec![p(0.5, 0.5)], 0.1);
        lost.detected = false;
        assert!(stabilizer.stabilize_detection(&lost, &display).is_empty());
        assert!(!stabilizer.is_tracking());
    }
}
