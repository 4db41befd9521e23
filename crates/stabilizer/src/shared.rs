//! Mutex-guarded stabilizer for callers on more than one thread.

use std::sync::Arc;

use handlens_landmark_model::detection::DetectionResult;
use handlens_landmark_model::point::ScreenPoint;
use handlens_platform_core::DisplayGeometry;
use parking_lot::Mutex;

use crate::stabilizer::LandmarkStabilizer;

#[derive(Debug, Default)]
struct Guarded {
    stabilizer: LandmarkStabilizer<ScreenPoint>,

    /// Bumped by every reset.
    generation: u64,
}

/// A cloneable handle to one stabilizer.
///
/// Reading the previous output, computing the new one and storing it
/// happen under a single lock, so concurrent frames cannot interleave
/// their read-modify-write. Resets bump a generation under the same lock;
/// a caller that read the generation before slow work can use
/// [`SharedStabilizer::stabilize_detection_if`] to write only if no reset
/// happened in between.
#[derive(Debug, Clone, Default)]
pub struct SharedStabilizer {
    inner: Arc<Mutex<Guarded>>,
}

impl SharedStabilizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stabilize_detection(
        &self,
        detection: &DetectionResult,
        display: &DisplayGeometry,
    ) -> Vec<ScreenPoint> {
        self.inner
            .lock()
            .stabilizer
            .stabilize_detection(detection, display)
    }

    /// Stabilize only if the stabilizer has not been reset since
    /// `generation` was read. Returns `None`, leaving state untouched,
    /// when it has.
    pub fn stabilize_detection_if(
        &self,
        generation: u64,
        detection: &DetectionResult,
        display: &DisplayGeometry,
    ) -> Option<Vec<ScreenPoint>> {
        let mut guarded = self.inner.lock();
        if guarded.generation != generation {
            return None;
        }
        Some(guarded.stabilizer.stabilize_detection(detection, display))
    }

    pub fn stabilize(&self, current: Vec<ScreenPoint>) -> Vec<ScreenPoint> {
        self.inner.lock().stabilizer.stabilize(current)
    }

    pub fn reset(&self) {
        let mut guarded = self.inner.lock();
        guarded.generation = guarded.generation.wrapping_add(1);
        guarded.stabilizer.reset();
    }

    /// Number of resets so far.
    pub fn generation(&self) -> u64 {
        self.inner.lock().generation
    }

    pub fn is_tracking(&self) -> bool {
        self.inner.lock().stabilizer.is_tracking()
    }

    /// Number of points held from the previous frame.
    pub fn len(&self) -> usize {
        self.inner.lock().stabilizer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
