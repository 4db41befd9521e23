//! Hand skeleton conventions.
//!
//! Hand landmark detectors report 21 points per hand in a fixed order.

use serde::{Deserialize, Serialize};

use crate::detection::Category;
use crate::point::Point3D;

/// Number of landmarks in one hand skeleton.
pub const HAND_LANDMARK_COUNT: usize = 21;

/// Landmark indices within a hand skeleton.
pub mod index {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_MCP: usize = 5;
    pub const INDEX_FINGER_PIP: usize = 6;
    pub const INDEX_FINGER_DIP: usize = 7;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_MCP: usize = 9;
    pub const MIDDLE_FINGER_PIP: usize = 10;
    pub const MIDDLE_FINGER_DIP: usize = 11;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_MCP: usize = 13;
    pub const RING_FINGER_PIP: usize = 14;
    pub const RING_FINGER_DIP: usize = 15;
    pub const RING_FINGER_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

/// One detected hand as reported by a multi-hand detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandLandmarks {
    pub landmarks: Vec<Point3D>,

    /// "Left" or "Right" with its score, when the detector reports it.
    #[serde(default)]
    pub handedness: Option<Category>,
}

impl HandLandmarks {
    pub fn new(landmarks: Vec<Point3D>) -> Self {
        Self {
            landmarks,
            handedness: None,
        }
    }

    pub fn wrist(&self) -> Option<&Point3D> {
        self.landmarks.get(index::WRIST)
    }
}
