//! Stabilized output handed to the renderer.

use serde::{Deserialize, Serialize};

use crate::detection::Category;
use crate::point::ScreenPoint;

/// Screen-space points for one frame, ready to draw.
///
/// Produced fresh per frame and consumed immediately by rendering.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StablePointSet {
    pub frame_number: u64,
    pub points: Vec<ScreenPoint>,

    /// Top gesture label and score (gesture mode only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gesture: Option<Category>,
}

impl StablePointSet {
    pub fn new(frame_number: u64, points: Vec<ScreenPoint>) -> Self {
        Self {
            frame_number,
            points,
            gesture: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Overlay caption for gesture mode, e.g. `"Thumb_Up (0.82)"`.
    pub fn gesture_caption(&self) -> Option<String> {
        self.gesture
            .as_ref()
            .map(|g| format!("{} ({:.2})", g.category_name, g.score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gesture_caption() {
        let mut set = StablePointSet::new(3, vec![ScreenPoint::new(1.0, 2.0)]);
        assert!(set.gesture_caption().is_none());
        set.gesture = Some(Category::new("Thumb_Up", 0.8234));
        assert_eq!(set.gesture_caption().unwrap(), "Thumb_Up (0.82)");
    }

    #[test]
    fn test_serialization_omits_missing_gesture() {
        let set = StablePointSet::new(1, vec![]);
        let json = serde_json::to_string(&set).unwrap();
        assert!(!json.contains("gesture"));
    }
}
