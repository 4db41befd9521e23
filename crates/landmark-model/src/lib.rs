//! handlens landmark model
//!
//! Defines the data contracts that flow through one frame:
//! - **Points:** normalized detector landmarks and display-space points
//! - **Detections:** per-frame detector output with optional gestures
//! - **Hands:** the 21-point hand skeleton convention
//! - **Point sets:** stabilized output handed to the renderer
//!
//! Landmark coordinates are normalized to `[0.0, 1.0]` relative to the
//! source frame, so they are independent of the display size.

pub mod detection;
pub mod hand;
pub mod point;
pub mod point_set;

pub use detection::*;
pub use hand::{HandLandmarks, HAND_LANDMARK_COUNT};
pub use point::*;
pub use point_set::*;
