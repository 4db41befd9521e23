//! handlens pipeline
//!
//! Wires the stabilizer to its collaborators. Frames come from a
//! [`FrameSource`], a [`Detector`] turns each into a detection, the
//! [`FrameProcessor`] stabilizes it and a [`Renderer`] draws the result.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                    TrackingSession                      │
//! │  ┌─────────────┐   ┌──────────────────────────────┐    │
//! │  │ FrameSource │──▶│        FrameProcessor        │    │
//! │  └─────────────┘   │  Detector ─▶ SharedStabilizer │    │
//! │                    └──────────────┬───────────────┘    │
//! │                                   ▼                    │
//! │                    ┌──────────────────────────────┐    │
//! │                    │  Renderer (+ RenderContext)  │    │
//! │                    └──────────────────────────────┘    │
//! └────────────────────────────────────────────────────────┘
//! ```

pub mod detector;
pub mod frame;
pub mod processor;
pub mod render;
pub mod session;
pub mod source;

pub use detector::{Detector, ScriptedDetector, SyntheticHandDetector};
pub use frame::{Frame, PixelFormat};
pub use processor::{FrameOutcome, FrameProcessor};
pub use render::{CollectingRenderer, JsonLinesRenderer, RenderContext, Renderer};
pub use session::*;
pub use source::{FrameSource, SyntheticFrameSource};
