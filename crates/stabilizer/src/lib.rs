//! handlens stabilizer
//!
//! Turns per-frame detector output into steady screen-space points:
//! - **Transform:** normalized landmark → mirrored → display pixels
//! - **Stabilizer:** exponential smoothing across frames with resets
//! - **Shared:** the same stabilizer behind a lock for concurrent callers
//!
//! This crate is pure computation with no I/O and no platform dependencies.
//! All inputs are data; all outputs are data.

pub mod shared;
pub mod stabilizer;
pub mod transform;

pub use shared::SharedStabilizer;
pub use stabilizer::{
    Blend, LandmarkStabilizer, StabilizerState, CURRENT_WEIGHT, HISTORY_WEIGHT,
};
pub use transform::{transform, transform_all};
