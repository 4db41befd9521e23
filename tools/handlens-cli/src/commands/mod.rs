pub mod config;
pub mod geometry;
pub mod replay;
pub mod simulate;
pub mod transform;
