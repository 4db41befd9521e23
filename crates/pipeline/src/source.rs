//! Frame sources.

use handlens_common::error::HandlensResult;
use handlens_platform_core::FrameOrientation;

use crate::frame::Frame;

/// Anything that produces camera frames in order.
pub trait FrameSource: Send {
    /// Human-readable name for logs.
    fn name(&self) -> &str;

    /// Next frame, or `None` once the source is exhausted.
    fn next_frame(&mut self) -> HandlensResult<Option<Frame>>;
}

/// Produces a fixed number of upright, metadata-only frames at a nominal rate.
///
/// Timestamps are derived from the frame number, so runs are reproducible.
#[derive(Debug, Clone)]
pub struct SyntheticFrameSource {
    width: u32,
    height: u32,
    interval_ns: u64,
    total: u64,
    next: u64,
}

impl SyntheticFrameSource {
    pub fn new(total: u64, fps: u32, width: u32, height: u32) -> Self {
        let interval_ns = if fps == 0 {
            0
        } else {
            1_000_000_000 / fps as u64
        };
        Self {
            width,
            height,
            interval_ns,
            total,
            next: 0,
        }
    }
}

impl FrameSource for SyntheticFrameSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn next_frame(&mut self) -> HandlensResult<Option<Frame>> {
        if self.next >= self.total {
            return Ok(None);
        }

        let frame = Frame::metadata_only(
            self.next,
            self.next * self.interval_ns,
            self.width,
            self.height,
            FrameOrientation::Deg0,
        );
        self.next += 1;
        Ok(Some(frame))
    }
}
