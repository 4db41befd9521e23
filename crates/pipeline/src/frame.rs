//! Camera frames as handed to the detector.

use handlens_common::error::{HandlensError, HandlensResult};
use handlens_platform_core::FrameOrientation;
use serde::{Deserialize, Serialize};

/// Pixel layout of a frame payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    #[default]
    Rgba8,
    Rgb8,
    Gray8,
    /// YUV 4:2:0, full-resolution luma plus interleaved half-resolution chroma.
    Nv21,
}

impl PixelFormat {
    /// Payload length in bytes for a frame of this format.
    pub fn payload_len(&self, width: u32, height: u32) -> usize {
        let pixels = width as usize * height as usize;
        match self {
            Self::Rgba8 => pixels * 4,
            Self::Rgb8 => pixels * 3,
            Self::Gray8 => pixels,
            Self::Nv21 => pixels + pixels / 2,
        }
    }
}

/// One camera frame.
///
/// `data` may be empty when the pixels live elsewhere (e.g. a GPU texture
/// owned by the inference runtime) and only the metadata travels.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub frame_number: u64,

    /// Nanoseconds since the session started.
    pub timestamp_ns: u64,

    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub orientation: FrameOrientation,
    pub data: Vec<u8>,
}

impl Frame {
    /// A frame that carries metadata only.
    pub fn metadata_only(
        frame_number: u64,
        timestamp_ns: u64,
        width: u32,
        height: u32,
        orientation: FrameOrientation,
    ) -> Self {
        Self {
            frame_number,
            timestamp_ns,
            width,
            height,
            format: PixelFormat::default(),
            orientation,
            data: Vec::new(),
        }
    }

    pub fn has_pixels(&self) -> bool {
        !self.data.is_empty()
    }

    /// Check the metadata before the frame reaches the detector.
    pub fn validate(&self) -> HandlensResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(HandlensError::invalid_argument(format!(
                "frame {} has zero dimensions ({}x{})",
                self.frame_number, self.width, self.height
            )));
        }

        if self.has_pixels() {
            let expected = self.format.payload_len(self.width, self.height);
            if self.data.len() != expected {
                return Err(HandlensError::invalid_argument(format!(
                    "frame {} payload is {} bytes, {:?} {}x{} needs {}",
                    self.frame_number,
                    self.data.len(),
                    self.format,
                    self.width,
                    self.height,
                    expected
                )));
            }
        }

        Ok(())
    }
}
