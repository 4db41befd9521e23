//! handlens platform core contracts.
//!
//! Source platforms disagree about whether camera frames arrive pre-rotated
//! and whether the preview is mirrored. This crate folds those differences
//! into one [`PlatformGeometry`] value, computed once per frame outside the
//! stabilizer and injected into the coordinate transform.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Mirroring and aspect handling for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformGeometry {
    /// Flip x so the preview reads like a mirror.
    pub mirror: bool,
    /// Display height per unit of display width.
    pub aspect_multiplier: f64,
}

impl PlatformGeometry {
    pub fn new(mirror: bool, aspect_multiplier: f64) -> Self {
        Self {
            mirror,
            aspect_multiplier,
        }
    }
}

/// Everything the coordinate transform needs from the host display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayGeometry {
    /// Display width in pixels.
    pub display_width: f64,
    pub platform: PlatformGeometry,
}

impl DisplayGeometry {
    pub fn new(display_width: f64, platform: PlatformGeometry) -> Self {
        Self {
            display_width,
            platform,
        }
    }

    /// Whether both the display width and aspect multiplier are known.
    ///
    /// Before the first layout pass both are zero and every transformed
    /// point collapses onto the origin, so nothing should be drawn.
    pub fn is_measured(&self) -> bool {
        let w = self.display_width;
        let r = self.platform.aspect_multiplier;
        w.is_finite() && r.is_finite() && w > 0.0 && r > 0.0
    }

    /// Display height implied by the width and aspect multiplier.
    pub fn display_height(&self) -> f64 {
        self.display_width * self.platform.aspect_multiplier
    }
}

/// Platform the frames come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SourcePlatform {
    Android,
    Ios,
    Web,
    #[default]
    Desktop,
}

impl fmt::Display for SourcePlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Android => "android",
            Self::Ios => "ios",
            Self::Web => "web",
            Self::Desktop => "desktop",
        };
        f.write_str(name)
    }
}

impl FromStr for SourcePlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "android" => Ok(Self::Android),
            "ios" => Ok(Self::Ios),
            "web" | "browser" => Ok(Self::Web),
            "desktop" | "macos" | "linux" | "windows" => Ok(Self::Desktop),
            other => Err(format!("unknown platform '{other}'")),
        }
    }
}

/// Clockwise rotation the frame needs before it is upright on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FrameOrientation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl FrameOrientation {
    /// Map a rotation in degrees (any multiple of 90, negative allowed).
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(Self::Deg0),
            90 => Some(Self::Deg90),
            180 => Some(Self::Deg180),
            270 => Some(Self::Deg270),
            _ => None,
        }
    }

    pub fn degrees(&self) -> i32 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// Whether width and height swap once the frame is upright.
    pub fn is_quarter_turn(&self) -> bool {
        matches!(self, Self::Deg90 | Self::Deg270)
    }
}

/// Which camera produced the frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CameraFacing {
    #[default]
    Front,
    Back,
}

/// Aspect multiplier for a frame of the given size and orientation.
///
/// Returns `0.0` when either dimension is unknown.
pub fn aspect_multiplier(
    frame_width: u32,
    frame_height: u32,
    orientation: FrameOrientation,
) -> f64 {
    if frame_width == 0 || frame_height == 0 {
        return 0.0;
    }
    let (w, h) = (frame_width as f64, frame_height as f64);
    if orientation.is_quarter_turn() {
        w / h
    } else {
        h / w
    }
}

/// Compute the geometry for a mobile or browser source, where the camera
/// facing decides mirroring: front cameras are shown as a mirror.
///
/// Desktop sources have no facing convention; they mirror only when the
/// user asks for it (see [`platform_geometry_with_mirror`]), so this
/// function never mirrors them.
pub fn platform_geometry(
    platform: SourcePlatform,
    frame_width: u32,
    frame_height: u32,
    orientation: FrameOrientation,
    facing: CameraFacing,
) -> PlatformGeometry {
    let mirror = match platform {
        SourcePlatform::Android | SourcePlatform::Ios | SourcePlatform::Web => {
            facing == CameraFacing::Front
        }
        SourcePlatform::Desktop => false,
    };
    PlatformGeometry::new(
        mirror,
        aspect_multiplier(frame_width, frame_height, orientation),
    )
}

/// Like [`platform_geometry`] but with an explicit mirror preference,
/// which wins on every platform.
pub fn platform_geometry_with_mirror(
    frame_width: u32,
    frame_height: u32,
    orientation: FrameOrientation,
    mirror: bool,
) -> PlatformGeometry {
    PlatformGeometry::new(
        mirror,
        aspect_multiplier(frame_width, frame_height, orientation),
    )
}
