//! Compute mirroring and aspect for a camera source.

use handlens_platform_core::{
    platform_geometry, platform_geometry_with_mirror, CameraFacing, FrameOrientation,
    SourcePlatform,
};

pub fn run(
    platform: String,
    frame_width: u32,
    frame_height: u32,
    rotation: i32,
    back: bool,
    mirror: Option<bool>,
) -> anyhow::Result<()> {
    let platform: SourcePlatform = platform.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let orientation = FrameOrientation::from_degrees(rotation)
        .ok_or_else(|| anyhow::anyhow!("rotation must be a multiple of 90, got {rotation}"))?;
    let facing = if back {
        CameraFacing::Back
    } else {
        CameraFacing::Front
    };

    let geometry = match mirror {
        Some(mirror) => {
            platform_geometry_with_mirror(frame_width, frame_height, orientation, mirror)
        }
        None => platform_geometry(platform, frame_width, frame_height, orientation, facing),
    };

    if geometry.aspect_multiplier == 0.0 {
        tracing::warn!(frame_width, frame_height, "Frame size unknown, geometry is unmeasured");
    }

    println!("Platform: {platform}");
    println!("  Frame: {frame_width}x{frame_height} rotated {}°", orientation.degrees());
    println!("  Facing: {facing:?}");
    println!("{}", serde_json::to_string_pretty(&geometry)?);
    Ok(())
}
