//! Map one normalized landmark to display pixels.

use handlens_landmark_model::point::Point3D;
use handlens_platform_core::PlatformGeometry;

pub fn run(x: f64, y: f64, width: f64, aspect: f64, mirror: bool) -> anyhow::Result<()> {
    let point = Point3D::new(x, y, 0.0);
    if !point.is_valid() {
        tracing::warn!(x, y, "Point lies outside the frame; the stabilizer would drop it");
    }

    let geometry = PlatformGeometry::new(mirror, aspect);
    let screen = handlens_stabilizer::transform(&point, width, &geometry);
    println!("{}", serde_json::to_string(&screen)?);
    Ok(())
}
