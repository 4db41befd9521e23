//! Normalized landmark → display pixel mapping.

use handlens_landmark_model::point::{Point3D, ScreenPoint};
use handlens_platform_core::{DisplayGeometry, PlatformGeometry};

/// Map a normalized landmark into display pixels.
///
/// `x' = (mirror ? 1 - x : x) * W` and `y' = y * W * R`, where `W` is the
/// display width and `R` the aspect multiplier. Both axes scale by the
/// display width so that the aspect multiplier alone decides the height.
///
/// No clamping is applied: off-screen handling belongs to the caller.
/// A zero `W` or `R` collapses the result onto the origin.
pub fn transform(point: &Point3D, display_width: f64, geometry: &PlatformGeometry) -> ScreenPoint {
    let x = if geometry.mirror {
        1.0 - point.x
    } else {
        point.x
    };
    ScreenPoint {
        x: x * display_width,
        y: point.y * display_width * geometry.aspect_multiplier,
    }
}

/// Transform every point with the same display geometry.
pub fn transform_all<'a, I>(points: I, display: &DisplayGeometry) -> Vec<ScreenPoint>
where
    I: IntoIterator<Item = &'a Point3D>,
{
    points
        .into_iter()
        .map(|p| transform(p, display.display_width, &display.platform))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirrored_transform() {
        let p = Point3D::new(0.3, 0.4, 0.0);
        let mirrored = transform(&p, 400.0, &PlatformGeometry::new(true, 1.0));
        assert!((mirrored.x - 280.0).abs() < 1e-9);
        assert!((mirrored.y - 160.0).abs() < 1e-9);

        let plain = transform(&p, 400.0, &PlatformGeometry::new(false, 1.0));
        assert!((plain.x - 120.0).abs() < 1e-9);
        assert!((plain.y - 160.0).abs() < 1e-9);
    }

    #[test]
    fn test_aspect_scales_only_y() {
        let p = Point3D::new(0.5, 0.5, 0.0);
        let out = transform(&p, 300.0, &PlatformGeometry::new(false, 16.0 / 9.0));
        assert!((out.x - 150.0).abs() < 1e-9);
        assert!((out.y - 0.5 * 300.0 * 16.0 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_unset_geometry_is_degenerate() {
        let p = Point3D::new(0.8, 0.9, 0.0);
        let out = transform(&p, 0.0, &PlatformGeometry::new(false, 1.0));
        assert_eq!(out, ScreenPoint::new(0.0, 0.0));

        let out = transform(&p, 500.0, &PlatformGeometry::new(false, 0.0));
        assert_eq!(out.y, 0.0);
    }

    #[test]
    fn test_no_clamping() {
        let p = Point3D::new(1.5, -0.5, 0.0);
        let out = transform(&p, 100.0, &PlatformGeometry::new(false, 1.0));
        assert!((out.x - 150.0).abs() < 1e-9);
        assert!((out.y + 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_transform_all_keeps_order() {
        let points = [Point3D::new(0.0, 0.0, 0.0), Point3D::new(1.0, 1.0, 0.0)];
        let display = DisplayGeometry::new(200.0, PlatformGeometry::new(true, 2.0));
        let out = transform_all(&points, &display);
        assert_eq!(out, vec![ScreenPoint::new(200.0, 0.0), ScreenPoint::new(0.0, 400.0)]);
    }
}
