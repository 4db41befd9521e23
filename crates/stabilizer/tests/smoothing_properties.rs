use handlens_landmark_model::detection::DetectionResult;
use handlens_landmark_model::point::{Point3D, ScreenPoint};
use handlens_platform_core::{DisplayGeometry, PlatformGeometry};
use handlens_stabilizer::{transform, LandmarkStabilizer};
use proptest::prelude::*;

fn point() -> impl Strategy<Value = Point3D> {
    (0.0f64..=1.0, 0.0f64..=1.0, -1.0f64..1.0).prop_map(|(x, y, z)| Point3D::new(x, y, z))
}

fn two_frames_same_len() -> impl Strategy<Value = (Vec<Point3D>, Vec<Point3D>)> {
    (1usize..43).prop_flat_map(|n| {
        (
            prop::collection::vec(point(), n),
            prop::collection::vec(point(), n),
        )
    })
}

proptest! {
    #[test]
    fn empty_detection_always_resets(first in prop::collection::vec(point(), 0..30)) {
        let mut stabilizer = LandmarkStabilizer::<Point3D>::new();
        stabilizer.stabilize(first);
        prop_assert!(stabilizer.stabilize(Vec::new()).is_empty());
        prop_assert!(!stabilizer.is_tracking());
    }

    #[test]
    fn first_frame_is_unsmoothed(points in prop::collection::vec(point(), 1..30)) {
        let mut stabilizer = LandmarkStabilizer::<Point3D>::new();
        prop_assert_eq!(stabilizer.stabilize(points.clone()), points);
    }

    #[test]
    fn same_length_is_convex_combination((previous, current) in two_frames_same_len()) {
        let mut stabilizer = LandmarkStabilizer::<Point3D>::new();
        stabilizer.stabilize(previous.clone());
        let out = stabilizer.stabilize(current.clone());

        prop_assert_eq!(out.len(), current.len());
        for i in 0..out.len() {
            prop_assert!((out[i].x - (0.7 * current[i].x + 0.3 * previous[i].x)).abs() < 1e-9);
            prop_assert!((out[i].y - (0.7 * current[i].y + 0.3 * previous[i].y)).abs() < 1e-9);
            prop_assert!((out[i].z - (0.7 * current[i].z + 0.3 * previous[i].z)).abs() < 1e-9);
        }
    }

    #[test]
    fn length_change_passes_through(
        previous in prop::collection::vec(point(), 1..25),
        current in prop::collection::vec(point(), 1..25),
    ) {
        prop_assume!(previous.len() != current.len());
        let mut stabilizer = LandmarkStabilizer::<Point3D>::new();
        stabilizer.stabilize(previous);
        let out = stabilizer.stabilize(current.clone());
        prop_assert_eq!(&out, &current);
        prop_assert_eq!(stabilizer.len(), current.len());
    }

    #[test]
    fn repeated_input_converges(
        start in prop::collection::vec(point(), 5),
        target in prop::collection::vec(point(), 5),
    ) {
        let mut stabilizer = LandmarkStabilizer::<Point3D>::new();
        stabilizer.stabilize(start);
        let mut out = Vec::new();
        for _ in 0..40 {
            out = stabilizer.stabilize(target.clone());
        }
        for (o, t) in out.iter().zip(&target) {
            prop_assert!((o.x - t.x).abs() < 1e-9);
            prop_assert!((o.y - t.y).abs() < 1e-9);
        }

        // Already at the fixed point: output equals input.
        let again = stabilizer.stabilize(target.clone());
        for (o, t) in again.iter().zip(&target) {
            prop_assert!((o.x - t.x).abs() < 1e-9);
        }
    }

    #[test]
    fn smoothing_commutes_with_the_transform((previous, current) in two_frames_same_len(),
                                             width in 1.0f64..2000.0,
                                             aspect in 0.1f64..3.0,
                                             mirror in any::<bool>()) {
        let display = DisplayGeometry::new(width, PlatformGeometry::new(mirror, aspect));

        let mut screen: LandmarkStabilizer = LandmarkStabilizer::new();
        let previous_frame = DetectionResult::with_landmarks(previous.clone(), 1.0);
        let current_frame = DetectionResult::with_landmarks(current.clone(), 1.0);
        screen.stabilize_detection(&previous_frame, &display);
        let screen_out = screen.stabilize_detection(&current_frame, &display);

        let mut normalized = LandmarkStabilizer::<Point3D>::new();
        normalized.stabilize(previous);
        let normalized_out: Vec<ScreenPoint> = normalized
            .stabilize(current)
            .iter()
            .map(|p| transform(p, display.display_width, &display.platform))
            .collect();

        for (a, b) in screen_out.iter().zip(&normalized_out) {
            prop_assert!((a.x - b.x).abs() < 1e-6);
            prop_assert!((a.y - b.y).abs() < 1e-6);
        }
    }
}
