//! Run a synthetic hand through a tracking session.

use handlens_landmark_model::detection::DetectionMode;
use handlens_landmark_model::point::ScreenPoint;
use handlens_pipeline::{
    CollectingRenderer, FrameProcessor, RenderContext, SessionConfig, SessionStats,
    SyntheticFrameSource, SyntheticHandDetector, TrackingSession,
};
use handlens_platform_core::{DisplayGeometry, PlatformGeometry};
use serde::Serialize;

pub struct SimulateArgs {
    pub frames: u64,
    pub fps: u32,
    pub width: f64,
    pub aspect: f64,
    pub mirror: bool,
    pub dropout: u64,
    pub jitter: f64,
    pub mode: DetectionMode,
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    stats: SessionStats,
    /// Mean per-landmark movement between consecutive frames, in pixels.
    raw_motion_px: f64,
    stabilized_motion_px: f64,
    reduction_pct: f64,
    last_gesture: Option<String>,
}

/// Mean per-point displacement across consecutive frames of equal length.
fn mean_motion(frames: &[Vec<ScreenPoint>]) -> f64 {
    let mut total = 0.0;
    let mut count = 0usize;
    for pair in frames.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if a.is_empty() || a.len() != b.len() {
            continue;
        }
        total += a.iter().zip(b).map(|(p, q)| p.distance_to(q)).sum::<f64>();
        count += a.len();
    }

    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

pub async fn run(args: SimulateArgs) -> anyhow::Result<()> {
    let display = DisplayGeometry::new(args.width, PlatformGeometry::new(args.mirror, args.aspect));
    if !display.is_measured() {
        anyhow::bail!(
            "display width and aspect must be positive (width {}, aspect {})",
            args.width,
            args.aspect
        );
    }

    let detector = SyntheticHandDetector::new()
        .with_jitter(args.jitter)
        .with_dropout(args.dropout);
    let reference = detector.clone();

    let config = SessionConfig {
        display: Some(display),
        target_fps: 0,
        render: RenderContext::default(),
    };
    let mut session = TrackingSession::new(
        config,
        FrameProcessor::new(Box::new(detector), args.mode),
        SyntheticFrameSource::new(
            args.frames,
            args.fps,
            args.width as u32,
            display.display_height() as u32,
        ),
        CollectingRenderer::new(),
    );

    let stats = session.run().await?;
    let sets = session.into_renderer().into_sets();

    let raw: Vec<Vec<ScreenPoint>> = sets
        .iter()
        .map(|set| {
            let detection = reference.detection_for(set.frame_number);
            handlens_stabilizer::transform_all(detection.valid_landmarks(), &display)
        })
        .collect();
    let stabilized: Vec<Vec<ScreenPoint>> = sets.iter().map(|set| set.points.clone()).collect();

    let raw_motion_px = mean_motion(&raw);
    let stabilized_motion_px = mean_motion(&stabilized);
    let reduction_pct = if raw_motion_px > 0.0 {
        (1.0 - stabilized_motion_px / raw_motion_px) * 100.0
    } else {
        0.0
    };

    let report = SimulationReport {
        stats,
        raw_motion_px,
        stabilized_motion_px,
        reduction_pct,
        last_gesture: sets.last().and_then(|set| set.gesture_caption()),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Simulated {} frames @ {}fps", args.frames, args.fps);
    println!(
        "  Display: {:.0}x{:.0} (mirror: {})",
        args.width,
        display.display_height(),
        args.mirror
    );
    println!("  Rendered: {}", report.stats.rendered);
    if args.dropout > 0 {
        println!("  Dropout: every {} frames", args.dropout);
    }
    println!();
    println!("Motion per landmark per frame:");
    println!("  Raw:        {:.2}px", report.raw_motion_px);
    println!("  Stabilized: {:.2}px", report.stabilized_motion_px);
    println!("  Reduction:  {:.1}%", report.reduction_pct);
    if let Some(gesture) = &report.last_gesture {
        println!("  Last gesture: {gesture}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_motion_skips_length_changes() {
        let frames = vec![
            vec![ScreenPoint::new(0.0, 0.0), ScreenPoint::new(10.0, 0.0)],
            vec![ScreenPoint::new(3.0, 4.0), ScreenPoint::new(10.0, 0.0)],
            vec![ScreenPoint::new(100.0, 100.0)],
            vec![],
        ];
        assert!((mean_motion(&frames) - 2.5).abs() < 1e-9);
        assert_eq!(mean_motion(&[]), 0.0);
    }

    #[tokio::test]
    async fn test_simulation_runs_in_both_modes() {
        for mode in [DetectionMode::Landmarks, DetectionMode::Gesture] {
            let args = SimulateArgs {
                frames: 20,
                fps: 30,
                width: 640.0,
                aspect: 0.75,
                mirror: true,
                dropout: 7,
                jitter: 0.01,
                mode,
                json: true,
            };
            run(args).await.unwrap();
        }
    }
}
