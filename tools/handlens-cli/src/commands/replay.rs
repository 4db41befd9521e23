//! Replay a detection recording through the stabilizer.

use std::path::PathBuf;

use handlens_landmark_model::detection::DetectionMode;
use handlens_pipeline::{
    FrameProcessor, JsonLinesRenderer, RenderContext, ScriptedDetector, SessionConfig,
    SessionStats, SyntheticFrameSource, TrackingSession,
};
use handlens_platform_core::{DisplayGeometry, PlatformGeometry};

pub struct ReplayArgs {
    pub path: PathBuf,
    pub width: f64,
    pub aspect: f64,
    pub mirror: bool,
    pub mode: DetectionMode,
    pub source_fps: u32,
    pub target_fps: u32,
}

/// Size of the synthetic frames that carry the recording's timing. Never
/// zero, so a narrow display cannot turn every frame into a malformed one.
fn frame_size(display: &DisplayGeometry) -> (u32, u32) {
    let width = display.display_width.round().max(1.0) as u32;
    let height = display.display_height().round().max(1.0) as u32;
    (width, height)
}

fn summary(args: &ReplayArgs, stats: &SessionStats) -> Vec<String> {
    let mut lines = vec![
        format!("Replayed {}", args.path.display()),
        format!("  Frames: {}", stats.frames_read),
        format!("  Rendered: {}", stats.rendered),
    ];

    let counters = [
        ("Throttled", stats.throttled),
        ("Dropped", stats.dropped),
        ("Skipped", stats.skipped),
        ("Rejected", stats.rejected),
    ];
    for (label, count) in counters {
        if count > 0 {
            lines.push(format!("  {label}: {count}"));
        }
    }

    if stats.awaiting_display > 0 {
        lines.push(format!(
            "  Awaiting display: {} (width {}, aspect {})",
            stats.awaiting_display, args.width, args.aspect
        ));
    }
    lines
}

pub async fn run(args: ReplayArgs) -> anyhow::Result<()> {
    let display = DisplayGeometry::new(args.width, PlatformGeometry::new(args.mirror, args.aspect));
    if !display.is_measured() {
        anyhow::bail!(
            "display width and aspect must be positive (width {}, aspect {})",
            args.width,
            args.aspect
        );
    }

    let detector = ScriptedDetector::from_jsonl(&args.path)
        .map_err(|e| anyhow::anyhow!("Failed to load recording: {e}"))?;
    let (frame_width, frame_height) = frame_size(&display);
    let source = SyntheticFrameSource::new(
        detector.frame_count(),
        args.source_fps,
        frame_width,
        frame_height,
    );

    let config = SessionConfig {
        display: Some(display),
        target_fps: args.target_fps,
        render: RenderContext::default(),
    };
    let mut session = TrackingSession::new(
        config,
        FrameProcessor::new(Box::new(detector), args.mode),
        source,
        JsonLinesRenderer::new(std::io::stdout()),
    );

    let stats = session.run().await?;

    eprintln!();
    for line in summary(&args, &stats) {
        eprintln!("{line}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(width: f64, aspect: f64) -> ReplayArgs {
        ReplayArgs {
            path: PathBuf::from("hand.jsonl"),
            width,
            aspect,
            mirror: false,
            mode: DetectionMode::Landmarks,
            source_fps: 30,
            target_fps: 0,
        }
    }

    #[test]
    fn test_frame_size_never_zero() {
        let display = DisplayGeometry::new(3.0, PlatformGeometry::new(false, 0.1));
        assert_eq!(frame_size(&display), (3, 1));

        let display = DisplayGeometry::new(640.0, PlatformGeometry::new(true, 0.75));
        assert_eq!(frame_size(&display), (640, 480));
    }

    #[test]
    fn test_summary_reports_lost_frames() {
        let stats = SessionStats {
            frames_read: 10,
            rendered: 5,
            dropped: 1,
            rejected: 4,
            ..SessionStats::default()
        };
        let lines = summary(&args(640.0, 0.75), &stats);

        assert!(lines.contains(&"  Rendered: 5".to_string()));
        assert!(lines.contains(&"  Dropped: 1".to_string()));
        assert!(lines.contains(&"  Rejected: 4".to_string()));
        assert!(!lines.iter().any(|l| l.contains("Throttled")));
    }

    #[tokio::test]
    async fn test_unmeasured_display_is_refused() {
        let err = run(args(640.0, 0.0)).await.unwrap_err();
        assert!(err.to_string().contains("aspect"));
    }
}
