//! Tracking session lifecycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use handlens_common::clock::{FramePacer, SessionClock};
use handlens_common::error::{HandlensError, HandlensResult};
use handlens_landmark_model::detection::DetectionMode;
use handlens_platform_core::DisplayGeometry;
use parking_lot::Mutex;
use serde::Serialize;

use crate::processor::{FrameOutcome, FrameProcessor};
use crate::render::{RenderContext, Renderer};
use crate::source::FrameSource;

/// How often a paused session checks whether it was resumed.
const PAUSE_POLL: Duration = Duration::from_millis(5);

/// Configuration for a tracking session.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Display geometry, or `None` until the first layout pass.
    pub display: Option<DisplayGeometry>,

    /// Upper bound on frames processed per second (0 = unbounded).
    pub target_fps: u32,

    pub render: RenderContext,
}

/// State of a tracking session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Session created but not started.
    Idle,
    /// Frames are flowing.
    Running,
    /// Frames are held back; stabilizer state was cleared.
    Paused,
    /// Session finished.
    Stopped,
}

/// Counters for one session run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    /// Frames pulled from the source.
    pub frames_read: u64,
    /// Frames turned into a point set and drawn.
    pub rendered: u64,
    /// Frames discarded because a cycle was in flight.
    pub dropped: u64,
    /// Frames the detector failed on.
    pub skipped: u64,
    /// Frames rejected before inference.
    pub rejected: u64,
    /// Frames held back by the frame pacer.
    pub throttled: u64,
    /// Frames processed before the display was measured.
    pub awaiting_display: u64,
}

/// Control surface shared between a running session and other tasks.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    state: Arc<Mutex<SessionState>>,
    stop_flag: Arc<AtomicBool>,
    processor: Arc<FrameProcessor>,
}

impl SessionHandle {
    pub fn state(&self) -> SessionState {
        *self.state.lock()
    }

    /// Hold frames back. Stabilizer state is cleared so tracking restarts
    /// fresh on resume.
    pub fn pause(&self) -> HandlensResult<()> {
        let mut state = self.state.lock();
        if *state != SessionState::Running {
            return Err(HandlensError::session("Not running"));
        }
        *state = SessionState::Paused;
        self.processor.reset();
        tracing::info!("Tracking paused");
        Ok(())
    }

    pub fn resume(&self) -> HandlensResult<()> {
        let mut state = self.state.lock();
        if *state != SessionState::Paused {
            return Err(HandlensError::session("Not paused"));
        }
        *state = SessionState::Running;
        tracing::info!("Tracking resumed");
        Ok(())
    }

    /// Stop the session. The frame loop exits before its next frame.
    pub fn stop(&self) {
        let mut state = self.state.lock();
        if *state == SessionState::Stopped {
            return;
        }
        *state = SessionState::Stopped;
        self.stop_flag.store(true, Ordering::SeqCst);
        self.processor.reset();
        tracing::info!("Tracking stopped");
    }

    /// Switch detection mode; a change clears the stabilizer.
    pub fn switch_mode(&self, mode: DetectionMode) -> bool {
        self.processor.set_mode(mode)
    }

    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }
}

/// Pulls frames from a source, processes them and renders the results.
pub struct TrackingSession<S, R> {
    config: SessionConfig,
    source: S,
    renderer: R,
    pacer: FramePacer,
    handle: SessionHandle,
    clock: Option<SessionClock>,
    stats: SessionStats,
}

impl<S: FrameSource, R: Renderer> TrackingSession<S, R> {
    pub fn new(config: SessionConfig, processor: FrameProcessor, source: S, renderer: R) -> Self {
        let pacer = FramePacer::new(config.target_fps);
        Self {
            config,
            source,
            renderer,
            pacer,
            handle: SessionHandle {
                state: Arc::new(Mutex::new(SessionState::Idle)),
                stop_flag: Arc::new(AtomicBool::new(false)),
                processor: Arc::new(processor),
            },
            clock: None,
            stats: SessionStats::default(),
        }
    }

    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    pub fn state(&self) -> SessionState {
        self.handle.state()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn processor(&self) -> &FrameProcessor {
        &self.handle.processor
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    pub fn render_context(&self) -> &RenderContext {
        &self.config.render
    }

    /// Update the display geometry, e.g. after a layout pass or rotation.
    pub fn set_display(&mut self, display: DisplayGeometry) {
        self.config.display = Some(display);
    }

    pub fn pause(&self) -> HandlensResult<()> {
        self.handle.pause()
    }

    pub fn resume(&self) -> HandlensResult<()> {
        self.handle.resume()
    }

    pub fn stop(&self) {
        self.handle.stop()
    }

    pub fn switch_mode(&self, mode: DetectionMode) -> bool {
        self.handle.switch_mode(mode)
    }

    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.handle.stop_flag()
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.clock
            .as_ref()
            .map(|c| SessionClock::ns_to_secs(c.elapsed_ns()))
            .unwrap_or(0.0)
    }

    /// Run the frame loop until the source is exhausted or the session is
    /// stopped.
    ///
    /// Frames rejected before inference are counted and skipped. Any other
    /// error stops the session and is returned.
    pub async fn run(&mut self) -> HandlensResult<SessionStats> {
        {
            let mut state = self.handle.state.lock();
            if *state != SessionState::Idle {
                return Err(HandlensError::session("Session already started"));
            }
            *state = SessionState::Running;
        }

        let clock = SessionClock::start();
        tracing::info!(
            source = self.source.name(),
            detector = self.handle.processor.detector_name(),
            mode = ?self.handle.processor.mode(),
            started_at = clock.epoch_wall(),
            "Tracking session started"
        );
        self.clock = Some(clock);

        let result = self.frame_loop().await;

        self.handle.stop();
        self.stats.throttled = self.pacer.rejected();
        tracing::info!(
            frames = self.stats.frames_read,
            rendered = self.stats.rendered,
            dropped = self.stats.dropped,
            skipped = self.stats.skipped,
            duration_secs = self.elapsed_secs(),
            "Tracking session finished"
        );

        result.map(|_| self.stats)
    }

    async fn frame_loop(&mut self) -> HandlensResult<()> {
        let mut was_paused = false;

        loop {
            if self.handle.stop_flag.load(Ordering::SeqCst) {
                return Ok(());
            }

            match self.handle.state() {
                SessionState::Stopped => return Ok(()),
                SessionState::Paused => {
                    was_paused = true;
                    tokio::time::sleep(PAUSE_POLL).await;
                    continue;
                }
                SessionState::Idle | SessionState::Running => {}
            }

            if was_paused {
                self.pacer.reset();
                was_paused = false;
            }

            let Some(frame) = self.source.next_frame()? else {
                tracing::debug!(source = self.source.name(), "Frame source exhausted");
                return Ok(());
            };
            self.stats.frames_read += 1;

            if !self.pacer.accept(frame.timestamp_ns) {
                continue;
            }

            let outcome = self
                .handle
                .processor
                .submit(&frame, self.config.display.as_ref())
                .await;

            match outcome {
                Ok(FrameOutcome::Rendered(set)) => {
                    self.renderer.render(&mut self.config.render, &set)?;
                    self.stats.rendered += 1;
                }
                Ok(FrameOutcome::Dropped) => self.stats.dropped += 1,
                Ok(FrameOutcome::Skipped { .. }) => self.stats.skipped += 1,
                Ok(FrameOutcome::AwaitingDisplay) => self.stats.awaiting_display += 1,
                Err(e) if e.is_recoverable() => {
                    tracing::warn!(frame = frame.frame_number, error = %e, "Frame rejected");
                    self.stats.rejected += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
