//! Clock and pacing utilities for the frame loop.
//!
//! Every tracking session is anchored to a monotonic epoch recorded when the
//! session starts. Frame timestamps are nanoseconds relative to that epoch.

use std::time::Instant;

/// A session clock that provides monotonic timestamps relative to
/// a fixed epoch (the moment the session started).
#[derive(Debug, Clone)]
pub struct SessionClock {
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339).
    epoch_wall: String,
}

impl SessionClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Nanoseconds elapsed since the session started.
    pub fn elapsed_ns(&self) -> u64 {
        self.epoch.elapsed().as_nanos() as u64
    }

    /// Wall-clock time at session start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    pub fn ns_to_secs(ns: u64) -> f64 {
        ns as f64 / 1_000_000_000.0
    }
}

/// Admits frames at most at a target rate.
///
/// Accepted frames are held to an ideal schedule of `interval_ns` steps, so a
/// source whose rate is an exact multiple of the target is decimated evenly
/// even when its timestamps are truncated to whole nanoseconds. A source that
/// falls a full interval behind the schedule restarts it.
#[derive(Debug)]
pub struct FramePacer {
    interval_ns: u64,

    /// Early arrival still counted as on time.
    slack_ns: u64,
    next_due_ns: Option<u64>,
    rejected: u64,
}

impl FramePacer {
    /// Create a pacer targeting `target_fps`. Zero disables pacing.
    pub fn new(target_fps: u32) -> Self {
        let interval_ns = if target_fps == 0 {
            0
        } else {
            1_000_000_000 / target_fps as u64
        };
        Self {
            interval_ns,
            slack_ns: interval_ns / 10,
            next_due_ns: None,
            rejected: 0,
        }
    }

    /// Decide whether a frame stamped `timestamp_ns` should be processed.
    /// The first frame is always accepted.
    pub fn accept(&mut self, timestamp_ns: u64) -> bool {
        if self.interval_ns == 0 {
            return true;
        }

        let next_due = match self.next_due_ns {
            None => timestamp_ns.saturating_add(self.interval_ns),
            Some(due) if timestamp_ns.saturating_add(self.slack_ns) < due => {
                self.rejected += 1;
                return false;
            }
            Some(due) if timestamp_ns < due.saturating_add(self.interval_ns) => {
                due.saturating_add(self.interval_ns)
            }
            Some(_) => timestamp_ns.saturating_add(self.interval_ns),
        };

        self.next_due_ns = Some(next_due);
        true
    }

    /// Forget the schedule, e.g. after a pause.
    pub fn reset(&mut self) {
        self.next_due_ns = None;
    }

    pub fn interval_ns(&self) -> u64 {
        self.interval_ns
    }

    /// Number of frames rejected so far.
    pub fn rejected(&self) -> u64 {
        self.rejected
    }
}
