//! Renderer seam.
//!
//! Drawing state lives in a [`RenderContext`] owned by the caller and
//! passed into every draw call. Renderers hold no paint state of their own
//! between frames.

use std::io::Write;

use handlens_common::error::{HandlensError, HandlensResult};
use handlens_landmark_model::point_set::StablePointSet;

/// Per-session drawing state.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    /// Point sets drawn so far.
    pub frames_drawn: u64,

    /// Marker radius in display pixels.
    pub point_radius: f64,

    /// Draw the gesture caption alongside the points.
    pub show_caption: bool,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            frames_drawn: 0,
            point_radius: 6.0,
            show_caption: true,
        }
    }
}

/// Draws one stabilized point set.
pub trait Renderer: Send {
    fn render(&mut self, ctx: &mut RenderContext, set: &StablePointSet) -> HandlensResult<()>;
}

/// Writes each point set as one JSON line.
#[derive(Debug)]
pub struct JsonLinesRenderer<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> JsonLinesRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Renderer for JsonLinesRenderer<W> {
    fn render(&mut self, ctx: &mut RenderContext, set: &StablePointSet) -> HandlensResult<()> {
        let line = if ctx.show_caption || set.gesture.is_none() {
            serde_json::to_string(set)?
        } else {
            serde_json::to_string(&StablePointSet {
                gesture: None,
                ..set.clone()
            })?
        };

        writeln!(self.out, "{line}")
            .map_err(|e| HandlensError::render(format!("frame {}: {e}", set.frame_number)))?;
        ctx.frames_drawn += 1;
        Ok(())
    }
}

/// Keeps every point set in memory.
#[derive(Debug, Default, Clone)]
pub struct CollectingRenderer {
    sets: Vec<StablePointSet>,
}

impl CollectingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sets(&self) -> &[StablePointSet] {
        &self.sets
    }

    pub fn into_sets(self) -> Vec<StablePointSet> {
        self.sets
    }
}

impl Renderer for CollectingRenderer {
    fn render(&mut self, ctx: &mut RenderContext, set: &StablePointSet) -> HandlensResult<()> {
        self.sets.push(set.clone());
        ctx.frames_drawn += 1;
        Ok(())
    }
}
