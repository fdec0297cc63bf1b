//! Frame loop state for one tree view
//!
//! The host calls [`Animator::tick`] once per displayed frame with the handle
//! it got from [`Animator::start`]. Restarting the loop hands out a new handle
//! and cancels the old one, so a stale caller can never drive a second loop.

use crate::canvas::Canvas;
use crate::config::TreeConfig;
use crate::error::Result;
use crate::geometry::{build_tree, Segment};
use crate::render::{advance_reveal, render_frame, Frame};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use std::rc::Rc;

/// Wind phase advance per tick at wind speed 1.0
pub const WIND_STEP: f64 = 0.02;

/// Registration token for the running frame loop
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameHandle(u64);

/// What `Animator::apply` did with a new config
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Change {
    Unchanged,
    Restarted,
    Rebuilt,
}

pub struct Animator {
    config: TreeConfig,
    width: u32,
    height: u32,
    segments: Rc<[Segment]>,
    wind_time: f64,
    reveal: usize,
    active: Option<FrameHandle>,
    next_handle: u64,
    tree_rng: StdRng,
    dot_rng: StdRng,
}

impl Animator {
    /// Build the first tree for a `width` x `height` surface. The loop starts stopped.
    pub fn new(config: TreeConfig, width: u32, height: u32, seed: u64) -> Self {
        let mut animator = Self {
            config,
            width,
            height,
            segments: Rc::from(Vec::<Segment>::new()),
            wind_time: 0.0,
            reveal: 0,
            active: None,
            next_handle: 0,
            tree_rng: StdRng::seed_from_u64(seed),
            dot_rng: StdRng::seed_from_u64(seed.wrapping_add(1)),
        };
        animator.rebuild();
        animator
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn segments(&self) -> &Rc<[Segment]> {
        &self.segments
    }

    pub fn reveal(&self) -> usize {
        self.reveal
    }

    pub fn wind_time(&self) -> f64 {
        self.wind_time
    }

    pub fn active(&self) -> Option<FrameHandle> {
        self.active
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Register a fresh frame loop, cancelling any previous one
    pub fn start(&mut self) -> FrameHandle {
        self.stop();
        self.next_handle += 1;
        let handle = FrameHandle(self.next_handle);
        self.active = Some(handle);
        log::debug!("frame loop {} started", handle.0);
        handle
    }

    /// Cancel the frame loop, if any
    pub fn stop(&mut self) {
        if let Some(handle) = self.active.take() {
            log::debug!("frame loop {} cancelled", handle.0);
        }
    }

    /// Run one frame for `handle`.
    ///
    /// Returns the handle to use for the next frame, or `None` when `handle`
    /// is no longer the active registration. Without a surface nothing
    /// happens and the registration is kept.
    pub fn tick(&mut self, handle: FrameHandle, surface: Option<&mut Canvas>) -> Option<FrameHandle> {
        if self.active != Some(handle) {
            return None;
        }
        let Some(canvas) = surface else {
            return Some(handle);
        };

        if self.config.wind {
            self.wind_time += WIND_STEP * self.config.wind_speed;
        }
        self.draw(canvas);
        Some(handle)
    }

    /// Take a new config: rebuild on shape edits, restart the loop on any edit
    pub fn apply(&mut self, config: TreeConfig) -> Change {
        let change = if self.config.shape_changed(&config) {
            Change::Rebuilt
        } else if self.config.animation_changed(&config) {
            Change::Restarted
        } else {
            Change::Unchanged
        };

        self.config = config;
        match change {
            Change::Rebuilt => {
                self.rebuild();
                self.reveal = 0;
                self.start();
            }
            Change::Restarted => {
                self.start();
            }
            Change::Unchanged => {}
        }
        change
    }

    /// Regenerate the tree and draw it fully grown, skipping the grow animation once
    pub fn redraw(&mut self, surface: Option<&mut Canvas>) {
        let Some(canvas) = surface else {
            return;
        };
        self.rebuild();
        self.reveal = self.segments.len();
        self.draw(canvas);
    }

    /// Save the surface as it was last drawn. Returns false when there is no surface.
    pub fn export(&self, surface: Option<&Canvas>, path: &Path) -> Result<bool> {
        let Some(canvas) = surface else {
            return Ok(false);
        };
        canvas.save_png(path)?;
        log::info!(
            "exported {}x{} frame ({}/{} segments) to {}",
            canvas.width(),
            canvas.height(),
            self.reveal.min(self.segments.len()),
            self.segments.len(),
            path.display()
        );
        Ok(true)
    }

    fn rebuild(&mut self) {
        let segments = build_tree(&self.config, self.width, self.height, &mut self.tree_rng);
        log::debug!("built tree: depth {} -> {} segments", self.config.depth, segments.len());
        self.segments = Rc::from(segments);
    }

    fn draw(&mut self, canvas: &mut Canvas) {
        let frame = Frame {
            segments: &self.segments,
            config: &self.config,
            wind_time: self.wind_time,
            reveal: self.reveal,
        };
        render_frame(canvas, &frame, &mut self.dot_rng);
        self.reveal = advance_reveal(self.reveal, self.segments.len(), self.config.grow, self.config.grow_speed);
    }
}

impl Drop for Animator {
    fn drop(&mut self) {
        self.stop();
    }
}
