//! Per-frame input snapshot.
//!
//! The driver captures everything a frame depends on (clock, viewport,
//! pointer) into one [`FrameSnapshot`] and passes it explicitly to each step
//! function. No step reads state written by another callback behind its back.

use glam::Vec2;

/// Viewport size in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width over height. Degenerate viewports report 1.0.
    pub fn aspect(&self) -> f32 {
        if self.width > 0.0 && self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Whether both dimensions are positive.
    pub fn is_usable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Everything one frame of simulation reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSnapshot {
    /// Seconds since the scene started.
    pub elapsed: f32,
    /// Seconds since the previous frame.
    pub delta: f32,
    /// Current viewport.
    pub viewport: Viewport,
    /// Pointer in normalized device coordinates, `[-1, 1]` on both axes,
    /// y up.
    pub pointer_ndc: Vec2,
}

impl FrameSnapshot {
    /// A 60 Hz frame at `elapsed` seconds with the pointer centered.
    pub fn at(elapsed: f32, viewport: Viewport) -> Self {
        Self {
            elapsed,
            delta: 1.0 / 60.0,
            viewport,
            pointer_ndc: Vec2::ZERO,
        }
    }

    /// Same frame with a different pointer position.
    pub fn with_pointer(mut self, ndc: Vec2) -> Self {
        self.pointer_ndc = ndc;
        self
    }
}
