//! Pointer and viewport input.
//!
//! [`Input`] turns raw winit window events into the two things the scene
//! consumes: the pointer in normalized device coordinates and the viewport
//! size in logical pixels. Left-button presses are queued so the render loop can dispatch one
//! impact per press even if several arrive between redraws.

use glam::Vec2;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};

use crate::frame::Viewport;

/// Pointer and viewport state for the render loop.
#[derive(Debug)]
pub struct Input {
    pointer_position: Vec2,
    pointer_ndc: Vec2,
    pending_presses: u32,
    /// Physical pixels, as winit reports them.
    window_size: (u32, u32),
    scale_factor: f64,
}

impl Input {
    /// Create a tracker for a window of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pointer_position: Vec2::ZERO,
            pointer_ndc: Vec2::ZERO,
            pending_presses: 0,
            window_size: (width, height),
            scale_factor: 1.0,
        }
    }

    /// Pointer position in physical window pixels.
    pub fn pointer_position(&self) -> Vec2 {
        self.pointer_position
    }

    /// Pointer in normalized device coordinates (-1 to 1).
    ///
    /// Origin is at the center of the window. X increases to the right, Y
    /// increases upward.
    pub fn pointer_ndc(&self) -> Vec2 {
        self.pointer_ndc
    }

    /// Current viewport in logical pixels.
    pub fn viewport(&self) -> Viewport {
        let logical = PhysicalSize::new(self.window_size.0, self.window_size.1)
            .to_logical::<f32>(self.scale_factor);
        Viewport::new(logical.width, logical.height)
    }

    /// Display scale factor of the window.
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Number of presses since the last call, resetting the count.
    pub fn take_presses(&mut self) -> u32 {
        std::mem::take(&mut self.pending_presses)
    }

    pub(crate) fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
        // Keep NDC consistent with the new size
        self.cursor_moved(self.pointer_position);
    }

    pub(crate) fn set_scale_factor(&mut self, scale_factor: f64) {
        if scale_factor.is_finite() && scale_factor > 0.0 {
            self.scale_factor = scale_factor;
        }
    }

    /// Process a winit window event.
    pub(crate) fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.pressed(),

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(Vec2::new(position.x as f32, position.y as f32));
            }

            WindowEvent::Resized(size) => self.set_window_size(size.width, size.height),

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.set_scale_factor(*scale_factor);
            }

            _ => {}
        }
    }

    fn pressed(&mut self) {
        self.pending_presses = self.pending_presses.saturating_add(1);
    }

    fn cursor_moved(&mut self, position: Vec2) {
        self.pointer_position = position;

        let (w, h) = self.window_size;
        if w > 0 && h > 0 {
            self.pointer_ndc = Vec2::new(
                (position.x / w as f32) * 2.0 - 1.0,
                1.0 - (position.y / h as f32) * 2.0, // Y flipped
            )
            .clamp(Vec2::NEG_ONE, Vec2::ONE);
        }
    }
}

impl Default for Input {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_ndc() {
        let mut input = Input::new(800, 600);

        input.cursor_moved(Vec2::new(400.0, 300.0));
        assert!(input.pointer_ndc().length() < 1e-6);

        input.cursor_moved(Vec2::new(0.0, 0.0));
        assert_eq!(input.pointer_ndc(), Vec2::new(-1.0, 1.0));

        input.cursor_moved(Vec2::new(800.0, 600.0));
        assert_eq!(input.pointer_ndc(), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_ndc_clamped_outside_window() {
        let mut input = Input::new(100, 100);
        input.cursor_moved(Vec2::new(-50.0, 250.0));
        assert_eq!(input.pointer_ndc(), Vec2::new(-1.0, -1.0));
    }

    #[test]
    fn test_resize_recomputes_ndc() {
        let mut input = Input::new(800, 600);
        input.cursor_moved(Vec2::new(400.0, 300.0));

        input.set_window_size(1600, 600);
        assert_eq!(input.pointer_ndc(), Vec2::new(-0.5, 0.0));
        assert_eq!(input.viewport(), Viewport::new(1600.0, 600.0));
    }

    #[test]
    fn test_viewport_is_logical() {
        let mut input = Input::new(1280, 720);
        input.set_scale_factor(2.0);
        input.handle_event(&WindowEvent::Resized(PhysicalSize::new(2560, 1440)));

        assert_eq!(input.viewport(), Viewport::new(1280.0, 720.0));
        assert_eq!(input.scale_factor(), 2.0);

        // NDC is a ratio, so the cursor stays in physical pixels
        input.cursor_moved(Vec2::new(1920.0, 360.0));
        assert_eq!(input.pointer_position(), Vec2::new(1920.0, 360.0));
        assert_eq!(input.pointer_ndc(), Vec2::new(0.5, 0.5));
    }

    #[test]
    fn test_invalid_scale_factor_ignored() {
        let mut input = Input::new(800, 600);
        input.set_scale_factor(0.0);
        input.set_scale_factor(f64::NAN);
        assert_eq!(input.scale_factor(), 1.0);
        assert_eq!(input.viewport(), Viewport::new(800.0, 600.0));
    }

    #[test]
    fn test_presses_are_drained() {
        let mut input = Input::default();
        input.pressed();
        input.pressed();

        assert_eq!(input.take_presses(), 2);
        assert_eq!(input.take_presses(), 0);
    }

    #[test]
    fn test_zero_sized_window_keeps_last_ndc() {
        let mut input = Input::new(800, 600);
        input.cursor_moved(Vec2::new(600.0, 150.0));
        let before = input.pointer_ndc();

        input.set_window_size(0, 0);
        assert_eq!(input.pointer_ndc(), before);
        assert!(!input.viewport().is_usable());
    }
}
