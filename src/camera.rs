//! Adaptive camera.
//!
//! Wider screens pull the camera in and narrow the field of view; narrow
//! screens push it back and widen it. Every frame the live distance and FOV
//! move 10% of the way toward the viewport-derived targets, so resizing never
//! snaps the framing.
//!
//! ```text
//! target distance = clamp(30 - width / 150, 4, 16)
//! target fov      = clamp(55 - width / 100, 12, 60)
//! live           += (target - live) * 0.1
//! ```

use glam::{Mat4, Vec2, Vec3};

use crate::error::SceneError;
use crate::frame::Viewport;

/// Constants of the width → framing mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraParams {
    /// Distance at width 0, before clamping.
    pub distance_base: f32,
    /// Pixels of width per unit of distance removed.
    pub distance_divisor: f32,
    pub distance_min: f32,
    pub distance_max: f32,
    /// FOV (degrees) at width 0, before clamping.
    pub fov_base: f32,
    /// Pixels of width per degree of FOV removed.
    pub fov_divisor: f32,
    pub fov_min: f32,
    pub fov_max: f32,
    /// Fraction of the remaining gap closed per frame.
    pub smoothing: f32,
    /// Live distance before the first update.
    pub initial_distance: f32,
    /// Live FOV (degrees) before the first update.
    pub initial_fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            distance_base: 30.0,
            distance_divisor: 150.0,
            distance_min: 4.0,
            distance_max: 16.0,
            fov_base: 55.0,
            fov_divisor: 100.0,
            fov_min: 12.0,
            fov_max: 60.0,
            smoothing: 0.1,
            initial_distance: 20.0,
            initial_fov: 50.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Distance and FOV the camera is heading toward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTargets {
    pub distance: f32,
    pub fov: f32,
}

impl CameraTargets {
    /// Targets for a viewport width in pixels.
    pub fn for_width(width: f32, params: &CameraParams) -> Self {
        Self {
            distance: (params.distance_base - width / params.distance_divisor)
                .clamp(params.distance_min, params.distance_max),
            fov: (params.fov_base - width / params.fov_divisor)
                .clamp(params.fov_min, params.fov_max),
        }
    }
}

/// Live camera state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// Camera z-offset from the origin it looks at.
    pub distance: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
}

/// Perspective camera on the +Z axis looking at the origin, eased toward
/// width-derived targets.
#[derive(Debug, Clone)]
pub struct AdaptiveCamera {
    params: CameraParams,
    state: CameraState,
    aspect: f32,
    projection: Mat4,
}

impl AdaptiveCamera {
    /// Create a camera at the initial distance and FOV.
    pub fn new(params: CameraParams) -> Self {
        let state = CameraState {
            distance: params.initial_distance,
            fov: params.initial_fov,
        };
        let aspect = Viewport::default().aspect();
        Self {
            projection: perspective(state.fov, aspect, &params),
            params,
            state,
            aspect,
        }
    }

    /// Ease toward the targets for this viewport and recompute the
    /// projection. Returns [`SceneError::CameraNotReady`] (and leaves the
    /// camera untouched) while the viewport has no area.
    pub fn update(&mut self, viewport: Viewport) -> Result<CameraState, SceneError> {
        if !viewport.is_usable() {
            return Err(SceneError::CameraNotReady);
        }

        let target = CameraTargets::for_width(viewport.width, &self.params);
        let k = self.params.smoothing;
        self.state.distance += (target.distance - self.state.distance) * k;
        self.state.fov += (target.fov - self.state.fov) * k;

        self.aspect = viewport.aspect();
        self.projection = perspective(self.state.fov, self.aspect, &self.params);
        Ok(self.state)
    }

    /// Current live state.
    #[inline]
    pub fn state(&self) -> CameraState {
        self.state
    }

    /// Tuning constants.
    #[inline]
    pub fn params(&self) -> &CameraParams {
        &self.params
    }

    /// World-space camera position.
    pub fn position(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.state.distance)
    }

    /// View matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), Vec3::ZERO, Vec3::Y)
    }

    /// Projection matrix as of the last update.
    #[inline]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    /// Projection times view.
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }

    /// World-space width and height visible on the `z = 0` plane.
    pub fn visible_extent(&self) -> Vec2 {
        let height = 2.0 * self.state.distance * (self.state.fov.to_radians() * 0.5).tan();
        Vec2::new(height * self.aspect, height)
    }
}

impl Default for AdaptiveCamera {
    fn default() -> Self {
        Self::new(CameraParams::default())
    }
}

fn perspective(fov_degrees: f32, aspect: f32, params: &CameraParams) -> Mat4 {
    Mat4::perspective_rh(fov_degrees.to_radians(), aspect, params.near, params.far)
}
