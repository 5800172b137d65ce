//! Pointer proxy: a kinematic collision volume that follows the cursor.
//!
//! The proxy is a long, thin box elongated along Z so it reaches objects at
//! any depth of the cluster. Its pose is set directly every frame; contacts
//! never push it back, but it shoves dynamic bodies out of its way.
//!
//! The last commanded position is kept in [`PointerState`], which the impact
//! dispatcher reads as the shockwave center.

use glam::{Vec2, Vec3};

use crate::error::SceneError;
use crate::physics::{BodyHandle, PhysicsWorld, RigidBodies};

/// World-space pointer position, last value only.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    pub position: Vec3,
}

/// Shape of the proxy body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProxyParams {
    pub half_extents: Vec3,
}

impl Default for ProxyParams {
    fn default() -> Self {
        Self {
            half_extents: Vec3::new(0.3, 0.3, 10.0),
        }
    }
}

/// Map normalized device coordinates onto the `z = 0` plane.
///
/// `visible_extent` is the world-space width and height of that plane as seen
/// by the camera.
#[inline]
pub fn world_position(ndc: Vec2, visible_extent: Vec2) -> Vec3 {
    (ndc * visible_extent * 0.5).extend(0.0)
}

/// Drives the proxy body and publishes its position.
#[derive(Debug, Clone, Default)]
pub struct PointerProxy {
    params: ProxyParams,
    handle: Option<BodyHandle>,
    state: PointerState,
}

impl PointerProxy {
    /// A proxy with no body yet. Call [`Self::spawn`] before driving it.
    pub fn new(params: ProxyParams) -> Self {
        Self {
            params,
            handle: None,
            state: PointerState::default(),
        }
    }

    /// Create the kinematic body at the current pointer position. Replaces
    /// any body spawned earlier.
    pub fn spawn(&mut self, world: &mut PhysicsWorld) -> BodyHandle {
        if let Some(old) = self.handle.take() {
            world.remove(old);
        }
        let handle = world.spawn_kinematic_box(self.state.position, self.params.half_extents);
        self.handle = Some(handle);
        handle
    }

    /// Destroy the body. Safe to call when nothing is spawned.
    pub fn despawn(&mut self, world: &mut PhysicsWorld) {
        if let Some(handle) = self.handle.take() {
            world.remove(handle);
        }
    }

    /// Move the proxy under the pointer for this frame.
    ///
    /// Returns [`SceneError::ProxyNotReady`] without touching anything if the
    /// body has not been spawned. The published position only changes once
    /// the body has accepted the command.
    pub fn update<B: RigidBodies + ?Sized>(
        &mut self,
        bodies: &mut B,
        ndc: Vec2,
        visible_extent: Vec2,
    ) -> Result<Vec3, SceneError> {
        let handle = self.handle.ok_or(SceneError::ProxyNotReady)?;
        let position = world_position(ndc, visible_extent);
        bodies.set_kinematic_translation(handle, position)?;
        self.state.position = position;
        Ok(position)
    }

    /// Last published pointer state.
    #[inline]
    pub fn state(&self) -> PointerState {
        self.state
    }

    #[inline]
    pub fn handle(&self) -> Option<BodyHandle> {
        self.handle
    }

    #[inline]
    pub fn params(&self) -> &ProxyParams {
        &self.params
    }
}
