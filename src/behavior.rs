//! Per-object behavior: frame forces, material classes and placement.
//!
//! Each frame every object gets two impulses added together:
//!
//! - **Centering**: `-position * 0.45`, a soft tether back to the origin.
//! - **Drift**: `(sin(t * 0.4 + x0), cos(t * 0.4 + y0), 0) * 0.2`, where
//!   `(x0, y0)` is the object's spawn position so objects breathe out of
//!   phase with each other.
//!
//! Placement is generated once per scene with [`generate_objects`] and never
//! regenerated.

use glam::Vec3;
use rand::Rng;
use std::f32::consts::PI;

use crate::color::Rgb;
use crate::error::SceneError;
use crate::physics::{BodyHandle, RigidBodies};
use crate::registry::ObjectId;
use crate::theme::ThemeSource;

// ========== Material classes ==========

/// Surface finish used by the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Finish {
    pub roughness: f32,
    pub clearcoat: f32,
}

/// Visual class of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialType {
    /// Near-black, low sheen.
    Matte,
    /// Painted in the current theme color.
    Glossy,
    /// Off-white plastic.
    Pale,
}

impl MaterialType {
    /// Numeric class as the renderer's instance data stores it.
    pub fn index(self) -> u32 {
        match self {
            MaterialType::Matte => 0,
            MaterialType::Glossy => 1,
            MaterialType::Pale => 2,
        }
    }

    /// Fixed base color. Glossy objects normally take the theme color
    /// instead; this is their fallback.
    pub fn base_color(self) -> Rgb {
        match self {
            MaterialType::Matte => Rgb::hex(0x0B0B0B),
            MaterialType::Glossy => Rgb::hex(0xFFFFFF),
            MaterialType::Pale => Rgb::hex(0xD8D8D8),
        }
    }

    pub fn finish(self) -> Finish {
        match self {
            MaterialType::Matte => Finish {
                roughness: 0.32,
                clearcoat: 0.45,
            },
            MaterialType::Glossy => Finish {
                roughness: 0.26,
                clearcoat: 0.6,
            },
            MaterialType::Pale => Finish {
                roughness: 0.30,
                clearcoat: 0.55,
            },
        }
    }
}

// ========== Objects ==========

/// One floating object. Placement is fixed at creation; live pose belongs to
/// the physics body registered under `id`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedObject {
    pub id: ObjectId,
    /// Spawn position. Also the phase offset of the drift force.
    pub position: Vec3,
    /// Spawn orientation as XYZ Euler angles in radians.
    pub rotation: Vec3,
    pub is_colored: bool,
    pub material: MaterialType,
}

impl SimulatedObject {
    /// Render color: the theme color for colored objects, otherwise the
    /// material's own color.
    pub fn color(&self, theme: &dyn ThemeSource) -> Rgb {
        if self.is_colored {
            theme.object_color()
        } else {
            self.material.base_color()
        }
    }

    /// Apply this frame's centering and drift impulses.
    ///
    /// Fails with [`SceneError::StaleHandle`] if the body is gone; the caller
    /// skips the object for this frame.
    pub fn apply_frame_forces<B: RigidBodies + ?Sized>(
        &self,
        bodies: &mut B,
        handle: BodyHandle,
        elapsed: f32,
        params: &ForceParams,
    ) -> Result<(), SceneError> {
        let position = bodies.translation(handle)?;
        bodies.apply_impulse(handle, params.centering_impulse(position))?;
        bodies.apply_impulse(handle, params.drift_impulse(elapsed, self.position))?;
        Ok(())
    }
}

/// Magnitudes of the per-frame forces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceParams {
    /// Pull toward the origin per unit of distance.
    pub centering: f32,
    /// Peak drift impulse.
    pub drift_amplitude: f32,
    /// Drift angular frequency in rad/s.
    pub drift_frequency: f32,
}

impl Default for ForceParams {
    fn default() -> Self {
        Self {
            centering: 0.45,
            drift_amplitude: 0.2,
            drift_frequency: 0.4,
        }
    }
}

impl ForceParams {
    #[inline]
    pub fn centering_impulse(&self, position: Vec3) -> Vec3 {
        -position * self.centering
    }

    #[inline]
    pub fn drift_impulse(&self, elapsed: f32, spawn: Vec3) -> Vec3 {
        let phase = elapsed * self.drift_frequency;
        Vec3::new(
            (phase + spawn.x).sin() * self.drift_amplitude,
            (phase + spawn.y).cos() * self.drift_amplitude,
            0.0,
        )
    }
}

// ========== Scale tiers ==========

/// Viewport width classes that pick the visual scale of objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScaleTier {
    /// Up to 640 px.
    Small,
    /// Up to 1024 px.
    Medium,
    /// Anything wider.
    Large,
}

impl ScaleTier {
    pub fn from_width(width: f32) -> Self {
        if width <= 640.0 {
            ScaleTier::Small
        } else if width <= 1024.0 {
            ScaleTier::Medium
        } else {
            ScaleTier::Large
        }
    }

    /// Uniform visual scale applied to the mesh.
    pub fn factor(self) -> f32 {
        match self {
            ScaleTier::Small => 0.85,
            ScaleTier::Medium => 0.95,
            ScaleTier::Large => 1.15,
        }
    }
}

// ========== Generation ==========

/// How many objects to create and how they are split into classes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationParams {
    pub count: u32,
    /// The first `colored` objects are glossy and theme-colored.
    pub colored: u32,
    /// The next `matte` objects are matte; the rest are pale.
    pub matte: u32,
    /// Full size of the spawn box, centered on the origin.
    pub spawn_extent: Vec3,
}

impl Default for PopulationParams {
    fn default() -> Self {
        Self {
            count: 34,
            colored: 20,
            matte: 8,
            spawn_extent: Vec3::new(18.0, 15.0, 6.0),
        }
    }
}

impl PopulationParams {
    /// Material class for the object at `index`.
    pub fn class_of(&self, index: u32) -> (bool, MaterialType) {
        if index < self.colored {
            (true, MaterialType::Glossy)
        } else if index < self.colored.saturating_add(self.matte) {
            (false, MaterialType::Matte)
        } else {
            (false, MaterialType::Pale)
        }
    }
}

/// Create the scene's objects with random placement.
pub fn generate_objects<R: Rng>(
    params: &PopulationParams,
    rng: &mut R,
) -> Vec<SimulatedObject> {
    (0..params.count)
        .map(|i| {
            let (is_colored, material) = params.class_of(i);
            let jitter = Vec3::new(
                rng.gen::<f32>() - 0.5,
                rng.gen::<f32>() - 0.5,
                rng.gen::<f32>() - 0.5,
            );
            SimulatedObject {
                id: ObjectId(i),
                position: jitter * params.spawn_extent,
                rotation: Vec3::new(
                    rng.gen::<f32>() * PI,
                    rng.gen::<f32>() * PI,
                    rng.gen::<f32>() * PI,
                ),
                is_colored,
                material,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeBroadcast;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use rapier3d::prelude::RigidBodyHandle;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Recorder {
        positions: HashMap<BodyHandle, Vec3>,
        impulses: Vec<(BodyHandle, Vec3)>,
    }

    impl RigidBodies for Recorder {
        fn translation(&self, handle: BodyHandle) -> Result<Vec3, SceneError> {
            self.positions
                .get(&handle)
                .copied()
                .ok_or(SceneError::StaleHandle(handle))
        }

        fn rotation(&self, handle: BodyHandle) -> Result<glam::Quat, SceneError> {
            self.translation(handle).map(|_| glam::Quat::IDENTITY)
        }

        fn apply_impulse(&mut self, handle: BodyHandle, impulse: Vec3) -> Result<(), SceneError> {
            self.translation(handle)?;
            self.impulses.push((handle, impulse));
            Ok(())
        }

        fn apply_torque_impulse(&mut self, handle: BodyHandle, _: Vec3) -> Result<(), SceneError> {
            self.translation(handle).map(|_| ())
        }

        fn set_kinematic_translation(&mut self, handle: BodyHandle, _: Vec3) -> Result<(), SceneError> {
            self.translation(handle).map(|_| ())
        }
    }

    fn object(position: Vec3) -> SimulatedObject {
        SimulatedObject {
            id: ObjectId(0),
            position,
            rotation: Vec3::ZERO,
            is_colored: true,
            material: MaterialType::Glossy,
        }
    }

    #[test]
    fn test_centering_points_at_origin() {
        let params = ForceParams::default();
        let impulse = params.centering_impulse(Vec3::new(2.0, -4.0, 1.0));
        assert_eq!(impulse, Vec3::new(-0.9, 1.8, -0.45));
    }

    #[test]
    fn test_drift_bounded_and_planar() {
        let params = ForceParams::default();
        for step in 0..200 {
            let drift = params.drift_impulse(step as f32 * 0.1, Vec3::new(3.0, -1.0, 2.0));
            assert_eq!(drift.z, 0.0);
            assert!(drift.x.abs() <= 0.2 + 1e-6);
            assert!(drift.y.abs() <= 0.2 + 1e-6);
        }
    }

    #[test]
    fn test_drift_desynchronized_by_spawn_position() {
        let params = ForceParams::default();
        let a = params.drift_impulse(1.0, Vec3::new(0.0, 0.0, 0.0));
        let b = params.drift_impulse(1.0, Vec3::new(1.5, 2.0, 0.0));
        assert_ne!(a, b);
    }

    #[test]
    fn test_frame_forces_apply_both_impulses() {
        let handle = BodyHandle(RigidBodyHandle::from_raw_parts(0, 0));
        let mut bodies = Recorder::default();
        bodies.positions.insert(handle, Vec3::new(1.0, 0.0, 0.0));

        let params = ForceParams::default();
        let obj = object(Vec3::new(0.5, 0.25, 0.0));
        obj.apply_frame_forces(&mut bodies, handle, 2.0, &params).unwrap();

        assert_eq!(bodies.impulses.len(), 2);
        assert_eq!(bodies.impulses[0].1, Vec3::new(-0.45, 0.0, 0.0));
        assert_eq!(bodies.impulses[1].1, params.drift_impulse(2.0, obj.position));
    }

    #[test]
    fn test_frame_forces_on_stale_handle() {
        let handle = BodyHandle(RigidBodyHandle::from_raw_parts(3, 0));
        let mut bodies = Recorder::default();

        let result = object(Vec3::ZERO).apply_frame_forces(&mut bodies, handle, 0.0, &ForceParams::default());
        assert_eq!(result, Err(SceneError::StaleHandle(handle)));
        assert!(bodies.impulses.is_empty());
    }

    #[test]
    fn test_scale_tiers() {
        assert_eq!(ScaleTier::from_width(320.0), ScaleTier::Small);
        assert_eq!(ScaleTier::from_width(640.0), ScaleTier::Small);
        assert_eq!(ScaleTier::from_width(641.0), ScaleTier::Medium);
        assert_eq!(ScaleTier::from_width(1024.0), ScaleTier::Medium);
        assert_eq!(ScaleTier::from_width(1025.0), ScaleTier::Large);
        assert_eq!(ScaleTier::Large.factor(), 1.15);
    }

    #[test]
    fn test_generated_classes_and_bounds() {
        let params = PopulationParams::default();
        let mut rng = SmallRng::seed_from_u64(7);
        let objects = generate_objects(&params, &mut rng);

        assert_eq!(objects.len(), 34);
        assert_eq!(objects.iter().filter(|o| o.is_colored).count(), 20);
        assert_eq!(objects.iter().filter(|o| o.material == MaterialType::Matte).count(), 8);
        assert_eq!(objects.iter().filter(|o| o.material == MaterialType::Pale).count(), 6);
        assert_eq!(objects[33].id, ObjectId(33));

        let half = params.spawn_extent * 0.5;
        for o in &objects {
            assert!(o.position.abs().cmple(half).all());
            assert!(o.rotation.cmpge(Vec3::ZERO).all() && o.rotation.cmple(Vec3::splat(PI)).all());
        }
    }

    #[test]
    fn test_class_split_near_u32_max() {
        let params = PopulationParams {
            count: 3,
            colored: u32::MAX,
            matte: 1,
            ..PopulationParams::default()
        };
        assert_eq!(params.class_of(0), (true, MaterialType::Glossy));
        assert_eq!(params.class_of(u32::MAX - 1), (true, MaterialType::Glossy));

        let params = PopulationParams {
            count: 3,
            colored: 1,
            matte: u32::MAX,
            ..PopulationParams::default()
        };
        assert_eq!(params.class_of(2), (false, MaterialType::Matte));

        let objects = generate_objects(&params, &mut SmallRng::seed_from_u64(1));
        assert_eq!(objects.len(), 3);
    }

    #[test]
    fn test_color_resolution() {
        let theme = ThemeBroadcast::default();
        let colored = object(Vec3::ZERO);
        assert_eq!(colored.color(&theme), Rgb::hex(0x1F3FBF));

        theme.advance();
        assert_eq!(colored.color(&theme), Rgb::hex(0x8FBF00));

        let pale = SimulatedObject {
            is_colored: false,
            material: MaterialType::Pale,
            ..colored
        };
        assert_eq!(pale.color(&theme), Rgb::hex(0xD8D8D8));
    }
}
