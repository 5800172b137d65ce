//! Rigid-body world backed by rapier.
//!
//! The rest of the crate never touches rapier types directly. It talks to
//! bodies through the [`RigidBodies`] trait, which keeps the force and impact
//! code testable with a recording double, and asks [`PhysicsWorld::step`] to
//! advance the simulation once per frame.

use glam::{Quat, Vec3};
use rapier3d::prelude::*;

use crate::error::SceneError;

/// Longest step the world will integrate in one call. Longer frames (a
/// backgrounded tab, a debugger pause) are clamped so bodies don't tunnel.
pub const MAX_STEP: f32 = 1.0 / 15.0;

/// Opaque reference to a rigid body owned by the [`PhysicsWorld`].
///
/// Holding a handle does not keep the body alive. Once the body is removed
/// every access through the handle fails with [`SceneError::StaleHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub(crate) RigidBodyHandle);

/// Physical properties of the floating objects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyParams {
    /// Mass of each object.
    pub mass: f32,
    /// Linear damping. High values make motion feel viscous.
    pub linear_damping: f32,
    /// Angular damping, keeps spins from running forever.
    pub angular_damping: f32,
    /// Bounciness of contacts.
    pub restitution: f32,
    /// Ball collider radius at the reference visual scale.
    pub collider_radius: f32,
    /// Visual scale at which `collider_radius` applies unchanged.
    pub reference_scale: f32,
}

impl BodyParams {
    /// Collider radius for a given visual scale factor.
    pub fn radius_for_scale(&self, scale: f32) -> f32 {
        self.collider_radius * (scale / self.reference_scale)
    }
}

impl Default for BodyParams {
    fn default() -> Self {
        Self {
            mass: 6.0,
            linear_damping: 5.5,
            angular_damping: 3.5,
            restitution: 0.1,
            collider_radius: 2.0,
            reference_scale: 1.15,
        }
    }
}

/// Access to rigid bodies by handle.
///
/// Every operation may fail with [`SceneError::StaleHandle`] when the body has
/// been destroyed; callers in the frame loop skip that body and carry on.
pub trait RigidBodies {
    /// World-space position of the body.
    fn translation(&self, handle: BodyHandle) -> Result<Vec3, SceneError>;

    /// World-space orientation of the body.
    fn rotation(&self, handle: BodyHandle) -> Result<Quat, SceneError>;

    /// Apply an instantaneous change of linear momentum, waking the body.
    fn apply_impulse(&mut self, handle: BodyHandle, impulse: Vec3) -> Result<(), SceneError>;

    /// Apply an instantaneous change of angular momentum, waking the body.
    fn apply_torque_impulse(&mut self, handle: BodyHandle, torque: Vec3) -> Result<(), SceneError>;

    /// Set where a kinematic body will be at the end of the next step.
    fn set_kinematic_translation(
        &mut self,
        handle: BodyHandle,
        translation: Vec3,
    ) -> Result<(), SceneError>;
}

/// Zero-gravity rapier world holding the floating objects and the pointer
/// proxy.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    /// Create an empty world with no gravity.
    pub fn new() -> Self {
        Self {
            gravity: vector![0.0, 0.0, 0.0],
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Number of live bodies, including the pointer proxy.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Whether the handle still refers to a live body.
    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains(handle.0)
    }

    /// Insert a dynamic body with a ball collider.
    pub fn spawn_dynamic(
        &mut self,
        position: Vec3,
        rotation: Quat,
        radius: f32,
        params: &BodyParams,
    ) -> BodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(to_vector(position))
            .rotation(to_vector(rotation.to_scaled_axis()))
            .linear_damping(params.linear_damping)
            .angular_damping(params.angular_damping)
            .build();
        let collider = ColliderBuilder::ball(radius)
            .mass(params.mass)
            .restitution(params.restitution)
            .build();

        let handle = self.bodies.insert(body);
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        BodyHandle(handle)
    }

    /// Insert a kinematic, position-driven body with a cuboid collider.
    ///
    /// Its pose is set by [`RigidBodies::set_kinematic_translation`]; contacts
    /// never move it, but it still pushes dynamic bodies out of the way.
    pub fn spawn_kinematic_box(&mut self, position: Vec3, half_extents: Vec3) -> BodyHandle {
        let body = RigidBodyBuilder::kinematic_position_based()
            .translation(to_vector(position))
            .build();
        let collider =
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z).build();

        let handle = self.bodies.insert(body);
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        BodyHandle(handle)
    }

    /// Remove a body and its colliders. Returns `false` if it was already gone.
    pub fn remove(&mut self, handle: BodyHandle) -> bool {
        self.bodies
            .remove(
                handle.0,
                &mut self.island_manager,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    /// Replace the ball collider(s) of a body with ones of a new radius.
    pub fn set_ball_radius(&mut self, handle: BodyHandle, radius: f32) -> Result<(), SceneError> {
        let body = self
            .bodies
            .get(handle.0)
            .ok_or(SceneError::StaleHandle(handle))?;
        for collider_handle in body.colliders().to_vec() {
            if let Some(collider) = self.colliders.get_mut(collider_handle) {
                collider.set_shape(SharedShape::ball(radius));
            }
        }
        Ok(())
    }

    /// Radius of the body's first ball collider, if it has one.
    pub fn ball_radius(&self, handle: BodyHandle) -> Option<f32> {
        let body = self.bodies.get(handle.0)?;
        let collider = self.colliders.get(*body.colliders().first()?)?;
        collider.shape().as_ball().map(|ball| ball.radius)
    }

    /// Linear velocity of a body.
    pub fn linear_velocity(&self, handle: BodyHandle) -> Result<Vec3, SceneError> {
        self.bodies
            .get(handle.0)
            .map(|body| from_vector(body.linvel()))
            .ok_or(SceneError::StaleHandle(handle))
    }

    /// Angular velocity of a body.
    pub fn angular_velocity(&self, handle: BodyHandle) -> Result<Vec3, SceneError> {
        self.bodies
            .get(handle.0)
            .map(|body| from_vector(body.angvel()))
            .ok_or(SceneError::StaleHandle(handle))
    }

    /// Advance the simulation by `dt` seconds (clamped to [`MAX_STEP`]).
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.integration_parameters.dt = dt.min(MAX_STEP);

        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Drop every body and collider. Safe to call more than once.
    pub fn clear(&mut self) {
        let handles: Vec<RigidBodyHandle> = self.bodies.iter().map(|(h, _)| h).collect();
        for handle in handles {
            self.remove(BodyHandle(handle));
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl RigidBodies for PhysicsWorld {
    fn translation(&self, handle: BodyHandle) -> Result<Vec3, SceneError> {
        self.bodies
            .get(handle.0)
            .map(|body| from_vector(body.translation()))
            .ok_or(SceneError::StaleHandle(handle))
    }

    fn rotation(&self, handle: BodyHandle) -> Result<Quat, SceneError> {
        let body = self
            .bodies
            .get(handle.0)
            .ok_or(SceneError::StaleHandle(handle))?;
        let q = body.rotation();
        Ok(Quat::from_xyzw(q.i, q.j, q.k, q.w))
    }

    fn apply_impulse(&mut self, handle: BodyHandle, impulse: Vec3) -> Result<(), SceneError> {
        let body = self
            .bodies
            .get_mut(handle.0)
            .ok_or(SceneError::StaleHandle(handle))?;
        body.apply_impulse(to_vector(impulse), true);
        Ok(())
    }

    fn apply_torque_impulse(&mut self, handle: BodyHandle, torque: Vec3) -> Result<(), SceneError> {
        let body = self
            .bodies
            .get_mut(handle.0)
            .ok_or(SceneError::StaleHandle(handle))?;
        body.apply_torque_impulse(to_vector(torque), true);
        Ok(())
    }

    fn set_kinematic_translation(
        &mut self,
        handle: BodyHandle,
        translation: Vec3,
    ) -> Result<(), SceneError> {
        let body = self
            .bodies
            .get_mut(handle.0)
            .ok_or(SceneError::StaleHandle(handle))?;
        body.set_next_kinematic_translation(to_vector(translation));
        Ok(())
    }
}

#[inline]
fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

#[inline]
fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_and_remove() {
        let mut world = PhysicsWorld::new();
        let handle = world.spawn_dynamic(Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY, 2.0, &BodyParams::default());

        assert_eq!(world.body_count(), 1);
        assert_eq!(world.translation(handle), Ok(Vec3::new(1.0, 2.0, 3.0)));

        assert!(world.remove(handle));
        assert!(!world.remove(handle));
        assert_eq!(world.translation(handle), Err(SceneError::StaleHandle(handle)));
        assert_eq!(
            world.apply_impulse(handle, Vec3::X),
            Err(SceneError::StaleHandle(handle))
        );
    }

    #[test]
    fn test_impulse_moves_body() {
        let mut world = PhysicsWorld::new();
        let handle = world.spawn_dynamic(Vec3::ZERO, Quat::IDENTITY, 1.0, &BodyParams::default());
        world.step(1.0 / 60.0);

        world.apply_impulse(handle, Vec3::new(30.0, 0.0, 0.0)).unwrap();
        world.step(1.0 / 60.0);

        assert!(world.linear_velocity(handle).unwrap().x > 0.0);
        assert!(world.translation(handle).unwrap().x > 0.0);
    }

    #[test]
    fn test_torque_impulse_spins_body() {
        let mut world = PhysicsWorld::new();
        let handle = world.spawn_dynamic(Vec3::ZERO, Quat::IDENTITY, 1.0, &BodyParams::default());
        world.step(1.0 / 60.0);

        world.apply_torque_impulse(handle, Vec3::new(0.0, 50.0, 0.0)).unwrap();
        world.step(1.0 / 60.0);

        assert!(world.angular_velocity(handle).unwrap().y > 0.0);
    }

    #[test]
    fn test_kinematic_body_follows_target() {
        let mut world = PhysicsWorld::new();
        let proxy = world.spawn_kinematic_box(Vec3::ZERO, Vec3::new(0.3, 0.3, 10.0));

        world.set_kinematic_translation(proxy, Vec3::new(4.0, -2.0, 0.0)).unwrap();
        world.step(1.0 / 60.0);

        let position = world.translation(proxy).unwrap();
        assert!((position - Vec3::new(4.0, -2.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_set_ball_radius() {
        let mut world = PhysicsWorld::new();
        let params = BodyParams::default();
        let handle = world.spawn_dynamic(Vec3::ZERO, Quat::IDENTITY, params.radius_for_scale(1.15), &params);
        assert_eq!(world.ball_radius(handle), Some(2.0));

        world.set_ball_radius(handle, params.radius_for_scale(0.85)).unwrap();
        let radius = world.ball_radius(handle).unwrap();
        assert!((radius - 2.0 * 0.85 / 1.15).abs() < 1e-5);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut world = PhysicsWorld::new();
        world.spawn_dynamic(Vec3::ZERO, Quat::IDENTITY, 1.0, &BodyParams::default());
        world.spawn_kinematic_box(Vec3::ZERO, Vec3::ONE);

        world.clear();
        assert_eq!(world.body_count(), 0);
        world.clear();
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn test_step_clamps_long_frames() {
        let mut world = PhysicsWorld::new();
        world.step(2.0);
        assert!((world.integration_parameters.dt - MAX_STEP).abs() < f32::EPSILON);
    }
}
