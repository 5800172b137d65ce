//! The scene driver.
//!
//! [`Scene`] owns everything that lives for the duration of the hero: the
//! physics world, the arena of objects indexed by id, the body registry, the
//! pointer proxy and the camera. Objects enter and leave only through
//! [`Scene::spawn`] and [`Scene::despawn`], which keep the arena, the
//! registry and the physics world in step.
//!
//! Each displayed frame runs [`Scene::tick`] with a [`FrameSnapshot`], in a
//! fixed order:
//!
//! 1. camera eases toward the viewport targets
//! 2. pointer proxy moves under the cursor
//! 3. every object gets its centering and drift impulses
//! 4. colliders follow a change of scale tier
//! 5. physics advances by the frame delta
//!
//! Presses go through [`Scene::impact`] between frames.
//!
//! ```ignore
//! let mut scene = Scene::new(SceneConfig::default());
//! scene.populate(&mut rng);
//! loop {
//!     scene.tick(&frame);
//!     renderer.render(&scene.instances(), &scene.camera());
//! }
//! ```

use glam::{EulerRot, Mat4, Quat, Vec3};
use rand::Rng;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::behavior::{generate_objects, MaterialType, ScaleTier, SimulatedObject};
use crate::camera::AdaptiveCamera;
use crate::color::Rgb;
use crate::config::SceneConfig;
use crate::error::SceneError;
use crate::frame::{FrameSnapshot, Viewport};
use crate::impact::{ImpactDispatcher, ImpactSummary};
use crate::physics::{BodyHandle, PhysicsWorld, RigidBodies};
use crate::pointer::{PointerProxy, PointerState};
use crate::registry::{BodyRegistry, ObjectId};
use crate::theme::{ThemeBroadcast, ThemePalette, ThemeSource};

/// Per-object data the renderer needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectInstance {
    pub id: ObjectId,
    /// Translation × rotation × uniform visual scale.
    pub model: Mat4,
    /// Linear RGB.
    pub color: Vec3,
    pub material: MaterialType,
}

/// The hero scene.
pub struct Scene {
    config: SceneConfig,
    theme: Arc<ThemeBroadcast>,
    physics: PhysicsWorld,
    registry: BodyRegistry,
    objects: BTreeMap<ObjectId, SimulatedObject>,
    proxy: PointerProxy,
    camera: AdaptiveCamera,
    dispatcher: ImpactDispatcher,
    tier: ScaleTier,
}

impl Scene {
    /// Create an empty scene on the process-wide theme. A config with a
    /// non-default palette gets a theme of its own instead, since the global
    /// one is fixed to the default palette.
    ///
    /// The theme index starts at 0 for every new scene; listeners already
    /// subscribed to the global theme stay subscribed.
    pub fn new(config: SceneConfig) -> Self {
        let theme = if config.palette == ThemePalette::default() {
            ThemeBroadcast::global()
        } else {
            log::debug!("Custom palette, using a private theme");
            Arc::new(ThemeBroadcast::new(config.palette))
        };
        Self::with_theme(config, theme)
    }

    /// Create an empty scene on a given theme, resetting its index to 0.
    pub fn with_theme(config: SceneConfig, theme: Arc<ThemeBroadcast>) -> Self {
        theme.reset();
        let mut physics = PhysicsWorld::new();
        let mut proxy = PointerProxy::new(config.proxy);
        proxy.spawn(&mut physics);

        Self {
            camera: AdaptiveCamera::new(config.camera),
            dispatcher: ImpactDispatcher::new(config.impact),
            tier: ScaleTier::from_width(Viewport::default().width),
            registry: BodyRegistry::new(),
            objects: BTreeMap::new(),
            config,
            theme,
            physics,
            proxy,
        }
    }

    /// Generate and spawn the configured objects. Returns how many were
    /// spawned.
    pub fn populate<R: Rng>(&mut self, rng: &mut R) -> usize {
        let objects = generate_objects(&self.config.population, rng);
        let count = objects.len();
        for object in objects {
            self.spawn(object);
        }
        log::info!("Scene populated with {} objects", count);
        count
    }

    /// Add an object and its rigid body. Spawning an id that already exists
    /// replaces the old object and destroys its body.
    pub fn spawn(&mut self, object: SimulatedObject) -> BodyHandle {
        if self.despawn(object.id) {
            log::debug!("Respawning {}", object.id);
        }

        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            object.rotation.x,
            object.rotation.y,
            object.rotation.z,
        );
        let radius = self.config.bodies.radius_for_scale(self.tier.factor());
        let handle = self
            .physics
            .spawn_dynamic(object.position, rotation, radius, &self.config.bodies);

        self.registry.register(object.id, handle);
        self.objects.insert(object.id, object);
        log::debug!("Spawned {} at {:?}", object.id, object.position);
        handle
    }

    /// Remove an object and destroy its body in the same call. Returns
    /// `false` if the id was not spawned.
    pub fn despawn(&mut self, id: ObjectId) -> bool {
        let Some(handle) = self.registry.unregister(id) else {
            return false;
        };
        self.objects.remove(&id);
        self.physics.remove(handle);
        log::debug!("Despawned {}", id);
        true
    }

    /// Run one frame.
    pub fn tick(&mut self, frame: &FrameSnapshot) {
        if let Err(err) = self.camera.update(frame.viewport) {
            log::trace!("Camera skipped this frame: {}", err);
        }

        if let Err(err) =
            self.proxy
                .update(&mut self.physics, frame.pointer_ndc, self.camera.visible_extent())
        {
            log::trace!("Pointer proxy skipped this frame: {}", err);
        }

        let Self {
            registry,
            objects,
            physics,
            config,
            ..
        } = self;
        registry.for_each(|_, id, handle| {
            let Some(object) = objects.get(&id) else {
                return;
            };
            if let Err(err) = object.apply_frame_forces(physics, handle, frame.elapsed, &config.forces) {
                log::trace!("Forces skipped for {}: {}", id, err);
            }
        });

        if frame.viewport.is_usable() {
            self.set_tier(ScaleTier::from_width(frame.viewport.width));
        }

        self.physics.step(frame.delta);
    }

    /// Fire a shockwave from the current pointer position and advance the
    /// theme.
    pub fn impact<R: Rng>(&mut self, rng: &mut R) -> ImpactSummary {
        let center = self.proxy.state().position;
        self.dispatcher.dispatch(
            &mut self.registry,
            &mut self.physics,
            center,
            &self.theme,
            rng,
        )
    }

    /// Render data for every live object, in id order.
    pub fn instances(&self) -> Vec<ObjectInstance> {
        let scale = Vec3::splat(self.tier.factor());
        self.objects
            .values()
            .filter_map(|object| {
                let handle = self.registry.get(object.id)?;
                let pose = self
                    .physics
                    .translation(handle)
                    .and_then(|t| Ok((t, self.physics.rotation(handle)?)));
                let (translation, rotation) = match pose {
                    Ok(pose) => pose,
                    Err(err) => {
                        log::trace!("Not drawing {}: {}", object.id, err);
                        return None;
                    }
                };
                Some(ObjectInstance {
                    id: object.id,
                    model: Mat4::from_scale_rotation_translation(scale, rotation, translation),
                    color: object.color(self.theme.as_ref()).to_linear(),
                    material: object.material,
                })
            })
            .collect()
    }

    /// Live position of an object.
    pub fn object_position(&self, id: ObjectId) -> Result<Vec3, SceneError> {
        let handle = self.registry.get(id).ok_or(SceneError::UnknownObject(id))?;
        self.physics.translation(handle)
    }

    /// Clear color behind the objects.
    pub fn background_color(&self) -> Rgb {
        self.theme.background_color()
    }

    /// Accent tint for the key light.
    pub fn accent_color(&self) -> Rgb {
        self.theme.accent_color()
    }

    /// Release every body and forget every object. Safe to call more than
    /// once; later calls do nothing.
    pub fn teardown(&mut self) {
        if self.objects.is_empty() && self.proxy.handle().is_none() && self.physics.body_count() == 0 {
            return;
        }
        let count = self.objects.len();
        self.proxy.despawn(&mut self.physics);
        self.registry.clear();
        self.objects.clear();
        self.physics.clear();
        log::info!("Scene torn down ({} objects released)", count);
    }

    fn set_tier(&mut self, tier: ScaleTier) {
        if tier == self.tier {
            return;
        }
        log::debug!("Scale tier {:?} -> {:?}", self.tier, tier);
        self.tier = tier;

        let radius = self.config.bodies.radius_for_scale(tier.factor());
        for (id, handle) in self.registry.entries() {
            if let Err(err) = self.physics.set_ball_radius(handle, radius) {
                log::trace!("Collider resize skipped for {}: {}", id, err);
            }
        }
    }

    // ========== Accessors ==========

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn theme(&self) -> &Arc<ThemeBroadcast> {
        &self.theme
    }

    pub fn camera(&self) -> &AdaptiveCamera {
        &self.camera
    }

    pub fn pointer(&self) -> PointerState {
        self.proxy.state()
    }

    pub fn proxy(&self) -> &PointerProxy {
        &self.proxy
    }

    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn object(&self, id: ObjectId) -> Option<&SimulatedObject> {
        self.objects.get(&id)
    }

    pub fn objects(&self) -> impl Iterator<Item = &SimulatedObject> {
        self.objects.values()
    }

    pub fn tier(&self) -> ScaleTier {
        self.tier
    }

    /// Number of spawned objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
