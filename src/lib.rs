//! # Hero Scene
//!
//! An interactive, physically simulated 3D hero: a cluster of floating rigid
//! objects held together by a soft pull toward the origin, nudged by a
//! pointer-driven collision proxy and scattered by click shockwaves, under a
//! camera that reframes itself for the viewport width.
//!
//! ## Quick Start
//!
//! ```ignore
//! use hero_scene::prelude::*;
//!
//! fn main() -> Result<(), SimulationError> {
//!     Hero::new()
//!         .with_title("Studio")
//!         .with_config(SceneConfig::default().with_object_count(30))
//!         .run()
//! }
//! ```
//!
//! ## Driving a scene without a window
//!
//! [`Scene`] is usable on its own. Feed it one [`FrameSnapshot`] per frame
//! and call [`Scene::impact`] for each press:
//!
//! ```ignore
//! let mut rng = SmallRng::seed_from_u64(1);
//! let mut scene = Scene::new(SceneConfig::default());
//! scene.populate(&mut rng);
//!
//! for i in 0..600 {
//!     let frame = FrameSnapshot::at(i as f32 / 60.0, Viewport::new(1920.0, 1080.0));
//!     scene.tick(&frame);
//! }
//! scene.impact(&mut rng);
//! ```
//!
//! ## Core Concepts
//!
//! | Piece | Role |
//! |-------|------|
//! | [`geometry`] | the shared cross-shaped mesh, tessellated once |
//! | [`BodyRegistry`] | object id → rigid body, safe to mutate while iterating |
//! | [`behavior`] | centering + drift impulses, material classes, scale tiers |
//! | [`PointerProxy`] | kinematic box under the cursor |
//! | [`ImpactDispatcher`] | radial impulse/torque shockwave, advances the theme |
//! | [`AdaptiveCamera`] | width-driven distance and FOV, eased every frame |
//! | [`ThemeBroadcast`] | process-wide theme index with subscribers |
//!
//! ## Theme listeners
//!
//! UI outside the scene follows the theme through [`ThemeBroadcast::global`]:
//!
//! ```ignore
//! let theme = ThemeBroadcast::global();
//! let events = theme.subscribe();
//! header.set_accent(&theme.current_color());
//! for event in events.try_iter() {
//!     if let ThemeEvent::ColorChanged { color, .. } = event {
//!         header.set_accent(&color);
//!     }
//! }
//! ```

mod app;
pub mod behavior;
pub mod camera;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
mod gpu;
pub mod impact;
pub mod input;
pub mod physics;
pub mod pointer;
pub mod registry;
pub mod scene;
pub mod theme;
pub mod time;

pub use app::Hero;
pub use behavior::{MaterialType, ScaleTier, SimulatedObject};
pub use camera::{AdaptiveCamera, CameraState};
pub use color::Rgb;
pub use config::SceneConfig;
pub use error::{GpuError, SceneError, SimulationError};
pub use frame::{FrameSnapshot, Viewport};
pub use glam::{Vec2, Vec3};
pub use impact::{ImpactDispatcher, ImpactSummary};
pub use physics::{BodyHandle, PhysicsWorld, RigidBodies};
pub use pointer::{PointerProxy, PointerState};
pub use registry::{BodyRegistry, ObjectId};
pub use scene::{ObjectInstance, Scene};
pub use theme::{ThemeBroadcast, ThemeEvent, ThemePalette, ThemeSource};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use hero_scene::prelude::*;
/// ```
pub mod prelude {
    pub use crate::app::Hero;
    pub use crate::behavior::{MaterialType, ScaleTier, SimulatedObject};
    pub use crate::camera::AdaptiveCamera;
    pub use crate::color::Rgb;
    pub use crate::config::SceneConfig;
    pub use crate::error::{SceneError, SimulationError};
    pub use crate::frame::{FrameSnapshot, Viewport};
    pub use crate::impact::ImpactSummary;
    pub use crate::registry::ObjectId;
    pub use crate::scene::Scene;
    pub use crate::theme::{ThemeBroadcast, ThemeEvent, ThemeSource};
    pub use crate::{Vec2, Vec3};
}
