//! Tunable constants of the scene, gathered in one place.
//!
//! There is no runtime configuration surface; [`SceneConfig::default`]
//! reproduces the tuned values and the `with_*` methods exist for tests,
//! benches and embedders that want a different look.
//!
//! ```ignore
//! let config = SceneConfig::default()
//!     .with_object_count(12)
//!     .with_impact(ImpactParams { radius: 10.0, ..Default::default() });
//! ```

use glam::Vec3;

use crate::behavior::{ForceParams, PopulationParams};
use crate::camera::CameraParams;
use crate::geometry::GeometryParams;
use crate::impact::ImpactParams;
use crate::physics::BodyParams;
use crate::pointer::ProxyParams;
use crate::theme::ThemePalette;

/// Everything the scene reads at construction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SceneConfig {
    pub population: PopulationParams,
    pub forces: ForceParams,
    pub bodies: BodyParams,
    pub impact: ImpactParams,
    pub camera: CameraParams,
    pub proxy: ProxyParams,
    pub geometry: GeometryParams,
    pub palette: ThemePalette,
}

impl SceneConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of objects. The class split is clamped to fit.
    pub fn with_object_count(mut self, count: u32) -> Self {
        self.population.count = count;
        self.population.colored = self.population.colored.min(count);
        self.population.matte = self.population.matte.min(count - self.population.colored);
        self
    }

    /// Set how many objects are theme-colored and how many are matte.
    pub fn with_class_split(mut self, colored: u32, matte: u32) -> Self {
        self.population.colored = colored;
        self.population.matte = matte;
        self
    }

    /// Set the full size of the spawn box.
    pub fn with_spawn_extent(mut self, extent: Vec3) -> Self {
        self.population.spawn_extent = extent;
        self
    }

    pub fn with_forces(mut self, forces: ForceParams) -> Self {
        self.forces = forces;
        self
    }

    pub fn with_bodies(mut self, bodies: BodyParams) -> Self {
        self.bodies = bodies;
        self
    }

    pub fn with_impact(mut self, impact: ImpactParams) -> Self {
        self.impact = impact;
        self
    }

    pub fn with_camera(mut self, camera: CameraParams) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_proxy(mut self, proxy: ProxyParams) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn with_geometry(mut self, geometry: GeometryParams) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_palette(mut self, palette: ThemePalette) -> Self {
        self.palette = palette;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SceneConfig::default();
        assert_eq!(config.population.count, 34);
        assert_eq!(config.population.colored, 20);
        assert_eq!(config.population.matte, 8);
        assert_eq!(config.forces.centering, 0.45);
        assert_eq!(config.impact.radius, 18.0);
        assert_eq!(config.bodies.mass, 6.0);
        assert_eq!(config.proxy.half_extents, Vec3::new(0.3, 0.3, 10.0));
    }

    #[test]
    fn test_object_count_clamps_split() {
        let config = SceneConfig::new().with_object_count(24);
        assert_eq!(config.population.colored, 20);
        assert_eq!(config.population.matte, 4);

        let config = SceneConfig::new().with_object_count(5);
        assert_eq!(config.population.colored, 5);
        assert_eq!(config.population.matte, 0);
    }

    #[test]
    fn test_builders_replace_each_section() {
        let forces = ForceParams {
            centering: 0.9,
            ..ForceParams::default()
        };
        let bodies = BodyParams {
            mass: 2.0,
            ..BodyParams::default()
        };
        let impact = ImpactParams {
            radius: 10.0,
            ..ImpactParams::default()
        };
        let camera = CameraParams {
            smoothing: 0.5,
            ..CameraParams::default()
        };
        let proxy = ProxyParams {
            half_extents: Vec3::new(1.0, 1.0, 4.0),
        };
        let geometry = GeometryParams {
            curve_segments: 12,
            ..GeometryParams::default()
        };
        let mut palette = ThemePalette::default();
        palette.objects[0] = crate::color::Rgb::hex(0x123456);

        let config = SceneConfig::new()
            .with_class_split(4, 2)
            .with_spawn_extent(Vec3::splat(5.0))
            .with_forces(forces)
            .with_bodies(bodies)
            .with_impact(impact)
            .with_camera(camera)
            .with_proxy(proxy)
            .with_geometry(geometry)
            .with_palette(palette);

        assert_eq!(config.population.colored, 4);
        assert_eq!(config.population.matte, 2);
        assert_eq!(config.population.spawn_extent, Vec3::splat(5.0));
        assert_eq!(config.forces, forces);
        assert_eq!(config.bodies, bodies);
        assert_eq!(config.impact, impact);
        assert_eq!(config.camera, camera);
        assert_eq!(config.proxy, proxy);
        assert_eq!(config.geometry, geometry);
        assert_eq!(config.palette, palette);
        // Untouched sections keep their defaults
        assert_eq!(config.population.count, 34);
    }

    #[test]
    fn test_oversized_class_split_clamps_on_count() {
        let config = SceneConfig::new()
            .with_class_split(u32::MAX, 1)
            .with_object_count(10);
        assert_eq!(config.population.colored, 10);
        assert_eq!(config.population.matte, 0);
    }
}
