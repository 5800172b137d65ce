//! Window, event loop and the `Hero` builder.
//!
//! ```ignore
//! use hero_scene::prelude::*;
//!
//! Hero::new()
//!     .with_title("Studio")
//!     .with_window_size(1600, 900)
//!     .run()?;
//! ```

use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::SceneConfig;
use crate::error::SimulationError;
use crate::frame::FrameSnapshot;
use crate::geometry::{build_object_mesh, shared_mesh, GeometryParams, MeshData};
use crate::gpu::GpuState;
use crate::input::Input;
use crate::scene::Scene;
use crate::time::FrameClock;

/// Builder for the hero window.
///
/// Use method chaining to configure, then call `.run()` to start.
pub struct Hero {
    config: SceneConfig,
    title: String,
    window_size: (u32, u32),
    seed: Option<u64>,
}

impl Hero {
    /// Create a hero with the default scene in a 1280×720 window.
    pub fn new() -> Self {
        Self {
            config: SceneConfig::default(),
            title: "Hero".to_string(),
            window_size: (1280, 720),
            seed: None,
        }
    }

    /// Replace the scene constants.
    pub fn with_config(mut self, config: SceneConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Initial window size in logical pixels.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    /// Fix the random seed so placement and torque jitter repeat between
    /// runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Open the window and run until it is closed.
    pub fn run(self) -> Result<(), SimulationError> {
        let mut rng = match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        let mesh = if self.config.geometry == GeometryParams::default() {
            shared_mesh()
        } else {
            Arc::new(build_object_mesh(&self.config.geometry))
        };

        let mut scene = Scene::new(self.config);
        scene.populate(&mut rng);

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App {
            title: self.title,
            input: Input::new(self.window_size.0, self.window_size.1),
            window_size: self.window_size,
            mesh,
            scene,
            rng,
            clock: FrameClock::new(),
            window: None,
            gpu_state: None,
            error: None,
        };
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for Hero {
    fn default() -> Self {
        Self::new()
    }
}

struct App {
    title: String,
    window_size: (u32, u32),
    mesh: Arc<MeshData>,
    scene: Scene,
    input: Input,
    clock: FrameClock,
    rng: SmallRng,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    /// Setup failure to hand back from `run` once the loop has exited.
    error: Option<SimulationError>,
}

impl App {
    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), SimulationError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.window_size.0,
                self.window_size.1,
            ));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let size = window.inner_size();
        self.input.set_scale_factor(window.scale_factor());
        self.input.set_window_size(size.width, size.height);
        self.window = Some(window.clone());
        self.gpu_state = Some(pollster::block_on(GpuState::new(window, &self.mesh))?);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (elapsed, delta) = self.clock.tick();

        for _ in 0..self.input.take_presses() {
            self.scene.impact(&mut self.rng);
        }

        let frame = FrameSnapshot {
            elapsed,
            delta,
            viewport: self.input.viewport(),
            pointer_ndc: self.input.pointer_ndc(),
        };
        self.scene.tick(&frame);

        if let Some(gpu_state) = &mut self.gpu_state {
            let instances = self.scene.instances();
            match gpu_state.render(
                &instances,
                self.scene.camera(),
                self.scene.background_color(),
                self.scene.accent_color(),
            ) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    gpu_state.reconfigure();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("GPU out of memory, exiting");
                    event_loop.exit();
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        if self.clock.frame() % 600 == 0 {
            log::debug!("{:.1} fps, {} objects", self.clock.fps(), self.scene.len());
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(err) = self.create_window(event_loop) {
                log::error!("Failed to start renderer: {}", err);
                self.error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }
            WindowEvent::Occluded(hidden) => {
                if hidden {
                    self.clock.pause();
                } else {
                    self.clock.resume();
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.scene.teardown();
        self.gpu_state = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let hero = Hero::default();
        assert_eq!(hero.title, "Hero");
        assert_eq!(hero.window_size, (1280, 720));
        assert_eq!(hero.seed, None);
        assert_eq!(hero.config, SceneConfig::default());
    }

    #[test]
    fn test_builder_chain() {
        let config = SceneConfig::default().with_object_count(12);
        let hero = Hero::new()
            .with_config(config)
            .with_title("Studio")
            .with_window_size(1600, 900)
            .with_seed(7);

        assert_eq!(hero.title, "Studio");
        assert_eq!(hero.window_size, (1600, 900));
        assert_eq!(hero.seed, Some(7));
        assert_eq!(hero.config.population.count, 12);
    }
}
