//! Error types for the hero scene.
//!
//! Two families live here. [`SceneError`] covers faults inside the simulation
//! core; they are recovered locally by the frame loop (a body is skipped for one
//! operation, a controller no-ops for one frame) and never reach the user.
//! [`GpuError`] and [`SimulationError`] cover setup of the window and renderer,
//! which propagate out of [`crate::Hero::run`].

use thiserror::Error;

use crate::physics::BodyHandle;
use crate::registry::ObjectId;

/// Faults raised by the simulation core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SceneError {
    /// The handle no longer refers to a live rigid body. Happens when a body is
    /// queried in the same frame it is being destroyed.
    #[error("rigid body {0:?} no longer exists")]
    StaleHandle(BodyHandle),
    /// No object with this id is spawned in the scene.
    #[error("object {0} is not spawned")]
    UnknownObject(ObjectId),
    /// The pointer proxy was driven before its kinematic body was created.
    #[error("pointer proxy body has not been created")]
    ProxyNotReady,
    /// The viewport has no usable size yet, so no camera can be derived from it.
    #[error("camera has no viewport to frame")]
    CameraNotReady,
}

/// Errors that can occur during GPU initialization.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found; a GPU with WebGPU/Vulkan/Metal/DX12 support is required")]
    NoAdapter,
    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
}

/// Errors that can occur when running the hero scene.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Failed to create event loop.
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_error_messages() {
        let err = SceneError::UnknownObject(ObjectId(7));
        assert_eq!(err.to_string(), "object obj-7 is not spawned");
        assert_eq!(
            SceneError::ProxyNotReady.to_string(),
            "pointer proxy body has not been created"
        );
    }

    #[test]
    fn test_gpu_error_wraps_into_simulation_error() {
        let err: SimulationError = GpuError::NoAdapter.into();
        assert!(matches!(err, SimulationError::Gpu(GpuError::NoAdapter)));
        assert!(err.to_string().starts_with("GPU error:"));
    }
}
