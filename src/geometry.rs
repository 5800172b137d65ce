//! Procedural mesh for the floating objects.
//!
//! Every object is the same shape: three hollow, bevelled tubes crossing at
//! the origin along X, Y and Z, joined by a rounded cube. The mesh is
//! tessellated once per process by [`shared_mesh`] and every object renders
//! the same buffer.
//!
//! Tubes are built by revolving a closed profile around the Z axis. The
//! profile is an annulus cross-section whose four corners are quarter
//! ellipses (bevel size radially, bevel thickness axially), so normals are
//! continuous all the way round.
//!
//! The core uses the usual rounded-box trick: points on a subdivided cube are
//! clamped into a smaller inner box and pushed back out along the difference
//! by the corner radius.

use glam::{Quat, Vec3};
use std::f32::consts::{FRAC_PI_2, TAU};
use std::sync::{Arc, OnceLock};

/// Vertex format of the object mesh.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }

    /// Vertex buffer layout for wgpu.
    pub fn buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Indexed triangle list.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds as `(min, max)`. Both are zero for an empty mesh.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        if self.vertices.is_empty() {
            return (Vec3::ZERO, Vec3::ZERO);
        }
        self.vertices.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(min, max), v| {
                let p = Vec3::from_array(v.position);
                (min.min(p), max.max(p))
            },
        )
    }

    /// Append another mesh, rotated by `rotation`.
    pub fn append_rotated(&mut self, other: &MeshData, rotation: Quat) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(other.vertices.iter().map(|v| {
            Vertex::new(
                rotation * Vec3::from_array(v.position),
                rotation * Vec3::from_array(v.normal),
            )
        }));
        self.indices.extend(other.indices.iter().map(|i| base + i));
    }
}

/// Dimensions and tessellation quality of the object shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeometryParams {
    /// Outer radius of each tube.
    pub outer_radius: f32,
    /// Radius of the bore through each tube.
    pub hole_radius: f32,
    /// Length of the straight part of each tube.
    pub length: f32,
    /// Axial depth of the rounded rim at each end.
    pub bevel_thickness: f32,
    /// Radial bulge of the rounded rim.
    pub bevel_size: f32,
    /// Segments per rim quarter-arc.
    pub bevel_segments: u32,
    /// Segments around the tube.
    pub curve_segments: u32,
    /// Edge length of the rounded core cube.
    pub core_size: f32,
    /// Corner radius of the core cube.
    pub core_radius: f32,
    /// Subdivisions per core corner.
    pub core_smoothness: u32,
}

impl Default for GeometryParams {
    fn default() -> Self {
        Self {
            outer_radius: 0.5,
            hole_radius: 0.2,
            length: 2.5,
            bevel_thickness: 0.12,
            bevel_size: 0.02,
            bevel_segments: 20,
            curve_segments: 64,
            core_size: 0.98,
            core_radius: 0.3,
            core_smoothness: 10,
        }
    }
}

/// The object mesh with default dimensions, built on first use.
pub fn shared_mesh() -> Arc<MeshData> {
    static MESH: OnceLock<Arc<MeshData>> = OnceLock::new();
    MESH.get_or_init(|| {
        let mesh = build_object_mesh(&GeometryParams::default());
        log::debug!(
            "Tessellated object mesh: {} vertices, {} triangles",
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        Arc::new(mesh)
    })
    .clone()
}

/// Build the full cross shape: tubes along Z, Y and X plus the core.
pub fn build_object_mesh(params: &GeometryParams) -> MeshData {
    let tube = build_tube(params);

    let mut mesh = MeshData::default();
    mesh.append_rotated(&tube, Quat::IDENTITY);
    mesh.append_rotated(&tube, Quat::from_rotation_x(FRAC_PI_2));
    mesh.append_rotated(&tube, Quat::from_rotation_y(FRAC_PI_2));
    mesh.append_rotated(&build_rounded_box(params), Quat::IDENTITY);
    mesh
}

/// Point of the revolved profile in the (radius, z) half-plane.
#[derive(Clone, Copy, Debug)]
struct ProfilePoint {
    r: f32,
    z: f32,
    nr: f32,
    nz: f32,
}

/// Closed tube profile, centered on z = 0.
fn tube_profile(params: &GeometryParams) -> Vec<ProfilePoint> {
    let half = params.length * 0.5;
    let s = params.bevel_size;
    let t = params.bevel_thickness;
    let n = params.bevel_segments.max(1);

    // Corner centers in order: outer front, inner front, inner back, outer back.
    let corners = [
        (params.outer_radius, half),
        (params.hole_radius, half),
        (params.hole_radius, -half),
        (params.outer_radius, -half),
    ];

    let mut profile = Vec::with_capacity(corners.len() * (n as usize + 1));
    for (quadrant, (cr, cz)) in corners.into_iter().enumerate() {
        let start = quadrant as f32 * FRAC_PI_2;
        for k in 0..=n {
            let theta = start + FRAC_PI_2 * k as f32 / n as f32;
            let (sin, cos) = theta.sin_cos();
            let normal = glam::Vec2::new(t * cos, s * sin).normalize_or_zero();
            profile.push(ProfilePoint {
                r: cr + s * cos,
                z: cz + t * sin,
                nr: normal.x,
                nz: normal.y,
            });
        }
    }
    profile
}

/// One hollow tube along Z.
fn build_tube(params: &GeometryParams) -> MeshData {
    let profile = tube_profile(params);
    let segments = params.curve_segments.max(3);
    let rows = profile.len() as u32;

    let mut mesh = MeshData::default();
    mesh.vertices.reserve((rows * segments) as usize);
    for p in &profile {
        for j in 0..segments {
            let phi = TAU * j as f32 / segments as f32;
            let (sin, cos) = phi.sin_cos();
            mesh.vertices.push(Vertex::new(
                Vec3::new(p.r * cos, p.r * sin, p.z),
                Vec3::new(p.nr * cos, p.nr * sin, p.nz),
            ));
        }
    }

    // The profile is closed, so the last row connects back to the first.
    mesh.indices.reserve((rows * segments * 6) as usize);
    for a in 0..rows {
        let b = (a + 1) % rows;
        for j in 0..segments {
            let k = (j + 1) % segments;
            let (a0, a1) = (a * segments + j, a * segments + k);
            let (b0, b1) = (b * segments + j, b * segments + k);
            mesh.indices.extend_from_slice(&[a0, b0, b1, a0, b1, a1]);
        }
    }
    mesh
}

/// Rounded cube centered on the origin.
fn build_rounded_box(params: &GeometryParams) -> MeshData {
    let half = params.core_size * 0.5;
    let radius = params.core_radius.min(half);
    let inner = Vec3::splat(half - radius);
    let grid = params.core_smoothness.max(1) * 2;

    // (normal, u axis, v axis) for each face; u × v = normal.
    let faces = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];

    let mut mesh = MeshData::default();
    let side = grid + 1;
    for (normal, u, v) in faces {
        let base = mesh.vertices.len() as u32;
        for i in 0..=grid {
            for j in 0..=grid {
                let fu = (i as f32 / grid as f32) * 2.0 - 1.0;
                let fv = (j as f32 / grid as f32) * 2.0 - 1.0;
                let on_cube = (normal + u * fu + v * fv) * half;
                let clamped = on_cube.clamp(-inner, inner);
                let offset = on_cube - clamped;
                let n = if offset.length_squared() > 0.0 {
                    offset.normalize()
                } else {
                    normal
                };
                mesh.vertices.push(Vertex::new(clamped + n * radius, n));
            }
        }
        for i in 0..grid {
            for j in 0..grid {
                let a = base + i * side + j;
                let b = base + (i + 1) * side + j;
                mesh.indices
                    .extend_from_slice(&[a, b, b + 1, a, b + 1, a + 1]);
            }
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_well_formed(mesh: &MeshData) {
        assert!(!mesh.vertices.is_empty());
        assert_eq!(mesh.indices.len() % 3, 0);
        let count = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < count));
        for v in &mesh.vertices {
            let len = Vec3::from_array(v.normal).length();
            assert!((len - 1.0).abs() < 1e-4, "normal length {}", len);
        }
    }

    #[test]
    fn test_shared_mesh_is_built_once() {
        let a = shared_mesh();
        let b = shared_mesh();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_object_mesh_well_formed() {
        assert_well_formed(&build_object_mesh(&GeometryParams::default()));
    }

    #[test]
    fn test_tube_is_hollow() {
        let params = GeometryParams::default();
        let tube = build_tube(&params);
        assert_well_formed(&tube);

        let min_r = params.hole_radius - params.bevel_size;
        let max_r = params.outer_radius + params.bevel_size;
        for v in &tube.vertices {
            let r = glam::Vec2::new(v.position[0], v.position[1]).length();
            assert!(r >= min_r - 1e-4 && r <= max_r + 1e-4, "radius {}", r);
        }
    }

    #[test]
    fn test_object_extents() {
        let params = GeometryParams::default();
        let (min, max) = build_object_mesh(&params).bounds();

        // Each axis is spanned by one tube: half length plus the rim.
        let reach = params.length * 0.5 + params.bevel_thickness;
        for axis in 0..3 {
            assert!((max[axis] - reach).abs() < 1e-4);
            assert!((min[axis] + reach).abs() < 1e-4);
        }
    }

    #[test]
    fn test_rounded_box_stays_inside_cube() {
        let params = GeometryParams::default();
        let core = build_rounded_box(&params);
        assert_well_formed(&core);

        let (min, max) = core.bounds();
        let half = params.core_size * 0.5;
        assert!((max - Vec3::splat(half)).abs().max_element() < 1e-4);
        assert!((min + Vec3::splat(half)).abs().max_element() < 1e-4);
    }
}
