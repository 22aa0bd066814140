//! CPU-side geometry for the primitive shapes. Vertex layout and index order
//! match the usual sphere/torus/box generators, with counter-clockwise front
//! faces.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use scrollscape_common::Shape;
use std::f32::consts::{PI, TAU};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Indexed triangle list.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Generate geometry for a shape.
pub fn build(shape: &Shape) -> MeshData {
    match *shape {
        Shape::Sphere {
            radius,
            width_segments,
            height_segments,
        } => sphere(radius, width_segments, height_segments),
        Shape::Torus {
            radius,
            tube,
            radial_segments,
            tubular_segments,
        } => torus(radius, tube, radial_segments, tubular_segments),
        Shape::Cuboid {
            width,
            height,
            depth,
        } => cuboid(width, height, depth),
    }
}

/// UV sphere with poles on the y axis. `(w + 1) * (h + 1)` vertices; the
/// degenerate triangles at both poles are skipped.
pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);
    let mut vertices = Vec::with_capacity(((ws + 1) * (hs + 1)) as usize);

    for iy in 0..=hs {
        let v = iy as f32 / hs as f32;
        for ix in 0..=ws {
            let u = ix as f32 / ws as f32;
            let p = Vec3::new(
                -radius * (u * TAU).cos() * (v * PI).sin(),
                radius * (v * PI).cos(),
                radius * (u * TAU).sin() * (v * PI).sin(),
            );
            let n = p.normalize_or_zero();
            vertices.push(Vertex {
                position: p.to_array(),
                normal: n.to_array(),
            });
        }
    }

    let row = ws + 1;
    let mut indices = Vec::new();
    for iy in 0..hs {
        for ix in 0..ws {
            let a = (iy * row + ix + 1) as u16;
            let b = (iy * row + ix) as u16;
            let c = ((iy + 1) * row + ix) as u16;
            let d = ((iy + 1) * row + ix + 1) as u16;
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != hs - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    debug_assert!(vertices.len() <= u16::MAX as usize);
    MeshData { vertices, indices }
}

/// Torus around the z axis. `radial` segments go around the tube,
/// `tubular` segments go around the ring.
pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> MeshData {
    let radial = radial_segments.max(3);
    let tubular = tubular_segments.max(3);
    let mut vertices = Vec::with_capacity(((radial + 1) * (tubular + 1)) as usize);

    for j in 0..=radial {
        let v = j as f32 / radial as f32 * TAU;
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * TAU;
            let p = Vec3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            vertices.push(Vertex {
                position: p.to_array(),
                normal: (p - center).normalize_or_zero().to_array(),
            });
        }
    }

    let row = tubular + 1;
    let mut indices = Vec::with_capacity((radial * tubular * 6) as usize);
    for j in 1..=radial {
        for i in 1..=tubular {
            let a = (row * j + i - 1) as u16;
            let b = (row * (j - 1) + i - 1) as u16;
            let c = (row * (j - 1) + i) as u16;
            let d = (row * j + i) as u16;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    debug_assert!(vertices.len() <= u16::MAX as usize);
    MeshData { vertices, indices }
}

/// Axis-aligned box centered on the origin, four vertices per face so
/// every face has flat normals.
pub fn cuboid(width: f32, height: f32, depth: f32) -> MeshData {
    let (x, y, z) = (width * 0.5, height * 0.5, depth * 0.5);
    let v = |position: [f32; 3], normal: [f32; 3]| Vertex { position, normal };
    #[rustfmt::skip]
    let vertices = vec![
        // +Z face
        v([-x, -y,  z], [0.0, 0.0, 1.0]),
        v([ x, -y,  z], [0.0, 0.0, 1.0]),
        v([ x,  y,  z], [0.0, 0.0, 1.0]),
        v([-x,  y,  z], [0.0, 0.0, 1.0]),
        // -Z face
        v([ x, -y, -z], [0.0, 0.0, -1.0]),
        v([-x, -y, -z], [0.0, 0.0, -1.0]),
        v([-x,  y, -z], [0.0, 0.0, -1.0]),
        v([ x,  y, -z], [0.0, 0.0, -1.0]),
        // +X face
        v([ x, -y,  z], [1.0, 0.0, 0.0]),
        v([ x, -y, -z], [1.0, 0.0, 0.0]),
        v([ x,  y, -z], [1.0, 0.0, 0.0]),
        v([ x,  y,  z], [1.0, 0.0, 0.0]),
        // -X face
        v([-x, -y, -z], [-1.0, 0.0, 0.0]),
        v([-x, -y,  z], [-1.0, 0.0, 0.0]),
        v([-x,  y,  z], [-1.0, 0.0, 0.0]),
        v([-x,  y, -z], [-1.0, 0.0, 0.0]),
        // +Y face
        v([-x,  y,  z], [0.0, 1.0, 0.0]),
        v([ x,  y,  z], [0.0, 1.0, 0.0]),
        v([ x,  y, -z], [0.0, 1.0, 0.0]),
        v([-x,  y, -z], [0.0, 1.0, 0.0]),
        // -Y face
        v([-x, -y, -z], [0.0, -1.0, 0.0]),
        v([ x, -y, -z], [0.0, -1.0, 0.0]),
        v([ x, -y,  z], [0.0, -1.0, 0.0]),
        v([-x, -y,  z], [0.0, -1.0, 0.0]),
    ];
    #[rustfmt::skip]
    let indices: Vec<u16> = vec![
        0,1,2, 2,3,0,       // +Z
        4,5,6, 6,7,4,       // -Z
        8,9,10, 10,11,8,    // +X
        12,13,14, 14,15,12, // -X
        16,17,18, 18,19,16, // +Y
        20,21,22, 22,23,20, // -Y
    ];
    MeshData { vertices, indices }
}
