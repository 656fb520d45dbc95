//! Procedural meshes: the ground quad and the unit UV sphere used for pickups.
//!
//! Both are built once at startup and handed to the GPU unchanged. The sphere
//! has radius 1 and is scaled per draw.

use std::f32::consts::{PI, TAU};

use thiserror::Error;

use crate::utils::{Mesh, Vertex};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    #[error("sphere needs at least 1 stack and 3 slices, got {stacks} stacks and {slices} slices")]
    InvalidSphere { stacks: u32, slices: u32 },
}

/// Horizontal square of side `2 * half_extent` at y = 0, two triangles, no
/// index buffer.
pub fn build_plane(half_extent: f32) -> Mesh {
    let s = half_extent;
    let up = [0.0, 1.0, 0.0];
    let v = |x: f32, z: f32, u: f32, w: f32| Vertex { pos: [x, 0.0, z], normal: up, uv: [u, w] };

    let vertices = vec![
        v(-s, -s, 0.0, 0.0),
        v(s, -s, 1.0, 0.0),
        v(s, s, 1.0, 1.0),
        v(s, s, 1.0, 1.0),
        v(-s, s, 0.0, 1.0),
        v(-s, -s, 0.0, 0.0),
    ];

    Mesh { vertices, indices: None }
}

/// Latitude/longitude unit sphere.
///
/// Rings run from the north pole (`i = 0`) to the south pole (`i = stacks`).
/// Each ring repeats its first vertex at `j = slices` so the texture seam
/// closes, giving `(stacks + 1) * (slices + 1)` vertices and six indices per
/// grid cell.
pub fn build_sphere(stacks: u32, slices: u32) -> Result<Mesh, GeometryError> {
    if stacks == 0 || slices < 3 {
        return Err(GeometryError::InvalidSphere { stacks, slices });
    }

    let ring = slices + 1;
    let mut vertices = Vec::with_capacity(((stacks + 1) * ring) as usize);
    for i in 0..=stacks {
        let v = i as f32 / stacks as f32;
        let phi = v * PI;
        let (r, y) = (phi.sin(), phi.cos());
        for j in 0..=slices {
            let u = j as f32 / slices as f32;
            let theta = u * TAU;
            let p = [r * theta.cos(), y, r * theta.sin()];
            vertices.push(Vertex { pos: p, normal: p, uv: [u, 1.0 - v] });
        }
    }

    let mut indices = Vec::with_capacity((stacks * slices * 6) as usize);
    for i in 0..stacks {
        for j in 0..slices {
            let a = i * ring + j;
            let b = (i + 1) * ring + j;
            indices.extend_from_slice(&[a, b, a + 1, b, b + 1, a + 1]);
        }
    }

    Ok(Mesh { vertices, indices: Some(indices) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_spans_requested_extent() {
        let mesh = build_plane(50.0);
        assert_eq!(mesh.vertices.len(), 6);
        assert!(mesh.indices.is_none());

        for v in &mesh.vertices {
            assert_eq!(v.pos[1], 0.0);
            assert_eq!(v.pos[0].abs(), 50.0);
            assert_eq!(v.pos[2].abs(), 50.0);
            assert_eq!(v.normal, [0.0, 1.0, 0.0]);
            assert!((0.0..=1.0).contains(&v.uv[0]));
            assert!((0.0..=1.0).contains(&v.uv[1]));
        }

        let us: Vec<f32> = mesh.vertices.iter().map(|v| v.uv[0]).collect();
        assert!(us.contains(&0.0) && us.contains(&1.0));
    }

    #[test]
    fn sphere_grid_counts() {
        let mesh = build_sphere(16, 24).unwrap();
        assert_eq!(mesh.vertices.len(), 17 * 25);
        assert_eq!(mesh.indices.as_ref().unwrap().len(), 16 * 24 * 6);
        assert_eq!(mesh.triangle_count(), 16 * 24 * 2);
    }

    #[test]
    fn sphere_normals_match_unit_positions() {
        let mesh = build_sphere(8, 12).unwrap();
        for v in &mesh.vertices {
            let p = glam::Vec3::from(v.pos);
            assert!((p.length() - 1.0).abs() < 1e-5);
            assert_eq!(v.pos, v.normal);
        }
    }

    #[test]
    fn sphere_seam_is_duplicated() {
        let slices = 6;
        let mesh = build_sphere(4, slices).unwrap();
        let ring = (slices + 1) as usize;
        // equator ring: first and last vertex share position but not u
        let first = mesh.vertices[2 * ring];
        let last = mesh.vertices[2 * ring + slices as usize];
        for k in 0..3 {
            assert!((first.pos[k] - last.pos[k]).abs() < 1e-5);
        }
        assert_eq!(first.uv[0], 0.0);
        assert_eq!(last.uv[0], 1.0);
    }

    #[test]
    fn sphere_indices_stay_in_range() {
        let mesh = build_sphere(3, 5).unwrap();
        let n = mesh.vertices.len() as u32;
        assert!(mesh.indices.unwrap().iter().all(|&i| i < n));
    }

    #[test]
    fn degenerate_sphere_is_rejected() {
        assert_eq!(
            build_sphere(0, 24),
            Err(GeometryError::InvalidSphere { stacks: 0, slices: 24 })
        );
        assert!(build_sphere(16, 2).is_err());
        assert!(build_sphere(1, 3).is_ok());
    }
}
