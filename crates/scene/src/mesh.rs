//! Triangle meshes attached to scene nodes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A run of triangles sharing one material.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    /// Vertex positions in the owning node's local space.
    pub vertices: Vec<Vec3>,
    /// Triangle indices into `vertices`.
    pub triangles: Vec<[u32; 3]>,
    /// Material name, used for footstep lookups among other things.
    pub material: Option<String>,
}

/// A mesh is a list of surfaces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub surfaces: Vec<Surface>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Axis-aligned box centered on `center` with outward-facing triangles.
    pub fn cuboid(center: Vec3, half_extents: Vec3, material: Option<&str>) -> Self {
        let mut mesh = Self::new();
        mesh.add_cuboid(center, half_extents, material);
        mesh
    }

    /// Append a box as its own surface.
    pub fn add_cuboid(&mut self, center: Vec3, half_extents: Vec3, material: Option<&str>) {
        let h = half_extents;
        let vertices = [
            Vec3::new(-h.x, -h.y, -h.z),
            Vec3::new(h.x, -h.y, -h.z),
            Vec3::new(h.x, h.y, -h.z),
            Vec3::new(-h.x, h.y, -h.z),
            Vec3::new(-h.x, -h.y, h.z),
            Vec3::new(h.x, -h.y, h.z),
            Vec3::new(h.x, h.y, h.z),
            Vec3::new(-h.x, h.y, h.z),
        ]
        .map(|v| v + center)
        .to_vec();

        // Counter-clockwise when seen from outside.
        let triangles = vec![
            [0, 2, 1], [0, 3, 2], // -Z
            [4, 5, 6], [4, 6, 7], // +Z
            [0, 4, 7], [0, 7, 3], // -X
            [1, 2, 6], [1, 6, 5], // +X
            [0, 1, 5], [0, 5, 4], // -Y
            [3, 7, 6], [3, 6, 2], // +Y
        ];

        self.surfaces.push(Surface {
            vertices,
            triangles,
            material: material.map(str::to_owned),
        });
    }

    pub fn triangle_count(&self) -> usize {
        self.surfaces.iter().map(|s| s.triangles.len()).sum()
    }
}
