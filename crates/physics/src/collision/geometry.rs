//! Static triangle geometry.
//!
//! Each [`StaticGeometry`] keeps its triangles twice: as plain
//! [`StaticTriangle`]s carrying the surface material, and as one parry
//! [`TriMesh`] whose BVH answers ray and proximity queries. Triangle `i` of
//! the mesh is `triangles()[i]`.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use glam::{Mat4, Vec3};
use parry3d::bounding_volume::Aabb;
use parry3d::math::{Point, Real};
use parry3d::query::{Ray as ParryRay, RayCast, RayIntersection};
use parry3d::shape::{FeatureId, TriMesh};
use slotmap::new_key_type;

new_key_type! {
    /// Stable handle to static geometry in a [`PhysicsWorld`](crate::PhysicsWorld).
    pub struct GeometryHandle;
}

/// Identifier of a surface material, derived from its name.
///
/// Two ids built from the same name are equal, so gameplay code can key
/// lookups by name without holding on to the strings. Ids are only
/// meaningful inside one process, so they are never serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(u64);

impl MaterialId {
    pub fn from_name(name: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self(hasher.finish())
    }
}

/// One triangle in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticTriangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
    /// Unit normal following counter-clockwise winding.
    pub normal: Vec3,
    pub material: Option<MaterialId>,
}

/// A triangle soup that bodies collide with and rays hit.
#[derive(Debug, Clone, Default)]
pub struct StaticGeometry {
    triangles: Vec<StaticTriangle>,
    /// `None` while there are no triangles.
    mesh: Option<TriMesh>,
}

impl StaticGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append indexed triangles, transforming vertices to world space.
    ///
    /// Degenerate triangles and out-of-range indices are skipped.
    pub fn add_triangles(
        &mut self,
        vertices: &[Vec3],
        indices: &[[u32; 3]],
        transform: Mat4,
        material: Option<MaterialId>,
    ) {
        let world: Vec<Vec3> = vertices.iter().map(|v| transform.transform_point3(*v)).collect();
        let before = self.triangles.len();

        for [i, j, k] in indices {
            let (Some(&a), Some(&b), Some(&c)) = (
                world.get(*i as usize),
                world.get(*j as usize),
                world.get(*k as usize),
            ) else {
                log::warn!("triangle index out of range, skipped");
                continue;
            };

            let normal = (b - a).cross(c - a);
            if normal.length_squared() <= f32::EPSILON * f32::EPSILON {
                continue;
            }

            self.triangles.push(StaticTriangle {
                a,
                b,
                c,
                normal: normal.normalize(),
                material,
            });
        }

        if self.triangles.len() != before {
            self.rebuild_mesh();
        }
    }

    fn rebuild_mesh(&mut self) {
        let vertices: Vec<Point<Real>> = self
            .triangles
            .iter()
            .flat_map(|t| [to_point(t.a), to_point(t.b), to_point(t.c)])
            .collect();
        let indices: Vec<[u32; 3]> = (0..self.triangles.len() as u32)
            .map(|i| [3 * i, 3 * i + 1, 3 * i + 2])
            .collect();
        self.mesh = Some(TriMesh::new(vertices, indices));
    }

    pub fn triangles(&self) -> &[StaticTriangle] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Indices of the triangles whose bounds overlap the box `(min, max)`,
    /// in ascending order.
    pub(crate) fn triangles_near(&self, min: Vec3, max: Vec3) -> Vec<usize> {
        let Some(mesh) = &self.mesh else {
            return Vec::new();
        };
        let mut found = Vec::new();
        mesh.qbvh().intersect_aabb(&Aabb::new(to_point(min), to_point(max)), &mut found);

        let mut indices: Vec<usize> = found.into_iter().map(|i| i as usize).collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// Closest hit of `ray` within `max_toi`, with the index of the
    /// triangle that was hit.
    pub(crate) fn cast_ray(&self, ray: &ParryRay, max_toi: Real) -> Option<(RayIntersection, usize)> {
        let mesh = self.mesh.as_ref()?;
        let hit = mesh.cast_local_ray_and_get_normal(ray, max_toi, true)?;
        // Back-face hits are reported past the last triangle.
        let FeatureId::Face(face) = hit.feature else {
            log::warn!("trimesh ray hit without a face: {:?}", hit.feature);
            return None;
        };
        Some((hit, face as usize % self.triangles.len()))
    }
}

#[inline]
fn to_point(v: Vec3) -> Point<Real> {
    Point::new(v.x, v.y, v.z)
}
