//! Static geometry built from scene meshes.

use shooter_physics::{MaterialId, StaticGeometry};
use shooter_scene::{NodeHandle, Scene};

/// Copy a mesh node's triangles into world-space static geometry.
///
/// Surface material names become [`MaterialId`]s. Returns `None` when the
/// node is missing or carries no mesh.
pub fn geometry_from_mesh(scene: &Scene, node: NodeHandle) -> Option<StaticGeometry> {
    let mesh = scene.node(node)?.as_mesh()?;
    let transform = scene.global_transform(node);

    let mut geometry = StaticGeometry::new();
    for surface in &mesh.surfaces {
        let material = surface.material.as_deref().map(MaterialId::from_name);
        geometry.add_triangles(&surface.vertices, &surface.triangles, transform, material);
    }
    Some(geometry)
}
