//! The physics world: bodies, static geometry and the fixed step.
//!
//! Bodies only collide with static geometry, never with each other. Rays hit
//! both unless told otherwise.

use glam::Vec3;
use parry3d::math::{Isometry, Point, Real, Vector};
use parry3d::query::{contact, Ray as ParryRay, RayCast, RayIntersection};
use parry3d::shape::{Capsule, Triangle};
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::body::{Body, BodyHandle, Contact, TriangleRef};
use crate::collision::{
    GeometryHandle, MaterialId, Ray, RayCastFlags, RayCastResult, StaticGeometry, StaticTriangle,
};
use crate::config::PhysicsConfig;

/// Owner of every body and piece of static geometry.
///
/// Static geometry is rebuilt from the scene rather than saved, so it is
/// skipped when the world is serialized.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PhysicsWorld {
    bodies: SlotMap<BodyHandle, Body>,
    #[serde(skip)]
    geometries: SlotMap<GeometryHandle, StaticGeometry>,
    config: PhysicsConfig,
}

impl PhysicsWorld {
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            bodies: SlotMap::with_key(),
            geometries: SlotMap::with_key(),
            config,
        }
    }

    // ========================================================================
    // Bodies
    // ========================================================================

    pub fn add_body(&mut self, body: Body) -> BodyHandle {
        self.bodies.insert(body)
    }

    pub fn remove_body(&mut self, handle: BodyHandle) -> Option<Body> {
        self.bodies.remove(handle)
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle)
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    // ========================================================================
    // Static geometry
    // ========================================================================

    pub fn add_geometry(&mut self, geometry: StaticGeometry) -> GeometryHandle {
        self.geometries.insert(geometry)
    }

    pub fn geometry(&self, handle: GeometryHandle) -> Option<&StaticGeometry> {
        self.geometries.get(handle)
    }

    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }

    // ========================================================================
    // Simulation
    // ========================================================================

    /// Advance the world by one fixed step.
    ///
    /// For each body: apply gravity and accumulated acceleration to the
    /// velocity, move by the velocity, then push the capsule out of every
    /// penetrated triangle near it and rebuild its contact list. Touching
    /// triangles of one flat surface yield a single contact.
    pub fn step(&mut self) {
        let gravity = self.config.gravity_per_step();
        let dt2 = self.config.time_step * self.config.time_step;
        let margin = self.config.contact_margin;

        for (_, body) in self.bodies.iter_mut() {
            let acceleration = body.take_acceleration();
            body.velocity += gravity + acceleration * dt2;
            body.position += body.velocity;
            body.contacts_mut().clear();

            for (handle, geometry) in self.geometries.iter() {
                let (min, max) = body.bounds(margin);
                for index in geometry.triangles_near(min, max) {
                    resolve_triangle(body, handle, index, &geometry.triangles()[index], margin);
                }
            }
        }
    }

    /// Cast a ray against static geometry and, unless
    /// [`RayCastFlags::IGNORE_BODIES`] is set, against bodies.
    ///
    /// Results are unordered unless [`RayCastFlags::SORT_RESULTS`] is set.
    pub fn ray_cast(&self, ray: &Ray, flags: RayCastFlags) -> Vec<RayCastResult> {
        let mut results = Vec::new();
        if ray.dir.length_squared() <= 0.0 {
            return results;
        }

        let parry_ray = ParryRay::new(to_point(ray.origin), to_vector(ray.dir));

        for (handle, geometry) in self.geometries.iter() {
            if let Some((hit, index)) = geometry.cast_ray(&parry_ray, 1.0) {
                let material = geometry.triangles()[index].material;
                results.push(make_result(ray, &hit, None, Some(handle), material));
            }
        }

        if !flags.contains(RayCastFlags::IGNORE_BODIES) {
            for (handle, body) in self.bodies.iter() {
                let iso = body_isometry(body);
                if let Some(hit) = body_capsule(body).cast_ray_and_get_normal(&iso, &parry_ray, 1.0, true) {
                    results.push(make_result(ray, &hit, Some(handle), None, None));
                }
            }
        }

        if flags.contains(RayCastFlags::SORT_RESULTS) {
            results.sort_by(|a, b| a.toi.total_cmp(&b.toi));
        }

        results
    }
}

/// Clip velocity against a surface.
///
/// Removes the component of velocity going into the surface.
/// `overbounce` > 1.0 adds a slight push away from the surface.
pub fn clip_velocity(velocity: Vec3, normal: Vec3, overbounce: f32) -> Vec3 {
    let backoff = velocity.dot(normal);

    let adjusted_backoff = if backoff < 0.0 {
        backoff * overbounce
    } else {
        backoff / overbounce
    };

    velocity - normal * adjusted_backoff
}

/// Normals closer than this belong to the same surface.
const COPLANAR_DOT: f32 = 0.9999;

fn resolve_triangle(
    body: &mut Body,
    geometry: GeometryHandle,
    index: usize,
    triangle: &StaticTriangle,
    margin: f32,
) {
    let shape = to_triangle(triangle);
    let capsule = body_capsule(body);
    let iso = body_isometry(body);

    let hit = match contact(&iso, &capsule, &Isometry::identity(), &shape, margin) {
        Ok(Some(hit)) => hit,
        Ok(None) => return,
        Err(_) => {
            log::warn!("unsupported capsule/triangle contact query");
            return;
        }
    };

    // normal2 lives in the triangle's frame, which is world space.
    let normal = Vec3::new(hit.normal2.x, hit.normal2.y, hit.normal2.z);
    let position = Vec3::new(hit.point2.x, hit.point2.y, hit.point2.z);

    if hit.dist < 0.0 {
        body.position += normal * -hit.dist;
        if body.velocity.dot(normal) < 0.0 {
            body.velocity = clip_velocity(body.velocity, normal, 1.0);
        }
    }

    // Neighbouring triangles of one flat surface report the same contact.
    let duplicate = body.contacts().iter().any(|other| {
        other.geometry == geometry
            && other.normal.dot(normal) > COPLANAR_DOT
            && normal.dot(position - other.position).abs() < margin
    });
    if duplicate {
        return;
    }

    body.contacts_mut().push(Contact {
        geometry,
        position,
        normal,
        triangle: Some(TriangleRef {
            index,
            material: triangle.material,
        }),
    });
}

fn make_result(
    ray: &Ray,
    hit: &RayIntersection,
    body: Option<BodyHandle>,
    geometry: Option<GeometryHandle>,
    material: Option<MaterialId>,
) -> RayCastResult {
    let mut normal = Vec3::new(hit.normal.x, hit.normal.y, hit.normal.z);
    if normal.dot(ray.dir) > 0.0 {
        normal = -normal;
    }
    RayCastResult {
        position: ray.point_at(hit.time_of_impact),
        normal,
        toi: hit.time_of_impact,
        body,
        geometry,
        material,
    }
}

fn body_capsule(body: &Body) -> Capsule {
    Capsule::new(
        Point::origin(),
        Point::new(0.0, body.shape.height(), 0.0),
        body.shape.radius,
    )
}

fn body_isometry(body: &Body) -> Isometry<Real> {
    Isometry::translation(body.position.x, body.position.y, body.position.z)
}

fn to_triangle(triangle: &StaticTriangle) -> Triangle {
    Triangle::new(to_point(triangle.a), to_point(triangle.b), to_point(triangle.c))
}

#[inline]
fn to_point(v: Vec3) -> Point<Real> {
    Point::new(v.x, v.y, v.z)
}

#[inline]
fn to_vector(v: Vec3) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}

// ============================================================================
// Tests
// ============================================================================
