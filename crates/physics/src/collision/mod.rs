//! Static collision geometry and ray queries.
//!
//! # Key Types
//!
//! - [`StaticGeometry`]: a triangle soup in world space with one AABB
//! - [`Ray`]: a segment from `origin` to `origin + dir`
//! - [`RayCastResult`]: one hit, on geometry or on a body
//! - [`RayCastFlags`]: what to skip and whether to sort by distance

mod flags;
mod geometry;
mod ray;

pub use flags::RayCastFlags;
pub use geometry::{GeometryHandle, MaterialId, StaticGeometry, StaticTriangle};
pub use ray::{Ray, RayCastResult};
