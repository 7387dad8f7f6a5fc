//! Shooter Physics
//!
//! A small fixed-step physics world for first-person gameplay. It knows two
//! kinds of objects:
//!
//! - **Bodies**: vertical capsules that move, fall and collect contacts
//! - **Static geometry**: triangle soups that bodies collide with and rays hit
//!
//! # Units
//!
//! Velocities are expressed in units per step, as in the classic per-frame
//! game loop. Accelerations (gravity, air control) are in units per second²
//! and are scaled by `time_step²` when integrated.
//!
//! # Contacts
//!
//! Every [`PhysicsWorld::step`] rebuilds each body's contact list. Contacts
//! are enumerated in geometry order (ascending slot order of the geometry
//! arena, which is creation order until something is removed) and then in
//! triangle order. Gameplay code that takes "the first matching contact"
//! depends on that order.

pub mod body;
pub mod collision;
pub mod config;
pub mod world;

// Re-export commonly used types
pub use body::{Body, BodyHandle, CapsuleShape, Contact, TriangleRef, MIN_GROUND_NORMAL_Y};
pub use collision::{
    GeometryHandle, MaterialId, Ray, RayCastFlags, RayCastResult, StaticGeometry, StaticTriangle,
};
pub use config::PhysicsConfig;
pub use world::PhysicsWorld;
