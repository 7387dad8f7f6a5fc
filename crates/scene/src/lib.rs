//! Shooter Scene Graph
//!
//! A small arena-backed node hierarchy consumed by the gameplay layer.
//!
//! # Features
//!
//! - Named nodes with local position/rotation/scale and parent links
//! - Global transforms and look and side vectors derived on demand
//! - Node kinds: base pivots, cameras, lights, meshes, particle systems
//! - Model prototypes that can be instantiated many times
//!
//! # Conventions
//!
//! The graph is right-handed with +Y up. A node "looks" along its global +Z
//! axis and its side vector is the global +X axis.
//!
//! Nodes are addressed by [`NodeHandle`], a generational key that stays
//! valid until the node is removed.

pub mod camera;
pub mod graph;
pub mod mesh;
pub mod model;
pub mod node;

pub use camera::Camera;
pub use graph::Scene;
pub use mesh::{Mesh, Surface};
pub use model::{Model, ModelNode};
pub use node::{Color, ColorGradient, Light, Node, NodeHandle, NodeKind, ParticleSystem};
