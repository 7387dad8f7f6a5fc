//! Model prototypes.
//!
//! A model is a flat list of nodes with parent indices. Instantiating it
//! copies the hierarchy into a scene, so one loaded model can back any number
//! of instances.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::node::NodeKind;

/// One node of a model prototype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelNode {
    pub name: String,
    pub kind: NodeKind,
    pub local_position: Vec3,
    pub local_rotation: Quat,
    pub local_scale: Vec3,
    /// Index of the parent inside the model, `None` for the root.
    pub parent: Option<usize>,
}

/// A reusable node hierarchy. Node 0 is the root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub nodes: Vec<ModelNode>,
}

impl Model {
    /// A model made of a single root node.
    pub fn single(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            nodes: vec![ModelNode {
                name: name.into(),
                kind,
                local_position: Vec3::ZERO,
                local_rotation: Quat::IDENTITY,
                local_scale: Vec3::ONE,
                parent: None,
            }],
        }
    }

    /// Append a child node under `parent` and return its index.
    pub fn add_child(&mut self, parent: usize, name: impl Into<String>, kind: NodeKind, position: Vec3) -> usize {
        self.nodes.push(ModelNode {
            name: name.into(),
            kind,
            local_position: position,
            local_rotation: Quat::IDENTITY,
            local_scale: Vec3::ONE,
            parent: Some(parent),
        });
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
