//! The scene: an arena of nodes linked into a hierarchy.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::model::Model;
use crate::node::{Node, NodeHandle, NodeKind};

/// Owner of every node.
///
/// Handles returned by the scene stay valid until the node (or one of its
/// ancestors) is removed. Operations on stale handles are ignored and
/// queries on them return `None` or neutral values.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Scene {
    nodes: SlotMap<NodeHandle, Node>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, linking it under its parent if it names one.
    pub fn add_node(&mut self, mut node: Node) -> NodeHandle {
        let parent = node.parent.take();
        node.children.clear();
        let handle = self.nodes.insert(node);
        if let Some(parent) = parent {
            self.attach(handle, parent);
        }
        handle
    }

    /// Create an unnamed node of the given kind at the origin.
    pub fn create_node(&mut self, kind: NodeKind) -> NodeHandle {
        self.add_node(Node::new(kind))
    }

    /// Remove a node and all of its descendants.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        self.detach(handle);
        let mut stack = vec![handle];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
            }
        }
    }

    pub fn node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(handle)
    }

    /// Iterate over all nodes.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeHandle, &Node)> {
        self.nodes.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Find the first node with exactly this name.
    pub fn find_node(&self, name: &str) -> Option<NodeHandle> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name == name)
            .map(|(handle, _)| handle)
    }

    /// Make `child` a child of `parent`, detaching it from any previous
    /// parent. Attaching a node under itself or one of its descendants is
    /// refused.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if !self.nodes.contains_key(child) || !self.nodes.contains_key(parent) {
            return;
        }
        if self.is_ancestor_or_self(child, parent) {
            log::warn!("refusing to attach node to its own descendant");
            return;
        }
        self.detach(child);
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
    }

    /// Unlink a node from its parent. The node stays in the scene.
    pub fn detach(&mut self, child: NodeHandle) {
        let Some(parent) = self.nodes.get_mut(child).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(parent) {
            parent.children.retain(|c| *c != child);
        }
    }

    fn is_ancestor_or_self(&self, ancestor: NodeHandle, mut node: NodeHandle) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.nodes.get(node).and_then(|n| n.parent) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    // ========================================================================
    // Transforms
    // ========================================================================

    pub fn set_local_position(&mut self, handle: NodeHandle, position: Vec3) {
        if let Some(node) = self.nodes.get_mut(handle) {
            node.local_position = position;
        }
    }

    pub fn set_local_rotation(&mut self, handle: NodeHandle, rotation: Quat) {
        if let Some(node) = self.nodes.get_mut(handle) {
            node.local_rotation = rotation;
        }
    }

    pub fn set_visible(&mut self, handle: NodeHandle, visible: bool) {
        if let Some(node) = self.nodes.get_mut(handle) {
            node.visible = visible;
        }
    }

    /// Transform from node space to world space.
    pub fn global_transform(&self, handle: NodeHandle) -> Mat4 {
        let mut transform = Mat4::IDENTITY;
        let mut current = Some(handle);
        while let Some(node) = current.and_then(|h| self.nodes.get(h)) {
            transform = node.local_transform() * transform;
            current = node.parent;
        }
        transform
    }

    pub fn global_position(&self, handle: NodeHandle) -> Vec3 {
        self.global_transform(handle).w_axis.truncate()
    }

    /// Global +Z axis of the node. Not normalized when scaled.
    pub fn look_vector(&self, handle: NodeHandle) -> Vec3 {
        self.global_transform(handle).z_axis.truncate()
    }

    /// Global +X axis of the node.
    pub fn side_vector(&self, handle: NodeHandle) -> Vec3 {
        self.global_transform(handle).x_axis.truncate()
    }

    // ========================================================================
    // Models
    // ========================================================================

    /// Copy a model's hierarchy into the scene and return the new root.
    ///
    /// Returns `None` for an empty model.
    pub fn instantiate(&mut self, model: &Model) -> Option<NodeHandle> {
        let mut created: Vec<NodeHandle> = Vec::with_capacity(model.nodes.len());
        for prototype in &model.nodes {
            let mut node = Node::new(prototype.kind.clone()).with_name(prototype.name.clone());
            node.local_position = prototype.local_position;
            node.local_rotation = prototype.local_rotation;
            node.local_scale = prototype.local_scale;
            let handle = self.nodes.insert(node);
            if let Some(parent) = prototype.parent.and_then(|i| created.get(i).copied()) {
                self.attach(handle, parent);
            }
            created.push(handle);
        }
        created.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;

    #[test]
    fn test_find_node() {
        let mut scene = Scene::new();
        let a = scene.add_node(Node::new(NodeKind::Base).with_name("PlayerPosition"));
        scene.add_node(Node::new(NodeKind::Base).with_name("Other"));

        assert_eq!(scene.find_node("PlayerPosition"), Some(a));
        assert_eq!(scene.find_node("Missing"), None);
    }

    #[test]
    fn test_global_transform_follows_parent() {
        let mut scene = Scene::new();
        let parent = scene.add_node(Node::new(NodeKind::Base).with_position(Vec3::new(1.0, 0.0, 0.0)));
        let child = scene.add_node(Node::new(NodeKind::Base).with_position(Vec3::new(0.0, 2.0, 0.0)));
        scene.attach(child, parent);

        assert_eq!(scene.global_position(child), Vec3::new(1.0, 2.0, 0.0));

        scene.set_local_rotation(parent, Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        let look = scene.look_vector(child);
        // +Z rotated a quarter turn about +Y points along +X
        assert!((look - Vec3::X).length() < 1e-5, "look={:?}", look);
    }

    #[test]
    fn test_side_vector_default() {
        let mut scene = Scene::new();
        let node = scene.create_node(NodeKind::Base);
        assert_eq!(scene.side_vector(node), Vec3::X);
        assert_eq!(scene.look_vector(node), Vec3::Z);
    }

    #[test]
    fn test_remove_node_removes_descendants() {
        let mut scene = Scene::new();
        let root = scene.create_node(NodeKind::Base);
        let child = scene.create_node(NodeKind::Base);
        let grandchild = scene.create_node(NodeKind::Base);
        scene.attach(child, root);
        scene.attach(grandchild, child);

        scene.remove_node(child);

        assert!(scene.contains(root));
        assert!(!scene.contains(child));
        assert!(!scene.contains(grandchild));
        assert!(scene.node(root).unwrap().children().is_empty());
    }

    #[test]
    fn test_attach_refuses_cycles() {
        let mut scene = Scene::new();
        let a = scene.create_node(NodeKind::Base);
        let b = scene.create_node(NodeKind::Base);
        scene.attach(b, a);
        scene.attach(a, b);

        assert_eq!(scene.node(a).unwrap().parent(), None);
        assert_eq!(scene.node(b).unwrap().parent(), Some(a));
    }

    #[test]
    fn test_reattach_moves_child() {
        let mut scene = Scene::new();
        let a = scene.create_node(NodeKind::Base);
        let b = scene.create_node(NodeKind::Base);
        let child = scene.create_node(NodeKind::Base);
        scene.attach(child, a);
        scene.attach(child, b);

        assert!(scene.node(a).unwrap().children().is_empty());
        assert_eq!(scene.node(b).unwrap().children(), &[child]);
    }

    #[test]
    fn test_instantiate_model() {
        let mut model = Model::single("Weapon", NodeKind::Base);
        model.add_child(0, "Barrel", NodeKind::Mesh(Mesh::default()), Vec3::new(0.0, 0.0, 0.5));

        let mut scene = Scene::new();
        let first = scene.instantiate(&model).unwrap();
        let second = scene.instantiate(&model).unwrap();

        assert_ne!(first, second);
        assert_eq!(scene.node_count(), 4);
        let barrel = scene.node(first).unwrap().children()[0];
        assert_eq!(scene.node(barrel).unwrap().name, "Barrel");
        assert_eq!(scene.instantiate(&Model::default()), None);
    }
}
