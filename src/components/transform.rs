use std::collections::HashMap;

use cgmath::{Matrix4, SquareMatrix};
use log::warn;

use crate::data_structures::{entity::Entity, transform::Transform};

#[derive(Clone, Debug)]
struct TransformNode {
    local: Transform,
    world: Matrix4<f32>,
    parent: Option<Entity>,
    children: Vec<Entity>,
}

/// Hierarchy and transforms of every entity that has a Transform component.
///
/// World matrices are kept up to date eagerly: changing a local transform
/// re-propagates through the subtree below it.
#[derive(Debug, Default)]
pub struct TransformManager {
    nodes: HashMap<Entity, TransformNode>,
}

impl TransformManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, entity: Entity) -> bool {
        self.nodes.contains_key(&entity)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Attach a Transform component to `entity`, optionally under `parent`.
    ///
    /// A parent without a Transform component is ignored and the entity
    /// becomes a root.
    pub fn create(&mut self, entity: Entity, parent: Option<Entity>, local: Transform) {
        let parent = match parent {
            Some(p) if self.nodes.contains_key(&p) => Some(p),
            Some(p) => {
                warn!("Parent {:?} of {:?} has no transform component, attaching to root.", p, entity);
                None
            }
            None => None,
        };
        if self.nodes.contains_key(&entity) {
            self.detach(entity);
        }
        let parent_world = parent
            .and_then(|p| self.nodes.get(&p))
            .map(|p| p.world)
            .unwrap_or_else(Matrix4::identity);
        if let Some(p) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            p.children.push(entity);
        }
        let children = self
            .nodes
            .get(&entity)
            .map(|n| n.children.clone())
            .unwrap_or_default();
        self.nodes.insert(
            entity,
            TransformNode {
                local,
                world: parent_world * local.to_matrix(),
                parent,
                children,
            },
        );
        if !self.children(entity).is_empty() {
            self.propagate(entity, parent_world);
        }
    }

    pub fn local_transform(&self, entity: Entity) -> Option<Transform> {
        self.nodes.get(&entity).map(|n| n.local)
    }

    pub fn set_local_transform(&mut self, entity: Entity, local: Transform) {
        match self.nodes.get_mut(&entity) {
            Some(node) => node.local = local,
            None => {
                warn!("Tried to transform {:?}, which has no transform component.", entity);
                return;
            }
        }
        let parent_world = self.parent_world(entity);
        self.propagate(entity, parent_world);
    }

    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.nodes.get(&entity).and_then(|n| n.parent)
    }

    pub fn children(&self, entity: Entity) -> &[Entity] {
        self.nodes
            .get(&entity)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn world_matrix(&self, entity: Entity) -> Option<Matrix4<f32>> {
        self.nodes.get(&entity).map(|n| n.world)
    }

    /// World matrix of `entity` expressed in the space of `ancestor`.
    ///
    /// Returns `None` if either entity lacks a transform or the world matrix of
    /// `ancestor` is not invertible.
    pub fn relative_matrix(&self, entity: Entity, ancestor: Entity) -> Option<Matrix4<f32>> {
        let world = self.world_matrix(entity)?;
        let ancestor_world = self.world_matrix(ancestor)?;
        ancestor_world.invert().map(|inv| inv * world)
    }

    /// Recompute every world matrix starting from the roots.
    pub fn update_world_transforms(&mut self) {
        let roots: Vec<Entity> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.parent.is_none())
            .map(|(e, _)| *e)
            .collect();
        for root in roots {
            self.propagate(root, Matrix4::identity());
        }
    }

    /// Remove the component. Children are detached and become roots.
    pub fn destroy(&mut self, entity: Entity) {
        if !self.nodes.contains_key(&entity) {
            return;
        }
        self.detach(entity);
        if let Some(node) = self.nodes.remove(&entity) {
            for child in node.children {
                if let Some(c) = self.nodes.get_mut(&child) {
                    c.parent = None;
                }
                self.propagate(child, Matrix4::identity());
            }
        }
    }

    fn detach(&mut self, entity: Entity) {
        let parent = self.nodes.get(&entity).and_then(|n| n.parent);
        if let Some(p) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            p.children.retain(|c| *c != entity);
        }
    }

    fn parent_world(&self, entity: Entity) -> Matrix4<f32> {
        self.parent(entity)
            .and_then(|p| self.world_matrix(p))
            .unwrap_or_else(Matrix4::identity)
    }

    fn propagate(&mut self, entity: Entity, parent_world: Matrix4<f32>) {
        let mut stack = vec![(entity, parent_world)];
        while let Some((current, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(&current) else {
                continue;
            };
            node.world = parent_world * node.local.to_matrix();
            let world = node.world;
            stack.extend(node.children.iter().map(|c| (*c, world)));
        }
    }
}
