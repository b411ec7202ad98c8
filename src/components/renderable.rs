use std::collections::HashMap;

use crate::data_structures::{aabb::Aabb, entity::Entity};

/// What the loader knows about a drawable node.
///
/// Only references into the source document are kept; vertex data stays in
/// the document buffers and is not uploaded anywhere by this crate.
#[derive(Clone, Debug, PartialEq)]
pub struct Renderable {
    pub mesh: usize,
    pub primitive_count: usize,
    /// Material index per primitive, `None` for the default material.
    pub materials: Vec<Option<usize>>,
    /// Bounds in the node's local space, from POSITION accessor min/max.
    pub local_bounds: Aabb,
}

#[derive(Debug, Default)]
pub struct RenderableManager {
    renderables: HashMap<Entity, Renderable>,
}

impl RenderableManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, entity: Entity) -> bool {
        self.renderables.contains_key(&entity)
    }

    pub fn create(&mut self, entity: Entity, renderable: Renderable) {
        self.renderables.insert(entity, renderable);
    }

    pub fn get(&self, entity: Entity) -> Option<&Renderable> {
        self.renderables.get(&entity)
    }

    pub fn destroy(&mut self, entity: Entity) {
        self.renderables.remove(&entity);
    }
}
