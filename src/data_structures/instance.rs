//! One instantiation of an asset's node hierarchy.

use std::sync::Arc;

use crate::{
    animator::{AnimationLibrary, Animator},
    components::NameComponentManager,
    data_structures::{aabb::Aabb, entity::Entity},
    engine::Engine,
};

/// Every asset owns at least one `Instance`. Loading in instanced mode yields
/// several, each with its own root and its own entity per source node.
///
/// Instances live inside their [`Asset`](crate::data_structures::asset::Asset)
/// and are only handed out by reference, so they cannot outlive it.
#[derive(Debug)]
pub struct Instance {
    pub(crate) index: usize,
    pub(crate) root: Entity,
    pub(crate) entities: Vec<Entity>,
    pub(crate) bounding_box: Aabb,
    pub(crate) library: Arc<AnimationLibrary>,
}

impl Instance {
    /// Entities of this instance, one per source node in document order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Root of this instance. For instanced assets it is a child of the
    /// asset's super root; otherwise it is the asset root itself.
    pub fn root(&self) -> Entity {
        self.root
    }

    /// Position of this instance inside the owning asset.
    pub fn asset_index(&self) -> usize {
        self.index
    }

    /// Animator over this instance's entities only.
    pub fn create_animator(&self, names: &NameComponentManager) -> Animator {
        Animator::new(&self.library, vec![self.entities.clone()], names)
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bounding_box
    }

    /// Recompute the bounding box from the current transforms, in the space
    /// of this instance's root.
    pub fn recompute_bounding_box(&mut self, engine: &Engine) -> Aabb {
        self.bounding_box = compute_bounds(engine, self.root, &self.entities);
        self.bounding_box
    }
}

/// Union of the renderables' local bounds of `entities`, expressed relative to `root`.
pub(crate) fn compute_bounds(engine: &Engine, root: Entity, entities: &[Entity]) -> Aabb {
    entities
        .iter()
        .filter_map(|e| {
            let renderable = engine.renderables().get(*e)?;
            let matrix = engine.transforms().relative_matrix(*e, root)?;
            Some(renderable.local_bounds.transform(&matrix))
        })
        .fold(Aabb::empty(), |acc, b| acc.union(&b))
}
