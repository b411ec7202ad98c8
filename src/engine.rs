//! Central owner of entity handles and component tables.
//!
//! Assets only ever hold [`Entity`] handles; the data behind them lives here.
//! Mutating anything in the scene therefore needs `&mut Engine`, which keeps
//! access arbitration in the borrow checker rather than in the tables.

use crate::{
    components::{Capability, LightManager, NameComponentManager, RenderableManager, TransformManager},
    data_structures::entity::{Entity, EntityManager},
};

#[derive(Debug, Default)]
pub struct Engine {
    entities: EntityManager,
    transforms: TransformManager,
    renderables: RenderableManager,
    lights: LightManager,
    names: NameComponentManager,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entities(&self) -> &EntityManager {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut EntityManager {
        &mut self.entities
    }

    pub fn transforms(&self) -> &TransformManager {
        &self.transforms
    }

    pub fn transforms_mut(&mut self) -> &mut TransformManager {
        &mut self.transforms
    }

    pub fn renderables(&self) -> &RenderableManager {
        &self.renderables
    }

    pub fn renderables_mut(&mut self) -> &mut RenderableManager {
        &mut self.renderables
    }

    pub fn lights(&self) -> &LightManager {
        &self.lights
    }

    pub fn lights_mut(&mut self) -> &mut LightManager {
        &mut self.lights
    }

    pub fn names(&self) -> &NameComponentManager {
        &self.names
    }

    pub fn names_mut(&mut self) -> &mut NameComponentManager {
        &mut self.names
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Whether `entity` has a row in the table named by `capability`.
    ///
    /// Dead handles have no capabilities.
    pub fn has_capability(&self, entity: Entity, capability: Capability) -> bool {
        if !self.entities.is_alive(entity) {
            return false;
        }
        match capability {
            Capability::Transform => self.transforms.has(entity),
            Capability::Renderable => self.renderables.has(entity),
            Capability::Light => self.lights.has(entity),
            Capability::Name => self.names.has(entity),
        }
    }

    /// Drop every component of `entity` and free its handle.
    pub fn destroy_entity(&mut self, entity: Entity) {
        self.transforms.destroy(entity);
        self.renderables.destroy(entity);
        self.lights.destroy(entity);
        self.names.destroy(entity);
        self.entities.destroy(entity);
    }
}
