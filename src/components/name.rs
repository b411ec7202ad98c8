use std::collections::HashMap;

use crate::data_structures::entity::Entity;

/// Names of entities, taken from glTF node names.
///
/// Passed by reference to animators so channel targets can be resolved by
/// name instead of by node index.
#[derive(Debug, Default)]
pub struct NameComponentManager {
    names: HashMap<Entity, String>,
}

impl NameComponentManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, entity: Entity) -> bool {
        self.names.contains_key(&entity)
    }

    pub fn set_name(&mut self, entity: Entity, name: impl Into<String>) {
        self.names.insert(entity, name.into());
    }

    pub fn name(&self, entity: Entity) -> Option<&str> {
        self.names.get(&entity).map(String::as_str)
    }

    /// First entity of `entities`, in iteration order, named `name`.
    pub fn first_by_name<'a>(
        &self,
        entities: impl IntoIterator<Item = &'a Entity>,
        name: &str,
    ) -> Option<Entity> {
        entities
            .into_iter()
            .copied()
            .find(|e| self.name(*e) == Some(name))
    }

    pub fn destroy(&mut self, entity: Entity) {
        self.names.remove(&entity);
    }
}
