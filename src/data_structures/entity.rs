//! Entity handles and the manager that issues them.
//!
//! An [`Entity`] is nothing but an index into the engine's component tables
//! plus a generation counter. Assets and instances hold entities, they never
//! own the data behind them.

/// Opaque handle to a node in the scene graph.
///
/// Handles are cheap to copy and compare. When an entity is destroyed the
/// slot's generation is bumped, so an old handle pointing at a recycled slot
/// is reported as dead instead of silently aliasing the new entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

#[derive(Debug, Default)]
pub struct EntityManager {
    generations: Vec<u32>,
    alive: Vec<bool>,
    free: Vec<u32>,
}

impl EntityManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh handle, recycling a freed slot if one is available.
    pub fn create(&mut self) -> Entity {
        if let Some(index) = self.free.pop() {
            let i = index as usize;
            self.alive[i] = true;
            return Entity {
                index,
                generation: self.generations[i],
            };
        }
        let index = self.generations.len() as u32;
        self.generations.push(0);
        self.alive.push(true);
        Entity {
            index,
            generation: 0,
        }
    }

    pub fn create_many(&mut self, amount: usize) -> Vec<Entity> {
        (0..amount).map(|_| self.create()).collect()
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        let i = entity.index as usize;
        i < self.alive.len() && self.alive[i] && self.generations[i] == entity.generation
    }

    /// Free the handle. Returns `false` if it was already dead.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        let i = entity.index as usize;
        self.alive[i] = false;
        self.generations[i] = self.generations[i].wrapping_add(1);
        self.free.push(entity.index);
        true
    }

    pub fn alive_count(&self) -> usize {
        self.alive.iter().filter(|alive| **alive).count()
    }
}
