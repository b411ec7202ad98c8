//! Sparse component tables keyed by [`Entity`](crate::data_structures::entity::Entity).
//!
//! An entity never "is" a light or a renderable; it is an index that may or may
//! not have a row in each of these tables. [`Capability`] names the tables so
//! callers can ask the engine which ones an entity participates in.
//!
//! - `transform` holds local TRS, hierarchy links and cached world matrices
//! - `renderable` holds mesh references and local bounds (no GPU data)
//! - `light` holds KHR_lights_punctual parameters
//! - `name` maps entities to their glTF node names

pub mod light;
pub mod name;
pub mod renderable;
pub mod transform;

pub use light::{Light, LightKind, LightManager};
pub use name::NameComponentManager;
pub use renderable::{Renderable, RenderableManager};
pub use transform::TransformManager;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    Transform,
    Renderable,
    Light,
    Name,
}
