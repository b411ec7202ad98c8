//! flow-gltfio
//!
//! Asset, instance and entity ownership for glTF scene graphs. A loaded
//! document becomes an [`Asset`] owning one or more [`Instance`]s; each
//! instance is a hierarchy of [`Entity`] handles whose components (transform,
//! renderable, light, name) live in an [`Engine`]. Nothing here touches the
//! GPU: renderables carry mesh references and bounds, not buffers.
//!
//! High-level modules
//! - `animator`: keyframe playback onto entity transforms
//! - `components`: sparse per-kind component tables and capability queries
//! - `data_structures`: entities, transforms, bounding boxes, assets, instances
//! - `engine`: central owner of entity handles and component tables
//! - `resources`: glTF / GLB loading into assets
//!

pub mod animator;
pub mod components;
pub mod data_structures;
pub mod engine;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use animator::Animator;
pub use components::{Capability, NameComponentManager};
pub use data_structures::{aabb::Aabb, asset::Asset, entity::Entity, instance::Instance};
pub use engine::Engine;
pub use resources::{AssetLoader, LoaderConfig};
pub use cgmath;
