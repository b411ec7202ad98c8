//! Engine data structures: handles, transforms, bounds, assets and instances.
//!
//! - `entity` holds opaque scene-graph handles and the manager issuing them
//! - `transform` holds per-node translation/rotation/scale
//! - `aabb` is the axis-aligned bounding box value type
//! - `asset` is the arena owner of one loaded document
//! - `instance` is one instantiation of an asset's hierarchy

pub mod aabb;
pub mod asset;
pub mod entity;
pub mod instance;
pub mod transform;
