//! A loaded glTF document and the instances created from it.

use std::sync::Arc;

use log::debug;

use crate::{
    animator::{AnimationLibrary, Animator},
    components::NameComponentManager,
    data_structures::{aabb::Aabb, entity::Entity, instance::Instance},
    engine::Engine,
};

/// Which texture input of a material a binding feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureSlot {
    BaseColor,
    MetallicRoughness,
    Normal,
    Occlusion,
    Emissive,
}

/// Material slot to texture mapping, needed only while textures are set up.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureBinding {
    pub material: usize,
    pub slot: TextureSlot,
    pub texture: usize,
    /// External image URI, `None` for images embedded in a buffer view.
    pub uri: Option<String>,
}

/// CPU-side data only needed during initial setup.
#[derive(Debug, Default)]
pub struct SourceData {
    pub uris: Vec<String>,
    pub texture_bindings: Vec<TextureBinding>,
    pub buffers: Vec<Vec<u8>>,
}

/// Arena owner of one loaded document.
///
/// The asset holds entity handles only; their components live in the
/// [`Engine`]. Dropping an asset without calling [`Asset::destroy`] leaves
/// those entities alive in the engine.
#[derive(Debug)]
pub struct Asset {
    pub(crate) root: Entity,
    pub(crate) entities: Vec<Entity>,
    pub(crate) renderable_entities: Vec<Entity>,
    pub(crate) bounding_box: Aabb,
    pub(crate) instances: Vec<Instance>,
    pub(crate) library: Arc<AnimationLibrary>,
    pub(crate) source: Option<SourceData>,
}

impl Asset {
    /// Transform root of the asset. It has no matching glTF node.
    ///
    /// For instanced assets this is a super root whose children are the
    /// instance roots, so all instances can be moved at once.
    pub fn root(&self) -> Entity {
        self.root
    }

    /// Animator over every entity of every instance.
    pub fn create_animator(&self, names: &NameComponentManager) -> Animator {
        let scopes = self.instances.iter().map(|i| i.entities.clone()).collect();
        Animator::new(&self.library, scopes, names)
    }

    /// Free URI strings, texture bindings and raw buffers.
    ///
    /// Entities, bounding boxes and animators are unaffected. Calling this
    /// more than once is a no-op.
    pub fn release_source_data(&mut self) {
        if let Some(source) = self.source.take() {
            debug!(
                "Released {} buffers and {} uris.",
                source.buffers.len(),
                source.uris.len()
            );
        }
    }

    pub fn has_source_data(&self) -> bool {
        self.source.is_some()
    }

    /// External resources referenced by the document; empty once released.
    pub fn resource_uris(&self) -> &[String] {
        self.source.as_ref().map(|s| s.uris.as_slice()).unwrap_or(&[])
    }

    pub fn texture_bindings(&self) -> &[TextureBinding] {
        self.source
            .as_ref()
            .map(|s| s.texture_bindings.as_slice())
            .unwrap_or(&[])
    }

    pub fn buffers(&self) -> &[Vec<u8>] {
        self.source.as_ref().map(|s| s.buffers.as_slice()).unwrap_or(&[])
    }

    /// One entity per glTF node, for every instance in instance order.
    ///
    /// Every entity has a Transform component; some also carry Renderable,
    /// Light or Name components.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// The subsequence of [`entities`](Self::entities) with a Renderable component.
    pub fn renderable_entities(&self) -> &[Entity] {
        &self.renderable_entities
    }

    pub fn renderable_entity_count(&self) -> usize {
        self.renderable_entities.len()
    }

    /// Box computed at load time from the accessor min / max values.
    ///
    /// It is not a bound over all instances.
    pub fn bounding_box(&self) -> Aabb {
        self.bounding_box
    }

    pub fn first_entity_by_name(&self, names: &NameComponentManager, name: &str) -> Option<Entity> {
        names.first_by_name(&self.entities, name)
    }

    /// First instance. The loader never creates an asset without one.
    pub fn instance(&self) -> &Instance {
        &self.instances[0]
    }

    pub fn instance_mut(&mut self) -> &mut Instance {
        &mut self.instances[0]
    }

    /// All instances. Longer than one only for instanced loads.
    pub fn asset_instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn asset_instances_mut(&mut self) -> &mut [Instance] {
        &mut self.instances
    }

    pub fn animation_count(&self) -> usize {
        self.library.clips.len()
    }

    pub fn animation_library(&self) -> &AnimationLibrary {
        &self.library
    }

    /// Destroy every entity owned by the asset and its instances.
    pub fn destroy(self, engine: &mut Engine) {
        for instance in &self.instances {
            for entity in &instance.entities {
                engine.destroy_entity(*entity);
            }
            if instance.root != self.root {
                engine.destroy_entity(instance.root);
            }
        }
        engine.destroy_entity(self.root);
        debug!("Destroyed asset with {} entities.", self.entities.len());
    }
}
