use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context as _, bail};
use log::{info, warn};

use crate::{
    animator::AnimationLibrary,
    components::{Light, Renderable},
    data_structures::{
        aabb::Aabb,
        asset::{Asset, SourceData, TextureBinding, TextureSlot},
        entity::Entity,
        instance::{Instance, compute_bounds},
        transform::Transform,
    },
    engine::Engine,
};

/**
 * This module contains all logic for turning glTF files into assets.
 */
pub mod animation;
pub mod buffer;

#[derive(Clone, Debug)]
pub struct LoaderConfig {
    /// Directory that file names passed to the `load_*` functions are relative to.
    pub asset_root: PathBuf,
    /// Drop URIs, texture bindings and raw buffers right after loading.
    pub release_source_data: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("./").join("assets"),
            release_source_data: false,
        }
    }
}

/// Creates [`Asset`]s from glTF / GLB data and registers their entities in an [`Engine`].
#[derive(Clone, Debug, Default)]
pub struct AssetLoader {
    config: LoaderConfig,
}

impl AssetLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load an asset with exactly one instance, whose root is the asset root.
    ///
    /// External buffers are resolved relative to the configured asset root.
    pub fn create_asset(&self, engine: &mut Engine, bytes: &[u8]) -> anyhow::Result<Asset> {
        let gltf = parse(bytes)?;
        self.build(engine, gltf, &self.config.asset_root, &HashMap::new(), None)
    }

    /// Load an asset with `count` instances, each parented to the asset's super root.
    pub fn create_instanced_asset(
        &self,
        engine: &mut Engine,
        bytes: &[u8],
        count: usize,
    ) -> anyhow::Result<Asset> {
        if count == 0 {
            bail!("An instanced asset needs at least one instance");
        }
        let gltf = parse(bytes)?;
        self.build(engine, gltf, &self.config.asset_root, &HashMap::new(), Some(count))
    }

    pub async fn load_asset(&self, engine: &mut Engine, file_name: &str) -> anyhow::Result<Asset> {
        self.load(engine, file_name, None).await
    }

    pub async fn load_instanced_asset(
        &self,
        engine: &mut Engine,
        file_name: &str,
        count: usize,
    ) -> anyhow::Result<Asset> {
        if count == 0 {
            bail!("An instanced asset needs at least one instance");
        }
        self.load(engine, file_name, Some(count)).await
    }

    /// Destroy the asset together with every entity it owns.
    pub fn destroy_asset(&self, asset: Asset, engine: &mut Engine) {
        asset.destroy(engine);
    }

    async fn load(
        &self,
        engine: &mut Engine,
        file_name: &str,
        count: Option<usize>,
    ) -> anyhow::Result<Asset> {
        let path = self.config.asset_root.join(file_name);
        let bytes = buffer::load_binary(&path).await?;
        let gltf = parse(&bytes).with_context(|| format!("While loading {}", path.display()))?;
        let base = path.parent().unwrap_or(Path::new("."));
        let external = buffer::prefetch_external(&gltf, base).await?;
        self.build(engine, gltf, base, &external, count)
    }

    fn build(
        &self,
        engine: &mut Engine,
        gltf: gltf::Gltf,
        base: &Path,
        external: &HashMap<String, Vec<u8>>,
        count: Option<usize>,
    ) -> anyhow::Result<Asset> {
        let buffers = buffer::load_buffers(&gltf, base, external)?;
        let document = &gltf.document;

        let library = Arc::new(AnimationLibrary {
            clips: animation::load_animations(document, &buffers),
            node_names: document.nodes().map(|n| n.name().map(str::to_string)).collect(),
        });

        let root = engine.entities_mut().create();
        engine.transforms_mut().create(root, None, Transform::new());

        let mut instances = Vec::new();
        for index in 0..count.unwrap_or(1) {
            let instance_root = match count {
                Some(_) => {
                    let instance_root = engine.entities_mut().create();
                    engine
                        .transforms_mut()
                        .create(instance_root, Some(root), Transform::new());
                    instance_root
                }
                None => root,
            };
            let entities = instantiate(engine, document, instance_root);
            let bounding_box = compute_bounds(engine, instance_root, &entities);
            instances.push(Instance {
                index,
                root: instance_root,
                entities,
                bounding_box,
                library: Arc::clone(&library),
            });
        }

        let entities: Vec<Entity> = instances
            .iter()
            .flat_map(|i| i.entities.iter().copied())
            .collect();
        let renderable_entities = entities
            .iter()
            .copied()
            .filter(|e| engine.renderables().has(*e))
            .collect();
        let bounding_box = instances[0].bounding_box;

        let source = SourceData {
            uris: collect_uris(document),
            texture_bindings: collect_texture_bindings(document),
            buffers,
        };

        let mut asset = Asset {
            root,
            entities,
            renderable_entities,
            bounding_box,
            instances,
            library,
            source: Some(source),
        };
        info!(
            "Loaded asset with {} instance(s), {} entities, {} renderables, {} animations.",
            asset.instances.len(),
            asset.entity_count(),
            asset.renderable_entity_count(),
            asset.animation_count()
        );
        if self.config.release_source_data {
            asset.release_source_data();
        }
        Ok(asset)
    }
}

fn parse(bytes: &[u8]) -> anyhow::Result<gltf::Gltf> {
    gltf::Gltf::from_slice(bytes).context("Failed to parse glTF document")
}

/// Create one entity per document node under `root` and attach its components.
fn instantiate(engine: &mut Engine, document: &gltf::Document, root: Entity) -> Vec<Entity> {
    let nodes: Vec<gltf::Node> = document.nodes().collect();
    let entities = engine.entities_mut().create_many(nodes.len());

    let mut parents = vec![None; nodes.len()];
    for node in &nodes {
        for child in node.children() {
            parents[child.index()] = Some(node.index());
        }
    }

    // parents must have a transform before their children
    let mut created = vec![false; nodes.len()];
    let mut stack: Vec<usize> = (0..nodes.len()).filter(|i| parents[*i].is_none()).rev().collect();
    while let Some(i) = stack.pop() {
        if created[i] {
            continue;
        }
        created[i] = true;
        let parent = parents[i].map(|p| entities[p]).unwrap_or(root);
        engine
            .transforms_mut()
            .create(entities[i], Some(parent), nodes[i].transform().into());
        let children: Vec<usize> = nodes[i].children().map(|c| c.index()).collect();
        stack.extend(children.into_iter().rev());
    }
    for (i, node) in nodes.iter().enumerate().filter(|(i, _)| !created[*i]) {
        warn!("Node {} is not reachable from a root, attaching it to the instance root.", i);
        engine
            .transforms_mut()
            .create(entities[i], Some(root), node.transform().into());
    }

    for (node, entity) in nodes.iter().zip(&entities) {
        if let Some(name) = node.name() {
            engine.names_mut().set_name(*entity, name);
        }
        if let Some(mesh) = node.mesh() {
            engine.renderables_mut().create(*entity, to_renderable(&mesh));
        }
        if let Some(light) = node.light() {
            engine.lights_mut().create(*entity, Light::from(light));
        }
    }
    entities
}

fn to_renderable(mesh: &gltf::Mesh) -> Renderable {
    let mut local_bounds = Aabb::empty();
    let mut materials = Vec::new();
    for primitive in mesh.primitives() {
        materials.push(primitive.material().index());
        match primitive_bounds(&primitive) {
            Some(bounds) => local_bounds = local_bounds.union(&bounds),
            None => warn!(
                "Primitive {} of mesh {:?} has no POSITION min/max, ignoring it for bounds.",
                primitive.index(),
                mesh.name()
            ),
        }
    }
    Renderable {
        mesh: mesh.index(),
        primitive_count: materials.len(),
        materials,
        local_bounds,
    }
}

fn primitive_bounds(primitive: &gltf::Primitive) -> Option<Aabb> {
    let accessor = primitive.get(&gltf::Semantic::Positions)?;
    let min = vec3_from_json(&accessor.min()?)?;
    let max = vec3_from_json(&accessor.max()?)?;
    Some(Aabb::new(min.into(), max.into()))
}

fn vec3_from_json(value: &gltf::json::Value) -> Option<[f32; 3]> {
    let values = value.as_array()?;
    if values.len() < 3 {
        return None;
    }
    Some([
        values[0].as_f64()? as f32,
        values[1].as_f64()? as f32,
        values[2].as_f64()? as f32,
    ])
}

fn collect_uris(document: &gltf::Document) -> Vec<String> {
    let buffers = document.buffers().filter_map(|b| match b.source() {
        gltf::buffer::Source::Uri(uri) if !buffer::is_data_uri(uri) => Some(uri.to_string()),
        _ => None,
    });
    let images = document.images().filter_map(|i| match i.source() {
        gltf::image::Source::Uri { uri, .. } if !buffer::is_data_uri(uri) => Some(uri.to_string()),
        _ => None,
    });
    buffers.chain(images).collect()
}

fn collect_texture_bindings(document: &gltf::Document) -> Vec<TextureBinding> {
    let mut bindings = Vec::new();
    for material in document.materials() {
        // the implicit default material has no index and no textures
        let Some(index) = material.index() else {
            continue;
        };
        let pbr = material.pbr_metallic_roughness();
        let slots = [
            (TextureSlot::BaseColor, pbr.base_color_texture().map(|t| t.texture())),
            (
                TextureSlot::MetallicRoughness,
                pbr.metallic_roughness_texture().map(|t| t.texture()),
            ),
            (TextureSlot::Normal, material.normal_texture().map(|t| t.texture())),
            (TextureSlot::Occlusion, material.occlusion_texture().map(|t| t.texture())),
            (TextureSlot::Emissive, material.emissive_texture().map(|t| t.texture())),
        ];
        for (slot, texture) in slots {
            let Some(texture) = texture else {
                continue;
            };
            let uri = match texture.source().source() {
                gltf::image::Source::Uri { uri, .. } => Some(uri.to_string()),
                gltf::image::Source::View { .. } => None,
            };
            bindings.push(TextureBinding {
                material: index,
                slot,
                texture: texture.index(),
                uri,
            });
        }
    }
    bindings
}
