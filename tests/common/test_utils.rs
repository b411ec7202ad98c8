#![allow(dead_code)]

use base64::Engine as _;
use flow_gltfio::{Asset, AssetLoader, Engine, LoaderConfig};

/// Vertex positions of the shared triangle, then animation times, then
/// translation keys of the "Hand" node.
pub const BIN_LEN: usize = 68;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn scene_bin() -> Vec<u8> {
    let floats: [f32; 17] = [
        // positions
        -1.0, -1.0, -1.0, //
        1.0, 1.0, 1.0, //
        1.0, -1.0, 0.0, //
        // times
        0.0, 1.0, //
        // translations
        0.0, 0.0, 0.0, //
        0.0, 4.0, 0.0,
    ];
    floats.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Nodes: 0 "Head" (mesh, at y=2) with child 1 "Hand", 2 "Hand" (mesh, at
/// x=5), 3 unnamed point light. One animation "wave" moving node 1 from the
/// origin to y=4 over one second.
pub fn scene_json(buffer: &str) -> String {
    format!(
        r#"{{
  "asset": {{ "version": "2.0" }},
  "extensionsUsed": ["KHR_lights_punctual"],
  "extensions": {{
    "KHR_lights_punctual": {{
      "lights": [{{ "type": "point", "color": [1.0, 0.5, 0.0], "intensity": 3.0 }}]
    }}
  }},
  "scene": 0,
  "scenes": [{{ "nodes": [0, 2, 3] }}],
  "nodes": [
    {{ "name": "Head", "mesh": 0, "translation": [0.0, 2.0, 0.0], "children": [1] }},
    {{ "name": "Hand" }},
    {{ "name": "Hand", "mesh": 0, "translation": [5.0, 0.0, 0.0] }},
    {{ "extensions": {{ "KHR_lights_punctual": {{ "light": 0 }} }} }}
  ],
  "meshes": [{{ "primitives": [{{ "attributes": {{ "POSITION": 0 }}, "material": 0 }}] }}],
  "materials": [{{ "pbrMetallicRoughness": {{ "baseColorTexture": {{ "index": 0 }} }} }}],
  "textures": [{{ "source": 0 }}],
  "images": [{{ "uri": "hut.png" }}],
  "animations": [{{
    "name": "wave",
    "samplers": [{{ "input": 1, "output": 2, "interpolation": "LINEAR" }}],
    "channels": [{{ "sampler": 0, "target": {{ "node": 1, "path": "translation" }} }}]
  }}],
  "accessors": [
    {{ "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
       "min": [-1.0, -1.0, -1.0], "max": [1.0, 1.0, 1.0] }},
    {{ "bufferView": 1, "componentType": 5126, "count": 2, "type": "SCALAR",
       "min": [0.0], "max": [1.0] }},
    {{ "bufferView": 2, "componentType": 5126, "count": 2, "type": "VEC3" }}
  ],
  "bufferViews": [
    {{ "buffer": 0, "byteOffset": 0, "byteLength": 36 }},
    {{ "buffer": 0, "byteOffset": 36, "byteLength": 8 }},
    {{ "buffer": 0, "byteOffset": 44, "byteLength": 24 }}
  ],
  "buffers": [{{ {buffer}"byteLength": {BIN_LEN} }}]
}}"#
    )
}

/// Pack a JSON document and a binary chunk into a GLB container.
pub fn glb(json: &str, bin: &[u8]) -> Vec<u8> {
    let mut json = json.as_bytes().to_vec();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    let mut bin = bin.to_vec();
    while bin.len() % 4 != 0 {
        bin.push(0);
    }
    let total = 12 + 8 + json.len() + 8 + bin.len();
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(b"JSON");
    out.extend_from_slice(&json);
    out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    out.extend_from_slice(b"BIN\0");
    out.extend_from_slice(&bin);
    out
}

pub fn scene_glb() -> Vec<u8> {
    glb(&scene_json(""), &scene_bin())
}

/// Same scene as [`scene_glb`] with the buffer embedded as a base64 data uri.
pub fn scene_gltf_data_uri() -> Vec<u8> {
    let encoded = base64::engine::general_purpose::STANDARD.encode(scene_bin());
    let uri = format!(r#""uri": "data:application/octet-stream;base64,{encoded}", "#);
    scene_json(&uri).into_bytes()
}

/// Same scene with the buffer stored next to the document as `uri`.
pub fn scene_gltf_external(uri: &str) -> Vec<u8> {
    scene_json(&format!(r#""uri": "{uri}", "#)).into_bytes()
}

/// A skeleton-only document whose "Hand" node sits at a different index than
/// in the scene fixture.
pub fn rig_gltf() -> Vec<u8> {
    r#"{
  "asset": { "version": "2.0" },
  "scene": 0,
  "scenes": [{ "nodes": [1] }],
  "nodes": [
    { "name": "Hand" },
    { "name": "Body", "children": [0] }
  ]
}"#
    .as_bytes()
    .to_vec()
}

pub fn load_scene(engine: &mut Engine) -> Asset {
    init_logger();
    AssetLoader::new(LoaderConfig::default())
        .create_asset(engine, &scene_glb())
        .expect("scene fixture should load")
}

pub fn load_instanced_scene(engine: &mut Engine, count: usize) -> Asset {
    init_logger();
    AssetLoader::new(LoaderConfig::default())
        .create_instanced_asset(engine, &scene_glb(), count)
        .expect("scene fixture should load")
}

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}
