use flow_gltfio::{AssetLoader, Engine, LoaderConfig};

use crate::common::test_utils::{
    BIN_LEN, init_logger, scene_bin, scene_glb, scene_gltf_data_uri, scene_gltf_external,
};

mod common;

fn loader_in(root: &std::path::Path) -> AssetLoader {
    AssetLoader::new(LoaderConfig {
        asset_root: root.to_path_buf(),
        ..Default::default()
    })
}

#[test]
fn should_load_buffers_from_data_uris() {
    init_logger();
    let mut engine = Engine::new();
    let asset = AssetLoader::default()
        .create_asset(&mut engine, &scene_gltf_data_uri())
        .expect("data uri document should load");

    assert_eq!(asset.entity_count(), 4);
    assert_eq!(asset.animation_count(), 1);
    assert_eq!(asset.buffers()[0].len(), BIN_LEN);
    // data uris are not external resources
    assert_eq!(asset.resource_uris(), &["hut.png".to_string()]);
}

#[test]
fn should_match_glb_and_gltf_bounds() {
    init_logger();
    let mut engine = Engine::new();
    let loader = AssetLoader::default();
    let glb = loader.create_asset(&mut engine, &scene_glb()).expect("glb");
    let gltf = loader
        .create_asset(&mut engine, &scene_gltf_data_uri())
        .expect("gltf");

    assert_eq!(glb.bounding_box(), gltf.bounding_box());
}

#[test]
fn should_read_external_buffers_relative_to_the_asset_root() {
    init_logger();
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("scene data.bin"), scene_bin()).expect("write bin");
    let mut engine = Engine::new();

    let asset = loader_in(dir.path())
        .create_asset(&mut engine, &scene_gltf_external("scene%20data.bin"))
        .expect("external buffer should resolve");

    assert_eq!(asset.animation_count(), 1);
    assert_eq!(
        asset.resource_uris(),
        &["scene%20data.bin".to_string(), "hut.png".to_string()]
    );
}

#[tokio::test]
async fn should_load_assets_from_files() {
    init_logger();
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::create_dir(dir.path().join("models")).expect("mkdir");
    std::fs::write(dir.path().join("models/scene.bin"), scene_bin()).expect("write bin");
    std::fs::write(
        dir.path().join("models/scene.gltf"),
        scene_gltf_external("scene.bin"),
    )
    .expect("write gltf");
    std::fs::write(dir.path().join("scene.glb"), scene_glb()).expect("write glb");
    let loader = loader_in(dir.path());
    let mut engine = Engine::new();

    let gltf = loader
        .load_asset(&mut engine, "models/scene.gltf")
        .await
        .expect("gltf file should load");
    let glb = loader
        .load_instanced_asset(&mut engine, "scene.glb", 2)
        .await
        .expect("glb file should load");

    assert_eq!(gltf.asset_instances().len(), 1);
    assert_eq!(glb.asset_instances().len(), 2);
    assert_eq!(gltf.bounding_box(), glb.bounding_box());
}

#[tokio::test]
async fn should_fail_on_missing_files() {
    init_logger();
    let dir = tempfile::tempdir().expect("tempdir");
    let mut engine = Engine::new();

    let result = loader_in(dir.path()).load_asset(&mut engine, "nope.glb").await;

    assert!(result.is_err());
}

#[test]
fn should_fail_on_missing_external_buffer() {
    init_logger();
    let dir = tempfile::tempdir().expect("tempdir");
    let mut engine = Engine::new();

    let result = loader_in(dir.path()).create_asset(&mut engine, &scene_gltf_external("gone.bin"));

    assert!(result.is_err());
    assert_eq!(engine.entities().alive_count(), 0);
}

#[test]
fn should_fail_on_short_buffer() {
    init_logger();
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("short.bin"), &scene_bin()[..20]).expect("write bin");
    let mut engine = Engine::new();

    let result = loader_in(dir.path()).create_asset(&mut engine, &scene_gltf_external("short.bin"));

    assert!(result.is_err());
}

#[test]
fn should_fail_on_malformed_documents() {
    init_logger();
    let mut engine = Engine::new();

    let result = AssetLoader::default().create_asset(&mut engine, b"{ not gltf");

    assert!(result.is_err());
}

#[test]
fn should_release_source_data_when_configured() {
    init_logger();
    let mut engine = Engine::new();
    let loader = AssetLoader::new(LoaderConfig {
        release_source_data: true,
        ..Default::default()
    });

    let asset = loader.create_asset(&mut engine, &scene_glb()).expect("glb");

    assert!(!asset.has_source_data());
    assert_eq!(asset.entity_count(), 4);
    assert_eq!(asset.create_animator(engine.names()).animation_count(), 1);
}
