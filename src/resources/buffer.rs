use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::{Context as _, bail};
use base64::Engine as _;

const DATA_URI_PREFIX: &str = "data:";

pub fn is_data_uri(uri: &str) -> bool {
    uri.starts_with(DATA_URI_PREFIX)
}

/// Decode a base64 `data:` URI such as `data:application/octet-stream;base64,AAAA`.
pub fn decode_data_uri(uri: &str) -> anyhow::Result<Vec<u8>> {
    let Some((header, payload)) = uri.split_once(',') else {
        bail!("Malformed data uri, missing ','");
    };
    if !header.ends_with(";base64") {
        bail!("Only base64 data uris are supported, got header {header}");
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .context("Invalid base64 payload in data uri")
}

/// Resolve a relative resource URI against the asset root.
///
/// Percent-encoded spaces are the only escape glTF exporters commonly emit.
pub fn resolve_path(root: &Path, uri: &str) -> PathBuf {
    root.join(uri.replace("%20", " "))
}

pub async fn load_binary(path: &Path) -> anyhow::Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// Fetch every external buffer of `gltf` so that buffer resolution can stay
/// synchronous afterwards.
pub async fn prefetch_external(
    gltf: &gltf::Gltf,
    root: &Path,
) -> anyhow::Result<HashMap<String, Vec<u8>>> {
    let mut fetched = HashMap::new();
    for buffer in gltf.buffers() {
        if let gltf::buffer::Source::Uri(uri) = buffer.source() {
            if is_data_uri(uri) || fetched.contains_key(uri) {
                continue;
            }
            let bin = load_binary(&resolve_path(root, uri)).await?;
            fetched.insert(uri.to_string(), bin);
        }
    }
    Ok(fetched)
}

/// Bytes of every buffer of `gltf`, indexed like the document's buffers.
///
/// `external` provides data for non-`data:` URIs; missing entries are read
/// from `root` synchronously.
pub fn load_buffers(
    gltf: &gltf::Gltf,
    root: &Path,
    external: &HashMap<String, Vec<u8>>,
) -> anyhow::Result<Vec<Vec<u8>>> {
    let mut buffer_data = Vec::new();
    for buffer in gltf.buffers() {
        let mut data = match buffer.source() {
            gltf::buffer::Source::Bin => match gltf.blob.as_deref() {
                Some(blob) => blob.to_vec(),
                None => bail!("Buffer {} refers to a missing GLB binary chunk", buffer.index()),
            },
            gltf::buffer::Source::Uri(uri) if is_data_uri(uri) => decode_data_uri(uri)
                .with_context(|| format!("Failed to decode buffer {}", buffer.index()))?,
            gltf::buffer::Source::Uri(uri) => match external.get(uri).cloned() {
                Some(bin) => bin,
                None => {
                    let path = resolve_path(root, uri);
                    std::fs::read(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))?
                }
            },
        };
        if data.len() < buffer.length() {
            bail!(
                "Buffer {} is {} bytes long but the document declares {}",
                buffer.index(),
                data.len(),
                buffer.length()
            );
        }
        // GLB chunks are padded to four bytes
        data.truncate(buffer.length());
        buffer_data.push(data);
    }
    Ok(buffer_data)
}
