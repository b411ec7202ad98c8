//! Animation clips read from glTF animation channels.
//!
//! Clips are parsed once at load time and shared (via `Arc`) with every
//! animator created afterwards, so releasing an asset's source buffers does
//! not affect animation playback.

use std::sync::Arc;

use log::warn;

#[derive(Clone, Debug)]
pub enum Keyframes {
    Translation(Vec<cgmath::Vector3<f32>>),
    Rotation(Vec<cgmath::Quaternion<f32>>),
    Scale(Vec<cgmath::Vector3<f32>>),
}

impl Keyframes {
    pub fn len(&self) -> usize {
        match self {
            Keyframes::Translation(v) => v.len(),
            Keyframes::Rotation(v) => v.len(),
            Keyframes::Scale(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interpolation {
    Step,
    Linear,
    /// Tangents are dropped at load time; keys are blended linearly.
    CubicSpline,
}

impl From<gltf::animation::Interpolation> for Interpolation {
    fn from(interpolation: gltf::animation::Interpolation) -> Self {
        match interpolation {
            gltf::animation::Interpolation::Step => Interpolation::Step,
            gltf::animation::Interpolation::Linear => Interpolation::Linear,
            gltf::animation::Interpolation::CubicSpline => Interpolation::CubicSpline,
        }
    }
}

/// One animated property of one source node.
#[derive(Clone, Debug)]
pub struct Channel {
    /// Index of the targeted node in the source document.
    pub node: usize,
    pub interpolation: Interpolation,
    pub timestamps: Vec<f32>,
    pub keyframes: Keyframes,
}

/// A named animation with its channels.
#[derive(Clone, Debug)]
pub struct AnimationClip {
    pub name: String,
    pub channels: Vec<Channel>,
}

impl AnimationClip {
    /// Time of the last key over all channels.
    pub fn duration(&self) -> f32 {
        self.channels
            .iter()
            .filter_map(|c| c.timestamps.last())
            .fold(0.0, |acc, t| acc.max(*t))
    }
}

/// Keep only the value of every `[in-tangent, value, out-tangent]` triplet.
fn strip_tangents<T: Copy>(values: Vec<T>, interpolation: Interpolation) -> Vec<T> {
    if interpolation != Interpolation::CubicSpline {
        return values;
    }
    values.chunks_exact(3).map(|triplet| triplet[1]).collect()
}

/// Parse every animation of `document`.
///
/// Channels that cannot be read (missing buffers, morph target weights,
/// mismatched key counts) are skipped with a warning.
pub fn load_animations(document: &gltf::Document, buffers: &[Vec<u8>]) -> Vec<Arc<AnimationClip>> {
    let mut clips = Vec::new();
    for animation in document.animations() {
        let name = animation
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("animation_{}", animation.index()));
        let mut channels = Vec::new();
        for channel in animation.channels() {
            let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
            let interpolation: Interpolation = channel.sampler().interpolation().into();
            let timestamps: Vec<f32> = match reader.read_inputs() {
                Some(inputs) => inputs.collect(),
                None => {
                    warn!("No keyframe times in channel {} of {}", channel.index(), name);
                    continue;
                }
            };
            let keyframes = match reader.read_outputs() {
                Some(gltf::animation::util::ReadOutputs::Translations(translations)) => {
                    let values = translations.map(cgmath::Vector3::from).collect();
                    Keyframes::Translation(strip_tangents(values, interpolation))
                }
                Some(gltf::animation::util::ReadOutputs::Rotations(rotations)) => {
                    let values = rotations
                        .into_f32()
                        .map(|[x, y, z, w]| cgmath::Quaternion::new(w, x, y, z))
                        .collect();
                    Keyframes::Rotation(strip_tangents(values, interpolation))
                }
                Some(gltf::animation::util::ReadOutputs::Scales(scales)) => {
                    let values = scales.map(cgmath::Vector3::from).collect();
                    Keyframes::Scale(strip_tangents(values, interpolation))
                }
                // TODO: morph target weights once renderables carry morph targets
                Some(gltf::animation::util::ReadOutputs::MorphTargetWeights(_)) => {
                    warn!("Skipping morph target channel {} of {}", channel.index(), name);
                    continue;
                }
                None => {
                    warn!("No keyframes found in channel {} of {}", channel.index(), name);
                    continue;
                }
            };
            if keyframes.len() != timestamps.len() || timestamps.is_empty() {
                warn!(
                    "Channel {} of {} has {} times but {} keyframes, skipping.",
                    channel.index(),
                    name,
                    timestamps.len(),
                    keyframes.len()
                );
                continue;
            }
            channels.push(Channel {
                node: channel.target().node().index(),
                interpolation,
                timestamps,
                keyframes,
            });
        }
        clips.push(Arc::new(AnimationClip { name, channels }));
    }
    clips
}
