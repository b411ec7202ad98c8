//! Keyframe playback onto entity transforms.
//!
//! An [`Animator`] binds the channels of parsed animation clips to concrete
//! entities. Binding happens once, when the animator is created; playback is
//! then just sampling keys and writing local transforms into the engine's
//! [`TransformManager`](crate::components::TransformManager).

use std::sync::Arc;

use anyhow::bail;
use cgmath::VectorSpace;
use log::{debug, warn};

use crate::{
    components::NameComponentManager,
    data_structures::{
        asset::Asset,
        entity::Entity,
        transform::{Transform, nlerp},
    },
    engine::Engine,
    resources::animation::{AnimationClip, Channel, Interpolation, Keyframes},
};

/// Clips plus the source node names their channels refer to.
///
/// Shared between an asset, its instances and every animator created from
/// them.
#[derive(Debug, Default)]
pub struct AnimationLibrary {
    pub clips: Vec<Arc<AnimationClip>>,
    pub node_names: Vec<Option<String>>,
}

#[derive(Clone, Debug)]
struct BoundClip {
    clip: Arc<AnimationClip>,
    /// `(channel index, target)`; a channel may drive one entity per instance.
    bindings: Vec<(usize, Entity)>,
}

#[derive(Clone, Debug)]
pub struct Animator {
    /// Entities per instance in source node order, used for retargeting.
    scopes: Vec<Vec<Entity>>,
    clips: Vec<BoundClip>,
}

/// Find the entity in `scope` that plays the role of source node `node`.
///
/// A named source node is matched by name; the positional entity wins when it
/// carries the same name, so duplicate names inside one asset still resolve
/// to the right node. Unnamed source nodes fall back to their position.
fn resolve_target(
    node: usize,
    source_name: Option<&str>,
    scope: &[Entity],
    names: &NameComponentManager,
) -> Option<Entity> {
    let positional = scope.get(node).copied();
    match source_name {
        Some(name) => {
            if let Some(entity) = positional.filter(|e| names.name(*e) == Some(name)) {
                return Some(entity);
            }
            names.first_by_name(scope, name)
        }
        None => positional,
    }
}

fn bind_clip(
    clip: &Arc<AnimationClip>,
    node_names: &[Option<String>],
    scopes: &[Vec<Entity>],
    names: &NameComponentManager,
) -> BoundClip {
    let mut bindings = Vec::new();
    for (idx, channel) in clip.channels.iter().enumerate() {
        let source_name = node_names.get(channel.node).and_then(|n| n.as_deref());
        for scope in scopes {
            match resolve_target(channel.node, source_name, scope, names) {
                Some(target) => bindings.push((idx, target)),
                None => warn!(
                    "Animation {}: no target for node {} ({:?}), channel skipped.",
                    clip.name, channel.node, source_name
                ),
            }
        }
    }
    BoundClip {
        clip: Arc::clone(clip),
        bindings,
    }
}

/// Index of the key at or before `time` and the blend factor towards the next key.
///
/// A NaN `time` resolves to the first key.
fn locate(timestamps: &[f32], time: f32) -> (usize, usize, f32) {
    let last = timestamps.len() - 1;
    if time.is_nan() || time <= timestamps[0] {
        return (0, 0, 0.0);
    }
    if time >= timestamps[last] {
        return (last, last, 0.0);
    }
    let next = timestamps.partition_point(|t| *t <= time);
    let prev = next - 1;
    let span = timestamps[next] - timestamps[prev];
    let t = if span > 0.0 { (time - timestamps[prev]) / span } else { 0.0 };
    (prev, next, t)
}

/// Overwrite the property driven by `channel` in `local` with its value at `time`.
fn sample(channel: &Channel, time: f32, local: &mut Transform) {
    let (prev, next, t) = locate(&channel.timestamps, time);
    let t = match channel.interpolation {
        Interpolation::Step => 0.0,
        Interpolation::Linear | Interpolation::CubicSpline => t,
    };
    match &channel.keyframes {
        Keyframes::Translation(values) => local.position = values[prev].lerp(values[next], t),
        Keyframes::Rotation(values) => local.rotation = nlerp(values[prev], values[next], t),
        Keyframes::Scale(values) => local.scale = values[prev].lerp(values[next], t),
    }
}

impl Animator {
    /// Bind every clip of `library` to each entity scope.
    ///
    /// `scopes` holds one entity list per instance, indexed by source node.
    pub fn new(
        library: &AnimationLibrary,
        scopes: Vec<Vec<Entity>>,
        names: &NameComponentManager,
    ) -> Self {
        let clips = library
            .clips
            .iter()
            .map(|clip| bind_clip(clip, &library.node_names, &scopes, names))
            .collect();
        debug!(
            "Created animator with {} clips over {} instance(s).",
            library.clips.len(),
            scopes.len()
        );
        Self { scopes, clips }
    }

    /// Append the clips of another library, retargeted onto this animator's
    /// entities by node name.
    ///
    /// Returns the number of clips added.
    pub fn add_animations(&mut self, library: &AnimationLibrary, names: &NameComponentManager) -> usize {
        let before = self.clips.len();
        for clip in &library.clips {
            let bound = bind_clip(clip, &library.node_names, &self.scopes, names);
            self.clips.push(bound);
        }
        self.clips.len() - before
    }

    /// Retarget the clips of `asset` onto this animator. See [`add_animations`](Self::add_animations).
    pub fn add_animations_from(&mut self, asset: &Asset, names: &NameComponentManager) -> usize {
        self.add_animations(asset.animation_library(), names)
    }

    pub fn animation_count(&self) -> usize {
        self.clips.len()
    }

    pub fn animation_name(&self, index: usize) -> Option<&str> {
        self.clips.get(index).map(|c| c.clip.name.as_str())
    }

    pub fn animation_duration(&self, index: usize) -> Option<f32> {
        self.clips.get(index).map(|c| c.clip.duration())
    }

    /// Entities driven by clip `index`, in channel order (may repeat).
    pub fn animation_targets(&self, index: usize) -> Vec<Entity> {
        self.clips
            .get(index)
            .map(|c| c.bindings.iter().map(|(_, e)| *e).collect())
            .unwrap_or_default()
    }

    /// Pose every target of clip `index` at `time` seconds.
    ///
    /// Times outside the clip are clamped to its first or last key; NaN maps
    /// to the first key. Fails when `index` names no clip.
    pub fn apply_animation(
        &self,
        engine: &mut Engine,
        index: usize,
        time: f32,
    ) -> anyhow::Result<()> {
        let Some(bound) = self.clips.get(index) else {
            bail!(
                "Animation index {} out of range, animator has {} clips.",
                index,
                self.clips.len()
            );
        };
        let transforms = engine.transforms_mut();
        for (channel_idx, target) in &bound.bindings {
            let Some(mut local) = transforms.local_transform(*target) else {
                continue;
            };
            sample(&bound.clip.channels[*channel_idx], time, &mut local);
            transforms.set_local_transform(*target, local);
        }
        Ok(())
    }

    /// Blend the current pose with clip `previous_index` sampled at `previous_time`.
    ///
    /// Call after [`apply_animation`](Self::apply_animation). `alpha == 0.0`
    /// yields the previous clip's pose, `alpha == 1.0` keeps the current one.
    /// Fails when `previous_index` names no clip.
    pub fn apply_cross_fade(
        &self,
        engine: &mut Engine,
        previous_index: usize,
        previous_time: f32,
        alpha: f32,
    ) -> anyhow::Result<()> {
        let Some(bound) = self.clips.get(previous_index) else {
            bail!(
                "Animation index {} out of range, animator has {} clips.",
                previous_index,
                self.clips.len()
            );
        };
        let alpha = if alpha.is_nan() { 1.0 } else { alpha.clamp(0.0, 1.0) };
        let transforms = engine.transforms_mut();
        for (channel_idx, target) in &bound.bindings {
            let Some(current) = transforms.local_transform(*target) else {
                continue;
            };
            let mut previous = current;
            sample(&bound.clip.channels[*channel_idx], previous_time, &mut previous);
            transforms.set_local_transform(*target, previous.blend(&current, alpha));
        }
        Ok(())
    }
}
