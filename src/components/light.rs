use std::collections::HashMap;

use crate::data_structures::entity::Entity;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LightKind {
    Directional,
    Point,
    Spot {
        inner_cone_angle: f32,
        outer_cone_angle: f32,
    },
}

/// Punctual light as described by `KHR_lights_punctual`.
#[derive(Clone, Debug, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: [f32; 3],
    pub intensity: f32,
    /// `None` means infinite range.
    pub range: Option<f32>,
}

impl From<gltf::khr_lights_punctual::Light<'_>> for Light {
    fn from(light: gltf::khr_lights_punctual::Light<'_>) -> Self {
        let kind = match light.kind() {
            gltf::khr_lights_punctual::Kind::Directional => LightKind::Directional,
            gltf::khr_lights_punctual::Kind::Point => LightKind::Point,
            gltf::khr_lights_punctual::Kind::Spot {
                inner_cone_angle,
                outer_cone_angle,
            } => LightKind::Spot {
                inner_cone_angle,
                outer_cone_angle,
            },
        };
        Light {
            kind,
            color: light.color(),
            intensity: light.intensity(),
            range: light.range(),
        }
    }
}

#[derive(Debug, Default)]
pub struct LightManager {
    lights: HashMap<Entity, Light>,
}

impl LightManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, entity: Entity) -> bool {
        self.lights.contains_key(&entity)
    }

    pub fn create(&mut self, entity: Entity, light: Light) {
        self.lights.insert(entity, light);
    }

    pub fn get(&self, entity: Entity) -> Option<&Light> {
        self.lights.get(&entity)
    }

    pub fn destroy(&mut self, entity: Entity) {
        self.lights.remove(&entity);
    }
}
