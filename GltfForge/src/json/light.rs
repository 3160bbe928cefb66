//! `KHR_lights_punctual` lights.

use std::f32::consts::FRAC_PI_4;

use glam::Vec3;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::defaults::{is_one, is_vec3_one, is_zero};

/// Cone angles of a spot light, in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LightSpot {
    #[serde(skip_serializing_if = "is_zero")]
    pub inner_cone_angle: f32,
    #[serde(skip_serializing_if = "LightSpot::is_default_outer")]
    pub outer_cone_angle: f32,
}

impl LightSpot {
    fn is_default_outer(angle: &f32) -> bool {
        *angle == FRAC_PI_4
    }
}

impl Default for LightSpot {
    fn default() -> Self {
        Self {
            inner_cone_angle: 0.0,
            outer_cone_angle: FRAC_PI_4,
        }
    }
}

/// Light type; only spot lights carry cone parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Directional,
    Point,
    Spot(LightSpot),
}

impl Default for LightKind {
    fn default() -> Self {
        Self::Point
    }
}

impl LightKind {
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Directional => "directional",
            Self::Point => "point",
            Self::Spot(_) => "spot",
        }
    }
}

/// A punctual light, referenced from nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub name: String,
    pub kind: LightKind,
    pub color: Vec3,
    pub intensity: f32,
    /// Cutoff distance; zero means unlimited.
    pub range: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: LightKind::Point,
            color: Vec3::ONE,
            intensity: 1.0,
            range: 0.0,
        }
    }
}

impl Serialize for Light {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if !self.name.is_empty() {
            map.serialize_entry("name", &self.name)?;
        }
        map.serialize_entry("type", self.kind.type_name())?;
        if !is_vec3_one(&self.color) {
            map.serialize_entry("color", &self.color)?;
        }
        if !is_one(&self.intensity) {
            map.serialize_entry("intensity", &self.intensity)?;
        }
        if let LightKind::Spot(spot) = &self.kind {
            map.serialize_entry("spot", spot)?;
        }
        if !is_zero(&self.range) {
            map.serialize_entry("range", &self.range)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_light() {
        assert_eq!(serde_json::to_string(&Light::default()).unwrap(), r#"{"type":"point"}"#);
    }

    #[test]
    fn test_spot_light_writes_cone() {
        let light = Light {
            kind: LightKind::Spot(LightSpot {
                inner_cone_angle: 0.25,
                ..LightSpot::default()
            }),
            intensity: 5.0,
            ..Light::default()
        };
        assert_eq!(
            serde_json::to_string(&light).unwrap(),
            r#"{"type":"spot","intensity":5.0,"spot":{"innerConeAngle":0.25}}"#
        );
    }

    #[test]
    fn test_directional_light_has_no_spot() {
        let light = Light {
            kind: LightKind::Directional,
            color: Vec3::new(1.0, 0.5, 0.25),
            ..Light::default()
        };
        assert_eq!(
            serde_json::to_string(&light).unwrap(),
            r#"{"type":"directional","color":[1.0,0.5,0.25]}"#
        );
    }
}
