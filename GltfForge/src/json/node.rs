//! Nodes, scenes, and skins.

use glam::{Mat4, Quat, Vec3};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::accessor::Accessor;
use super::camera::Camera;
use super::defaults::{is_mat4_identity, is_quat_identity, is_vec3_one, is_vec3_zero};
use super::extensions::{Extension, ExtensionRegistry, Reference, RegisterExtensions};
use super::index::Index;
use super::light::Light;
use super::mesh::Mesh;
use super::vendor::{Backdrop, Hotspot, LightMap, SkySphere};

/// Relative tolerance used when deciding whether a decomposed matrix still
/// reproduces the original.
const DECOMPOSE_EPSILON: f32 = 1e-5;

/// Local transform of a node: either a raw matrix or translation/rotation/scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeTransform {
    Trs {
        translation: Vec3,
        rotation: Quat,
        scale: Vec3,
    },
    Matrix(Mat4),
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl NodeTransform {
    pub const IDENTITY: Self = Self::Trs {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self::Trs {
            translation,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    /// Decompose `matrix` into TRS when that loses nothing.
    ///
    /// Matrices with shear (typically non-uniform scale under a parent
    /// rotation) stay as [`NodeTransform::Matrix`].
    #[must_use]
    pub fn from_matrix(matrix: Mat4) -> Self {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        let rebuilt = Mat4::from_scale_rotation_translation(scale, rotation, translation);
        let magnitude = matrix
            .to_cols_array()
            .iter()
            .fold(1.0_f32, |max, v| max.max(v.abs()));
        let tolerance = DECOMPOSE_EPSILON * magnitude;

        if scale.is_finite() && rotation.is_finite() && rebuilt.abs_diff_eq(matrix, tolerance) {
            Self::Trs {
                translation,
                rotation,
                scale,
            }
        } else {
            Self::Matrix(matrix)
        }
    }

    /// The transform as a single matrix.
    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        match *self {
            Self::Trs {
                translation,
                rotation,
                scale,
            } => Mat4::from_scale_rotation_translation(scale, rotation, translation),
            Self::Matrix(matrix) => matrix,
        }
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        match self {
            Self::Trs {
                translation,
                rotation,
                scale,
            } => is_vec3_zero(translation) && is_quat_identity(rotation) && is_vec3_one(scale),
            Self::Matrix(matrix) => is_mat4_identity(matrix),
        }
    }
}

impl Serialize for NodeTransform {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match self {
            Self::Matrix(matrix) => {
                if !is_mat4_identity(matrix) {
                    map.serialize_entry("matrix", &matrix.to_cols_array())?;
                }
            }
            Self::Trs {
                translation,
                rotation,
                scale,
            } => {
                if !is_vec3_zero(translation) {
                    map.serialize_entry("translation", translation)?;
                }
                if !is_quat_identity(rotation) {
                    map.serialize_entry("rotation", rotation)?;
                }
                if !is_vec3_one(scale) {
                    map.serialize_entry("scale", scale)?;
                }
            }
        }
        map.end()
    }
}

/// Node-level extension references.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeExtensions {
    pub light: Index<Light>,
    pub lightmap: Index<LightMap>,
    pub hotspot: Index<Hotspot>,
    pub backdrop: Index<Backdrop>,
    pub sky_sphere: Index<SkySphere>,
}

impl NodeExtensions {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.light.is_unset()
            && self.lightmap.is_unset()
            && self.hotspot.is_unset()
            && self.backdrop.is_unset()
            && self.sky_sphere.is_unset()
    }

    /// Clear references into vendor extension arrays.
    pub fn strip_vendor(&mut self) {
        self.lightmap = Index::UNSET;
        self.hotspot = Index::UNSET;
        self.backdrop = Index::UNSET;
        self.sky_sphere = Index::UNSET;
    }
}

impl Serialize for NodeExtensions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if self.light.is_set() {
            let value = Reference { key: "light", value: &self.light };
            map.serialize_entry(Extension::KhrLightsPunctual.as_str(), &value)?;
        }
        if self.lightmap.is_set() {
            let value = Reference { key: "lightmap", value: &self.lightmap };
            map.serialize_entry(Extension::EpicLightmapTextures.as_str(), &value)?;
        }
        if self.hotspot.is_set() {
            let value = Reference { key: "hotspot", value: &self.hotspot };
            map.serialize_entry(Extension::EpicAnimationHotspots.as_str(), &value)?;
        }
        if self.backdrop.is_set() {
            let value = Reference { key: "backdrop", value: &self.backdrop };
            map.serialize_entry(Extension::EpicHdriBackdrops.as_str(), &value)?;
        }
        if self.sky_sphere.is_set() {
            let value = Reference { key: "skySphere", value: &self.sky_sphere };
            map.serialize_entry(Extension::EpicSkySpheres.as_str(), &value)?;
        }
        map.end()
    }
}

/// A scene graph element.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Node {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(flatten)]
    pub transform: NodeTransform,
    #[serde(skip_serializing_if = "Index::is_unset_ref")]
    pub camera: Index<Camera>,
    #[serde(skip_serializing_if = "Index::is_unset_ref")]
    pub skin: Index<Skin>,
    #[serde(skip_serializing_if = "Index::is_unset_ref")]
    pub mesh: Index<Mesh>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Index<Node>>,
    #[serde(skip_serializing_if = "NodeExtensions::is_empty")]
    pub extensions: NodeExtensions,
    /// Node standing in for the host component this node wraps.
    #[serde(skip)]
    pub component_node: Index<Node>,
}

impl Node {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl RegisterExtensions for Node {
    fn register_extensions(&self, registry: &mut ExtensionRegistry) {
        let ext = &self.extensions;
        let present = [
            (ext.light.is_set(), Extension::KhrLightsPunctual),
            (ext.lightmap.is_set(), Extension::EpicLightmapTextures),
            (ext.hotspot.is_set(), Extension::EpicAnimationHotspots),
            (ext.backdrop.is_set(), Extension::EpicHdriBackdrops),
            (ext.sky_sphere.is_set(), Extension::EpicSkySpheres),
        ];
        for (used, extension) in present {
            if used {
                registry.mark_used(extension);
            }
        }
    }
}

/// Root nodes rendered together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Scene {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<Index<Node>>,
}

/// Joints and inverse bind matrices for skinned meshes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Skin {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Index::is_unset_ref")]
    pub inverse_bind_matrices: Index<Accessor>,
    #[serde(skip_serializing_if = "Index::is_unset_ref")]
    pub skeleton: Index<Node>,
    pub joints: Vec<Index<Node>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_default_node_is_empty_object() {
        assert_eq!(serde_json::to_string(&Node::default()).unwrap(), "{}");
    }

    #[test]
    fn test_identity_matrix_is_omitted() {
        let node = Node {
            transform: NodeTransform::Matrix(Mat4::IDENTITY),
            ..Node::default()
        };
        assert_eq!(serde_json::to_string(&node).unwrap(), "{}");
    }

    #[test]
    fn test_trs_writes_only_non_default_parts() {
        let node = Node {
            name: "pivot".to_string(),
            transform: NodeTransform::from_translation(Vec3::new(1.0, 2.0, 3.0)),
            children: vec![Index::new(4)],
            ..Node::default()
        };
        assert_eq!(
            serde_json::to_string(&node).unwrap(),
            r#"{"name":"pivot","translation":[1.0,2.0,3.0],"children":[4]}"#
        );
    }

    #[test]
    fn test_matrix_variant_never_writes_trs() {
        let matrix = Mat4::from_cols_array(&[
            1.0, 0.5, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ]);
        let transform = NodeTransform::from_matrix(matrix);
        assert!(matches!(transform, NodeTransform::Matrix(_)));

        let json = serde_json::to_string(&Node { transform, ..Node::default() }).unwrap();
        assert!(json.contains("\"matrix\""));
        assert!(!json.contains("translation"));
    }

    #[test]
    fn test_from_matrix_decomposes_rigid_transform() {
        let rotation = Quat::from_rotation_y(FRAC_PI_2);
        let matrix = Mat4::from_scale_rotation_translation(Vec3::splat(2.0), rotation, Vec3::X);
        match NodeTransform::from_matrix(matrix) {
            NodeTransform::Trs { translation, scale, .. } => {
                assert!(translation.abs_diff_eq(Vec3::X, 1e-6));
                assert!(scale.abs_diff_eq(Vec3::splat(2.0), 1e-5));
            }
            NodeTransform::Matrix(_) => panic!("rigid transform should decompose"),
        }
    }

    #[test]
    fn test_node_extensions() {
        let node = Node {
            extensions: NodeExtensions {
                light: Index::new(0),
                sky_sphere: Index::new(1),
                ..NodeExtensions::default()
            },
            ..Node::default()
        };
        assert_eq!(
            serde_json::to_string(&node).unwrap(),
            r#"{"extensions":{"KHR_lights_punctual":{"light":0},"EPIC_sky_spheres":{"skySphere":1}}}"#
        );

        let mut registry = ExtensionRegistry::new();
        node.register_extensions(&mut registry);
        assert!(registry.is_used(Extension::KhrLightsPunctual));
        assert!(registry.is_used(Extension::EpicSkySpheres));
        assert!(!registry.is_used(Extension::EpicHdriBackdrops));
    }

    #[test]
    fn test_default_skin_writes_joints() {
        assert_eq!(serde_json::to_string(&Skin::default()).unwrap(), r#"{"joints":[]}"#);
    }
}
