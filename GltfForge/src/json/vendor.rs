//! Vendor (`EPIC_*`) extension objects stored in root-level arrays.

use glam::{Vec3, Vec4};
use serde::Serialize;

use super::animation::Animation;
use super::index::Index;
use super::material::Material;
use super::mesh::Mesh;
use super::node::Node;
use super::texture::{Texture, TextureInfo};

/// HDRI backdrop (`EPIC_hdri_backdrops`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Backdrop {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Index::is_unset_ref")]
    pub mesh: Index<Mesh>,
    /// Cube faces in +X, -X, +Y, -Y, +Z, -Z order.
    #[serde(skip_serializing_if = "Backdrop::cubemap_incomplete")]
    pub cubemap: [Index<Texture>; 6],
    pub intensity: f32,
    pub size: f32,
    pub projection_center: Vec3,
    pub lighting_distance_factor: f32,
    pub use_camera_projection: bool,
}

impl Backdrop {
    fn cubemap_incomplete(cubemap: &[Index<Texture>; 6]) -> bool {
        cubemap.iter().any(|face| face.is_unset())
    }
}

impl Default for Backdrop {
    fn default() -> Self {
        Self {
            name: String::new(),
            mesh: Index::UNSET,
            cubemap: [Index::UNSET; 6],
            intensity: 1.0,
            size: 150.0,
            projection_center: Vec3::new(0.0, 1.7, 0.0),
            lighting_distance_factor: 0.5,
            use_camera_projection: false,
        }
    }
}

/// Clickable hotspot toggling an animation (`EPIC_animation_hotspots`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Index::is_unset_ref")]
    pub animation: Index<Animation>,
    #[serde(skip_serializing_if = "Index::is_unset_ref")]
    pub image: Index<Texture>,
    #[serde(skip_serializing_if = "Index::is_unset_ref")]
    pub hovered_image: Index<Texture>,
    #[serde(skip_serializing_if = "Index::is_unset_ref")]
    pub toggled_image: Index<Texture>,
    #[serde(skip_serializing_if = "Index::is_unset_ref")]
    pub toggled_hovered_image: Index<Texture>,
}

/// Baked lightmap for a mesh node (`EPIC_lightmap_textures`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LightMap {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "TextureInfo::is_unset")]
    pub texture: TextureInfo,
    pub lightmap_scale: Vec4,
    pub lightmap_add: Vec4,
    pub coordinate_scale_bias: Vec4,
}

impl Default for LightMap {
    fn default() -> Self {
        Self {
            name: String::new(),
            texture: TextureInfo::default(),
            lightmap_scale: Vec4::ONE,
            lightmap_add: Vec4::ZERO,
            coordinate_scale_bias: Vec4::new(1.0, 1.0, 0.0, 0.0),
        }
    }
}

/// Procedural sky dome (`EPIC_sky_spheres`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkySphere {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Index::is_unset_ref")]
    pub sky_sphere_mesh: Index<Mesh>,
    #[serde(skip_serializing_if = "Index::is_unset_ref")]
    pub sky_texture: Index<Texture>,
    #[serde(skip_serializing_if = "Index::is_unset_ref")]
    pub clouds_texture: Index<Texture>,
    #[serde(skip_serializing_if = "Index::is_unset_ref")]
    pub stars_texture: Index<Texture>,
    #[serde(skip_serializing_if = "Index::is_unset_ref")]
    pub directional_light: Index<Node>,
    pub sun_height: f32,
    pub sun_brightness: f32,
    pub stars_brightness: f32,
    pub cloud_speed: f32,
    pub cloud_opacity: f32,
    pub horizon_falloff: f32,
    pub sun_radius: f32,
    pub noise_power1: f32,
    pub noise_power2: f32,
    pub colors_determined_by_sun_position: bool,
    pub zenith_color: Vec4,
    pub horizon_color: Vec4,
    pub cloud_color: Vec4,
    pub overall_color: Vec4,
    pub scale: Vec3,
}

impl Default for SkySphere {
    fn default() -> Self {
        Self {
            name: String::new(),
            sky_sphere_mesh: Index::UNSET,
            sky_texture: Index::UNSET,
            clouds_texture: Index::UNSET,
            stars_texture: Index::UNSET,
            directional_light: Index::UNSET,
            sun_height: 0.0,
            sun_brightness: 75.0,
            stars_brightness: 0.1,
            cloud_speed: 1.0,
            cloud_opacity: 1.0,
            horizon_falloff: 3.0,
            sun_radius: 0.1,
            noise_power1: 1.0,
            noise_power2: 4.0,
            colors_determined_by_sun_position: true,
            zenith_color: Vec4::new(0.034, 0.110, 0.250, 1.0),
            horizon_color: Vec4::new(1.979, 2.375, 3.000, 1.0),
            cloud_color: Vec4::new(0.856, 0.896, 1.000, 1.0),
            overall_color: Vec4::ONE,
            scale: Vec3::ONE,
        }
    }
}

/// Material override for one material slot of a variant node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VariantMaterial {
    pub material: Index<Material>,
    pub index: u32,
}

/// Property overrides applied when a variant is activated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VariantNodeProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Index::is_unset_ref")]
    pub mesh: Index<Mesh>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<VariantMaterial>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VariantNode {
    #[serde(skip_serializing_if = "Index::is_unset_ref")]
    pub node: Index<Node>,
    pub properties: VariantNodeProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub name: String,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Index::is_unset_ref")]
    pub thumbnail: Index<Texture>,
    pub nodes: Vec<VariantNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VariantSet {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub variants: Vec<Variant>,
}

/// Switchable scene configurations (`EPIC_level_variant_sets`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelVariantSets {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub variant_sets: Vec<VariantSet>,
}
