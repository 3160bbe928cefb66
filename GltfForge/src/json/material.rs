//! Materials and the `KHR_materials_*` extensions.

use glam::{Vec3, Vec4};
use serde::Serialize;

use super::defaults::{is_false, is_one, is_vec3_zero, is_vec4_one, is_zero};
use super::extensions::{Extension, ExtensionRegistry, RegisterExtensions};
use super::texture::{NormalTextureInfo, OcclusionTextureInfo, TextureInfo};

/// How the alpha channel of the base color is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlphaMode {
    #[default]
    Opaque,
    Mask,
    Blend,
}

/// Which shading model a material's extensions describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingModel {
    DefaultLit,
    Unlit,
    ClearCoat,
}

/// Core metallic-roughness parameters.
///
/// Always written, even when every field is at its default.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PbrMetallicRoughness {
    #[serde(skip_serializing_if = "is_vec4_one")]
    pub base_color_factor: Vec4,
    #[serde(skip_serializing_if = "TextureInfo::is_unset")]
    pub base_color_texture: TextureInfo,
    #[serde(skip_serializing_if = "is_one")]
    pub metallic_factor: f32,
    #[serde(skip_serializing_if = "is_one")]
    pub roughness_factor: f32,
    #[serde(skip_serializing_if = "TextureInfo::is_unset")]
    pub metallic_roughness_texture: TextureInfo,
}

impl Default for PbrMetallicRoughness {
    fn default() -> Self {
        Self {
            base_color_factor: Vec4::ONE,
            base_color_texture: TextureInfo::default(),
            metallic_factor: 1.0,
            roughness_factor: 1.0,
            metallic_roughness_texture: TextureInfo::default(),
        }
    }
}

/// `KHR_materials_unlit` carries no parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Unlit {}

/// `KHR_materials_clearcoat`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearCoat {
    #[serde(skip_serializing_if = "is_zero")]
    pub clearcoat_factor: f32,
    #[serde(skip_serializing_if = "TextureInfo::is_unset")]
    pub clearcoat_texture: TextureInfo,
    #[serde(skip_serializing_if = "is_zero")]
    pub clearcoat_roughness_factor: f32,
    #[serde(skip_serializing_if = "TextureInfo::is_unset")]
    pub clearcoat_roughness_texture: TextureInfo,
    #[serde(skip_serializing_if = "NormalTextureInfo::is_unset")]
    pub clearcoat_normal_texture: NormalTextureInfo,
}

/// `KHR_materials_emissive_strength`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmissiveStrength {
    #[serde(skip_serializing_if = "is_one")]
    pub emissive_strength: f32,
}

impl Default for EmissiveStrength {
    fn default() -> Self {
        Self {
            emissive_strength: 1.0,
        }
    }
}

/// `KHR_materials_ior`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ior {
    #[serde(skip_serializing_if = "Ior::is_default_ior")]
    pub ior: f32,
}

impl Ior {
    pub const DEFAULT: f32 = 1.5;

    fn is_default_ior(ior: &f32) -> bool {
        *ior == Self::DEFAULT
    }
}

impl Default for Ior {
    fn default() -> Self {
        Self { ior: Self::DEFAULT }
    }
}

/// `KHR_materials_sheen`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheen {
    #[serde(skip_serializing_if = "is_vec3_zero")]
    pub sheen_color_factor: Vec3,
    #[serde(skip_serializing_if = "TextureInfo::is_unset")]
    pub sheen_color_texture: TextureInfo,
    #[serde(skip_serializing_if = "is_zero")]
    pub sheen_roughness_factor: f32,
    #[serde(skip_serializing_if = "TextureInfo::is_unset")]
    pub sheen_roughness_texture: TextureInfo,
}

/// `KHR_materials_specular`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Specular {
    #[serde(skip_serializing_if = "is_one")]
    pub specular_factor: f32,
    #[serde(skip_serializing_if = "TextureInfo::is_unset")]
    pub specular_texture: TextureInfo,
}

impl Default for Specular {
    fn default() -> Self {
        Self {
            specular_factor: 1.0,
            specular_texture: TextureInfo::default(),
        }
    }
}

/// `KHR_materials_transmission`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transmission {
    #[serde(skip_serializing_if = "is_zero")]
    pub transmission_factor: f32,
    #[serde(skip_serializing_if = "TextureInfo::is_unset")]
    pub transmission_texture: TextureInfo,
}

/// Material extension payloads. A `Some` field emits its extension.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MaterialExtensions {
    #[serde(rename = "KHR_materials_unlit", skip_serializing_if = "Option::is_none")]
    pub unlit: Option<Unlit>,
    #[serde(rename = "KHR_materials_clearcoat", skip_serializing_if = "Option::is_none")]
    pub clearcoat: Option<ClearCoat>,
    #[serde(
        rename = "KHR_materials_emissive_strength",
        skip_serializing_if = "Option::is_none"
    )]
    pub emissive_strength: Option<EmissiveStrength>,
    #[serde(rename = "KHR_materials_ior", skip_serializing_if = "Option::is_none")]
    pub ior: Option<Ior>,
    #[serde(rename = "KHR_materials_sheen", skip_serializing_if = "Option::is_none")]
    pub sheen: Option<Sheen>,
    #[serde(rename = "KHR_materials_specular", skip_serializing_if = "Option::is_none")]
    pub specular: Option<Specular>,
    #[serde(rename = "KHR_materials_transmission", skip_serializing_if = "Option::is_none")]
    pub transmission: Option<Transmission>,
}

impl MaterialExtensions {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn is_half(value: &f32) -> bool {
    *value == 0.5
}

/// A glTF material.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub pbr_metallic_roughness: PbrMetallicRoughness,
    #[serde(skip_serializing_if = "NormalTextureInfo::is_unset")]
    pub normal_texture: NormalTextureInfo,
    #[serde(skip_serializing_if = "OcclusionTextureInfo::is_unset")]
    pub occlusion_texture: OcclusionTextureInfo,
    #[serde(skip_serializing_if = "TextureInfo::is_unset")]
    pub emissive_texture: TextureInfo,
    #[serde(skip_serializing_if = "is_vec3_zero")]
    pub emissive_factor: Vec3,
    #[serde(skip_serializing_if = "super::defaults::is_default")]
    pub alpha_mode: AlphaMode,
    #[serde(skip_serializing_if = "is_half")]
    pub alpha_cutoff: f32,
    #[serde(skip_serializing_if = "is_false")]
    pub double_sided: bool,
    #[serde(skip_serializing_if = "MaterialExtensions::is_empty")]
    pub extensions: MaterialExtensions,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            pbr_metallic_roughness: PbrMetallicRoughness::default(),
            normal_texture: NormalTextureInfo::default(),
            occlusion_texture: OcclusionTextureInfo::default(),
            emissive_texture: TextureInfo::default(),
            emissive_factor: Vec3::ZERO,
            alpha_mode: AlphaMode::Opaque,
            alpha_cutoff: 0.5,
            double_sided: false,
            extensions: MaterialExtensions::default(),
        }
    }
}

impl Material {
    /// A material drawn without lighting.
    #[must_use]
    pub fn unlit(name: impl Into<String>) -> Self {
        let mut material = Self {
            name: name.into(),
            ..Self::default()
        };
        material.set_shading_model(ShadingModel::Unlit);
        material
    }

    #[must_use]
    pub fn shading_model(&self) -> ShadingModel {
        if self.extensions.unlit.is_some() {
            ShadingModel::Unlit
        } else if self.extensions.clearcoat.is_some() {
            ShadingModel::ClearCoat
        } else {
            ShadingModel::DefaultLit
        }
    }

    /// Switch shading model, keeping existing clearcoat parameters when
    /// switching to [`ShadingModel::ClearCoat`].
    pub fn set_shading_model(&mut self, model: ShadingModel) {
        match model {
            ShadingModel::DefaultLit => {
                self.extensions.unlit = None;
                self.extensions.clearcoat = None;
            }
            ShadingModel::Unlit => {
                self.extensions.unlit = Some(Unlit {});
                self.extensions.clearcoat = None;
            }
            ShadingModel::ClearCoat => {
                self.extensions.unlit = None;
                self.extensions.clearcoat.get_or_insert_with(ClearCoat::default);
            }
        }
    }

    fn texture_infos(&self) -> impl Iterator<Item = &TextureInfo> {
        let pbr = &self.pbr_metallic_roughness;
        let ext = &self.extensions;
        [
            Some(&pbr.base_color_texture),
            Some(&pbr.metallic_roughness_texture),
            Some(&self.normal_texture.info),
            Some(&self.occlusion_texture.info),
            Some(&self.emissive_texture),
            ext.clearcoat.as_ref().map(|c| &c.clearcoat_texture),
            ext.clearcoat.as_ref().map(|c| &c.clearcoat_roughness_texture),
            ext.clearcoat.as_ref().map(|c| &c.clearcoat_normal_texture.info),
            ext.sheen.as_ref().map(|s| &s.sheen_color_texture),
            ext.sheen.as_ref().map(|s| &s.sheen_roughness_texture),
            ext.specular.as_ref().map(|s| &s.specular_texture),
            ext.transmission.as_ref().map(|t| &t.transmission_texture),
        ]
        .into_iter()
        .flatten()
    }
}

impl RegisterExtensions for Material {
    fn register_extensions(&self, registry: &mut ExtensionRegistry) {
        let ext = &self.extensions;
        let present = [
            (ext.unlit.is_some(), Extension::KhrMaterialsUnlit),
            (ext.clearcoat.is_some(), Extension::KhrMaterialsClearcoat),
            (ext.emissive_strength.is_some(), Extension::KhrMaterialsEmissiveStrength),
            (ext.ior.is_some(), Extension::KhrMaterialsIor),
            (ext.sheen.is_some(), Extension::KhrMaterialsSheen),
            (ext.specular.is_some(), Extension::KhrMaterialsSpecular),
            (ext.transmission.is_some(), Extension::KhrMaterialsTransmission),
        ];
        for (used, extension) in present {
            if used {
                registry.mark_used(extension);
            }
        }
        for info in self.texture_infos() {
            info.register_extensions(registry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::{Index, TextureTransform};

    #[test]
    fn test_default_material_only_writes_pbr() {
        assert_eq!(
            serde_json::to_string(&Material::default()).unwrap(),
            r#"{"pbrMetallicRoughness":{}}"#
        );
    }

    #[test]
    fn test_unlit_material() {
        let material = Material::unlit("flat");
        assert_eq!(material.shading_model(), ShadingModel::Unlit);
        assert_eq!(
            serde_json::to_string(&material).unwrap(),
            r#"{"name":"flat","pbrMetallicRoughness":{},"extensions":{"KHR_materials_unlit":{}}}"#
        );

        let mut registry = ExtensionRegistry::new();
        material.register_extensions(&mut registry);
        assert!(registry.is_used(Extension::KhrMaterialsUnlit));
        assert!(!registry.is_required(Extension::KhrMaterialsUnlit));
    }

    #[test]
    fn test_shading_model_switch_clears_other_model() {
        let mut material = Material::unlit("m");
        material.set_shading_model(ShadingModel::ClearCoat);
        assert_eq!(material.shading_model(), ShadingModel::ClearCoat);
        assert!(material.extensions.unlit.is_none());

        material.set_shading_model(ShadingModel::DefaultLit);
        assert!(material.extensions.is_empty());
    }

    #[test]
    fn test_non_default_fields() {
        let material = Material {
            alpha_mode: AlphaMode::Mask,
            alpha_cutoff: 0.25,
            double_sided: true,
            emissive_factor: Vec3::new(1.0, 0.0, 0.0),
            pbr_metallic_roughness: PbrMetallicRoughness {
                metallic_factor: 0.0,
                ..PbrMetallicRoughness::default()
            },
            ..Material::default()
        };
        assert_eq!(
            serde_json::to_string(&material).unwrap(),
            r#"{"pbrMetallicRoughness":{"metallicFactor":0.0},"emissiveFactor":[1.0,0.0,0.0],"alphaMode":"MASK","alphaCutoff":0.25,"doubleSided":true}"#
        );
    }

    #[test]
    fn test_texture_transform_found_in_extension_textures() {
        let mut material = Material::default();
        material.extensions.specular = Some(Specular {
            specular_texture: TextureInfo {
                index: Index::new(0),
                transform: Some(TextureTransform {
                    rotation: 1.0,
                    ..TextureTransform::default()
                }),
                ..TextureInfo::default()
            },
            ..Specular::default()
        });

        let mut registry = ExtensionRegistry::new();
        material.register_extensions(&mut registry);
        assert!(registry.is_used(Extension::KhrMaterialsSpecular));
        assert!(registry.is_used(Extension::KhrTextureTransform));
    }
}
