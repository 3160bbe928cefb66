//! Images, samplers, textures, and the texture references used by materials.

use glam::Vec2;
use serde::Serialize;

use super::buffer::BufferView;
use super::defaults::{is_one, is_vec2_one, is_vec2_zero, is_zero, is_zero_u32};
use super::extensions::{Extension, ExtensionRegistry, RegisterExtensions};
use super::index::Index;

gl_enum! {
    /// Magnification filter.
    pub enum MagFilter {
        Nearest = 9728,
        Linear = 9729,
    }
}

gl_enum! {
    /// Minification filter.
    pub enum MinFilter {
        Nearest = 9728,
        Linear = 9729,
        NearestMipmapNearest = 9984,
        LinearMipmapNearest = 9985,
        NearestMipmapLinear = 9986,
        LinearMipmapLinear = 9987,
    }
}

gl_enum! {
    /// Texture coordinate wrapping.
    pub enum WrapMode {
        ClampToEdge = 33071,
        MirroredRepeat = 33648,
        Repeat = 10497,
    }
}

impl Default for WrapMode {
    fn default() -> Self {
        Self::Repeat
    }
}

fn is_repeat(mode: &WrapMode) -> bool {
    *mode == WrapMode::Repeat
}

/// Encoded image formats glTF core allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MimeType {
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/jpeg")]
    Jpeg,
}

impl MimeType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// File extension used for external image files.
    #[must_use]
    pub const fn file_extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

/// Image stored in a buffer view, a sibling file, or a data URI.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<MimeType>,
    #[serde(skip_serializing_if = "Index::is_unset_ref")]
    pub buffer_view: Index<BufferView>,
}

/// Filtering and wrapping for a texture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sampler {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mag_filter: Option<MagFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_filter: Option<MinFilter>,
    #[serde(skip_serializing_if = "is_repeat")]
    pub wrap_s: WrapMode,
    #[serde(skip_serializing_if = "is_repeat")]
    pub wrap_t: WrapMode,
}

/// An image paired with a sampler.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Texture {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Index::is_unset_ref")]
    pub sampler: Index<Sampler>,
    #[serde(skip_serializing_if = "Index::is_unset_ref")]
    pub source: Index<Image>,
}

/// `KHR_texture_transform` parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextureTransform {
    #[serde(skip_serializing_if = "is_vec2_zero")]
    pub offset: Vec2,
    #[serde(skip_serializing_if = "is_zero")]
    pub rotation: f32,
    #[serde(skip_serializing_if = "is_vec2_one")]
    pub scale: Vec2,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tex_coord: Option<u32>,
}

impl Default for TextureTransform {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            tex_coord: None,
        }
    }
}

impl TextureTransform {
    /// True when the transform leaves coordinates untouched.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Serialize)]
struct TextureInfoExtensions<'a> {
    #[serde(rename = "KHR_texture_transform")]
    transform: &'a TextureTransform,
}

fn transform_is_identity(transform: &Option<TextureTransform>) -> bool {
    transform.as_ref().is_none_or(TextureTransform::is_identity)
}

fn serialize_transform<S: serde::Serializer>(
    transform: &Option<TextureTransform>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match transform {
        Some(transform) => TextureInfoExtensions { transform }.serialize(serializer),
        None => serializer.serialize_none(),
    }
}

/// Reference from a material (or lightmap) to a texture.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextureInfo {
    pub index: Index<Texture>,
    #[serde(skip_serializing_if = "is_zero_u32")]
    pub tex_coord: u32,
    #[serde(
        rename = "extensions",
        skip_serializing_if = "transform_is_identity",
        serialize_with = "serialize_transform"
    )]
    pub transform: Option<TextureTransform>,
}

impl TextureInfo {
    #[must_use]
    pub fn new(index: Index<Texture>) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    /// Serde helper: a reference without a texture is omitted entirely.
    pub(crate) fn is_unset(info: &Self) -> bool {
        info.index.is_unset()
    }
}

impl RegisterExtensions for TextureInfo {
    fn register_extensions(&self, registry: &mut ExtensionRegistry) {
        if self.index.is_set() && !transform_is_identity(&self.transform) {
            registry.mark_used(Extension::KhrTextureTransform);
        }
    }
}

/// Normal map reference with its `scale`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalTextureInfo {
    #[serde(flatten)]
    pub info: TextureInfo,
    #[serde(skip_serializing_if = "is_one")]
    pub scale: f32,
}

impl Default for NormalTextureInfo {
    fn default() -> Self {
        Self {
            info: TextureInfo::default(),
            scale: 1.0,
        }
    }
}

impl NormalTextureInfo {
    pub(crate) fn is_unset(info: &Self) -> bool {
        info.info.index.is_unset()
    }
}

/// Occlusion map reference with its `strength`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OcclusionTextureInfo {
    #[serde(flatten)]
    pub info: TextureInfo,
    #[serde(skip_serializing_if = "is_one")]
    pub strength: f32,
}

impl Default for OcclusionTextureInfo {
    fn default() -> Self {
        Self {
            info: TextureInfo::default(),
            strength: 1.0,
        }
    }
}

impl OcclusionTextureInfo {
    pub(crate) fn is_unset(info: &Self) -> bool {
        info.info.index.is_unset()
    }
}
