//! glTF 2.0 document model.
//!
//! Every entity is plain data: primitive fields, `glam` value types, and
//! [`Index`] references into the arrays owned by [`JsonRoot`]. Entities never
//! own each other, so the graph has no ownership cycles. Fields equal to their
//! glTF default are skipped when the document is written.

/// Declares a glTF enum that is written as its numeric GL code.
macro_rules! gl_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $code:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// The numeric code written to JSON.
            #[must_use]
            pub const fn code(self) -> u32 {
                match self {
                    $(Self::$variant => $code),+
                }
            }
        }

        impl TryFrom<u32> for $name {
            type Error = crate::error::Error;

            fn try_from(value: u32) -> crate::error::Result<Self> {
                match value {
                    $($code => Ok(Self::$variant),)+
                    _ => Err(crate::error::Error::InvalidEnumValue {
                        kind: stringify!($name),
                        value,
                    }),
                }
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_u32(self.code())
            }
        }
    };
}

mod accessor;
mod animation;
mod buffer;
mod camera;
pub(crate) mod defaults;
mod extensions;
mod index;
mod light;
mod material;
mod mesh;
mod node;
mod root;
mod serialize;
mod texture;
mod variants;
mod vendor;

pub use accessor::{Accessor, AccessorType, ComponentType};
pub use animation::{
    Animation, AnimationChannel, AnimationChannelTarget, AnimationExtensions, AnimationPath,
    AnimationPlayback, AnimationSampler, Interpolation,
};
pub use buffer::{Buffer, BufferTarget, BufferView};
pub use camera::{
    Camera, CameraControl, CameraControlMode, CameraExtensions, CameraProjection, Orthographic,
    Perspective,
};
pub use extensions::{Extension, ExtensionRegistry, RegisterExtensions};
pub use index::Index;
pub use light::{Light, LightKind, LightSpot};
pub use material::{
    AlphaMode, ClearCoat, EmissiveStrength, Ior, Material, MaterialExtensions, PbrMetallicRoughness,
    ShadingModel, Sheen, Specular, Transmission, Unlit,
};
pub use mesh::{Attributes, Mesh, Primitive, PrimitiveExtensions, PrimitiveMode};
pub use node::{Node, NodeExtensions, NodeTransform, Scene, Skin};
pub use root::{Asset, JsonEntity, JsonRoot};
pub use serialize::{SerializeOptions, to_json_string, write_json};
pub use texture::{
    Image, MagFilter, MimeType, MinFilter, NormalTextureInfo, OcclusionTextureInfo, Sampler,
    Texture, TextureInfo, TextureTransform, WrapMode,
};
pub use variants::{MaterialVariant, MaterialVariantMapping};
pub use vendor::{
    Backdrop, Hotspot, LevelVariantSets, LightMap, SkySphere, Variant, VariantMaterial,
    VariantNode, VariantNodeProperties, VariantSet,
};
