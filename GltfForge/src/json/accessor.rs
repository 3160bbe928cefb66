//! Accessors: typed views over buffer view bytes.

use serde::Serialize;

use super::buffer::BufferView;
use super::defaults::{is_false, is_zero_u64};
use super::index::Index;

gl_enum! {
    /// Numeric type of each accessor component.
    pub enum ComponentType {
        Byte = 5120,
        UnsignedByte = 5121,
        Short = 5122,
        UnsignedShort = 5123,
        UnsignedInt = 5125,
        Float = 5126,
    }
}

impl ComponentType {
    /// Size of one component in bytes.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::Byte | Self::UnsignedByte => 1,
            Self::Short | Self::UnsignedShort => 2,
            Self::UnsignedInt | Self::Float => 4,
        }
    }
}

impl Default for ComponentType {
    fn default() -> Self {
        Self::Float
    }
}

/// Element shape of an accessor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccessorType {
    #[default]
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl AccessorType {
    /// Number of components per element.
    #[must_use]
    pub const fn component_count(self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Vec2 => 2,
            Self::Vec3 => 3,
            Self::Vec4 | Self::Mat2 => 4,
            Self::Mat3 => 9,
            Self::Mat4 => 16,
        }
    }
}

/// Accessor into a buffer view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Accessor {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Index::is_unset_ref")]
    pub buffer_view: Index<BufferView>,
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub byte_offset: u64,
    pub count: u32,
    #[serde(rename = "type")]
    pub accessor_type: AccessorType,
    pub component_type: ComponentType,
    #[serde(skip_serializing_if = "is_false")]
    pub normalized: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub min: Vec<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub max: Vec<f32>,
}

impl Accessor {
    /// Size in bytes of one tightly packed element.
    #[must_use]
    pub fn element_size(&self) -> usize {
        self.component_type.size() * self.accessor_type.component_count()
    }
}
