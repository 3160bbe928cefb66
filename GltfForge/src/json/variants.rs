//! `KHR_materials_variants` root entries and primitive mappings.

use serde::Serialize;

use super::index::Index;
use super::material::Material;

/// A named material variant, listed once at the document root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaterialVariant {
    pub name: String,
}

/// Material to use on a primitive when any of `variants` is active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaterialVariantMapping {
    pub material: Index<Material>,
    pub variants: Vec<Index<MaterialVariant>>,
}
