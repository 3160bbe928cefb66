//! Meshes and primitives.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::accessor::Accessor;
use super::extensions::{Extension, ExtensionRegistry, RegisterExtensions};
use super::index::Index;
use super::material::Material;
use super::variants::MaterialVariantMapping;

gl_enum! {
    /// Topology of a primitive.
    pub enum PrimitiveMode {
        Points = 0,
        Lines = 1,
        LineLoop = 2,
        LineStrip = 3,
        Triangles = 4,
        TriangleStrip = 5,
        TriangleFan = 6,
    }
}

impl Default for PrimitiveMode {
    fn default() -> Self {
        Self::Triangles
    }
}

fn is_triangles(mode: &PrimitiveMode) -> bool {
    *mode == PrimitiveMode::Triangles
}

/// Vertex attribute semantics mapped to accessors.
///
/// Written as a JSON object keyed by semantic (`POSITION`, `TEXCOORD_0`, ...).
/// Unset entries are skipped. Set-numbered semantics are numbered after the
/// skip, so `TEXCOORD_n` and friends always start at 0 without gaps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    pub position: Index<Accessor>,
    pub normal: Index<Accessor>,
    pub tangent: Index<Accessor>,
    pub tex_coords: Vec<Index<Accessor>>,
    pub colors: Vec<Index<Accessor>>,
    pub joints: Vec<Index<Accessor>>,
    pub weights: Vec<Index<Accessor>>,
}

impl Attributes {
    /// Every (semantic, accessor) pair with a set accessor, in output order.
    pub fn iter(&self) -> impl Iterator<Item = (String, Index<Accessor>)> + '_ {
        let fixed = [
            ("POSITION", self.position),
            ("NORMAL", self.normal),
            ("TANGENT", self.tangent),
        ]
        .into_iter()
        .map(|(name, index)| (name.to_string(), index));

        let numbered = [
            ("TEXCOORD", &self.tex_coords),
            ("COLOR", &self.colors),
            ("JOINTS", &self.joints),
            ("WEIGHTS", &self.weights),
        ]
        .into_iter()
        .flat_map(|(prefix, indices)| {
            indices
                .iter()
                .filter(|index| index.is_set())
                .enumerate()
                .map(move |(set, &index)| (format!("{prefix}_{set}"), index))
        });

        fixed.filter(|(_, index)| index.is_set()).chain(numbered)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (semantic, index) in self.iter() {
            map.serialize_entry(&semantic, &index)?;
        }
        map.end()
    }
}

/// Per-primitive extension payloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PrimitiveExtensions {
    #[serde(
        rename = "KHR_materials_variants",
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "serialize_mappings"
    )]
    pub variant_mappings: Vec<MaterialVariantMapping>,
}

impl PrimitiveExtensions {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variant_mappings.is_empty()
    }
}

fn serialize_mappings<S: Serializer>(
    mappings: &[MaterialVariantMapping],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(1))?;
    map.serialize_entry("mappings", mappings)?;
    map.end()
}

/// Geometry drawn with one material.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Primitive {
    pub attributes: Attributes,
    #[serde(skip_serializing_if = "Index::is_unset_ref")]
    pub indices: Index<Accessor>,
    #[serde(skip_serializing_if = "Index::is_unset_ref")]
    pub material: Index<Material>,
    #[serde(skip_serializing_if = "is_triangles")]
    pub mode: PrimitiveMode,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<Attributes>,
    #[serde(skip_serializing_if = "PrimitiveExtensions::is_empty")]
    pub extensions: PrimitiveExtensions,
}

/// A set of primitives rendered together.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Mesh {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub primitives: Vec<Primitive>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub weights: Vec<f32>,
}

impl RegisterExtensions for Mesh {
    fn register_extensions(&self, registry: &mut ExtensionRegistry) {
        if self.primitives.iter().any(|p| !p.extensions.is_empty()) {
            registry.mark_used(Extension::KhrMaterialsVariants);
        }
    }
}
