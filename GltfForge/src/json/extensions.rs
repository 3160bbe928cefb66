//! Extension identifiers and the used/required registry.

use std::collections::BTreeSet;

use serde::{Serialize, Serializer};

/// glTF extensions this writer knows how to emit.
///
/// Declaration order is alphabetical, which is also the order the ids are
/// written in `extensionsUsed` / `extensionsRequired`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Extension {
    EpicAnimationHotspots,
    EpicAnimationPlayback,
    EpicCameraControls,
    EpicHdriBackdrops,
    EpicLevelVariantSets,
    EpicLightmapTextures,
    EpicSkySpheres,
    KhrLightsPunctual,
    KhrMaterialsClearcoat,
    KhrMaterialsEmissiveStrength,
    KhrMaterialsIor,
    KhrMaterialsSheen,
    KhrMaterialsSpecular,
    KhrMaterialsTransmission,
    KhrMaterialsUnlit,
    KhrMaterialsVariants,
    KhrMeshQuantization,
    KhrTextureTransform,
}

impl Extension {
    pub const ALL: [Self; 18] = [
        Self::EpicAnimationHotspots,
        Self::EpicAnimationPlayback,
        Self::EpicCameraControls,
        Self::EpicHdriBackdrops,
        Self::EpicLevelVariantSets,
        Self::EpicLightmapTextures,
        Self::EpicSkySpheres,
        Self::KhrLightsPunctual,
        Self::KhrMaterialsClearcoat,
        Self::KhrMaterialsEmissiveStrength,
        Self::KhrMaterialsIor,
        Self::KhrMaterialsSheen,
        Self::KhrMaterialsSpecular,
        Self::KhrMaterialsTransmission,
        Self::KhrMaterialsUnlit,
        Self::KhrMaterialsVariants,
        Self::KhrMeshQuantization,
        Self::KhrTextureTransform,
    ];

    /// The extension id as written in the document.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EpicAnimationHotspots => "EPIC_animation_hotspots",
            Self::EpicAnimationPlayback => "EPIC_animation_playback",
            Self::EpicCameraControls => "EPIC_camera_controls",
            Self::EpicHdriBackdrops => "EPIC_hdri_backdrops",
            Self::EpicLevelVariantSets => "EPIC_level_variant_sets",
            Self::EpicLightmapTextures => "EPIC_lightmap_textures",
            Self::EpicSkySpheres => "EPIC_sky_spheres",
            Self::KhrLightsPunctual => "KHR_lights_punctual",
            Self::KhrMaterialsClearcoat => "KHR_materials_clearcoat",
            Self::KhrMaterialsEmissiveStrength => "KHR_materials_emissive_strength",
            Self::KhrMaterialsIor => "KHR_materials_ior",
            Self::KhrMaterialsSheen => "KHR_materials_sheen",
            Self::KhrMaterialsSpecular => "KHR_materials_specular",
            Self::KhrMaterialsTransmission => "KHR_materials_transmission",
            Self::KhrMaterialsUnlit => "KHR_materials_unlit",
            Self::KhrMaterialsVariants => "KHR_materials_variants",
            Self::KhrMeshQuantization => "KHR_mesh_quantization",
            Self::KhrTextureTransform => "KHR_texture_transform",
        }
    }

    /// Proprietary extensions outside the Khronos registry.
    #[must_use]
    pub const fn is_vendor(self) -> bool {
        matches!(
            self,
            Self::EpicAnimationHotspots
                | Self::EpicAnimationPlayback
                | Self::EpicCameraControls
                | Self::EpicHdriBackdrops
                | Self::EpicLevelVariantSets
                | Self::EpicLightmapTextures
                | Self::EpicSkySpheres
        )
    }
}

impl std::fmt::Display for Extension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Extension {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Tracks which extensions a document uses and which of those it requires.
///
/// `required` is always a subset of `used`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionRegistry {
    used: BTreeSet<Extension>,
    required: BTreeSet<Extension>,
}

impl ExtensionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `extension` used, and required if `required` is set.
    pub fn add(&mut self, extension: Extension, required: bool) {
        self.used.insert(extension);
        if required {
            self.required.insert(extension);
        }
    }

    /// Mark `extension` used without requiring it.
    pub fn mark_used(&mut self, extension: Extension) {
        self.add(extension, false);
    }

    #[must_use]
    pub fn is_used(&self, extension: Extension) -> bool {
        self.used.contains(&extension)
    }

    #[must_use]
    pub fn is_required(&self, extension: Extension) -> bool {
        self.required.contains(&extension)
    }

    pub fn used(&self) -> impl Iterator<Item = Extension> + '_ {
        self.used.iter().copied()
    }

    pub fn required(&self) -> impl Iterator<Item = Extension> + '_ {
        self.required.iter().copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    /// Fold another registry into this one.
    pub fn merge(&mut self, other: &Self) {
        self.used.extend(other.used.iter().copied());
        self.required.extend(other.required.iter().copied());
    }

    /// Drop every vendor extension from both sets.
    pub fn remove_vendor(&mut self) {
        self.used.retain(|e| !e.is_vendor());
        self.required.retain(|e| !e.is_vendor());
    }
}

/// Implemented by entities whose content can pull in an extension.
///
/// The serializer walks the whole document through this trait right before
/// writing, so extensions are derived from what is actually emitted.
pub trait RegisterExtensions {
    fn register_extensions(&self, registry: &mut ExtensionRegistry);
}

/// `{"<key>": <index>}` as found inside node-level extension objects.
pub(crate) struct Reference<'a, T: Serialize> {
    pub key: &'static str,
    pub value: &'a T,
}

impl<T: Serialize> Serialize for Reference<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.key, self.value)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_implies_used() {
        let mut registry = ExtensionRegistry::new();
        registry.add(Extension::KhrMeshQuantization, true);
        registry.mark_used(Extension::KhrMaterialsUnlit);

        assert!(registry.is_used(Extension::KhrMeshQuantization));
        assert!(registry.is_required(Extension::KhrMeshQuantization));
        assert!(registry.is_used(Extension::KhrMaterialsUnlit));
        assert!(!registry.is_required(Extension::KhrMaterialsUnlit));
    }

    #[test]
    fn test_ids_are_alphabetical_in_declaration_order() {
        let ids: Vec<&str> = Extension::ALL.iter().map(|e| e.as_str()).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_vendor_classification() {
        for extension in Extension::ALL {
            assert_eq!(extension.is_vendor(), extension.as_str().starts_with("EPIC_"));
        }
    }

    #[test]
    fn test_remove_vendor_keeps_khronos() {
        let mut registry = ExtensionRegistry::new();
        registry.add(Extension::EpicSkySpheres, true);
        registry.mark_used(Extension::KhrLightsPunctual);
        registry.remove_vendor();

        assert_eq!(registry.used().collect::<Vec<_>>(), vec![Extension::KhrLightsPunctual]);
        assert_eq!(registry.required().count(), 0);
    }
}
