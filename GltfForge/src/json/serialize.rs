//! JSON emission for a complete [`JsonRoot`].
//!
//! Categories are written in a fixed order, empty arrays are skipped, and
//! root-level extension arrays are grouped under a single `extensions` object.
//! Floats go through `serde_json`'s shortest round-trip formatting, so every
//! `f32` parses back to the identical bit pattern.

use std::io::Write;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::extensions::{Extension, ExtensionRegistry, Reference};
use super::root::JsonRoot;
use crate::error::Result;

/// Print policy for [`write_json`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Single line with no insignificant whitespace. Required for GLB, where
    /// the chunk length must be known before the binary chunk follows.
    pub condensed: bool,
    /// When `false`, all `EPIC_*` content is stripped before writing.
    pub include_vendor_extensions: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            condensed: false,
            include_vendor_extensions: true,
        }
    }
}

impl SerializeOptions {
    #[must_use]
    pub const fn condensed() -> Self {
        Self {
            condensed: true,
            include_vendor_extensions: true,
        }
    }
}

/// Serialize `root` into `writer`.
///
/// # Errors
/// Returns an error if a required index is unset or the writer fails.
pub fn write_json<W: Write>(root: &JsonRoot, writer: W, options: &SerializeOptions) -> Result<()> {
    let stripped;
    let root = if !options.include_vendor_extensions && root.has_vendor_content() {
        tracing::debug!("Stripping vendor extensions before serialization");
        let mut copy = root.clone();
        copy.strip_vendor_extensions();
        stripped = copy;
        &stripped
    } else {
        root
    };

    let document = Document {
        root,
        extensions: root.collect_extensions(),
    };

    tracing::debug!(
        "Writing glTF JSON: {} nodes, {} meshes, {} accessors, {} extensions",
        root.nodes.len(),
        root.meshes.len(),
        root.accessors.len(),
        document.extensions.used().count()
    );

    if options.condensed {
        serde_json::to_writer(writer, &document)?;
    } else {
        serde_json::to_writer_pretty(writer, &document)?;
    }
    Ok(())
}

/// Serialize `root` into a `String`.
///
/// # Errors
/// Returns an error if a required index is unset.
pub fn to_json_string(root: &JsonRoot, options: &SerializeOptions) -> Result<String> {
    let mut bytes = Vec::new();
    write_json(root, &mut bytes, options)?;
    // serde_json only ever emits UTF-8
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

struct Document<'a> {
    root: &'a JsonRoot,
    extensions: ExtensionRegistry,
}

fn entry<M: SerializeMap, T: Serialize>(
    map: &mut M,
    key: &'static str,
    items: &[T],
) -> std::result::Result<(), M::Error> {
    if !items.is_empty() {
        map.serialize_entry(key, items)?;
    }
    Ok(())
}

impl Serialize for Document<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let root = self.root;
        let mut map = serializer.serialize_map(None)?;

        map.serialize_entry("asset", &root.asset)?;
        if root.scene.is_set() {
            map.serialize_entry("scene", &root.scene)?;
        }

        entry(&mut map, "accessors", &root.accessors)?;
        entry(&mut map, "animations", &root.animations)?;
        entry(&mut map, "buffers", &root.buffers)?;
        entry(&mut map, "bufferViews", &root.buffer_views)?;
        entry(&mut map, "cameras", &root.cameras)?;
        entry(&mut map, "images", &root.images)?;
        entry(&mut map, "materials", &root.materials)?;
        entry(&mut map, "meshes", &root.meshes)?;
        entry(&mut map, "nodes", &root.nodes)?;
        entry(&mut map, "samplers", &root.samplers)?;
        entry(&mut map, "scenes", &root.scenes)?;
        entry(&mut map, "skins", &root.skins)?;
        entry(&mut map, "textures", &root.textures)?;

        let extensions = RootExtensions(root);
        if !extensions.is_empty() {
            map.serialize_entry("extensions", &extensions)?;
        }

        let used: Vec<Extension> = self.extensions.used().collect();
        if !used.is_empty() {
            map.serialize_entry("extensionsUsed", &used)?;
        }
        let required: Vec<Extension> = self.extensions.required().collect();
        if !required.is_empty() {
            map.serialize_entry("extensionsRequired", &required)?;
        }

        map.end()
    }
}

/// The root `extensions` object holding extension-owned arrays.
struct RootExtensions<'a>(&'a JsonRoot);

impl RootExtensions<'_> {
    fn is_empty(&self) -> bool {
        let root = self.0;
        root.hotspots.is_empty()
            && root.backdrops.is_empty()
            && root.level_variant_sets.is_empty()
            && root.light_maps.is_empty()
            && root.sky_spheres.is_empty()
            && root.lights.is_empty()
            && root.material_variants.is_empty()
    }
}

impl Serialize for RootExtensions<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        fn array<M: SerializeMap, T: Serialize>(
            map: &mut M,
            extension: Extension,
            key: &'static str,
            items: &[T],
        ) -> std::result::Result<(), M::Error> {
            if !items.is_empty() {
                map.serialize_entry(extension.as_str(), &Reference { key, value: &items })?;
            }
            Ok(())
        }

        let root = self.0;
        let mut map = serializer.serialize_map(None)?;
        array(&mut map, Extension::EpicAnimationHotspots, "hotspots", &root.hotspots)?;
        array(&mut map, Extension::EpicHdriBackdrops, "backdrops", &root.backdrops)?;
        array(
            &mut map,
            Extension::EpicLevelVariantSets,
            "levelVariantSets",
            &root.level_variant_sets,
        )?;
        array(&mut map, Extension::EpicLightmapTextures, "lightmaps", &root.light_maps)?;
        array(&mut map, Extension::EpicSkySpheres, "skySpheres", &root.sky_spheres)?;
        array(&mut map, Extension::KhrLightsPunctual, "lights", &root.lights)?;
        array(&mut map, Extension::KhrMaterialsVariants, "variants", &root.material_variants)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::json::{
        Accessor, Animation, AnimationSampler, Hotspot, Index, Light, Material, Node, NodeExtensions,
        Sampler, Scene,
    };
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn condensed(root: &JsonRoot) -> String {
        to_json_string(root, &SerializeOptions::condensed()).unwrap()
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(condensed(&JsonRoot::new()), r#"{"asset":{"version":"2.0"}}"#);
    }

    #[test]
    fn test_default_entities_are_minimal() {
        let mut root = JsonRoot::new();
        root.samplers.push(Sampler::default());
        root.nodes.push(Node::default());
        root.materials.push(Material::default());

        let value: Value = serde_json::from_str(&condensed(&root)).unwrap();
        assert_eq!(value["samplers"], json!([{}]));
        assert_eq!(value["nodes"], json!([{}]));
        assert_eq!(value["materials"], json!([{ "pbrMetallicRoughness": {} }]));
    }

    #[test]
    fn test_category_order_is_fixed() {
        let mut root = JsonRoot::new();
        root.scenes.push(Scene::default());
        root.nodes.push(Node::default());
        root.accessors.push(Accessor::default());
        root.scene = Index::new(0);

        let json = condensed(&root);
        let asset = json.find("\"asset\"").unwrap();
        let scene = json.find("\"scene\":").unwrap();
        let accessors = json.find("\"accessors\"").unwrap();
        let nodes = json.find("\"nodes\"").unwrap();
        let scenes = json.find("\"scenes\"").unwrap();
        assert!(asset < scene && scene < accessors && accessors < nodes && nodes < scenes);
    }

    #[test]
    fn test_root_extension_arrays_and_used_list() {
        let mut root = JsonRoot::new();
        root.lights.push(Light::default());
        root.hotspots.push(Hotspot::default());
        root.nodes.push(Node {
            extensions: NodeExtensions {
                light: Index::new(0),
                hotspot: Index::new(0),
                ..NodeExtensions::default()
            },
            ..Node::default()
        });
        root.materials.push(Material::unlit("flat"));

        let value: Value = serde_json::from_str(&condensed(&root)).unwrap();
        assert_eq!(
            value["extensions"],
            json!({
                "EPIC_animation_hotspots": { "hotspots": [{}] },
                "KHR_lights_punctual": { "lights": [{ "type": "point" }] },
            })
        );
        assert_eq!(
            value["extensionsUsed"],
            json!(["EPIC_animation_hotspots", "KHR_lights_punctual", "KHR_materials_unlit"])
        );
        assert!(value.get("extensionsRequired").is_none());
    }

    #[test]
    fn test_vendor_extensions_can_be_excluded() {
        let mut root = JsonRoot::new();
        root.hotspots.push(Hotspot::default());
        root.nodes.push(Node {
            extensions: NodeExtensions {
                hotspot: Index::new(0),
                ..NodeExtensions::default()
            },
            ..Node::default()
        });

        let options = SerializeOptions {
            condensed: true,
            include_vendor_extensions: false,
        };
        let json = to_json_string(&root, &options).unwrap();
        assert!(!json.contains("EPIC_"));
        assert_eq!(json, r#"{"asset":{"version":"2.0"},"nodes":[{}]}"#);
        // The caller's document is left untouched.
        assert_eq!(root.hotspots.len(), 1);
    }

    #[test]
    fn test_pretty_and_condensed_agree() {
        let mut root = JsonRoot::new();
        root.nodes.push(Node::named("a"));
        let pretty = to_json_string(&root, &SerializeOptions::default()).unwrap();
        assert!(pretty.contains('\n'));
        let a: Value = serde_json::from_str(&pretty).unwrap();
        let b: Value = serde_json::from_str(&condensed(&root)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_required_unset_index_is_an_error() {
        let mut root = JsonRoot::new();
        let mut animation = Animation::default();
        animation.add_sampler(AnimationSampler::default());
        root.animations.push(animation);

        let err = to_json_string(&root, &SerializeOptions::condensed()).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.to_string().contains("unset Accessor index"));
    }

    #[test]
    fn test_float_round_trip() {
        let values = [
            0.0_f32,
            -0.0,
            1.0,
            1.0 / 3.0,
            -2.5,
            f32::MAX,
            f32::MIN_POSITIVE,
            1.0e-45,
            123_456.79,
            -0.1,
        ];
        let mut root = JsonRoot::new();
        root.accessors.push(Accessor {
            min: values.to_vec(),
            ..Accessor::default()
        });

        let json = condensed(&root);
        let start = json.find("\"min\":[").unwrap() + "\"min\":[".len();
        let end = start + json[start..].find(']').unwrap();
        let parsed: Vec<f32> = json[start..end]
            .split(',')
            .map(|token| token.parse().unwrap())
            .collect();

        assert_eq!(parsed.len(), values.len());
        for (written, original) in parsed.iter().zip(values) {
            assert_eq!(written.to_bits(), original.to_bits(), "{original} did not round-trip");
        }
    }
}
