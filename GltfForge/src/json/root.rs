//! The document root owning every entity array.

use serde::Serialize;

use super::accessor::Accessor;
use super::animation::Animation;
use super::buffer::{Buffer, BufferView};
use super::camera::Camera;
use super::extensions::{Extension, ExtensionRegistry, RegisterExtensions};
use super::index::Index;
use super::light::Light;
use super::material::Material;
use super::mesh::Mesh;
use super::node::{Node, Scene, Skin};
use super::texture::{Image, Sampler, Texture};
use super::variants::MaterialVariant;
use super::vendor::{Backdrop, Hotspot, LevelVariantSets, LightMap, SkySphere};

/// The `asset` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Asset {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub generator: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
}

impl Default for Asset {
    fn default() -> Self {
        Self {
            generator: String::new(),
            version: "2.0".to_string(),
            copyright: None,
        }
    }
}

/// One ordered array per entity category, plus the extension registry and
/// the default scene.
///
/// Positions in each array are the indices handed out by the builder; nothing
/// is ever removed or reordered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonRoot {
    pub asset: Asset,
    pub scene: Index<Scene>,

    pub accessors: Vec<Accessor>,
    pub animations: Vec<Animation>,
    pub buffers: Vec<Buffer>,
    pub buffer_views: Vec<BufferView>,
    pub cameras: Vec<Camera>,
    pub images: Vec<Image>,
    pub materials: Vec<Material>,
    pub meshes: Vec<Mesh>,
    pub nodes: Vec<Node>,
    pub samplers: Vec<Sampler>,
    pub scenes: Vec<Scene>,
    pub skins: Vec<Skin>,
    pub textures: Vec<Texture>,

    // Root-level extension arrays
    pub lights: Vec<Light>,
    pub material_variants: Vec<MaterialVariant>,
    pub backdrops: Vec<Backdrop>,
    pub hotspots: Vec<Hotspot>,
    pub light_maps: Vec<LightMap>,
    pub sky_spheres: Vec<SkySphere>,
    pub level_variant_sets: Vec<LevelVariantSets>,

    /// Extensions registered explicitly; content-driven ones are added by
    /// [`JsonRoot::collect_extensions`].
    pub extensions: ExtensionRegistry,
}

/// An entity stored in one of the [`JsonRoot`] arrays.
pub trait JsonEntity: Sized {
    /// Category name used in diagnostics.
    const KIND: &'static str;

    fn collection(root: &JsonRoot) -> &Vec<Self>;
    fn collection_mut(root: &mut JsonRoot) -> &mut Vec<Self>;
}

macro_rules! json_entities {
    ($($ty:ty => $field:ident),+ $(,)?) => {
        $(
            impl JsonEntity for $ty {
                const KIND: &'static str = stringify!($ty);

                fn collection(root: &JsonRoot) -> &Vec<Self> {
                    &root.$field
                }

                fn collection_mut(root: &mut JsonRoot) -> &mut Vec<Self> {
                    &mut root.$field
                }
            }
        )+
    };
}

json_entities! {
    Accessor => accessors,
    Animation => animations,
    Buffer => buffers,
    BufferView => buffer_views,
    Camera => cameras,
    Image => images,
    Material => materials,
    Mesh => meshes,
    Node => nodes,
    Sampler => samplers,
    Scene => scenes,
    Skin => skins,
    Texture => textures,
    Light => lights,
    MaterialVariant => material_variants,
    Backdrop => backdrops,
    Hotspot => hotspots,
    LightMap => light_maps,
    SkySphere => sky_spheres,
    LevelVariantSets => level_variant_sets,
}

impl JsonRoot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit registrations merged with every extension the current content
    /// actually uses.
    #[must_use]
    pub fn collect_extensions(&self) -> ExtensionRegistry {
        let mut registry = self.extensions.clone();

        scan(&self.materials, &mut registry);
        scan(&self.meshes, &mut registry);
        scan(&self.nodes, &mut registry);
        scan(&self.cameras, &mut registry);
        scan(&self.animations, &mut registry);
        for light_map in &self.light_maps {
            light_map.texture.register_extensions(&mut registry);
        }

        let arrays = [
            (self.lights.is_empty(), Extension::KhrLightsPunctual),
            (self.material_variants.is_empty(), Extension::KhrMaterialsVariants),
            (self.backdrops.is_empty(), Extension::EpicHdriBackdrops),
            (self.hotspots.is_empty(), Extension::EpicAnimationHotspots),
            (self.light_maps.is_empty(), Extension::EpicLightmapTextures),
            (self.sky_spheres.is_empty(), Extension::EpicSkySpheres),
            (self.level_variant_sets.is_empty(), Extension::EpicLevelVariantSets),
        ];
        for (empty, extension) in arrays {
            if !empty {
                registry.mark_used(extension);
            }
        }

        registry
    }

    /// Whether any `EPIC_*` content is present.
    #[must_use]
    pub fn has_vendor_content(&self) -> bool {
        self.collect_extensions().used().any(Extension::is_vendor)
    }

    /// Remove every vendor extension object and every reference to one.
    pub fn strip_vendor_extensions(&mut self) {
        self.backdrops.clear();
        self.hotspots.clear();
        self.light_maps.clear();
        self.sky_spheres.clear();
        self.level_variant_sets.clear();

        for node in &mut self.nodes {
            node.extensions.strip_vendor();
        }
        for camera in &mut self.cameras {
            camera.extensions.controls = None;
        }
        for animation in &mut self.animations {
            animation.extensions.playback = None;
        }
        self.extensions.remove_vendor();
    }
}

fn scan<T: RegisterExtensions>(entities: &[T], registry: &mut ExtensionRegistry) {
    for entity in entities {
        entity.register_extensions(registry);
    }
}
