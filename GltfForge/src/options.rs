//! Export configuration
//!
//! An [`ExportOptions`] value is created once per export and handed to the
//! builder session; nothing here is global state.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Physical layout of the written asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContainerLayout {
    /// Single `.glb` file: JSON chunk followed by the binary chunk.
    Binary,
    /// `.gltf` JSON file with a sibling `.bin` sidecar.
    External,
}

impl ContainerLayout {
    /// `.glb` selects [`ContainerLayout::Binary`]; anything else is external.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let is_glb = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("glb"));
        if is_glb { Self::Binary } else { Self::External }
    }
}

/// Where encoded image bytes end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageStorage {
    /// A buffer view in the main binary buffer.
    Embedded,
    /// A base64 `data:` URI inside the JSON.
    DataUri,
    /// A separate image file next to the output.
    External,
}

impl ImageStorage {
    /// The storage used when none is configured.
    #[must_use]
    pub const fn default_for(layout: ContainerLayout) -> Self {
        match layout {
            ContainerLayout::Binary => Self::Embedded,
            ContainerLayout::External => Self::External,
        }
    }
}

/// Options for a glTF export session.
///
/// # Example
///
/// ```
/// use gltfforge::{ExportOptions, ImageStorage};
///
/// let options = ExportOptions::new()
///     .with_generator("My Exporter 1.0")
///     .with_condensed_json(true)
///     .with_image_storage(ImageStorage::DataUri);
/// assert!(options.deduplicate_images);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Written to `asset.generator`
    pub generator: String,

    /// Written to `asset.copyright` when set
    pub copyright: Option<String>,

    /// Condensed JSON for the external layout. GLB output is always condensed.
    pub condensed_json: bool,

    /// Image placement. `None` picks [`ImageStorage::default_for`] the layout.
    pub image_storage: Option<ImageStorage>,

    /// Reuse the earlier image when identical bytes are registered twice
    /// Default: true
    pub deduplicate_images: bool,

    /// Emit `EPIC_*` extensions
    /// Default: true
    pub include_vendor_extensions: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            generator: format!("GltfForge {}", crate::VERSION),
            copyright: None,
            condensed_json: false,
            image_storage: None,
            deduplicate_images: true,
            include_vendor_extensions: true,
        }
    }
}

impl ExportOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Image storage for `layout`, honouring an explicit setting.
    #[must_use]
    pub fn image_storage_for(&self, layout: ContainerLayout) -> ImageStorage {
        self.image_storage
            .unwrap_or_else(|| ImageStorage::default_for(layout))
    }

    /// Set the generator string.
    #[must_use]
    pub fn with_generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = generator.into();
        self
    }

    /// Set the copyright notice.
    #[must_use]
    pub fn with_copyright(mut self, copyright: impl Into<String>) -> Self {
        self.copyright = Some(copyright.into());
        self
    }

    /// Set whether external JSON is condensed.
    #[must_use]
    pub fn with_condensed_json(mut self, condensed: bool) -> Self {
        self.condensed_json = condensed;
        self
    }

    /// Set where images are stored.
    #[must_use]
    pub fn with_image_storage(mut self, storage: ImageStorage) -> Self {
        self.image_storage = Some(storage);
        self
    }

    /// Set whether identical images are shared.
    #[must_use]
    pub fn with_deduplicate_images(mut self, deduplicate: bool) -> Self {
        self.deduplicate_images = deduplicate;
        self
    }

    /// Set whether vendor extensions are written.
    #[must_use]
    pub fn with_vendor_extensions(mut self, include: bool) -> Self {
        self.include_vendor_extensions = include;
        self
    }
}
