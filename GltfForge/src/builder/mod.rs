//! glTF export session.
//!
//! [`GltfBuilder`] owns the document being built, the binary buffer it packs
//! into, and the warnings collected along the way. One builder exists per
//! export and is consumed when the container is written.

mod accessor;
mod buffer;
mod document;
mod export;
mod hash;
mod image;
mod messages;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::json::{Asset, Buffer, Image, Index, JsonRoot};
use crate::options::{ContainerLayout, ExportOptions};

pub use buffer::DEFAULT_ALIGNMENT;
pub use export::{ExportReport, export_to_file, write_glb};
pub use hash::{BinaryHashKey, BinaryHashMap};
pub use messages::MessageLog;

use buffer::BufferSink;

/// An image file to be written next to the output.
struct ExternalImage {
    file_name: String,
    bytes: Vec<u8>,
}

/// Builder for a single glTF export.
pub struct GltfBuilder {
    root: JsonRoot,
    options: ExportOptions,
    layout: ContainerLayout,
    output_path: Option<PathBuf>,

    sink: BufferSink,
    buffer: Index<Buffer>,

    image_hashes: BinaryHashMap<Index<Image>>,
    /// Bytes of embedded images already streamed to the sidecar.
    streamed_images: HashMap<Index<Image>, Vec<u8>>,
    image_file_names: HashSet<String>,
    external_images: Vec<ExternalImage>,

    messages: MessageLog,
}

impl GltfBuilder {
    /// Start an export to `path`. The layout follows the file extension.
    ///
    /// For the external layout the `.bin` sidecar is opened immediately and
    /// buffer data is streamed into it. If it cannot be created, a warning is
    /// recorded and every later buffer write yields an unset index.
    pub fn new(path: impl AsRef<Path>, options: ExportOptions) -> Self {
        let path = path.as_ref();
        let layout = ContainerLayout::from_path(path);
        let mut messages = MessageLog::new();

        let sink = match layout {
            ContainerLayout::Binary => BufferSink::memory(),
            ContainerLayout::External => BufferSink::open_file(sidecar_path(path), &mut messages),
        };

        let mut builder = Self::with_sink(options, layout, sink);
        // External images must not overwrite the document or its sidecar
        let reserved = [Some(path), builder.sink.sidecar_path()];
        for name in reserved.into_iter().flatten().filter_map(Path::file_name) {
            builder
                .image_file_names
                .insert(name.to_string_lossy().to_ascii_lowercase());
        }
        builder.output_path = Some(path.to_path_buf());
        builder.messages = messages;
        builder
    }

    /// Start an export whose binary buffer stays in memory, producing GLB
    /// bytes through [`GltfBuilder::to_glb_bytes`].
    pub fn in_memory(options: ExportOptions) -> Self {
        Self::with_sink(options, ContainerLayout::Binary, BufferSink::memory())
    }

    fn with_sink(options: ExportOptions, layout: ContainerLayout, sink: BufferSink) -> Self {
        let root = JsonRoot {
            asset: Asset {
                generator: options.generator.clone(),
                copyright: options.copyright.clone(),
                ..Asset::default()
            },
            ..JsonRoot::default()
        };

        Self {
            root,
            options,
            layout,
            output_path: None,
            sink,
            buffer: Index::UNSET,
            image_hashes: BinaryHashMap::new(),
            streamed_images: HashMap::new(),
            image_file_names: HashSet::new(),
            external_images: Vec::new(),
            messages: MessageLog::new(),
        }
    }

    #[must_use]
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    #[must_use]
    pub fn layout(&self) -> ContainerLayout {
        self.layout
    }

    /// The document built so far.
    #[must_use]
    pub fn root(&self) -> &JsonRoot {
        &self.root
    }

    #[must_use]
    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    /// Record a warning; the export continues.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.messages.warn(message);
    }

    /// Record a non-fatal error; the export continues.
    pub fn error(&mut self, message: impl Into<String>) {
        self.messages.error(message);
    }
}

/// `scene.gltf` streams into `scene.bin`. An output that already ends in
/// `.bin` gets `scene_0.bin` instead of writing over itself.
fn sidecar_path(path: &Path) -> PathBuf {
    let is_bin = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("bin"));
    if !is_bin {
        return path.with_extension("bin");
    }
    let stem = path.file_stem().map(|stem| stem.to_string_lossy()).unwrap_or_default();
    path.with_file_name(format!("{stem}_0.bin"))
}
