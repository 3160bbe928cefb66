//! Image registration with content deduplication.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::json::{Image, Index, MimeType};
use crate::options::ImageStorage;

use super::buffer::BufferSink;
use super::hash::BinaryHashKey;
use super::{ExternalImage, GltfBuilder};

impl GltfBuilder {
    /// Register encoded image bytes.
    ///
    /// Byte-identical images share one [`Image`] when deduplication is
    /// enabled. Storage follows [`ExportOptions::image_storage`]. Returns an
    /// unset index if embedded bytes could not be written.
    ///
    /// [`ExportOptions::image_storage`]: crate::ExportOptions::image_storage
    pub fn add_image(&mut self, bytes: &[u8], mime_type: MimeType, name: &str) -> Index<Image> {
        let key = self.options.deduplicate_images.then(|| BinaryHashKey::new(bytes));
        if let Some(key) = &key {
            let existing = self
                .image_hashes
                .find(key, |image| self.stored_image_equals(image, bytes));
            if let Some(existing) = existing {
                tracing::debug!("Reusing image {existing:?} for {name}");
                return existing;
            }
        }

        let mut image = Image {
            name: name.to_string(),
            ..Image::default()
        };
        match self.options.image_storage_for(self.layout) {
            ImageStorage::Embedded => {
                image.buffer_view = self.add_buffer_view(bytes, None);
                if image.buffer_view.is_unset() {
                    self.messages.warn(format!("Image {name} was dropped"));
                    return Index::UNSET;
                }
                image.mime_type = Some(mime_type);
            }
            ImageStorage::DataUri => {
                image.uri = format!("data:{};base64,{}", mime_type.as_str(), STANDARD.encode(bytes));
            }
            ImageStorage::External => {
                let file_name = self.unique_image_file_name(name, mime_type);
                image.uri.clone_from(&file_name);
                self.external_images.push(ExternalImage {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
        }

        let index = self.add(image);
        if let Some(key) = key {
            // Streamed bytes cannot be read back for comparison
            if matches!(self.sink, BufferSink::File { .. }) && self.get(index).buffer_view.is_set() {
                self.streamed_images.insert(index, bytes.to_vec());
            }
            self.image_hashes.insert(key, index);
        }
        index
    }

    /// Whether `image` was registered with exactly `bytes`, compared against
    /// the copy the session already holds.
    fn stored_image_equals(&self, image: Index<Image>, bytes: &[u8]) -> bool {
        if let Some(streamed) = self.streamed_images.get(&image) {
            return streamed.as_slice() == bytes;
        }
        let image = self.get(image);
        if image.buffer_view.is_set() {
            return self.stored_bytes(image.buffer_view) == Some(bytes);
        }
        if let Some((_, payload)) = image.uri.strip_prefix("data:").and_then(|uri| uri.split_once(";base64,")) {
            return STANDARD.decode(payload).is_ok_and(|decoded| decoded == bytes);
        }
        self.external_images
            .iter()
            .find(|external| external.file_name == image.uri)
            .is_some_and(|external| external.bytes == bytes)
    }

    /// `name.png`, then `name_1.png`, `name_2.png`, ... for repeats.
    fn unique_image_file_name(&mut self, name: &str, mime_type: MimeType) -> String {
        let stem = sanitize_file_stem(name);
        let extension = mime_type.file_extension();

        let mut candidate = format!("{stem}.{extension}");
        let mut suffix = 0;
        while self.image_file_names.contains(&candidate.to_ascii_lowercase()) {
            suffix += 1;
            candidate = format!("{stem}_{suffix}.{extension}");
        }
        self.image_file_names.insert(candidate.to_ascii_lowercase());
        candidate
    }
}

/// Keep a name usable as a relative URI and file name.
fn sanitize_file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() { "image".to_string() } else { stem }
}
