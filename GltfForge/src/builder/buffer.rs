//! Binary buffer packing.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::json::{Buffer, BufferTarget, BufferView, Index};

use super::GltfBuilder;
use super::messages::MessageLog;

/// Alignment applied by [`GltfBuilder::add_buffer_view`].
pub const DEFAULT_ALIGNMENT: usize = 4;

/// Backing store of the session's single buffer.
pub(super) enum BufferSink {
    /// Kept in memory and later written as the GLB binary chunk.
    Memory(Vec<u8>),
    /// Streamed into the `.bin` sidecar.
    File { path: PathBuf, writer: BufWriter<File> },
    /// The sidecar could not be created or written; nothing more is stored.
    Failed { path: PathBuf },
}

impl BufferSink {
    pub(super) fn memory() -> Self {
        Self::Memory(Vec::new())
    }

    pub(super) fn open_file(path: PathBuf, messages: &mut MessageLog) -> Self {
        match File::create(&path) {
            Ok(file) => {
                tracing::debug!("Streaming buffer data to {}", path.display());
                Self::File {
                    path,
                    writer: BufWriter::new(file),
                }
            }
            Err(err) => {
                messages.warn(format!("Failed to create buffer file {}: {err}", path.display()));
                Self::Failed { path }
            }
        }
    }

    fn write(&mut self, padding: usize, data: &[u8]) -> io::Result<()> {
        match self {
            Self::Memory(bytes) => {
                bytes.resize(bytes.len() + padding, 0);
                bytes.extend_from_slice(data);
                Ok(())
            }
            Self::File { writer, .. } => {
                writer.write_all(&vec![0; padding])?;
                writer.write_all(data)
            }
            Self::Failed { path } => Err(io::Error::other(format!(
                "{} is unavailable",
                path.display()
            ))),
        }
    }

    fn fail(&mut self) {
        let path = match std::mem::replace(self, Self::Memory(Vec::new())) {
            Self::File { path, .. } | Self::Failed { path } => path,
            Self::Memory(_) => PathBuf::new(),
        };
        *self = Self::Failed { path };
    }

    /// Path of the sidecar file, if this sink writes one.
    pub(super) fn sidecar_path(&self) -> Option<&Path> {
        match self {
            Self::Memory(_) => None,
            Self::File { path, .. } | Self::Failed { path } => Some(path),
        }
    }

    /// Flush buffered sidecar writes.
    pub(super) fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::File { writer, .. } => writer.flush(),
            Self::Memory(_) | Self::Failed { .. } => Ok(()),
        }
    }
}

impl GltfBuilder {
    /// Append `data` to the binary buffer at a 4-byte aligned offset.
    ///
    /// Returns an unset index (and records a warning) when the buffer's
    /// backing file is unavailable; callers omit the dependent content.
    pub fn add_buffer_view(&mut self, data: &[u8], target: Option<BufferTarget>) -> Index<BufferView> {
        self.add_buffer_view_aligned(data, target, DEFAULT_ALIGNMENT)
    }

    /// Append `data` at an offset that is a multiple of `alignment`.
    ///
    /// Gaps are filled with zero bytes.
    pub fn add_buffer_view_aligned(
        &mut self,
        data: &[u8],
        target: Option<BufferTarget>,
        alignment: usize,
    ) -> Index<BufferView> {
        if let BufferSink::Failed { path } = &self.sink {
            let message = format!(
                "Dropped {} bytes of buffer data: {} could not be written",
                data.len(),
                path.display()
            );
            self.messages.warn(message);
            return Index::UNSET;
        }

        let buffer = self.ensure_buffer();
        let offset = self.get(buffer).byte_length;
        let aligned = offset.next_multiple_of(alignment.max(1) as u64);
        let padding = (aligned - offset) as usize;

        if let Err(err) = self.sink.write(padding, data) {
            self.messages.warn(format!("Failed to write buffer data: {err}"));
            self.sink.fail();
            return Index::UNSET;
        }

        let byte_length = data.len() as u64;
        self.get_mut(buffer).byte_length = aligned + byte_length;
        self.add(BufferView {
            buffer,
            byte_offset: aligned,
            byte_length,
            target,
            ..BufferView::default()
        })
    }

    /// The in-memory binary buffer, for the GLB layout.
    #[must_use]
    pub fn binary_buffer(&self) -> Option<&[u8]> {
        match &self.sink {
            BufferSink::Memory(bytes) => Some(bytes),
            BufferSink::File { .. } | BufferSink::Failed { .. } => None,
        }
    }

    /// Bytes covered by `view`, when the buffer is held in memory.
    pub(super) fn stored_bytes(&self, view: Index<BufferView>) -> Option<&[u8]> {
        let BufferSink::Memory(data) = &self.sink else {
            return None;
        };
        let view = self.try_get(view)?;
        let start = usize::try_from(view.byte_offset).ok()?;
        let end = usize::try_from(view.end()).ok()?;
        data.get(start..end)
    }

    fn ensure_buffer(&mut self) -> Index<Buffer> {
        if self.buffer.is_unset() {
            let uri = self
                .sink
                .sidecar_path()
                .and_then(Path::file_name)
                .and_then(|name| name.to_str())
                .map(str::to_string)
                .unwrap_or_default();
            self.buffer = self.add(Buffer {
                uri,
                ..Buffer::default()
            });
        }
        self.buffer
    }
}
