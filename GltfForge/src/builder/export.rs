//! Container assembly: GLB, or `.gltf` plus `.bin`.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, WriteBytesExt};

use crate::error::{Error, Result};
use crate::json::{SerializeOptions, write_json};
use crate::options::{ContainerLayout, ExportOptions};
use crate::task::{CancellationToken, TaskProgressCallback, TaskRunOutcome, TaskScheduler};

use super::GltfBuilder;
use super::buffer::BufferSink;

const GLB_MAGIC: &[u8; 4] = b"glTF";
const GLB_VERSION: u32 = 2;
const GLB_HEADER_SIZE: usize = 12;
const CHUNK_HEADER_SIZE: usize = 8;
const CHUNK_TYPE_JSON: u32 = 0x4E4F534A; // "JSON"
const CHUNK_TYPE_BIN: u32 = 0x004E4942; // "BIN\0"

/// Outcome of a successful export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// Partial-content problems; the affected entities were omitted.
    pub warnings: Vec<String>,
    /// Non-fatal errors reported by collaborators.
    pub errors: Vec<String>,
    /// Every file written, main document first.
    pub files: Vec<PathBuf>,
}

/// Write a binary glTF container.
///
/// The JSON chunk is padded with spaces and the binary chunk with zeros, both
/// to a multiple of four bytes. With `binary == None` no binary chunk is
/// written.
///
/// # Errors
/// Returns [`Error::GlbTooLarge`] if the total length does not fit in `u32`,
/// or an IO error from `writer`.
pub fn write_glb<W: Write>(mut writer: W, json: &[u8], binary: Option<&[u8]>) -> Result<()> {
    let json_padding = chunk_padding(json.len());
    let json_chunk_len = json.len() + json_padding;
    let bin_chunk_len = binary.map(|bytes| bytes.len() + chunk_padding(bytes.len()));

    let total_len = GLB_HEADER_SIZE
        + CHUNK_HEADER_SIZE
        + json_chunk_len
        + bin_chunk_len.map_or(0, |len| CHUNK_HEADER_SIZE + len);
    let total_len_u32 = u32::try_from(total_len).map_err(|_| Error::GlbTooLarge { size: total_len })?;

    // GLB header
    writer.write_all(GLB_MAGIC)?;
    writer.write_u32::<LittleEndian>(GLB_VERSION)?;
    writer.write_u32::<LittleEndian>(total_len_u32)?;

    // JSON chunk
    writer.write_u32::<LittleEndian>(json_chunk_len as u32)?;
    writer.write_u32::<LittleEndian>(CHUNK_TYPE_JSON)?;
    writer.write_all(json)?;
    writer.write_all(&b"   "[..json_padding])?;

    // Binary chunk
    if let (Some(bytes), Some(chunk_len)) = (binary, bin_chunk_len) {
        writer.write_u32::<LittleEndian>(chunk_len as u32)?;
        writer.write_u32::<LittleEndian>(CHUNK_TYPE_BIN)?;
        writer.write_all(bytes)?;
        writer.write_all(&[0; 3][..chunk_len - bytes.len()])?;
    }

    Ok(())
}

fn chunk_padding(len: usize) -> usize {
    (4 - len % 4) % 4
}

fn write_output(path: &Path, bytes: &[u8], created: &mut Vec<PathBuf>) -> Result<()> {
    let mut writer = create_output(path)?;
    created.push(path.to_path_buf());
    writer.write_all(bytes)?;
    writer.flush()?;
    Ok(())
}

fn remove_output(path: &Path) {
    if let Err(err) = fs::remove_file(path) {
        tracing::warn!("Failed to remove {}: {err}", path.display());
    }
}

fn create_output(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| Error::OutputOpenFailed {
            path: path.to_path_buf(),
            source,
        })
}

impl GltfBuilder {
    fn json_bytes(&self, condensed: bool) -> Result<Vec<u8>> {
        let options = SerializeOptions {
            condensed,
            include_vendor_extensions: self.options.include_vendor_extensions,
        };
        let mut json = Vec::new();
        write_json(&self.root, &mut json, &options)?;
        Ok(json)
    }

    /// Assemble the document and in-memory buffer into GLB bytes.
    ///
    /// Images stored as external files are not part of the result; see
    /// [`GltfBuilder::external_image_files`].
    ///
    /// # Errors
    /// Returns an error if serialization fails or the container is too large.
    pub fn to_glb_bytes(&self) -> Result<Vec<u8>> {
        let json = self.json_bytes(true)?;
        let binary = if self.buffer.is_set() { self.binary_buffer() } else { None };
        let mut output = Vec::with_capacity(json.len() + binary.map_or(0, <[u8]>::len) + 32);
        write_glb(&mut output, &json, binary)?;
        Ok(output)
    }

    /// Image files waiting to be written next to the output, as
    /// `(file name, bytes)`.
    pub fn external_image_files(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.external_images
            .iter()
            .map(|image| (image.file_name.as_str(), image.bytes.as_slice()))
    }

    /// Write the container to the path given to [`GltfBuilder::new`].
    ///
    /// If any output fails, every file this export created is removed again.
    ///
    /// # Errors
    /// Returns [`Error::InvalidOutputPath`] for in-memory builders,
    /// [`Error::OutputOpenFailed`] if a destination cannot be created, or an
    /// IO/serialization error.
    pub fn write_to_file(mut self) -> Result<ExportReport> {
        let path = match self.output_path.take() {
            Some(path) if path.file_name().is_some() => path,
            other => return Err(Error::InvalidOutputPath(other.unwrap_or_default())),
        };

        let mut created = Vec::new();
        let files = match self.write_outputs(&path, &mut created) {
            Ok(files) => files,
            Err(err) => {
                tracing::warn!("Export to {} failed, removing partial output", path.display());
                for file in &created {
                    remove_output(file);
                }
                self.remove_sidecar();
                return Err(err);
            }
        };

        tracing::info!(
            "Exported {} ({} nodes, {} meshes, {} files)",
            path.display(),
            self.root.nodes.len(),
            self.root.meshes.len(),
            files.len()
        );

        let (warnings, errors) = self.messages.into_parts();
        Ok(ExportReport {
            warnings,
            errors,
            files,
        })
    }

    /// Write every output, recording each file in `created` as soon as it
    /// exists. Returns the report order: main document, sidecar, images.
    fn write_outputs(&mut self, path: &Path, created: &mut Vec<PathBuf>) -> Result<Vec<PathBuf>> {
        let mut files = vec![path.to_path_buf()];

        match self.layout {
            ContainerLayout::Binary => {
                let glb = self.to_glb_bytes()?;
                write_output(path, &glb, created)?;
            }
            ContainerLayout::External => {
                let sidecar = self.finish_sidecar()?;
                let json = self.json_bytes(self.options.condensed_json)?;
                write_output(path, &json, created)?;
                files.extend(sidecar);
            }
        }

        let directory = path.parent().unwrap_or_else(|| Path::new(""));
        for image in &self.external_images {
            let image_path = directory.join(&image.file_name);
            write_output(&image_path, &image.bytes, created)?;
            files.push(image_path);
        }
        Ok(files)
    }

    /// Flush the sidecar, or delete it if no buffer data was ever written.
    fn finish_sidecar(&mut self) -> Result<Option<PathBuf>> {
        if self.buffer.is_set() {
            self.sink.flush()?;
            return Ok(match &self.sink {
                BufferSink::File { path, .. } => Some(path.clone()),
                BufferSink::Memory(_) | BufferSink::Failed { .. } => None,
            });
        }
        self.remove_sidecar();
        Ok(None)
    }

    fn remove_sidecar(&mut self) {
        if let BufferSink::File { path, writer } = std::mem::replace(&mut self.sink, BufferSink::memory()) {
            drop(writer);
            remove_output(&path);
        }
    }

    /// Abandon the export, deleting any sidecar file already created.
    pub fn discard(mut self) {
        tracing::debug!("Discarding export");
        self.remove_sidecar();
    }
}

/// Run a complete export to `path`.
///
/// `populate` registers entities and schedules tasks; the tasks are then
/// drained and the container written. On cancellation or error nothing is
/// kept on disk.
///
/// # Errors
/// Returns [`Error::ExportCancelled`] if `cancel` fired, the first error from
/// `populate` or a task, or any error from [`GltfBuilder::write_to_file`].
pub fn export_to_file<F>(
    path: impl AsRef<Path>,
    options: ExportOptions,
    progress: Option<TaskProgressCallback<'_>>,
    cancel: Option<&CancellationToken>,
    populate: F,
) -> Result<ExportReport>
where
    F: FnOnce(&mut GltfBuilder, &mut TaskScheduler<GltfBuilder>) -> Result<()>,
{
    let path = path.as_ref();
    tracing::info!("Exporting glTF to {}", path.display());

    let mut builder = GltfBuilder::new(path, options);
    let mut scheduler = TaskScheduler::new();

    let outcome = populate(&mut builder, &mut scheduler)
        .and_then(|()| scheduler.run_all(&mut builder, progress, cancel));

    let cancelled = cancel.is_some_and(CancellationToken::is_cancelled);
    match outcome {
        Ok(TaskRunOutcome::Completed) if !cancelled => builder.write_to_file(),
        Ok(_) => {
            builder.discard();
            Err(Error::ExportCancelled)
        }
        Err(err) => {
            builder.discard();
            Err(err)
        }
    }
}
