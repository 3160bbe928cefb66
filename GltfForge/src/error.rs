//! Error types for `GltfForge`

use std::path::PathBuf;

use thiserror::Error;

use crate::task::TaskPriority;

/// The error type for `GltfForge` operations.
///
/// Partial-content problems (a buffer write after the sidecar failed to open,
/// a dropped image) are not errors: they are recorded as warnings in the
/// export session's message log and the export continues.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The destination file could not be created.
    #[error("failed to open {path} for writing: {source}")]
    OutputOpenFailed {
        /// The path that could not be opened.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// The output path has no usable file name.
    #[error("invalid output path: {0}")]
    InvalidOutputPath(PathBuf),

    // ==================== Serialization Errors ====================
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document grew past what a GLB container can describe.
    #[error("GLB container too large: {size} bytes")]
    GlbTooLarge {
        /// The total size that was requested.
        size: usize,
    },

    // ==================== Conversion Errors ====================
    /// A raw numeric code does not map onto a glTF enum value.
    #[error("invalid {kind} value: {value}")]
    InvalidEnumValue {
        /// The enum being converted into.
        kind: &'static str,
        /// The offending raw value.
        value: u32,
    },

    // ==================== Task Errors ====================
    /// A task was scheduled at a priority that has already been drained
    /// (or is currently being drained).
    #[error("task priority {requested:?} must be greater than the running priority {current:?}")]
    TaskPriority {
        /// The priority the task asked for.
        requested: TaskPriority,
        /// The priority being drained when the task was scheduled.
        current: TaskPriority,
    },

    /// The export was cancelled before all tasks completed.
    #[error("export cancelled")]
    ExportCancelled,
}

/// A specialized Result type for `GltfForge` operations.
pub type Result<T> = std::result::Result<T, Error>;
