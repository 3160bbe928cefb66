//! Buffers and buffer views.

use serde::Serialize;

use super::defaults::{is_zero_u32, is_zero_u64};
use super::index::Index;

gl_enum! {
    /// GPU binding hint for a buffer view.
    pub enum BufferTarget {
        ArrayBuffer = 34962,
        ElementArrayBuffer = 34963,
    }
}

/// Raw byte container, either the GLB binary chunk or a sidecar file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Buffer {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub uri: String,
    pub byte_length: u64,
}

/// Byte range inside one buffer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferView {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub buffer: Index<Buffer>,
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub byte_offset: u64,
    pub byte_length: u64,
    #[serde(skip_serializing_if = "is_zero_u32")]
    pub byte_stride: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<BufferTarget>,
}

impl BufferView {
    /// One past the last byte covered by this view.
    #[must_use]
    pub fn end(&self) -> u64 {
        self.byte_offset + self.byte_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_view_serialization() {
        let view = BufferView {
            buffer: Index::new(0),
            byte_offset: 16,
            byte_length: 36,
            target: Some(BufferTarget::ArrayBuffer),
            ..BufferView::default()
        };
        assert_eq!(
            serde_json::to_string(&view).unwrap(),
            r#"{"buffer":0,"byteOffset":16,"byteLength":36,"target":34962}"#
        );
        assert_eq!(view.end(), 52);
    }

    #[test]
    fn test_default_buffer() {
        assert_eq!(serde_json::to_string(&Buffer::default()).unwrap(), r#"{"byteLength":0}"#);
    }

    #[test]
    fn test_view_without_buffer_is_rejected() {
        let err = serde_json::to_string(&BufferView::default()).unwrap_err();
        assert!(err.to_string().contains("unset Buffer index"), "{err}");
    }
}
