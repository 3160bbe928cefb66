//! Typed accessor helpers.

use std::borrow::Cow;

use bytemuck::Pod;
use glam::{Vec2, Vec3, Vec4};

use crate::json::{Accessor, AccessorType, BufferTarget, ComponentType, Index};

use super::GltfBuilder;

impl GltfBuilder {
    /// Pack `data` into a new buffer view and describe it with an accessor.
    ///
    /// The element count is derived from the byte length and the
    /// type/component pair. Returns an unset index when the buffer view could
    /// not be written.
    ///
    /// # Panics
    /// Panics if the byte length of `data` is not a whole number of elements.
    pub fn add_accessor<T: Pod>(
        &mut self,
        data: &[T],
        accessor_type: AccessorType,
        component_type: ComponentType,
        target: Option<BufferTarget>,
    ) -> Index<Accessor> {
        let bytes = little_endian_bytes(data, component_type.size());
        let element_size = accessor_type.component_count() * component_type.size();
        assert!(
            bytes.len() % element_size == 0,
            "{} bytes is not a multiple of the {element_size}-byte element size",
            bytes.len()
        );
        let count = bytes.len() / element_size;

        let buffer_view = self.add_buffer_view(&bytes, target);
        if buffer_view.is_unset() {
            return Index::UNSET;
        }

        self.add(Accessor {
            buffer_view,
            count: count as u32,
            accessor_type,
            component_type,
            ..Accessor::default()
        })
    }

    // ========================================================================
    // Vertex Attribute Methods
    // ========================================================================

    /// `POSITION` accessor with the `min`/`max` bounds glTF requires.
    pub fn add_positions(&mut self, positions: &[Vec3]) -> Index<Accessor> {
        let accessor = self.add_accessor(
            positions,
            AccessorType::Vec3,
            ComponentType::Float,
            Some(BufferTarget::ArrayBuffer),
        );
        if accessor.is_set() && !positions.is_empty() {
            let (min, max) = positions.iter().fold(
                (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
                |(min, max), &p| (min.min(p), max.max(p)),
            );
            let accessor = self.get_mut(accessor);
            accessor.min = min.to_array().to_vec();
            accessor.max = max.to_array().to_vec();
        }
        accessor
    }

    pub fn add_normals(&mut self, normals: &[Vec3]) -> Index<Accessor> {
        self.add_accessor(
            normals,
            AccessorType::Vec3,
            ComponentType::Float,
            Some(BufferTarget::ArrayBuffer),
        )
    }

    /// Tangents with the handedness sign in `w`.
    pub fn add_tangents(&mut self, tangents: &[Vec4]) -> Index<Accessor> {
        self.add_accessor(
            tangents,
            AccessorType::Vec4,
            ComponentType::Float,
            Some(BufferTarget::ArrayBuffer),
        )
    }

    pub fn add_tex_coords(&mut self, uvs: &[Vec2]) -> Index<Accessor> {
        self.add_accessor(
            uvs,
            AccessorType::Vec2,
            ComponentType::Float,
            Some(BufferTarget::ArrayBuffer),
        )
    }

    pub fn add_colors(&mut self, colors: &[Vec4]) -> Index<Accessor> {
        self.add_accessor(
            colors,
            AccessorType::Vec4,
            ComponentType::Float,
            Some(BufferTarget::ArrayBuffer),
        )
    }

    // ========================================================================
    // Index Methods
    // ========================================================================

    pub fn add_indices_u16(&mut self, indices: &[u16]) -> Index<Accessor> {
        self.add_accessor(
            indices,
            AccessorType::Scalar,
            ComponentType::UnsignedShort,
            Some(BufferTarget::ElementArrayBuffer),
        )
    }

    pub fn add_indices_u32(&mut self, indices: &[u32]) -> Index<Accessor> {
        self.add_accessor(
            indices,
            AccessorType::Scalar,
            ComponentType::UnsignedInt,
            Some(BufferTarget::ElementArrayBuffer),
        )
    }

    /// Keyframe times for an animation sampler, with `min`/`max`.
    pub fn add_keyframe_times(&mut self, times: &[f32]) -> Index<Accessor> {
        let accessor = self.add_accessor(times, AccessorType::Scalar, ComponentType::Float, None);
        if accessor.is_set() && !times.is_empty() {
            let min = times.iter().copied().fold(f32::INFINITY, f32::min);
            let max = times.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            let accessor = self.get_mut(accessor);
            accessor.min = vec![min];
            accessor.max = vec![max];
        }
        accessor
    }
}

/// `data` as glTF's little-endian byte stream. Borrowed on little-endian
/// hosts; copied with every component byte-swapped otherwise.
fn little_endian_bytes<T: Pod>(data: &[T], component_size: usize) -> Cow<'_, [u8]> {
    let bytes: &[u8] = bytemuck::cast_slice(data);
    if cfg!(target_endian = "little") {
        return Cow::Borrowed(bytes);
    }
    let mut swapped = bytes.to_vec();
    swap_components(&mut swapped, component_size);
    Cow::Owned(swapped)
}

fn swap_components(bytes: &mut [u8], component_size: usize) {
    if component_size > 1 {
        for component in bytes.chunks_exact_mut(component_size) {
            component.reverse();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ExportOptions;

    #[test]
    fn test_positions_carry_bounds() {
        let mut builder = GltfBuilder::in_memory(ExportOptions::new());
        let positions = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, -2.0, 0.5),
            Vec3::new(-1.0, 3.0, 0.25),
        ];
        let index = builder.add_positions(&positions);

        let accessor = builder.get(index);
        assert_eq!(accessor.count, 3);
        assert_eq!(accessor.min, vec![-1.0, -2.0, 0.0]);
        assert_eq!(accessor.max, vec![1.0, 3.0, 0.5]);

        let view = builder.get(accessor.buffer_view);
        assert_eq!(view.byte_length, 36);
        assert_eq!(view.target, Some(BufferTarget::ArrayBuffer));
    }

    #[test]
    fn test_indices_and_uvs() {
        let mut builder = GltfBuilder::in_memory(ExportOptions::new());
        let uvs = builder.add_tex_coords(&[Vec2::ZERO, Vec2::X, Vec2::Y]);
        let indices = builder.add_indices_u16(&[0, 1, 2]);

        assert_eq!(builder.get(uvs).accessor_type, AccessorType::Vec2);
        let indices = builder.get(indices);
        assert_eq!(indices.count, 3);
        assert_eq!(indices.component_type, ComponentType::UnsignedShort);
        assert!(indices.min.is_empty());
        assert_eq!(builder.binary_buffer().unwrap().len(), 24 + 6);
    }

    #[test]
    fn test_vec3_packed_as_bytes() {
        let mut builder = GltfBuilder::in_memory(ExportOptions::new());
        builder.add_normals(&[Vec3::new(1.0, 0.0, 0.0)]);
        let bytes = builder.binary_buffer().unwrap();
        assert_eq!(&bytes[0..4], &1.0_f32.to_le_bytes());
        assert_eq!(&bytes[4..12], &[0; 8]);
    }

    #[test]
    fn test_indices_are_little_endian() {
        let mut builder = GltfBuilder::in_memory(ExportOptions::new());
        builder.add_indices_u16(&[0x0102, 0x0304]);
        builder.add_indices_u32(&[0x0A0B_0C0D]);
        let bytes = builder.binary_buffer().unwrap();
        assert_eq!(&bytes[0..4], &[0x02, 0x01, 0x04, 0x03]);
        assert_eq!(&bytes[4..8], &[0x0D, 0x0C, 0x0B, 0x0A]);
    }

    #[test]
    fn test_component_swap() {
        let mut shorts = [1, 2, 3, 4];
        swap_components(&mut shorts, 2);
        assert_eq!(shorts, [2, 1, 4, 3]);

        let mut floats = 1.5_f32.to_be_bytes();
        swap_components(&mut floats, 4);
        assert_eq!(floats, 1.5_f32.to_le_bytes());

        let mut bytes = [9, 8, 7];
        swap_components(&mut bytes, 1);
        assert_eq!(bytes, [9, 8, 7]);
    }

    #[test]
    fn test_keyframe_times() {
        let mut builder = GltfBuilder::in_memory(ExportOptions::new());
        let times = builder.add_keyframe_times(&[0.5, 0.0, 2.0]);
        assert_eq!(builder.get(times).min, vec![0.0]);
        assert_eq!(builder.get(times).max, vec![2.0]);
    }
}
