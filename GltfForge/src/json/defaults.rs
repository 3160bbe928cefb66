//! Default-value predicates for `skip_serializing_if`.
//!
//! A field equal to its glTF default is never written; consumers infer the
//! default from its absence.

use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

pub(crate) fn is_true(value: &bool) -> bool {
    *value
}

pub(crate) fn is_zero(value: &f32) -> bool {
    *value == 0.0
}

pub(crate) fn is_one(value: &f32) -> bool {
    *value == 1.0
}

pub(crate) fn is_zero_u32(value: &u32) -> bool {
    *value == 0
}

pub(crate) fn is_zero_u64(value: &u64) -> bool {
    *value == 0
}

pub(crate) fn is_vec2_zero(value: &Vec2) -> bool {
    *value == Vec2::ZERO
}

pub(crate) fn is_vec2_one(value: &Vec2) -> bool {
    *value == Vec2::ONE
}

pub(crate) fn is_vec3_zero(value: &Vec3) -> bool {
    *value == Vec3::ZERO
}

pub(crate) fn is_vec3_one(value: &Vec3) -> bool {
    *value == Vec3::ONE
}

pub(crate) fn is_vec4_one(value: &Vec4) -> bool {
    *value == Vec4::ONE
}

pub(crate) fn is_quat_identity(value: &Quat) -> bool {
    *value == Quat::IDENTITY
}

pub(crate) fn is_mat4_identity(value: &Mat4) -> bool {
    *value == Mat4::IDENTITY
}

pub(crate) fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}
