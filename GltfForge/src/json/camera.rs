//! Cameras and `EPIC_camera_controls`.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::defaults::is_zero;
use super::extensions::{Extension, ExtensionRegistry, RegisterExtensions};
use super::index::Index;
use super::node::Node;

/// Perspective projection. `zfar == 0` means an infinite far plane and
/// `aspect_ratio == 0` means "use the viewport".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Perspective {
    #[serde(skip_serializing_if = "is_zero")]
    pub aspect_ratio: f32,
    pub yfov: f32,
    #[serde(skip_serializing_if = "is_zero")]
    pub zfar: f32,
    pub znear: f32,
}

/// Orthographic projection. All fields are required by glTF.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Orthographic {
    pub xmag: f32,
    pub ymag: f32,
    pub zfar: f32,
    pub znear: f32,
}

/// The active projection of a camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraProjection {
    Perspective(Perspective),
    Orthographic(Orthographic),
}

impl Default for CameraProjection {
    fn default() -> Self {
        Self::Perspective(Perspective::default())
    }
}

impl CameraProjection {
    /// The glTF `type` discriminator.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Perspective(_) => "perspective",
            Self::Orthographic(_) => "orthographic",
        }
    }
}

/// Interaction style for `EPIC_camera_controls`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CameraControlMode {
    #[default]
    FreeLook,
    Orbital,
}

/// Viewer navigation constraints for a camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraControl {
    pub mode: CameraControlMode,
    #[serde(skip_serializing_if = "Index::is_unset_ref")]
    pub target: Index<Node>,
    pub max_distance: f32,
    pub min_distance: f32,
    pub max_pitch: f32,
    pub min_pitch: f32,
    pub max_yaw: f32,
    pub min_yaw: f32,
    pub rotation_sensitivity: f32,
    pub rotation_inertia: f32,
    pub dolly_sensitivity: f32,
    pub dolly_duration: f32,
}

impl Default for CameraControl {
    fn default() -> Self {
        Self {
            mode: CameraControlMode::FreeLook,
            target: Index::UNSET,
            max_distance: 0.0,
            min_distance: 0.0,
            max_pitch: 90.0,
            min_pitch: -90.0,
            max_yaw: 360.0,
            min_yaw: 0.0,
            rotation_sensitivity: 0.3,
            rotation_inertia: 0.1,
            dolly_sensitivity: 0.5,
            dolly_duration: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CameraExtensions {
    #[serde(rename = "EPIC_camera_controls", skip_serializing_if = "Option::is_none")]
    pub controls: Option<CameraControl>,
}

impl CameraExtensions {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controls.is_none()
    }
}

/// A camera. Only the active projection is ever written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Camera {
    pub name: String,
    pub projection: CameraProjection,
    pub extensions: CameraExtensions,
}

impl Serialize for Camera {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if !self.name.is_empty() {
            map.serialize_entry("name", &self.name)?;
        }
        map.serialize_entry("type", self.projection.type_name())?;
        match &self.projection {
            CameraProjection::Perspective(perspective) => {
                map.serialize_entry("perspective", perspective)?;
            }
            CameraProjection::Orthographic(orthographic) => {
                map.serialize_entry("orthographic", orthographic)?;
            }
        }
        if !self.extensions.is_empty() {
            map.serialize_entry("extensions", &self.extensions)?;
        }
        map.end()
    }
}

impl RegisterExtensions for Camera {
    fn register_extensions(&self, registry: &mut ExtensionRegistry) {
        if self.extensions.controls.is_some() {
            registry.mark_used(Extension::EpicCameraControls);
        }
    }
}
