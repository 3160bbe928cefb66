//! Task priority classes.

use crate::error::{Error, Result};

/// Construction phase a task belongs to.
///
/// Phases drain in declaration order. A running task may only schedule work
/// in a later phase, so every dependency points forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TaskPriority {
    /// Animation sampling; needs nothing built by other phases.
    Animation,
    /// Mesh conversion; may be scheduled by animations (morph targets).
    Mesh,
    /// Material conversion; scheduled by meshes.
    Material,
    /// Texture encoding; scheduled by materials.
    Texture,
}

impl TaskPriority {
    /// Number of priority classes.
    pub const COUNT: usize = 4;

    /// All priorities in drain order.
    pub const ALL: [Self; Self::COUNT] = [Self::Animation, Self::Mesh, Self::Material, Self::Texture];

    /// Bucket position of this priority.
    #[must_use]
    pub const fn rank(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Animation => "Animations",
            Self::Mesh => "Meshes",
            Self::Material => "Materials",
            Self::Texture => "Textures",
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u32> for TaskPriority {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or(Error::InvalidEnumValue {
                kind: "TaskPriority",
                value,
            })
    }
}
