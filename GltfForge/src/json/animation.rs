//! Animations and `EPIC_animation_playback`.

use serde::Serialize;

use super::accessor::Accessor;
use super::defaults::{is_default, is_one, is_true, is_zero};
use super::extensions::{Extension, ExtensionRegistry, RegisterExtensions};
use super::index::Index;
use super::node::Node;

/// Keyframe interpolation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Interpolation {
    #[default]
    Linear,
    Step,
    CubicSpline,
}

/// Animated node property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationPath {
    #[default]
    Translation,
    Rotation,
    Scale,
    Weights,
}

/// Keyframe times (`input`) paired with values (`output`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnimationSampler {
    pub input: Index<Accessor>,
    pub output: Index<Accessor>,
    #[serde(skip_serializing_if = "is_default")]
    pub interpolation: Interpolation,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnimationChannelTarget {
    #[serde(skip_serializing_if = "Index::is_unset_ref")]
    pub node: Index<Node>,
    pub path: AnimationPath,
}

/// Binds a sampler (indexed within the owning animation) to a node property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnimationChannel {
    pub sampler: Index<AnimationSampler>,
    pub target: AnimationChannelTarget,
}

/// Viewer playback settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationPlayback {
    #[serde(rename = "loop", skip_serializing_if = "is_true")]
    pub looping: bool,
    #[serde(skip_serializing_if = "is_true")]
    pub auto_play: bool,
    #[serde(skip_serializing_if = "is_one")]
    pub play_rate: f32,
    #[serde(skip_serializing_if = "is_zero")]
    pub start_time: f32,
}

impl Default for AnimationPlayback {
    fn default() -> Self {
        Self {
            looping: true,
            auto_play: true,
            play_rate: 1.0,
            start_time: 0.0,
        }
    }
}

impl AnimationPlayback {
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

fn playback_is_default(playback: &Option<AnimationPlayback>) -> bool {
    playback.as_ref().is_none_or(AnimationPlayback::is_default)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnimationExtensions {
    #[serde(rename = "EPIC_animation_playback", skip_serializing_if = "playback_is_default")]
    pub playback: Option<AnimationPlayback>,
}

impl AnimationExtensions {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        playback_is_default(&self.playback)
    }
}

/// A keyframe animation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Animation {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub channels: Vec<AnimationChannel>,
    pub samplers: Vec<AnimationSampler>,
    #[serde(skip_serializing_if = "AnimationExtensions::is_empty")]
    pub extensions: AnimationExtensions,
}

impl Animation {
    /// Append a sampler and return its animation-local index.
    pub fn add_sampler(&mut self, sampler: AnimationSampler) -> Index<AnimationSampler> {
        let index = Index::from_position(self.samplers.len());
        self.samplers.push(sampler);
        index
    }
}

impl RegisterExtensions for Animation {
    fn register_extensions(&self, registry: &mut ExtensionRegistry) {
        if !self.extensions.is_empty() {
            registry.mark_used(Extension::EpicAnimationPlayback);
        }
    }
}
