use glam::{Quat, Vec3};
use log::debug;
use rustc_hash::FxHashSet;

use crate::animation::binding::{ChannelTarget, TargetPath};
use crate::animation::tracks::{KeyframeCursor, KeyframeTrack};
use crate::animation::values::{ChannelValue, Interpolatable, MorphWeights};
use crate::errors::{Result, RigError};
use crate::scene::SamplerIndex;

/// Keyframe data of one sampler, tagged by output type.
#[derive(Debug, Clone)]
pub enum TrackData {
    Vector3(KeyframeTrack<Vec3>),
    Quaternion(KeyframeTrack<Quat>),
    MorphWeights(KeyframeTrack<MorphWeights>),
}

impl TrackData {
    #[must_use]
    pub fn end_time(&self) -> f32 {
        match self {
            TrackData::Vector3(track) => track.end_time(),
            TrackData::Quaternion(track) => track.end_time(),
            TrackData::MorphWeights(track) => track.end_time(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            TrackData::Vector3(_) => Vec3::KIND,
            TrackData::Quaternion(_) => Quat::KIND,
            TrackData::MorphWeights(_) => MorphWeights::KIND,
        }
    }

    /// Whether values of this track can be written to `path`.
    #[must_use]
    pub fn fits(&self, path: TargetPath) -> bool {
        matches!(
            (self, path),
            (TrackData::Vector3(_), TargetPath::Translation | TargetPath::Scale)
                | (TrackData::Quaternion(_), TargetPath::Rotation)
                | (TrackData::MorphWeights(_), TargetPath::Weights)
        )
    }

    #[must_use]
    pub fn sample(&self, time: f32) -> ChannelValue {
        match self {
            TrackData::Vector3(t) => ChannelValue::Vector3(t.sample(time)),
            TrackData::Quaternion(t) => ChannelValue::Quaternion(t.sample(time)),
            TrackData::MorphWeights(t) => ChannelValue::Weights(t.sample(time)),
        }
    }

    pub fn sample_with_cursor(&self, time: f32, cursor: &mut KeyframeCursor) -> ChannelValue {
        match self {
            TrackData::Vector3(t) => ChannelValue::Vector3(t.sample_with_cursor(time, cursor)),
            TrackData::Quaternion(t) => ChannelValue::Quaternion(t.sample_with_cursor(time, cursor)),
            TrackData::MorphWeights(t) => ChannelValue::Weights(t.sample_with_cursor(time, cursor)),
        }
    }
}

impl From<KeyframeTrack<Vec3>> for TrackData {
    fn from(track: KeyframeTrack<Vec3>) -> Self {
        TrackData::Vector3(track)
    }
}

impl From<KeyframeTrack<Quat>> for TrackData {
    fn from(track: KeyframeTrack<Quat>) -> Self {
        TrackData::Quaternion(track)
    }
}

impl From<KeyframeTrack<MorphWeights>> for TrackData {
    fn from(track: KeyframeTrack<MorphWeights>) -> Self {
        TrackData::MorphWeights(track)
    }
}

/// Binds one sampler to one animated property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    pub sampler: SamplerIndex,
    pub target: ChannelTarget,
}

impl Channel {
    #[must_use]
    pub const fn new(sampler: SamplerIndex, target: ChannelTarget) -> Self {
        Self { sampler, target }
    }
}

/// A named animation: samplers and the channels that route them to nodes.
///
/// Node indices in channel targets are checked against the node array by
/// [`SceneAsset::new`](crate::assets::SceneAsset::new); everything else is
/// checked here.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    name: String,
    duration: f32,
    samplers: Vec<TrackData>,
    channels: Vec<Channel>,
}

impl AnimationClip {
    /// Validates and assembles a clip.
    ///
    /// Fails on an out-of-range sampler reference, a sampler whose output type
    /// does not fit its channel's path, or two channels with the same target.
    pub fn new(name: impl Into<String>, samplers: Vec<TrackData>, channels: Vec<Channel>) -> Result<Self> {
        let name = name.into();

        let mut targets: FxHashSet<ChannelTarget> = FxHashSet::default();
        for (i, channel) in channels.iter().enumerate() {
            let sampler = samplers.get(channel.sampler.index()).ok_or_else(|| {
                RigError::dangling(
                    format!("animation '{name}' channel {i} sampler"),
                    channel.sampler.index(),
                    samplers.len(),
                )
            })?;

            if !sampler.fits(channel.target.path) {
                return Err(RigError::TrackTypeMismatch {
                    path: channel.target.path,
                    found: sampler.kind(),
                });
            }

            if !targets.insert(channel.target) {
                return Err(RigError::DuplicateChannelTarget {
                    node: channel.target.node.index(),
                    path: channel.target.path,
                });
            }
        }

        let duration = samplers
            .iter()
            .map(TrackData::end_time)
            .fold(0.0_f32, f32::max);

        debug!(
            "Animation '{name}': {} channels, {} samplers, {duration:.3}s",
            channels.len(),
            samplers.len()
        );

        Ok(Self {
            name,
            duration,
            samplers,
            channels,
        })
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Largest keyframe time over all samplers.
    #[inline]
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    #[inline]
    #[must_use]
    pub fn samplers(&self) -> &[TrackData] {
        &self.samplers
    }

    #[inline]
    #[must_use]
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// The sampler feeding `channel`. Indices were validated at construction.
    #[inline]
    #[must_use]
    pub fn sampler_for(&self, channel: &Channel) -> &TrackData {
        &self.samplers[channel.sampler.index()]
    }

    /// Samples channel `channel_index` at `time`.
    pub fn sample_channel(&self, channel_index: usize, time: f32) -> Result<ChannelValue> {
        let channel = self
            .channels
            .get(channel_index)
            .ok_or_else(|| RigError::UnknownChannel {
                animation: self.name.clone(),
                channel: channel_index,
            })?;
        Ok(self.sampler_for(channel).sample(time))
    }
}
