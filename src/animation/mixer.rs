//! Animation Mixer
//!
//! Drives animation clips into a scene instance's node states.
//!
//! # Blending
//!
//! Actions are applied in the order they were added. Each one moves the
//! properties it animates from their current value toward its sampled value by
//! its weight: a weight of 1 overrides, 0.25 moves a quarter of the way
//! (shortest-arc slerp for rotations). With `reset_to_rest_pose` enabled the
//! instance starts every frame from its rest pose, so a frame's result only
//! depends on the actions' times and weights.

use log::trace;
use slotmap::{SlotMap, new_key_type};

use crate::animation::action::AnimationAction;
use crate::animation::binding::TargetPath;
use crate::animation::clip::{AnimationClip, Channel, TrackData};
use crate::animation::tracks::KeyframeCursor;
use crate::animation::values::{ChannelValue, Interpolatable};
use crate::errors::{Result, RigError};
use crate::scene::instance::SceneInstance;
use crate::scene::node::NodeInstance;

new_key_type! {
    pub struct ActionKey;
}

/// Samples every channel of `clip` at `time` and writes the results into
/// `instances`, blended by `weight`.
///
/// Every target is checked before anything is written, so on error
/// `instances` is unchanged.
pub fn advance(clip: &AnimationClip, time: f32, weight: f32, instances: &mut [NodeInstance]) -> Result<()> {
    check_targets(clip, instances)?;
    if weight <= 0.0 {
        return Ok(());
    }

    for channel in clip.channels() {
        let value = clip.sampler_for(channel).sample(time);
        apply_value(&mut instances[channel.target.node.index()], channel, value, weight)?;
    }
    Ok(())
}

/// [`advance`] with per-channel cursors for sequential playback.
pub fn advance_with_cursors(
    clip: &AnimationClip,
    time: f32,
    weight: f32,
    instances: &mut [NodeInstance],
    cursors: &mut Vec<KeyframeCursor>,
) -> Result<()> {
    check_targets(clip, instances)?;
    if weight <= 0.0 {
        return Ok(());
    }

    cursors.resize(clip.channels().len(), KeyframeCursor::default());

    for (channel, cursor) in clip.channels().iter().zip(cursors.iter_mut()) {
        let value = clip.sampler_for(channel).sample_with_cursor(time, cursor);
        apply_value(&mut instances[channel.target.node.index()], channel, value, weight)?;
    }
    Ok(())
}

fn check_targets(clip: &AnimationClip, instances: &[NodeInstance]) -> Result<()> {
    for (i, channel) in clip.channels().iter().enumerate() {
        let node = channel.target.node.index();
        let Some(instance) = instances.get(node) else {
            return Err(RigError::dangling(
                format!("animation '{}' channel {i} target node", clip.name()),
                node,
                instances.len(),
            ));
        };

        if let TrackData::MorphWeights(track) = clip.sampler_for(channel)
            && track.arity() != instance.weights.len()
        {
            return Err(RigError::MorphWeightCountMismatch {
                node,
                expected: instance.weights.len(),
                actual: track.arity(),
            });
        }
    }
    Ok(())
}

#[inline]
fn blend_toward<T: Interpolatable>(current: &T, target: T, weight: f32) -> T {
    if weight >= 1.0 {
        target
    } else {
        T::blend(current, &target, weight)
    }
}

fn apply_value(instance: &mut NodeInstance, channel: &Channel, value: ChannelValue, weight: f32) -> Result<()> {
    let transform = &mut instance.transform;

    match (channel.target.path, value) {
        (TargetPath::Translation, ChannelValue::Vector3(v)) => {
            transform.translation = blend_toward(&transform.translation, v, weight);
        }
        (TargetPath::Scale, ChannelValue::Vector3(v)) => {
            transform.scale = blend_toward(&transform.scale, v, weight);
        }
        (TargetPath::Rotation, ChannelValue::Quaternion(q)) => {
            transform.rotation = blend_toward(&transform.rotation, q, weight);
        }
        (TargetPath::Weights, ChannelValue::Weights(w)) => {
            instance.weights = blend_toward(&instance.weights, w, weight);
        }
        (path, value) => {
            // Clips reject these at construction.
            return Err(RigError::TrackTypeMismatch {
                path,
                found: match value {
                    ChannelValue::Vector3(_) => "vector3",
                    ChannelValue::Quaternion(_) => "quaternion",
                    ChannelValue::Weights(_) => "weights",
                },
            });
        }
    }
    Ok(())
}

/// An ordered set of playing actions for one scene instance.
#[derive(Debug, Default)]
pub struct AnimationMixer {
    actions: SlotMap<ActionKey, AnimationAction>,
    // Application order; insertion order unless changed with `move_to_end`.
    order: Vec<ActionKey>,
}

impl AnimationMixer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_action(&mut self, action: AnimationAction) -> ActionKey {
        let key = self.actions.insert(action);
        self.order.push(key);
        key
    }

    pub fn remove_action(&mut self, key: ActionKey) -> Option<AnimationAction> {
        self.order.retain(|&k| k != key);
        self.actions.remove(key)
    }

    #[must_use]
    pub fn action(&self, key: ActionKey) -> Option<&AnimationAction> {
        self.actions.get(key)
    }

    pub fn action_mut(&mut self, key: ActionKey) -> Option<&mut AnimationAction> {
        self.actions.get_mut(key)
    }

    /// Makes `key` the last action applied, i.e. the one blended on top.
    pub fn move_to_end(&mut self, key: ActionKey) {
        if self.actions.contains_key(key) {
            self.order.retain(|&k| k != key);
            self.order.push(key);
        }
    }

    /// Actions in application order.
    pub fn actions(&self) -> impl Iterator<Item = (ActionKey, &AnimationAction)> {
        self.order.iter().filter_map(|&k| self.actions.get(k).map(|a| (k, a)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Advances every action by `dt` and writes the blended pose into `instance`.
    ///
    /// World and joint matrices are not recomputed; call
    /// [`SceneInstance::evaluate`] afterwards.
    pub fn update(&mut self, dt: f32, instance: &mut SceneInstance) -> Result<()> {
        let asset = instance.asset().clone();

        // Resolve every clip before touching the instance.
        let mut clips: Vec<&AnimationClip> = Vec::with_capacity(self.order.len());
        for &key in &self.order {
            clips.push(asset.animation(self.actions[key].animation())?);
        }

        if instance.settings().reset_to_rest_pose {
            instance.reset_pose();
        }

        for (&key, clip) in self.order.iter().zip(clips) {
            let action = &mut self.actions[key];
            action.update(dt, clip.duration());

            if !action.is_active() {
                continue;
            }

            trace!(
                "Applying '{}' at {:.3}s (weight {:.2})",
                clip.name(),
                action.time(),
                action.weight
            );
            advance_with_cursors(
                clip,
                action.time(),
                action.weight,
                instance.nodes_mut(),
                &mut action.channel_cursors,
            )?;
        }

        Ok(())
    }
}
