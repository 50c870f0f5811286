pub mod action;
pub mod binding;
pub mod clip;
pub mod mixer;
pub mod tracks;
pub mod values;

pub use action::{AnimationAction, LoopMode};
pub use binding::{ChannelTarget, TargetPath};
pub use clip::{AnimationClip, Channel, TrackData};
pub use mixer::{ActionKey, AnimationMixer, advance};
pub use tracks::{InterpolationMode, KeyframeCursor, KeyframeTrack};
pub use values::{ChannelValue, Interpolatable, MorphWeights};
