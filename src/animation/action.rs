use serde::{Deserialize, Serialize};

use crate::animation::tracks::KeyframeCursor;
use crate::scene::AnimationIndex;

/// How elapsed playback time maps onto a clip's `[0, duration]` timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopMode {
    /// Play once and hold the end (or start, when reversed).
    Once,
    /// Wrap modulo the duration.
    #[default]
    Loop,
    /// Alternate forward and backward.
    PingPong,
}

impl LoopMode {
    /// Playback time for `elapsed` seconds on a clip of `duration` seconds.
    ///
    /// Negative `elapsed` (reverse playback) is handled symmetrically. A clip
    /// with zero duration always plays at time 0.
    #[must_use]
    pub fn playback_time(self, elapsed: f32, duration: f32) -> f32 {
        if duration <= 0.0 || !elapsed.is_finite() {
            return 0.0;
        }

        match self {
            LoopMode::Once => elapsed.clamp(0.0, duration),
            // rem_euclid keeps reverse playback in [0, duration)
            LoopMode::Loop => elapsed.rem_euclid(duration),
            LoopMode::PingPong => {
                let double_duration = duration * 2.0;
                let t = elapsed.rem_euclid(double_duration);
                // In the second half of the cycle, reverse direction
                if t > duration { double_duration - t } else { t }
            }
        }
    }

    /// Whether playback has run off the clip and should stop.
    #[must_use]
    pub fn is_finished(self, elapsed: f32, duration: f32) -> bool {
        self == LoopMode::Once && (elapsed >= duration || elapsed < 0.0)
    }
}

/// Playback state of one clip within a mixer.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    animation: AnimationIndex,

    /// Unwrapped seconds since playback started, scaled by `time_scale`.
    pub elapsed: f32,
    pub time_scale: f32,
    /// Blend weight in `[0, 1]`; 1 overrides what earlier actions wrote.
    pub weight: f32,
    pub loop_mode: LoopMode,
    pub paused: bool,
    pub enabled: bool,

    time: f32,
    pub(crate) channel_cursors: Vec<KeyframeCursor>,
}

impl AnimationAction {
    #[must_use]
    pub fn new(animation: AnimationIndex) -> Self {
        Self {
            animation,
            elapsed: 0.0,
            time_scale: 1.0,
            weight: 1.0,
            loop_mode: LoopMode::Loop,
            paused: false,
            enabled: true,
            time: 0.0,
            channel_cursors: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    #[must_use]
    pub fn with_loop_mode(mut self, loop_mode: LoopMode) -> Self {
        self.loop_mode = loop_mode;
        self
    }

    #[must_use]
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }

    #[inline]
    #[must_use]
    pub fn animation(&self) -> AnimationIndex {
        self.animation
    }

    /// Current playback time on the clip's timeline.
    #[inline]
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Jumps to `elapsed` seconds. Cursors recover through their search fallback.
    pub fn seek(&mut self, elapsed: f32, duration: f32) {
        self.elapsed = elapsed;
        self.time = self.loop_mode.playback_time(elapsed, duration);
    }

    /// Whether this action contributes to the current frame.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.enabled && self.weight > 0.0
    }

    /// Advances time by `dt` seconds on a clip of `duration` seconds.
    pub fn update(&mut self, dt: f32, duration: f32) {
        if self.paused || !self.enabled {
            return;
        }

        self.elapsed += dt * self.time_scale;
        self.time = self.loop_mode.playback_time(self.elapsed, duration);

        if self.loop_mode.is_finished(self.elapsed, duration) {
            self.paused = true; // Auto-pause
        }
    }
}
