use serde::{Deserialize, Serialize};

use crate::animation::values::Interpolatable;
use crate::errors::{Result, RigError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterpolationMode {
    Linear,
    Step,
    CubicSpline,
}

impl InterpolationMode {
    /// Stored values per keyframe: `(in-tangent, value, out-tangent)` for cubic splines.
    #[inline]
    #[must_use]
    pub const fn values_per_keyframe(self) -> usize {
        match self {
            InterpolationMode::CubicSpline => 3,
            InterpolationMode::Linear | InterpolationMode::Step => 1,
        }
    }
}

const MAX_SCAN_OFFSET: usize = 3;

/// Remembers the last keyframe interval a track was sampled in.
#[derive(Debug, Clone, Default)]
pub struct KeyframeCursor {
    pub last_index: usize,
}

/// Keyframe timeline plus one output value per keyframe.
///
/// Construction validates the data, so sampling never fails:
/// - at least one keyframe;
/// - finite, non-decreasing times;
/// - `values.len() == times.len()`, or three times that for cubic splines;
/// - values of equal arity (morph weight arrays of one length).
#[derive(Debug, Clone)]
pub struct KeyframeTrack<T: Interpolatable> {
    times: Vec<f32>,
    values: Vec<T>, // For CubicSpline, length is times.len() * 3
    interpolation: InterpolationMode,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: InterpolationMode) -> Result<Self> {
        if times.is_empty() {
            return Err(RigError::EmptyTrack);
        }

        for (index, time) in times.iter().enumerate() {
            if !time.is_finite() {
                return Err(RigError::NonFiniteKeyframe { index });
            }
        }

        if let Some(index) = times.windows(2).position(|w| w[1] < w[0]) {
            return Err(RigError::UnsortedKeyframes {
                index: index + 1,
                previous: times[index],
                current: times[index + 1],
            });
        }

        let expected = times.len() * interpolation.values_per_keyframe();
        if values.len() != expected {
            return Err(RigError::length_mismatch(
                format!("{interpolation:?} keyframe values vs times"),
                expected,
                values.len(),
            ));
        }

        let arity = values[0].arity();
        if let Some(odd) = values.iter().find(|v| v.arity() != arity) {
            return Err(RigError::length_mismatch(
                format!("{} keyframe value arity", T::KIND),
                arity,
                odd.arity(),
            ));
        }

        Ok(Self {
            times,
            values,
            interpolation,
        })
    }

    #[inline]
    #[must_use]
    pub fn times(&self) -> &[f32] {
        &self.times
    }

    #[inline]
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    #[inline]
    #[must_use]
    pub fn interpolation(&self) -> InterpolationMode {
        self.interpolation
    }

    /// Time of the last keyframe.
    #[inline]
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.times[self.times.len() - 1]
    }

    /// Arity shared by every value (morph target count for weight tracks).
    #[inline]
    #[must_use]
    pub fn arity(&self) -> usize {
        self.values[0].arity()
    }

    /// Value at `time`, clamped to the first and last keyframe.
    #[must_use]
    pub fn sample(&self, time: f32) -> T {
        if self.times.len() == 1 {
            return self.get_value_at(0).clone();
        }

        // partition_point finds the first index where t > time, i.e. next_index
        let next_idx = self.times.partition_point(|&t| t <= time);
        let index = next_idx.saturating_sub(1);

        self.sample_at_frame(index, time)
    }

    /// Same result as [`sample`](Self::sample), tuned for playback.
    ///
    /// Sequential times scan a few intervals from the cursor (O(1) per frame);
    /// anything further away falls back to a binary search.
    pub fn sample_with_cursor(&self, time: f32, cursor: &mut KeyframeCursor) -> T {
        let len = self.times.len();
        // Fast path: static data (single keyframe)
        if len == 1 {
            return self.get_value_at(0).clone();
        }

        // Cursor may come from another track
        let i = cursor.last_index.min(len - 1);
        let t_curr = self.times[i];

        let found_index = if time >= t_curr {
            // Forward: check [i, i+1), [i+1, i+2), ...
            let mut res = None;
            for offset in 0..=MAX_SCAN_OFFSET {
                let idx = i + offset;
                if idx >= len - 1 {
                    res = Some(len - 1);
                    break;
                }
                if time < self.times[idx + 1] {
                    res = Some(idx);
                    break;
                }
            }
            res
        } else {
            // Backward: time < times[i], so the interval starts before i
            let mut res = None;
            for offset in 1..=MAX_SCAN_OFFSET {
                let Some(idx) = i.checked_sub(offset) else {
                    res = Some(0);
                    break;
                };
                if time >= self.times[idx] {
                    res = Some(idx);
                    break;
                }
            }
            res
        };

        let index = found_index.unwrap_or_else(|| {
            // Large jump (scrubbing / loop reset)
            self.times.partition_point(|&t| t <= time).saturating_sub(1)
        });

        cursor.last_index = index;
        self.sample_at_frame(index, time)
    }

    /// For Linear/Step the value is at `index`; for CubicSpline at `index * 3 + 1`.
    fn get_value_at(&self, index: usize) -> &T {
        match self.interpolation {
            InterpolationMode::CubicSpline => &self.values[index * 3 + 1],
            _ => &self.values[index],
        }
    }

    fn sample_at_frame(&self, index: usize, time: f32) -> T {
        let len = self.times.len();

        if index >= len - 1 {
            return self.get_value_at(len - 1).clone();
        }

        let next_idx = index + 1;
        let t0 = self.times[index];
        let t1 = self.times[next_idx];
        let dt = t1 - t0;

        // Before the first keyframe, or a zero-length interval
        if time <= t0 || dt <= 0.0 {
            return self.get_value_at(index).clone();
        }

        let t = ((time - t0) / dt).clamp(0.0, 1.0);

        match self.interpolation {
            InterpolationMode::Step => self.get_value_at(index).clone(),
            InterpolationMode::Linear => {
                let v0 = self.get_value_at(index);
                let v1 = self.get_value_at(next_idx);
                T::interpolate_linear(v0, v1, t)
            }
            InterpolationMode::CubicSpline => {
                let i_prev = index * 3;
                let i_next = next_idx * 3;

                let v0 = &self.values[i_prev + 1];
                let out_tangent0 = &self.values[i_prev + 2];
                let in_tangent1 = &self.values[i_next];
                let v1 = &self.values[i_next + 1];

                T::interpolate_cubic(v0, out_tangent0, in_tangent1, v1, t, dt)
            }
        }
    }
}
