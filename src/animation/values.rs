use glam::{Quat, Vec3, Vec4};
use smallvec::SmallVec;

/// Inline capacity of [`MorphWeights`]; larger arrays spill to the heap.
pub const INLINE_MORPH_TARGETS: usize = 8;

/// Values a keyframe track can interpolate and a mixer can blend.
pub trait Interpolatable: Clone + Sized {
    /// Human-readable output type, used in validation errors.
    const KIND: &'static str;

    fn interpolate_linear(start: &Self, end: &Self, t: f32) -> Self;

    /// Cubic Hermite spline between `v0` and `v1`.
    ///
    /// Tangents are per second; `dt` is the interval length used to scale them.
    fn interpolate_cubic(
        v0: &Self,
        out_tangent0: &Self,
        in_tangent1: &Self,
        v1: &Self,
        t: f32,
        dt: f32,
    ) -> Self;

    /// Moves `current` toward `target` by `weight` in `[0, 1]`.
    fn blend(current: &Self, target: &Self, weight: f32) -> Self {
        Self::interpolate_linear(current, target, weight)
    }

    /// Element count per value; only meaningful for variable-length values.
    fn arity(&self) -> usize {
        1
    }
}

/// Hermite basis `(s0, s1, s2, s3)` for value0, tangent0, value1, tangent1.
#[inline]
fn hermite_basis(t: f32) -> (f32, f32, f32, f32) {
    let t2 = t * t;
    let t3 = t2 * t;

    let s2 = -2.0 * t3 + 3.0 * t2;
    let s3 = t3 - t2;
    let s0 = 1.0 - s2;
    let s1 = s3 - t2 + t;

    (s0, s1, s2, s3)
}

impl Interpolatable for f32 {
    const KIND: &'static str = "scalar";

    fn interpolate_linear(start: &Self, end: &Self, t: f32) -> Self {
        start + (end - start) * t
    }

    fn interpolate_cubic(v0: &Self, out_tangent0: &Self, in_tangent1: &Self, v1: &Self, t: f32, dt: f32) -> Self {
        let (s0, s1, s2, s3) = hermite_basis(t);
        s0 * v0 + s1 * (out_tangent0 * dt) + s2 * v1 + s3 * (in_tangent1 * dt)
    }
}

impl Interpolatable for Vec3 {
    const KIND: &'static str = "vector3";

    fn interpolate_linear(start: &Self, end: &Self, t: f32) -> Self {
        start.lerp(*end, t)
    }

    fn interpolate_cubic(v0: &Self, out_tangent0: &Self, in_tangent1: &Self, v1: &Self, t: f32, dt: f32) -> Self {
        let (s0, s1, s2, s3) = hermite_basis(t);

        let m0 = *out_tangent0 * dt;
        let m1 = *in_tangent1 * dt;

        *v0 * s0 + m0 * s1 + *v1 * s2 + m1 * s3
    }
}

impl Interpolatable for Quat {
    const KIND: &'static str = "quaternion";

    /// Shortest-arc slerp, renormalized.
    fn interpolate_linear(start: &Self, end: &Self, t: f32) -> Self {
        // q and -q are the same rotation; pick the one on start's hemisphere so
        // the path never goes the long way around.
        let end = if start.dot(*end) < 0.0 { -*end } else { *end };
        start.slerp(end, t).normalize()
    }

    fn interpolate_cubic(v0: &Self, out_tangent0: &Self, in_tangent1: &Self, v1: &Self, t: f32, dt: f32) -> Self {
        let (s0, s1, s2, s3) = hermite_basis(t);

        let v0_v = Vec4::from(*v0);
        let v1_v = Vec4::from(*v1);
        let m0_v = Vec4::from(*out_tangent0) * dt;
        let m1_v = Vec4::from(*in_tangent1) * dt;

        let result = v0_v * s0 + m0_v * s1 + v1_v * s2 + m1_v * s3;

        Quat::from_vec4(result).normalize()
    }
}

/// Morph target weights of one node.
///
/// Arrays taking part in one interpolation or blend have the same length;
/// assets validate this when built.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MorphWeights(pub SmallVec<[f32; INLINE_MORPH_TARGETS]>);

impl MorphWeights {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    fn zip_map(a: &Self, b: &Self, f: impl Fn(f32, f32) -> f32) -> Self {
        Self(a.0.iter().zip(&b.0).map(|(&x, &y)| f(x, y)).collect())
    }
}

impl From<Vec<f32>> for MorphWeights {
    fn from(weights: Vec<f32>) -> Self {
        Self(SmallVec::from_vec(weights))
    }
}

impl From<&[f32]> for MorphWeights {
    fn from(weights: &[f32]) -> Self {
        Self(SmallVec::from_slice(weights))
    }
}

impl<const N: usize> From<[f32; N]> for MorphWeights {
    fn from(weights: [f32; N]) -> Self {
        Self(weights.into_iter().collect())
    }
}

impl Interpolatable for MorphWeights {
    const KIND: &'static str = "weights";

    fn interpolate_linear(start: &Self, end: &Self, t: f32) -> Self {
        Self::zip_map(start, end, |a, b| a + (b - a) * t)
    }

    fn interpolate_cubic(v0: &Self, out_tangent0: &Self, in_tangent1: &Self, v1: &Self, t: f32, dt: f32) -> Self {
        let (s0, s1, s2, s3) = hermite_basis(t);

        Self(
            v0.0.iter()
                .zip(&out_tangent0.0)
                .zip(&in_tangent1.0)
                .zip(&v1.0)
                .map(|(((&p0, &m0), &m1), &p1)| s0 * p0 + s1 * (m0 * dt) + s2 * p1 + s3 * (m1 * dt))
                .collect(),
        )
    }

    fn arity(&self) -> usize {
        self.len()
    }
}

/// A sampled channel value, tagged by output type.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelValue {
    Vector3(Vec3),
    Quaternion(Quat),
    Weights(MorphWeights),
}
