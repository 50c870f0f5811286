use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Squared-length tolerance below which a rotation is treated as unit length.
const UNIT_QUAT_EPSILON: f32 = 1e-6;

/// Transform component
///
/// A local translation, rotation and non-uniform scale (TRS).
///
/// All matrices use glam's column-major convention: a point is transformed as
/// `M * p`, and the local matrix is `translation * rotation * scale`, so scale
/// is applied first and translation last.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[must_use]
    pub const fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    #[must_use]
    pub const fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    #[must_use]
    pub const fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Self::IDENTITY
        }
    }

    #[must_use]
    pub const fn from_scale(scale: Vec3) -> Self {
        Self {
            scale,
            ..Self::IDENTITY
        }
    }

    /// Decomposes a local matrix into TRS.
    ///
    /// Used for glTF nodes that store a `matrix` instead of separate TRS
    /// properties. Shear cannot be represented and is lost.
    #[must_use]
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        Self {
            translation,
            rotation,
            scale,
        }
    }

    // ========================================================================
    // Matrix construction
    // ========================================================================

    /// Local matrix `T * R * S`.
    #[inline]
    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        to_matrix(self.translation, self.rotation, self.scale)
    }

    /// World matrix of a node with this local transform under `parent_world`.
    #[inline]
    #[must_use]
    pub fn compose(&self, parent_world: &Mat4) -> Mat4 {
        compose(parent_world, self)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Builds `translation(t) * rotation(r) * scale(s)`.
///
/// The rotation is normalized first. Repeated interpolation drifts away from
/// unit length, and a non-unit quaternion would otherwise shear the matrix.
#[must_use]
pub fn to_matrix(translation: Vec3, rotation: Quat, scale: Vec3) -> Mat4 {
    Mat4::from_scale_rotation_translation(scale, normalize_rotation(rotation), translation)
}

/// Returns `parent_world * local.to_matrix()`. Roots pass [`Mat4::IDENTITY`].
#[inline]
#[must_use]
pub fn compose(parent_world: &Mat4, local: &Transform) -> Mat4 {
    *parent_world * local.to_matrix()
}

/// Normalizes `q`, mapping zero-length and non-finite input to identity.
#[must_use]
pub fn normalize_rotation(q: Quat) -> Quat {
    let length_squared = q.length_squared();
    if (length_squared - 1.0).abs() <= UNIT_QUAT_EPSILON {
        return q;
    }
    if !length_squared.is_finite() || length_squared <= f32::EPSILON {
        log::warn!("Degenerate rotation {q:?} replaced by identity");
        return Quat::IDENTITY;
    }
    q * length_squared.sqrt().recip()
}
