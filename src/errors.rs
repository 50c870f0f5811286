//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! [`RigError`] covers two classes of failure:
//! - **Data-integrity faults**: malformed hierarchies, dangling references,
//!   mismatched array lengths, mistyped samplers. These are detected once, when
//!   tracks, clips, skins and assets are constructed, and the affected asset is
//!   refused rather than repaired.
//! - **Runtime query faults**: asking for an animation, channel or node that does
//!   not exist, or skinning a mesh whose node transform cannot be inverted.
//!
//! Out-of-range sample times are *not* errors; they clamp.
//!
//! # Usage
//!
//! All fallible APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, RigError>`.
//!
//! ```rust,ignore
//! use rigpose::errors::{RigError, Result};
//!
//! fn build() -> Result<()> {
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::animation::binding::TargetPath;

/// The main error type for pose evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RigError {
    // ========================================================================
    // Hierarchy Errors
    // ========================================================================
    /// A node names a parent with an index not smaller than its own while the
    /// index-order invariant is required.
    #[error("Node {node} references parent {parent} that is not ordered before it")]
    ForwardParentReference {
        /// Offending node index
        node: usize,
        /// Its parent index
        parent: usize,
    },

    /// The parent relation contains a cycle through `node`.
    #[error("Node hierarchy contains a cycle through node {node}")]
    HierarchyCycle {
        /// A node that is part of the cycle
        node: usize,
    },

    /// A node is listed as a child of two different parents.
    #[error("Node {child} has two parents ({first} and {second})")]
    MultipleParents {
        /// Child node index
        child: usize,
        /// First parent seen
        first: usize,
        /// Second parent seen
        second: usize,
    },

    // ========================================================================
    // Reference & Length Errors
    // ========================================================================
    /// An index points outside the collection it refers to.
    #[error("Dangling reference: {context} (index: {index}, len: {len})")]
    DanglingReference {
        /// Description of what was being referenced
        context: String,
        /// The invalid index
        index: usize,
        /// Length of the referenced collection
        len: usize,
    },

    /// Two arrays that must agree in length do not.
    #[error("Length mismatch: {context} (expected {expected}, found {actual})")]
    LengthMismatch {
        /// Description of the arrays involved
        context: String,
        /// Required length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    // ========================================================================
    // Animation Data Errors
    // ========================================================================
    /// A keyframe track has no keyframes.
    #[error("Keyframe track is empty")]
    EmptyTrack,

    /// Keyframe times decrease at `index`.
    #[error("Keyframe times must be non-decreasing (index {index}: {previous} > {current})")]
    UnsortedKeyframes {
        /// Index of the first out-of-order keyframe
        index: usize,
        /// Time of the preceding keyframe
        previous: f32,
        /// Time at `index`
        current: f32,
    },

    /// A keyframe time is NaN or infinite.
    #[error("Keyframe time at index {index} is not finite")]
    NonFiniteKeyframe {
        /// Index of the keyframe
        index: usize,
    },

    /// A sampler's output type does not fit the channel's target path.
    #[error("Channel targeting {path:?} cannot use a {found} sampler")]
    TrackTypeMismatch {
        /// Target path of the channel
        path: TargetPath,
        /// Output type of the sampler
        found: &'static str,
    },

    /// Two channels of one animation animate the same property.
    #[error("Duplicate channel target: node {node}, path {path:?}")]
    DuplicateChannelTarget {
        /// Target node index
        node: usize,
        /// Target path
        path: TargetPath,
    },

    /// A target path string is not one of the known properties.
    #[error("Unknown channel target path: {0}")]
    UnknownTargetPath(String),

    /// Morph weight arrays disagree with the mesh's morph target count.
    #[error("Morph weight count mismatch on node {node} (expected {expected}, found {actual})")]
    MorphWeightCountMismatch {
        /// Node whose weights are affected
        node: usize,
        /// Morph target count
        expected: usize,
        /// Weight array length
        actual: usize,
    },

    /// A skinned vertex references a joint slot the skin does not have.
    #[error("Mesh {mesh} references joint slot {joint} but skin {skin} has {joint_count} joints")]
    InvalidJointIndex {
        /// Mesh index
        mesh: usize,
        /// Skin index
        skin: usize,
        /// Offending joint slot
        joint: usize,
        /// Joints in the skin
        joint_count: usize,
    },

    // ========================================================================
    // Runtime Query Errors
    // ========================================================================
    /// The requested animation does not exist in the asset.
    #[error("Unknown animation: {0}")]
    UnknownAnimation(usize),

    /// The requested channel does not exist in the animation.
    #[error("Unknown channel {channel} in animation '{animation}'")]
    UnknownChannel {
        /// Animation name
        animation: String,
        /// Channel index
        channel: usize,
    },

    /// The requested node does not exist in the asset.
    #[error("Unknown node: {0}")]
    UnknownNode(usize),

    /// The world matrix of a skinned mesh node cannot be inverted.
    #[error("World matrix of skinned mesh node {node} is singular")]
    SingularMeshTransform {
        /// Mesh node index
        node: usize,
    },
}

impl RigError {
    pub(crate) fn dangling(context: impl Into<String>, index: usize, len: usize) -> Self {
        RigError::DanglingReference {
            context: context.into(),
            index,
            len,
        }
    }

    pub(crate) fn length_mismatch(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        RigError::LengthMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }

    /// Returns `true` for faults in the loaded data, as opposed to bad queries.
    #[must_use]
    pub fn is_data_integrity(&self) -> bool {
        !matches!(
            self,
            RigError::UnknownAnimation(_)
                | RigError::UnknownChannel { .. }
                | RigError::UnknownNode(_)
                | RigError::SingularMeshTransform { .. }
        )
    }
}

/// Alias for `Result<T, RigError>`.
pub type Result<T> = std::result::Result<T, RigError>;
