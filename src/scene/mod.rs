//! Scene graph module
//!
//! Static scene data and its per-frame evaluation:
//! - Transform: TRS component and matrix composition
//! - Node / NodeInstance: immutable hierarchy node and its mutable per-frame state
//! - Mesh: immutable vertex/index buffers
//! - Skin: joints, inverse-bind matrices and joint palette evaluation
//! - Hierarchy: ordering validation and traversal order
//! - TransformSystem: world matrix evaluation
//! - SceneInstance: one playing copy of an asset

pub mod hierarchy;
pub mod instance;
pub mod mesh;
pub mod node;
pub mod skin;
pub mod transform;
pub mod transform_system;

pub use hierarchy::TraversalOrder;
pub use instance::SceneInstance;
pub use mesh::Mesh;
pub use node::{Node, NodeInstance};
pub use skin::Skin;
pub use transform::Transform;

use std::num::TryFromIntError;

use serde::{Deserialize, Serialize};

macro_rules! asset_index {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            /// Wraps an array index.
            ///
            /// # Panics
            ///
            /// Panics if `index` does not fit in a `u32`. Use `try_from` for
            /// indices that come from untrusted data.
            #[inline]
            #[must_use]
            pub const fn new(index: usize) -> Self {
                assert!(index <= u32::MAX as usize, "asset index exceeds u32::MAX");
                Self(index as u32)
            }

            #[inline]
            #[must_use]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = TryFromIntError;

            #[inline]
            fn try_from(index: usize) -> Result<Self, Self::Error> {
                u32::try_from(index).map(Self)
            }
        }
    };
}

asset_index!(
    /// Index of a node inside one [`SceneAsset`](crate::assets::SceneAsset).
    NodeIndex
);
asset_index!(
    /// Index of a mesh inside one asset.
    MeshIndex
);
asset_index!(
    /// Index of a skin inside one asset.
    SkinIndex
);
asset_index!(
    /// Index of an animation inside one asset.
    AnimationIndex
);
asset_index!(
    /// Index of a sampler inside one animation.
    SamplerIndex
);
