//! Asset data
//!
//! [`SceneAsset`] bundles the immutable output of the external glTF loader
//! (nodes, meshes, skins, animations) after validating it. Instances share
//! it through `Arc`.

pub mod scene_asset;

pub use scene_asset::{SceneAsset, SkinnedMesh};
