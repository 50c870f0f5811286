//! # rigpose
//!
//! Per-frame evaluation of animated, skinned glTF-style scene graphs.
//!
//! Given the static data produced by a glTF loader, `rigpose` computes for
//! every frame:
//! - the world matrix of every node;
//! - the joint (skinning) matrix palette of every skinned mesh.
//!
//! # Data flow
//!
//! ```text
//! AnimationMixer ──samples channels──▶ SceneInstance::nodes (TRS + weights)
//!                                            │
//!                      transform_system ◀────┘  world matrices, parents first
//!                                            │
//!                      skin::evaluate_skin ◀─┘  joint palettes
//! ```
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rigpose::{AnimationAction, PoseWorld, SceneAsset};
//!
//! let asset = Arc::new(SceneAsset::new(nodes, meshes, skins, animations)?);
//! let mut world = PoseWorld::default();
//! let key = world.spawn(asset.clone())?;
//!
//! let walk = asset.find_animation("Walk").unwrap();
//! world.get_mut(key).unwrap().mixer.add_action(AnimationAction::new(walk));
//!
//! world.update(1.0 / 60.0)?;
//! let palette = world.get(key).unwrap().instance.joint_matrices(mesh_node);
//! ```

pub mod animation;
pub mod assets;
pub mod errors;
pub mod scene;
pub mod settings;
pub mod world;

pub use animation::{
    AnimationAction, AnimationClip, AnimationMixer, Channel, ChannelTarget, InterpolationMode,
    KeyframeTrack, LoopMode, MorphWeights, TargetPath, TrackData,
};
pub use assets::SceneAsset;
pub use errors::{Result, RigError};
pub use scene::{
    AnimationIndex, MeshIndex, Mesh, Node, NodeIndex, NodeInstance, SamplerIndex, SceneInstance,
    Skin, SkinIndex, Transform,
};
pub use settings::{EvaluatorSettings, HierarchyOrder, WorldSettings};
pub use world::{AnimatedInstance, InstanceKey, PoseWorld};
