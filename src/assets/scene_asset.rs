use log::debug;

use crate::animation::clip::{AnimationClip, TrackData};
use crate::errors::{Result, RigError};
use crate::scene::hierarchy::TraversalOrder;
use crate::scene::mesh::Mesh;
use crate::scene::node::Node;
use crate::scene::skin::Skin;
use crate::scene::{AnimationIndex, MeshIndex, NodeIndex, SkinIndex};
use crate::settings::EvaluatorSettings;

/// A node that draws a skinned mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkinnedMesh {
    pub node: NodeIndex,
    pub mesh: MeshIndex,
    pub skin: SkinIndex,
}

/// Immutable, validated scene data, shared by every instance playing it.
///
/// Building a `SceneAsset` is where data-integrity faults surface: every
/// cross reference, array length and the hierarchy ordering are checked once
/// here, and instances rely on them afterwards.
#[derive(Debug)]
pub struct SceneAsset {
    nodes: Vec<Node>,
    meshes: Vec<Mesh>,
    skins: Vec<Skin>,
    animations: Vec<AnimationClip>,

    traversal_order: TraversalOrder,
    skinned_meshes: Vec<SkinnedMesh>,
    settings: EvaluatorSettings,
}

impl SceneAsset {
    /// Validates and assembles an asset with default settings.
    pub fn new(
        nodes: Vec<Node>,
        meshes: Vec<Mesh>,
        skins: Vec<Skin>,
        animations: Vec<AnimationClip>,
    ) -> Result<Self> {
        Self::with_settings(nodes, meshes, skins, animations, EvaluatorSettings::default())
    }

    pub fn with_settings(
        mut nodes: Vec<Node>,
        meshes: Vec<Mesh>,
        skins: Vec<Skin>,
        animations: Vec<AnimationClip>,
        settings: EvaluatorSettings,
    ) -> Result<Self> {
        let node_count = nodes.len();

        for (i, mesh) in meshes.iter().enumerate() {
            mesh.validate(i)?;
        }
        for (i, skin) in skins.iter().enumerate() {
            skin.validate(i, node_count)?;
        }

        let traversal_order = TraversalOrder::build(&nodes, settings.hierarchy_order)?;

        let mut skinned_meshes = Vec::new();
        for (i, node) in nodes.iter_mut().enumerate() {
            let mesh = match node.mesh {
                Some(m) => Some(meshes.get(m.index()).ok_or_else(|| {
                    RigError::dangling(format!("node {i} mesh"), m.index(), meshes.len())
                })?),
                None => None,
            };

            if let Some(s) = node.skin
                && s.index() >= skins.len()
            {
                return Err(RigError::dangling(format!("node {i} skin"), s.index(), skins.len()));
            }

            let Some(mesh) = mesh else { continue };

            // Default weights come from the mesh's morph target count.
            if node.weights.is_empty() {
                node.weights.0.resize(mesh.morph_target_count, 0.0);
            } else if node.weights.len() != mesh.morph_target_count {
                return Err(RigError::MorphWeightCountMismatch {
                    node: i,
                    expected: mesh.morph_target_count,
                    actual: node.weights.len(),
                });
            }

            if let (Some(mesh_index), Some(skin_index)) = (node.mesh, node.skin) {
                let joint_count = skins[skin_index.index()].joint_count();
                if let Some(joint) = mesh.max_joint_slot()
                    && joint >= joint_count
                {
                    return Err(RigError::InvalidJointIndex {
                        mesh: mesh_index.index(),
                        skin: skin_index.index(),
                        joint,
                        joint_count,
                    });
                }
                skinned_meshes.push(SkinnedMesh {
                    node: NodeIndex::new(i),
                    mesh: mesh_index,
                    skin: skin_index,
                });
            }
        }

        for clip in &animations {
            validate_clip_targets(clip, &nodes)?;
        }

        debug!(
            "Scene asset: {} nodes, {} meshes, {} skins, {} animations, {} skinned meshes",
            nodes.len(),
            meshes.len(),
            skins.len(),
            animations.len(),
            skinned_meshes.len()
        );

        Ok(Self {
            nodes,
            meshes,
            skins,
            animations,
            traversal_order,
            skinned_meshes,
            settings,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, index: NodeIndex) -> Result<&Node> {
        self.nodes
            .get(index.index())
            .ok_or(RigError::UnknownNode(index.index()))
    }

    #[inline]
    #[must_use]
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    #[inline]
    #[must_use]
    pub fn mesh(&self, index: MeshIndex) -> Option<&Mesh> {
        self.meshes.get(index.index())
    }

    #[inline]
    #[must_use]
    pub fn skins(&self) -> &[Skin] {
        &self.skins
    }

    #[inline]
    #[must_use]
    pub fn skin(&self, index: SkinIndex) -> Option<&Skin> {
        self.skins.get(index.index())
    }

    #[inline]
    #[must_use]
    pub fn animations(&self) -> &[AnimationClip] {
        &self.animations
    }

    /// Looks up an animation; a missing one is a programmer error surfaced as
    /// [`RigError::UnknownAnimation`].
    pub fn animation(&self, index: AnimationIndex) -> Result<&AnimationClip> {
        self.animations
            .get(index.index())
            .ok_or(RigError::UnknownAnimation(index.index()))
    }

    #[must_use]
    pub fn find_animation(&self, name: &str) -> Option<AnimationIndex> {
        self.animations
            .iter()
            .position(|clip| clip.name() == name)
            .map(AnimationIndex::new)
    }

    #[must_use]
    pub fn find_node(&self, name: &str) -> Option<NodeIndex> {
        self.nodes
            .iter()
            .position(|node| node.name.as_deref() == Some(name))
            .map(NodeIndex::new)
    }

    #[inline]
    #[must_use]
    pub fn traversal_order(&self) -> &TraversalOrder {
        &self.traversal_order
    }

    /// Nodes carrying both a mesh and a skin, in node order.
    #[inline]
    #[must_use]
    pub fn skinned_meshes(&self) -> &[SkinnedMesh] {
        &self.skinned_meshes
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &EvaluatorSettings {
        &self.settings
    }
}

fn validate_clip_targets(clip: &AnimationClip, nodes: &[Node]) -> Result<()> {
    for (i, channel) in clip.channels().iter().enumerate() {
        let node_index = channel.target.node.index();
        let node = nodes.get(node_index).ok_or_else(|| {
            RigError::dangling(
                format!("animation '{}' channel {i} target node", clip.name()),
                node_index,
                nodes.len(),
            )
        })?;

        if let TrackData::MorphWeights(track) = clip.sampler_for(channel)
            && track.arity() != node.weights.len()
        {
            return Err(RigError::MorphWeightCountMismatch {
                node: node_index,
                expected: node.weights.len(),
                actual: track.arity(),
            });
        }
    }
    Ok(())
}
