use std::sync::Arc;

use glam::Mat4;
use log::trace;

use crate::assets::{SceneAsset, SkinnedMesh};
use crate::errors::{Result, RigError};
use crate::scene::NodeIndex;
use crate::scene::node::NodeInstance;
use crate::scene::skin::evaluate_skin_into;
use crate::scene::transform_system::evaluate_in_order;
use crate::settings::EvaluatorSettings;

/// Smallest `|det| / (|x| * |y| * |z|)` of a mesh node's basis axes accepted
/// as invertible. Relative to the axis lengths, so uniformly small scales pass.
const SINGULAR_EPSILON: f32 = 1e-6;

/// One playing copy of a [`SceneAsset`].
///
/// Owns everything that changes per frame: node states, world matrices and
/// one joint palette per skinned mesh. The asset itself is shared read-only,
/// so instances can be evaluated on different threads.
#[derive(Debug, Clone)]
pub struct SceneInstance {
    asset: Arc<SceneAsset>,
    nodes: Vec<NodeInstance>,
    world_matrices: Vec<Mat4>,
    // Parallel to `asset.skinned_meshes()`
    joint_palettes: Vec<Vec<Mat4>>,
}

impl SceneInstance {
    /// Creates an instance in rest pose with matrices already evaluated.
    pub fn new(asset: Arc<SceneAsset>) -> Result<Self> {
        let nodes = asset.nodes().iter().map(NodeInstance::from_node).collect();
        let joint_palettes = asset
            .skinned_meshes()
            .iter()
            .map(|sm| Vec::with_capacity(asset.skins()[sm.skin.index()].joint_count()))
            .collect();

        let mut instance = Self {
            asset,
            nodes,
            world_matrices: Vec::new(),
            joint_palettes,
        };
        instance.evaluate()?;
        Ok(instance)
    }

    #[inline]
    #[must_use]
    pub fn asset(&self) -> &Arc<SceneAsset> {
        &self.asset
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &EvaluatorSettings {
        self.asset.settings()
    }

    // ========================================================================
    // Node state
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[NodeInstance] {
        &self.nodes
    }

    #[inline]
    pub fn nodes_mut(&mut self) -> &mut [NodeInstance] {
        &mut self.nodes
    }

    pub fn node(&self, index: NodeIndex) -> Result<&NodeInstance> {
        self.nodes
            .get(index.index())
            .ok_or(RigError::UnknownNode(index.index()))
    }

    pub fn node_mut(&mut self, index: NodeIndex) -> Result<&mut NodeInstance> {
        self.nodes
            .get_mut(index.index())
            .ok_or(RigError::UnknownNode(index.index()))
    }

    /// Restores every node to the asset's rest pose.
    pub fn reset_pose(&mut self) {
        for (state, node) in self.nodes.iter_mut().zip(self.asset.nodes()) {
            state.reset(node);
        }
    }

    // ========================================================================
    // Evaluation
    // ========================================================================

    /// Recomputes world matrices, then every joint palette.
    pub fn evaluate(&mut self) -> Result<()> {
        self.update_world_matrices()?;
        self.update_skins()
    }

    pub fn update_world_matrices(&mut self) -> Result<()> {
        evaluate_in_order(
            self.asset.nodes(),
            self.asset.traversal_order(),
            &self.nodes,
            &mut self.world_matrices,
        )
    }

    /// Recomputes the joint palette of every skinned mesh from the current
    /// world matrices.
    ///
    /// Each palette is relative to its mesh node: the inverse of the mesh
    /// node's world matrix is always applied, and is simply identity when that
    /// node sits at the origin of world space.
    ///
    /// Every mesh node is inverted before any palette is written. On error all
    /// palettes are left empty.
    pub fn update_skins(&mut self) -> Result<()> {
        let result = self.write_palettes();
        if result.is_err() {
            for palette in &mut self.joint_palettes {
                palette.clear();
            }
        }
        result
    }

    fn write_palettes(&mut self) -> Result<()> {
        let asset = &self.asset;
        let world_matrices = &self.world_matrices;

        let mesh_inverses = asset
            .skinned_meshes()
            .iter()
            .map(|binding| {
                let node = binding.node.index();
                invert_mesh_world(&world_matrices[node]).ok_or(RigError::SingularMeshTransform { node })
            })
            .collect::<Result<Vec<Mat4>>>()?;

        let bindings = asset.skinned_meshes().iter().zip(&mesh_inverses);
        for ((binding, mesh_world_inverse), palette) in bindings.zip(&mut self.joint_palettes) {
            let skin = &asset.skins()[binding.skin.index()];
            evaluate_skin_into(skin, world_matrices, mesh_world_inverse, palette)?;
        }

        trace!("Evaluated {} joint palettes", self.joint_palettes.len());
        Ok(())
    }

    // ========================================================================
    // Output
    // ========================================================================

    /// World matrix per node, in node order.
    #[inline]
    #[must_use]
    pub fn world_matrices(&self) -> &[Mat4] {
        &self.world_matrices
    }

    pub fn world_matrix(&self, index: NodeIndex) -> Result<&Mat4> {
        self.world_matrices
            .get(index.index())
            .ok_or(RigError::UnknownNode(index.index()))
    }

    /// Skinned meshes and their joint palettes, in node order.
    pub fn skinned_palettes(&self) -> impl Iterator<Item = (&SkinnedMesh, &[Mat4])> {
        self.asset
            .skinned_meshes()
            .iter()
            .zip(self.joint_palettes.iter().map(Vec::as_slice))
    }

    /// Joint palette of the skinned mesh drawn by `node`.
    #[must_use]
    pub fn joint_matrices(&self, node: NodeIndex) -> Option<&[Mat4]> {
        self.skinned_palettes()
            .find(|(binding, _)| binding.node == node)
            .map(|(_, palette)| palette)
    }

    /// Joint palette of `node` as raw bytes, ready for a GPU buffer upload.
    #[must_use]
    pub fn joint_matrix_bytes(&self, node: NodeIndex) -> Option<&[u8]> {
        self.joint_matrices(node).map(bytemuck::cast_slice)
    }
}

/// Inverse of a mesh node's world matrix, or `None` when it is singular.
///
/// The determinant is compared against the product of the basis axis lengths,
/// which measures how far the axes are from collapsing onto a plane
/// independently of their scale.
fn invert_mesh_world(world: &Mat4) -> Option<Mat4> {
    let axes_volume = world.x_axis.truncate().length()
        * world.y_axis.truncate().length()
        * world.z_axis.truncate().length();
    let det = world.determinant();

    if !axes_volume.is_finite() || axes_volume <= 0.0 || det.abs() <= SINGULAR_EPSILON * axes_volume {
        return None;
    }

    let inverse = world.inverse();
    inverse.is_finite().then_some(inverse)
}
