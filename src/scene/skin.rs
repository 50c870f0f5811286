use glam::Mat4;

use crate::errors::{Result, RigError};
use crate::scene::NodeIndex;

#[derive(Debug, Clone)]
pub struct Skin {
    pub name: Option<String>,

    /// Common root of the joint hierarchy, if the asset names one.
    pub skeleton: Option<NodeIndex>,

    // Joint list: ordered, joints[i] is joint slot i in the vertex attributes
    joints: Vec<NodeIndex>,

    // Static after load. Transforms mesh-space positions into the joint's
    // bind-pose local space.
    inverse_bind_matrices: Vec<Mat4>,
}

impl Skin {
    /// Creates a skin. `joints` and `inverse_bind_matrices` must have equal length.
    pub fn new(joints: Vec<NodeIndex>, inverse_bind_matrices: Vec<Mat4>) -> Result<Self> {
        if joints.len() != inverse_bind_matrices.len() {
            return Err(RigError::length_mismatch(
                "skin joints vs inverse bind matrices",
                joints.len(),
                inverse_bind_matrices.len(),
            ));
        }

        Ok(Self {
            name: None,
            skeleton: None,
            joints,
            inverse_bind_matrices,
        })
    }

    /// A skin without inverse-bind matrices; every one defaults to identity.
    #[must_use]
    pub fn with_identity_bind(joints: Vec<NodeIndex>) -> Self {
        let count = joints.len();
        Self {
            name: None,
            skeleton: None,
            joints,
            inverse_bind_matrices: vec![Mat4::IDENTITY; count],
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_skeleton(mut self, skeleton: NodeIndex) -> Self {
        self.skeleton = Some(skeleton);
        self
    }

    #[inline]
    #[must_use]
    pub fn joints(&self) -> &[NodeIndex] {
        &self.joints
    }

    #[inline]
    #[must_use]
    pub fn inverse_bind_matrices(&self) -> &[Mat4] {
        &self.inverse_bind_matrices
    }

    #[inline]
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Checks every joint (and the skeleton root) against `node_count`.
    pub fn validate(&self, skin_index: usize, node_count: usize) -> Result<()> {
        for (slot, joint) in self.joints.iter().enumerate() {
            if joint.index() >= node_count {
                return Err(RigError::dangling(
                    format!("skin {skin_index} joint slot {slot}"),
                    joint.index(),
                    node_count,
                ));
            }
        }
        if let Some(root) = self.skeleton
            && root.index() >= node_count
        {
            return Err(RigError::dangling(
                format!("skin {skin_index} skeleton root"),
                root.index(),
                node_count,
            ));
        }
        Ok(())
    }
}

/// Computes the joint matrix palette of `skin`.
///
/// `joint[j] = mesh_node_world_inverse * world[joints[j]] * inverse_bind[j]`
///
/// `mesh_node_world_inverse` is the inverse world matrix of the node that owns
/// the skinned mesh. It cancels the mesh node's own transform, which the
/// renderer applies on top of skinning. Pass [`Mat4::IDENTITY`] when the mesh
/// node's world matrix is identity.
pub fn evaluate_skin(
    skin: &Skin,
    world_matrices: &[Mat4],
    mesh_node_world_inverse: &Mat4,
) -> Result<Vec<Mat4>> {
    let mut palette = Vec::with_capacity(skin.joint_count());
    evaluate_skin_into(skin, world_matrices, mesh_node_world_inverse, &mut palette)?;
    Ok(palette)
}

/// Same as [`evaluate_skin`], reusing `out`'s allocation.
///
/// On error `out` is left empty, never partially filled.
pub fn evaluate_skin_into(
    skin: &Skin,
    world_matrices: &[Mat4],
    mesh_node_world_inverse: &Mat4,
    out: &mut Vec<Mat4>,
) -> Result<()> {
    out.clear();

    for (joint, ibm) in skin.joints.iter().zip(&skin.inverse_bind_matrices) {
        let Some(joint_world) = world_matrices.get(joint.index()) else {
            out.clear();
            return Err(RigError::dangling(
                "skin joint world matrix",
                joint.index(),
                world_matrices.len(),
            ));
        };

        // Order matters: IBM takes the vertex into joint bind space, the joint's
        // current world matrix poses it, the mesh node inverse returns to mesh space.
        out.push(*mesh_node_world_inverse * *joint_world * *ibm);
    }

    Ok(())
}
