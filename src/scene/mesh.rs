use glam::{Vec2, Vec3, Vec4};

use crate::errors::{Result, RigError};

/// Immutable vertex and index buffers of one triangle-list primitive.
///
/// Optional attributes are empty when absent. When present, every attribute
/// has one element per position.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub texcoords_0: Vec<Vec2>,
    /// Skin weights per vertex (`WEIGHTS_0`).
    pub weights_0: Vec<Vec4>,
    /// Joint slots per vertex (`JOINTS_0`), indexing into the skin's joint list.
    pub joints_0: Vec<[u16; 4]>,
    pub indices: Vec<u32>,
    /// Number of morph targets, i.e. the length of this mesh's weight arrays.
    pub morph_target_count: usize,
}

impl Mesh {
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    #[must_use]
    pub fn is_skinned(&self) -> bool {
        !self.joints_0.is_empty()
    }

    /// Highest joint slot referenced by a vertex with non-zero weight.
    #[must_use]
    pub fn max_joint_slot(&self) -> Option<usize> {
        self.joints_0
            .iter()
            .zip(self.weights_0.iter())
            .flat_map(|(joints, weights)| {
                joints
                    .iter()
                    .zip(weights.to_array())
                    .filter(|(_, w)| *w != 0.0)
                    .map(|(&j, _)| usize::from(j))
            })
            .max()
    }

    /// Checks attribute lengths and index bounds.
    pub fn validate(&self, mesh_index: usize) -> Result<()> {
        let count = self.vertex_count();

        let optional = [
            ("normals", self.normals.len()),
            ("texcoords_0", self.texcoords_0.len()),
            ("weights_0", self.weights_0.len()),
            ("joints_0", self.joints_0.len()),
        ];
        for (name, len) in optional {
            if len != 0 && len != count {
                return Err(RigError::length_mismatch(
                    format!("mesh {mesh_index} {name} vs positions"),
                    count,
                    len,
                ));
            }
        }

        if self.joints_0.len() != self.weights_0.len() {
            return Err(RigError::length_mismatch(
                format!("mesh {mesh_index} joints_0 vs weights_0"),
                self.weights_0.len(),
                self.joints_0.len(),
            ));
        }

        if self.indices.len() % 3 != 0 {
            return Err(RigError::length_mismatch(
                format!("mesh {mesh_index} index count (triangle list)"),
                self.indices.len() - self.indices.len() % 3,
                self.indices.len(),
            ));
        }

        if let Some(&bad) = self.indices.iter().find(|&&i| i as usize >= count) {
            return Err(RigError::dangling(
                format!("mesh {mesh_index} index buffer"),
                bad as usize,
                count,
            ));
        }

        Ok(())
    }
}
