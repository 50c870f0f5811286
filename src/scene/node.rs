use crate::animation::values::MorphWeights;
use crate::scene::transform::Transform;
use crate::scene::{MeshIndex, NodeIndex, SkinIndex};

/// An immutable scene node, as produced by the asset loader.
///
/// # Hierarchy
///
/// `parent` is `None` for roots. The parent relation must form a forest; the
/// asset validates this once and computes a parent-before-child traversal
/// order (see [`TraversalOrder`](crate::scene::TraversalOrder)).
///
/// # Rest pose
///
/// `transform` and `weights` hold the rest pose. Per-frame values live in the
/// instance's [`NodeInstance`] array and start from these.
#[derive(Debug, Clone, Default)]
pub struct Node {
    pub name: Option<String>,
    pub parent: Option<NodeIndex>,
    pub mesh: Option<MeshIndex>,
    pub skin: Option<SkinIndex>,
    pub transform: Transform,
    /// Default morph target weights. Empty when the node's mesh has no targets.
    pub weights: MorphWeights,
}

impl Node {
    #[must_use]
    pub fn new(transform: Transform) -> Self {
        Self {
            transform,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent: NodeIndex) -> Self {
        self.parent = Some(parent);
        self
    }

    #[must_use]
    pub fn with_mesh(mut self, mesh: MeshIndex) -> Self {
        self.mesh = Some(mesh);
        self
    }

    #[must_use]
    pub fn with_skin(mut self, skin: SkinIndex) -> Self {
        self.skin = Some(skin);
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_weights(mut self, weights: impl Into<MorphWeights>) -> Self {
        self.weights = weights.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Mutable per-frame state of one node within one scene instance.
///
/// Written by the animation mixer, read by the transform system.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeInstance {
    pub transform: Transform,
    pub weights: MorphWeights,
}

impl NodeInstance {
    /// Rest-pose state of `node`.
    #[must_use]
    pub fn from_node(node: &Node) -> Self {
        Self {
            transform: node.transform,
            weights: node.weights.clone(),
        }
    }

    /// Restores the rest pose without reallocating the weight array.
    pub fn reset(&mut self, node: &Node) {
        self.transform = node.transform;
        self.weights.clone_from(&node.weights);
    }
}
