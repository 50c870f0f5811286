//! Hierarchy validation and traversal order
//!
//! World matrix evaluation is a single pass that must visit every parent
//! before its children. Assets exported with parents stored before children
//! satisfy this by index order; others need a precomputed order. Both cases
//! are checked here, once, when the asset is built.

use log::debug;

use crate::errors::{Result, RigError};
use crate::scene::NodeIndex;
use crate::scene::node::Node;
use crate::settings::HierarchyOrder;

/// A validated parent-before-child visiting order over an asset's nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalOrder {
    order: Vec<NodeIndex>,
    index_ordered: bool,
}

impl TraversalOrder {
    /// Validates the parent relation of `nodes` and builds a visiting order.
    ///
    /// - Out-of-range parents fail with [`RigError::DanglingReference`].
    /// - With [`HierarchyOrder::Strict`], a parent index not smaller than its
    ///   child's fails with [`RigError::ForwardParentReference`].
    /// - With [`HierarchyOrder::Resort`], such nodes are reordered; cycles
    ///   (including self-parenting) fail with [`RigError::HierarchyCycle`].
    pub fn build(nodes: &[Node], policy: HierarchyOrder) -> Result<Self> {
        let count = nodes.len();

        let mut first_forward = None;
        for (i, node) in nodes.iter().enumerate() {
            let Some(parent) = node.parent else { continue };
            let parent = parent.index();
            if parent >= count {
                return Err(RigError::dangling(format!("node {i} parent"), parent, count));
            }
            if parent >= i && first_forward.is_none() {
                first_forward = Some((i, parent));
            }
        }

        let Some((node, parent)) = first_forward else {
            return Ok(Self {
                order: (0..count).map(NodeIndex::new).collect(),
                index_ordered: true,
            });
        };

        match policy {
            HierarchyOrder::Strict => Err(RigError::ForwardParentReference { node, parent }),
            HierarchyOrder::Resort => {
                let order = topological_order(nodes)?;
                debug!("Node hierarchy is not index-ordered; resorted {count} nodes");
                Ok(Self {
                    order,
                    index_ordered: false,
                })
            }
        }
    }

    /// Node indices, each parent before its children.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[NodeIndex] {
        &self.order
    }

    /// `true` when the order is simply `0..len`.
    #[inline]
    #[must_use]
    pub fn is_index_ordered(&self) -> bool {
        self.index_ordered
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Breadth-first (Kahn) ordering. Parents must already be range-checked.
fn topological_order(nodes: &[Node]) -> Result<Vec<NodeIndex>> {
    let count = nodes.len();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut order: Vec<NodeIndex> = Vec::with_capacity(count);
    for (i, node) in nodes.iter().enumerate() {
        match node.parent {
            Some(parent) => children[parent.index()].push(i),
            None => order.push(NodeIndex::new(i)),
        }
    }

    let mut head = 0;
    while head < order.len() {
        let current = order[head].index();
        head += 1;
        order.extend(children[current].iter().copied().map(NodeIndex::new));
    }

    if order.len() != count {
        // Every node not reached from a root hangs off a cycle.
        let mut visited = vec![false; count];
        for node in &order {
            visited[node.index()] = true;
        }
        let node = visited.iter().position(|v| !v).unwrap_or_default();
        return Err(RigError::HierarchyCycle { node });
    }

    Ok(order)
}

/// Builds each node's parent from glTF-style `children` lists.
///
/// `children[i]` lists the children of node `i`. A node listed under two
/// parents, or a child index out of range, is rejected.
pub fn parents_from_children(children: &[Vec<usize>]) -> Result<Vec<Option<NodeIndex>>> {
    let count = children.len();
    let mut parents: Vec<Option<NodeIndex>> = vec![None; count];

    for (parent, list) in children.iter().enumerate() {
        for &child in list {
            if child >= count {
                return Err(RigError::dangling(format!("node {parent} child"), child, count));
            }
            if child == parent {
                return Err(RigError::HierarchyCycle { node: child });
            }
            if let Some(first) = parents[child] {
                return Err(RigError::MultipleParents {
                    child,
                    first: first.index(),
                    second: parent,
                });
            }
            parents[child] = Some(NodeIndex::new(parent));
        }
    }

    Ok(parents)
}
