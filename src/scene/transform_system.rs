//! Transform System
//!
//! Computes world matrices for a scene instance. Kept apart from
//! [`SceneInstance`](crate::scene::SceneInstance) so it only borrows what it
//! needs: the immutable node array, the per-frame node states and the output
//! buffer.
//!
//! Both entry points make one pass and rely on the parent of every node being
//! evaluated earlier in that pass:
//! - [`evaluate_world_matrices`] walks in index order and checks the
//!   `parent < self` invariant as it goes;
//! - [`evaluate_in_order`] follows a [`TraversalOrder`] validated at load time.

use glam::Mat4;
use log::trace;

use crate::errors::{Result, RigError};
use crate::scene::hierarchy::TraversalOrder;
use crate::scene::node::{Node, NodeInstance};
use crate::scene::transform::compose;

/// World matrix of every node, walking nodes in index order.
///
/// Fails without producing output when a node's parent is out of range or not
/// stored before it, or when `instances` and `nodes` differ in length.
pub fn evaluate_world_matrices(nodes: &[Node], instances: &[NodeInstance]) -> Result<Vec<Mat4>> {
    check_lengths(nodes, instances)?;

    let mut world: Vec<Mat4> = Vec::with_capacity(nodes.len());
    for (i, (node, instance)) in nodes.iter().zip(instances).enumerate() {
        let parent_world = match node.parent {
            None => Mat4::IDENTITY,
            Some(parent) => {
                let parent = parent.index();
                if parent >= nodes.len() {
                    return Err(RigError::dangling(format!("node {i} parent"), parent, nodes.len()));
                }
                // Written already iff parent < i.
                *world
                    .get(parent)
                    .ok_or(RigError::ForwardParentReference { node: i, parent })?
            }
        };
        world.push(compose(&parent_world, &instance.transform));
    }

    Ok(world)
}

/// World matrix of every node following a validated `order`, written into `out`.
///
/// `out` is resized to `nodes.len()`. `order` must have been built from the
/// same `nodes`.
pub fn evaluate_in_order(
    nodes: &[Node],
    order: &TraversalOrder,
    instances: &[NodeInstance],
    out: &mut Vec<Mat4>,
) -> Result<()> {
    check_lengths(nodes, instances)?;
    if order.len() != nodes.len() {
        return Err(RigError::length_mismatch(
            "traversal order vs nodes",
            nodes.len(),
            order.len(),
        ));
    }

    out.clear();
    out.resize(nodes.len(), Mat4::IDENTITY);

    for &handle in order.as_slice() {
        let i = handle.index();
        let parent_world = match nodes[i].parent {
            None => Mat4::IDENTITY,
            Some(parent) => out[parent.index()],
        };
        out[i] = compose(&parent_world, &instances[i].transform);
    }

    trace!("Evaluated {} world matrices", nodes.len());
    Ok(())
}

fn check_lengths(nodes: &[Node], instances: &[NodeInstance]) -> Result<()> {
    if nodes.len() == instances.len() {
        Ok(())
    } else {
        Err(RigError::length_mismatch(
            "node instances vs nodes",
            nodes.len(),
            instances.len(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::NodeIndex;
    use crate::scene::transform::Transform;
    use crate::settings::HierarchyOrder;
    use glam::Vec3;

    fn instances_of(nodes: &[Node]) -> Vec<NodeInstance> {
        nodes.iter().map(NodeInstance::from_node).collect()
    }

    #[test]
    fn test_hierarchy_update() {
        let parent = Node::new(Transform::from_translation(Vec3::new(1.0, 0.0, 0.0)));
        let child = Node::new(Transform::from_translation(Vec3::new(0.0, 1.0, 0.0)))
            .with_parent(NodeIndex::new(0));
        let nodes = vec![parent, child];

        let world = evaluate_world_matrices(&nodes, &instances_of(&nodes)).unwrap();

        let child_world_pos = world[1].w_axis.truncate();
        assert!((child_world_pos.x - 1.0).abs() < 1e-5);
        assert!((child_world_pos.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_forward_reference_rejected_in_index_order() {
        let nodes = vec![
            Node::new(Transform::IDENTITY).with_parent(NodeIndex::new(1)),
            Node::new(Transform::IDENTITY),
        ];

        let err = evaluate_world_matrices(&nodes, &instances_of(&nodes)).unwrap_err();
        assert_eq!(err, RigError::ForwardParentReference { node: 0, parent: 1 });
    }

    #[test]
    fn test_resorted_order_matches_reference() {
        // Child stored before its parent.
        let nodes = vec![
            Node::new(Transform::from_translation(Vec3::X)).with_parent(NodeIndex::new(1)),
            Node::new(Transform::from_translation(Vec3::Y)),
        ];
        let order = TraversalOrder::build(&nodes, HierarchyOrder::Resort).unwrap();

        let mut world = Vec::new();
        evaluate_in_order(&nodes, &order, &instances_of(&nodes), &mut world).unwrap();

        assert_eq!(world[0].w_axis.truncate(), Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(world[1].w_axis.truncate(), Vec3::Y);
    }

    #[test]
    fn test_length_mismatch() {
        let nodes = vec![Node::default(), Node::default()];
        let instances = vec![NodeInstance::default()];
        assert!(matches!(
            evaluate_world_matrices(&nodes, &instances),
            Err(RigError::LengthMismatch { expected: 2, actual: 1, .. })
        ));
    }
}
