//! Hierarchy validation tests
//!
//! Tests for:
//! - TraversalOrder under Strict and Resort policies
//! - Cycle and dangling parent detection
//! - Building parents from glTF children lists

use rigpose::errors::RigError;
use rigpose::scene::NodeIndex;
use rigpose::scene::hierarchy::{TraversalOrder, parents_from_children};
use rigpose::scene::node::Node;
use rigpose::settings::HierarchyOrder;

fn with_parents(parents: &[Option<usize>]) -> Vec<Node> {
    parents
        .iter()
        .map(|p| {
            let node = Node::default();
            match p {
                Some(p) => node.with_parent(NodeIndex::new(*p)),
                None => node,
            }
        })
        .collect()
}

fn position(order: &TraversalOrder, node: usize) -> usize {
    order
        .as_slice()
        .iter()
        .position(|n| n.index() == node)
        .unwrap()
}

// ============================================================================
// TraversalOrder
// ============================================================================

#[test]
fn index_ordered_forest_keeps_identity_order() {
    let nodes = with_parents(&[None, Some(0), Some(0), None, Some(3), Some(2)]);

    for policy in [HierarchyOrder::Strict, HierarchyOrder::Resort] {
        let order = TraversalOrder::build(&nodes, policy).unwrap();
        assert!(order.is_index_ordered());
        let indices: Vec<usize> = order.as_slice().iter().map(|n| n.index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
    }
}

#[test]
fn strict_rejects_forward_reference() {
    let nodes = with_parents(&[Some(2), None, Some(1)]);
    let err = TraversalOrder::build(&nodes, HierarchyOrder::Strict).unwrap_err();
    assert_eq!(err, RigError::ForwardParentReference { node: 0, parent: 2 });
    assert!(err.is_data_integrity());
}

#[test]
fn resort_puts_parents_first() {
    let nodes = with_parents(&[Some(2), None, Some(1), Some(0)]);
    let order = TraversalOrder::build(&nodes, HierarchyOrder::Resort).unwrap();

    assert_eq!(order.len(), 4);
    for (child, node) in nodes.iter().enumerate() {
        if let Some(parent) = node.parent {
            assert!(position(&order, parent.index()) < position(&order, child));
        }
    }
}

#[test]
fn resort_rejects_cycle() {
    // 0 is a root; 1 and 2 point at each other.
    let nodes = with_parents(&[None, Some(2), Some(1)]);
    let err = TraversalOrder::build(&nodes, HierarchyOrder::Resort).unwrap_err();
    assert!(matches!(err, RigError::HierarchyCycle { node: 1 | 2 }), "{err:?}");
}

#[test]
fn resort_rejects_self_parent() {
    let nodes = with_parents(&[Some(0)]);
    let err = TraversalOrder::build(&nodes, HierarchyOrder::Resort).unwrap_err();
    assert_eq!(err, RigError::HierarchyCycle { node: 0 });
}

#[test]
fn dangling_parent_rejected() {
    let nodes = with_parents(&[None, Some(9)]);
    let err = TraversalOrder::build(&nodes, HierarchyOrder::Resort).unwrap_err();
    assert!(matches!(
        err,
        RigError::DanglingReference { index: 9, len: 2, .. }
    ));
}

#[test]
fn empty_hierarchy_is_valid() {
    let order = TraversalOrder::build(&[], HierarchyOrder::Strict).unwrap();
    assert!(order.is_empty());
}

// ============================================================================
// parents_from_children
// ============================================================================

#[test]
fn parents_from_children_lists() {
    let parents = parents_from_children(&[vec![1, 2], vec![3], vec![], vec![]]).unwrap();
    assert_eq!(
        parents,
        vec![
            None,
            Some(NodeIndex::new(0)),
            Some(NodeIndex::new(0)),
            Some(NodeIndex::new(1)),
        ]
    );
}

#[test]
fn parents_from_children_rejects_two_parents() {
    let err = parents_from_children(&[vec![2], vec![2], vec![]]).unwrap_err();
    assert_eq!(
        err,
        RigError::MultipleParents {
            child: 2,
            first: 0,
            second: 1
        }
    );
}

#[test]
fn parents_from_children_rejects_out_of_range_child() {
    let err = parents_from_children(&[vec![5]]).unwrap_err();
    assert!(matches!(err, RigError::DanglingReference { index: 5, len: 1, .. }));
}

#[test]
fn parents_from_children_rejects_self_child() {
    let err = parents_from_children(&[vec![0]]).unwrap_err();
    assert_eq!(err, RigError::HierarchyCycle { node: 0 });
}
