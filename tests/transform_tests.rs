//! Transform and TransformSystem tests
//!
//! Tests for:
//! - Transform TRS matrix construction and composition order
//! - Rotation normalization
//! - Matrix decomposition
//! - Hierarchical matrix propagation (index order and resorted order)

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Quat, Vec3};
use rigpose::scene::hierarchy::TraversalOrder;
use rigpose::scene::node::{Node, NodeInstance};
use rigpose::scene::transform::{Transform, compose, normalize_rotation, to_matrix};
use rigpose::scene::transform_system::{evaluate_in_order, evaluate_world_matrices};
use rigpose::scene::NodeIndex;
use rigpose::settings::HierarchyOrder;

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
}

fn mat4_approx(a: &Mat4, b: &Mat4) -> bool {
    a.to_cols_array()
        .iter()
        .zip(b.to_cols_array())
        .all(|(x, y)| approx_eq(*x, y))
}

fn instances_of(nodes: &[Node]) -> Vec<NodeInstance> {
    nodes.iter().map(NodeInstance::from_node).collect()
}

// ============================================================================
// Transform Unit Tests
// ============================================================================

#[test]
fn transform_default_is_identity() {
    let t = Transform::default();
    assert_eq!(t.translation, Vec3::ZERO);
    assert_eq!(t.rotation, Quat::IDENTITY);
    assert_eq!(t.scale, Vec3::ONE);
    assert_eq!(t.to_matrix(), Mat4::IDENTITY);
}

#[test]
fn transform_matrix_applies_scale_then_rotation_then_translation() {
    let t = Transform::new(
        Vec3::new(10.0, 0.0, 0.0),
        Quat::from_rotation_z(FRAC_PI_2),
        Vec3::splat(2.0),
    );

    // (1,0,0) -> scale (2,0,0) -> rotate 90° about Z (0,2,0) -> translate (10,2,0)
    let p = t.to_matrix().transform_point3(Vec3::X);
    assert!(vec3_approx(p, Vec3::new(10.0, 2.0, 0.0)), "got {p}");
}

#[test]
fn to_matrix_matches_explicit_product() {
    let translation = Vec3::new(1.0, 2.0, 3.0);
    let rotation = Quat::from_rotation_y(0.7);
    let scale = Vec3::new(1.0, 2.0, 0.5);

    let expected = Mat4::from_translation(translation)
        * Mat4::from_quat(rotation)
        * Mat4::from_scale(scale);
    assert!(mat4_approx(&to_matrix(translation, rotation, scale), &expected));
}

#[test]
fn compose_with_identity_parent_is_local_matrix() {
    let local = Transform::from_translation(Vec3::new(4.0, 5.0, 6.0));
    assert_eq!(compose(&Mat4::IDENTITY, &local), local.to_matrix());
}

#[test]
fn compose_multiplies_parent_on_the_left() {
    let parent = Mat4::from_rotation_z(FRAC_PI_2);
    let local = Transform::from_translation(Vec3::X);

    let world = local.compose(&parent);
    // Child offset along parent's rotated X axis.
    assert!(vec3_approx(world.w_axis.truncate(), Vec3::Y));
}

#[test]
fn non_unit_rotation_is_normalized() {
    let q = Quat::from_rotation_x(0.5);
    let scaled = Quat::from_xyzw(q.x * 3.0, q.y * 3.0, q.z * 3.0, q.w * 3.0);

    let a = to_matrix(Vec3::ZERO, q, Vec3::ONE);
    let b = to_matrix(Vec3::ZERO, scaled, Vec3::ONE);
    assert!(mat4_approx(&a, &b));
}

#[test]
fn degenerate_rotation_becomes_identity() {
    assert_eq!(normalize_rotation(Quat::from_xyzw(0.0, 0.0, 0.0, 0.0)), Quat::IDENTITY);
    assert_eq!(
        normalize_rotation(Quat::from_xyzw(f32::NAN, 0.0, 0.0, 1.0)),
        Quat::IDENTITY
    );
}

#[test]
fn from_matrix_round_trips_trs() {
    let t = Transform::new(
        Vec3::new(-1.0, 2.0, 0.5),
        Quat::from_rotation_y(1.2),
        Vec3::new(2.0, 3.0, 4.0),
    );
    let back = Transform::from_matrix(&t.to_matrix());

    assert!(vec3_approx(back.translation, t.translation));
    assert!(vec3_approx(back.scale, t.scale));
    assert!(back.rotation.dot(t.rotation).abs() > 1.0 - 1e-5);
}

// ============================================================================
// Hierarchy propagation
// ============================================================================

#[test]
fn three_node_chain_accumulates_translation() {
    let step = Transform::from_translation(Vec3::new(1.0, 0.0, 0.0));
    let nodes = vec![
        Node::new(step),
        Node::new(step).with_parent(NodeIndex::new(0)),
        Node::new(step).with_parent(NodeIndex::new(1)),
    ];

    let world = evaluate_world_matrices(&nodes, &instances_of(&nodes)).unwrap();

    assert!(vec3_approx(world[0].w_axis.truncate(), Vec3::new(1.0, 0.0, 0.0)));
    assert!(vec3_approx(world[1].w_axis.truncate(), Vec3::new(2.0, 0.0, 0.0)));
    assert!(vec3_approx(world[2].w_axis.truncate(), Vec3::new(3.0, 0.0, 0.0)));
}

#[test]
fn world_equals_parent_world_times_local() {
    let nodes = vec![
        Node::new(Transform::new(
            Vec3::new(0.0, 1.0, 0.0),
            Quat::from_rotation_x(0.3),
            Vec3::splat(2.0),
        )),
        Node::new(Transform::new(
            Vec3::new(1.0, 0.0, 2.0),
            Quat::from_rotation_z(-0.8),
            Vec3::new(1.0, 0.5, 1.0),
        ))
        .with_parent(NodeIndex::new(0)),
        Node::new(Transform::from_scale(Vec3::splat(3.0))),
        Node::new(Transform::from_rotation(Quat::from_rotation_y(2.0))).with_parent(NodeIndex::new(2)),
        Node::new(Transform::from_translation(Vec3::NEG_Z)).with_parent(NodeIndex::new(1)),
    ];

    let world = evaluate_world_matrices(&nodes, &instances_of(&nodes)).unwrap();

    for (i, node) in nodes.iter().enumerate() {
        let expected = match node.parent {
            None => node.transform.to_matrix(),
            Some(p) => world[p.index()] * node.transform.to_matrix(),
        };
        assert!(mat4_approx(&world[i], &expected), "node {i}");
    }
}

#[test]
fn instance_state_overrides_rest_pose() {
    let nodes = vec![Node::new(Transform::from_translation(Vec3::X))];
    let mut instances = instances_of(&nodes);
    instances[0].transform.translation = Vec3::new(0.0, 0.0, 7.0);

    let world = evaluate_world_matrices(&nodes, &instances).unwrap();
    assert!(vec3_approx(world[0].w_axis.truncate(), Vec3::new(0.0, 0.0, 7.0)));
}

#[test]
fn resorted_evaluation_matches_index_ordered_equivalent() {
    // Same tree stored in two orders: 0 <- 1 <- 2 and reversed.
    let a = Transform::from_translation(Vec3::X);
    let b = Transform::from_rotation(Quat::from_rotation_z(FRAC_PI_2));
    let c = Transform::from_translation(Vec3::new(0.0, 2.0, 0.0));

    let ordered = vec![
        Node::new(a),
        Node::new(b).with_parent(NodeIndex::new(0)),
        Node::new(c).with_parent(NodeIndex::new(1)),
    ];
    let reversed = vec![
        Node::new(c).with_parent(NodeIndex::new(1)),
        Node::new(b).with_parent(NodeIndex::new(2)),
        Node::new(a),
    ];

    let expected = evaluate_world_matrices(&ordered, &instances_of(&ordered)).unwrap();

    let order = TraversalOrder::build(&reversed, HierarchyOrder::Resort).unwrap();
    assert!(!order.is_index_ordered());
    let mut world = Vec::new();
    evaluate_in_order(&reversed, &order, &instances_of(&reversed), &mut world).unwrap();

    assert!(mat4_approx(&world[0], &expected[2]));
    assert!(mat4_approx(&world[1], &expected[1]));
    assert!(mat4_approx(&world[2], &expected[0]));
}

#[test]
fn evaluate_in_order_reuses_buffer() {
    let nodes = vec![Node::default(), Node::default().with_parent(NodeIndex::new(0))];
    let order = TraversalOrder::build(&nodes, HierarchyOrder::Strict).unwrap();

    let mut world = vec![Mat4::ZERO; 7];
    evaluate_in_order(&nodes, &order, &instances_of(&nodes), &mut world).unwrap();
    assert_eq!(world, vec![Mat4::IDENTITY; 2]);
}
