//! Pose evaluation benchmarks
//!
//! - `hierarchy/*`: world matrix evaluation of a deep chain and a wide tree
//! - `sampling/*`: keyframe lookup by binary search and by cursor
//! - `frame/skinned_character`: mixer + world matrices + joint palette

use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use glam::{Mat4, Quat, Vec3, Vec4};
use rigpose::animation::{
    AnimationAction, AnimationClip, Channel, ChannelTarget, InterpolationMode, KeyframeCursor,
    KeyframeTrack, TargetPath, TrackData,
};
use rigpose::assets::SceneAsset;
use rigpose::scene::mesh::Mesh;
use rigpose::scene::node::{Node, NodeInstance};
use rigpose::scene::skin::Skin;
use rigpose::scene::transform::Transform;
use rigpose::scene::transform_system::evaluate_world_matrices;
use rigpose::scene::{AnimationIndex, MeshIndex, NodeIndex, SamplerIndex, SkinIndex};
use rigpose::world::AnimatedInstance;

const BONES: usize = 64;
const KEYFRAMES: usize = 240;

fn chain(len: usize) -> Vec<Node> {
    (0..len)
        .map(|i| {
            let node = Node::new(Transform::new(
                Vec3::Y,
                Quat::from_rotation_z(0.05),
                Vec3::ONE,
            ));
            if i == 0 { node } else { node.with_parent(NodeIndex::new(i - 1)) }
        })
        .collect()
}

fn wide_tree(len: usize) -> Vec<Node> {
    (0..len)
        .map(|i| {
            let node = Node::new(Transform::from_translation(Vec3::X));
            if i == 0 { node } else { node.with_parent(NodeIndex::new((i - 1) / 4)) }
        })
        .collect()
}

fn rotation_track() -> KeyframeTrack<Quat> {
    let times = (0..KEYFRAMES).map(|i| i as f32 / 30.0).collect();
    let values = (0..KEYFRAMES)
        .map(|i| Quat::from_rotation_y(i as f32 * 0.1))
        .collect();
    KeyframeTrack::new(times, values, InterpolationMode::Linear).expect("valid track")
}

/// A chain of bones skinning a single-triangle mesh, with one rotation clip
/// animating every bone.
fn skinned_character() -> Arc<SceneAsset> {
    let mut nodes = vec![Node::default().with_mesh(MeshIndex::new(0)).with_skin(SkinIndex::new(0))];
    nodes.extend(chain(BONES).into_iter().map(|mut bone| {
        bone.parent = bone.parent.map(|p| NodeIndex::new(p.index() + 1));
        bone
    }));

    let mesh = Mesh {
        positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
        joints_0: vec![[0, 1, 2, 3]; 3],
        weights_0: vec![Vec4::splat(0.25); 3],
        indices: vec![0, 1, 2],
        ..Mesh::default()
    };
    let skin = Skin::with_identity_bind((1..=BONES).map(NodeIndex::new).collect());

    let channels = (1..=BONES)
        .map(|bone| {
            Channel::new(
                SamplerIndex::new(0),
                ChannelTarget::new(NodeIndex::new(bone), TargetPath::Rotation),
            )
        })
        .collect();
    let clip = AnimationClip::new("Sway", vec![TrackData::from(rotation_track())], channels)
        .expect("valid clip");

    Arc::new(SceneAsset::new(nodes, vec![mesh], vec![skin], vec![clip]).expect("valid asset"))
}

fn bench_hierarchy(c: &mut Criterion) {
    let mut group = c.benchmark_group("hierarchy");

    for (name, nodes) in [("chain_1024", chain(1024)), ("wide_1024", wide_tree(1024))] {
        let instances: Vec<NodeInstance> = nodes.iter().map(NodeInstance::from_node).collect();
        group.bench_function(name, |b| {
            b.iter(|| evaluate_world_matrices(black_box(&nodes), black_box(&instances)));
        });
    }

    group.finish();
}

fn bench_sampling(c: &mut Criterion) {
    let track = rotation_track();
    let end = track.end_time();
    let steps: Vec<f32> = (0..1000).map(|i| end * i as f32 / 1000.0).collect();

    let mut group = c.benchmark_group("sampling");
    group.bench_function("binary_search", |b| {
        b.iter(|| {
            for &t in &steps {
                black_box(track.sample(black_box(t)));
            }
        });
    });
    group.bench_function("cursor_sequential", |b| {
        b.iter(|| {
            let mut cursor = KeyframeCursor::default();
            for &t in &steps {
                black_box(track.sample_with_cursor(black_box(t), &mut cursor));
            }
        });
    });
    group.finish();
}

fn bench_frame(c: &mut Criterion) {
    let mut animated = AnimatedInstance::new(skinned_character()).expect("instance");
    animated.mixer.add_action(AnimationAction::new(AnimationIndex::new(0)));

    c.bench_function("frame/skinned_character", |b| {
        b.iter(|| animated.update(black_box(1.0 / 60.0)));
    });
}

criterion_group!(benches, bench_hierarchy, bench_sampling, bench_frame);
criterion_main!(benches);
