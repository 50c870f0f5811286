//! Evaluator Settings
//!
//! Runtime configuration for pose evaluation, split by owner:
//! - [`EvaluatorSettings`] travels with each [`SceneAsset`](crate::assets::SceneAsset)
//!   and governs validation and the mixer of every instance of it;
//! - [`WorldSettings`] configures one [`PoseWorld`](crate::world::PoseWorld).
//!
//! All fields have defaults, and both structs deserialize from any serde
//! format with missing fields falling back to [`Default`].
//!
//! ```rust,ignore
//! use rigpose::settings::{EvaluatorSettings, HierarchyOrder};
//!
//! let settings = EvaluatorSettings {
//!     hierarchy_order: HierarchyOrder::Strict,
//!     ..Default::default()
//! };
//! ```

use serde::{Deserialize, Serialize};

/// How a node array whose parents are not stored before their children is
/// handled when an asset is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyOrder {
    /// Every parent index must be smaller than its child's index.
    /// Anything else is rejected as a data-integrity fault.
    Strict,
    /// Compute a parent-before-child traversal order once at load time.
    /// Cycles are still rejected.
    #[default]
    Resort,
}

/// Per-asset configuration, shared by every instance of the asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorSettings {
    /// Ordering policy applied when validating the node hierarchy.
    pub hierarchy_order: HierarchyOrder,

    /// Restore every node to its rest pose before the mixer applies the
    /// current frame's clips. Without it, partial weights accumulate across
    /// frames.
    pub reset_to_rest_pose: bool,
}

impl Default for EvaluatorSettings {
    fn default() -> Self {
        Self {
            hierarchy_order: HierarchyOrder::Resort,
            reset_to_rest_pose: true,
        }
    }
}

/// Configuration of a [`PoseWorld`](crate::world::PoseWorld).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    /// Below this number of instances the world updates sequentially even
    /// when the `parallel` feature is enabled.
    pub parallel_threshold: usize,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self { parallel_threshold: 4 }
    }
}
