use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::RigError;
use crate::scene::NodeIndex;

/// Defines the target property for animation data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetPath {
    Translation, // Maps to transform.translation
    Rotation,    // Maps to transform.rotation
    Scale,       // Maps to transform.scale
    Weights,     // Maps to morph target weights
}

impl TargetPath {
    /// glTF spelling of the path.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TargetPath::Translation => "translation",
            TargetPath::Rotation => "rotation",
            TargetPath::Scale => "scale",
            TargetPath::Weights => "weights",
        }
    }
}

impl FromStr for TargetPath {
    type Err = RigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "translation" => Ok(TargetPath::Translation),
            "rotation" => Ok(TargetPath::Rotation),
            "scale" => Ok(TargetPath::Scale),
            "weights" => Ok(TargetPath::Weights),
            other => Err(RigError::UnknownTargetPath(other.to_string())),
        }
    }
}

impl fmt::Display for TargetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The property a channel animates: one path of one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelTarget {
    pub node: NodeIndex,
    pub path: TargetPath,
}

impl ChannelTarget {
    #[must_use]
    pub const fn new(node: NodeIndex, path: TargetPath) -> Self {
        Self { node, path }
    }
}
