//! Error types for planning operations.

use crate::algorithms::aabb::Point;
use crate::algorithms::roadmap::NodeId;

/// Errors raised while configuring a planner or querying its roadmap.
///
/// Geometric tests never fail; every error here comes from a search over a
/// roadmap that does not join init to goal, or from configuration input.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PlanningError {
    /// The search exhausted the component reachable from init without
    /// meeting the goal.
    #[error(
        "no path from {start:?} to {goal:?} after expanding {expanded} nodes; \
         the roadmap is not sufficiently connected, increase max_failures or resample"
    )]
    NoPathExists {
        start: Point,
        goal: Point,
        expanded: usize,
    },

    /// An adjacency list references a node that is not in the node pool.
    #[error(
        "roadmap malformed: node {node} lists neighbor {missing}, which is not in the node pool; \
         rebuild the roadmap"
    )]
    MalformedRoadmap { node: NodeId, missing: NodeId },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML configuration: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("failed to parse YAML configuration: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

impl PlanningError {
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// The roadmap does not join init to goal
    ///
    /// Callers usually react by growing a denser roadmap and retrying.
    #[must_use]
    pub const fn is_insufficient_connectivity(&self) -> bool {
        matches!(
            self,
            Self::NoPathExists { .. } | Self::MalformedRoadmap { .. }
        )
    }
}

/// Result alias for planning operations
pub type PlanningResult<T> = Result<T, PlanningError>;
