//! A* Search over the Roadmap
//!
//! Shortest-path query over the adjacency recorded in a [`Roadmap`].
//!
//! Only recorded edges are traversed, and each one is re-checked with the
//! collision oracle before it is relaxed. Edge cost and heuristic are both
//! Euclidean distance, so the returned path is optimal for the recorded
//! adjacency.
//!
//! # Example
//!
//! ```rust
//! use visprm::algorithms::astar::AStar;
//! use visprm::algorithms::collision::CollisionOracle;
//! use visprm::algorithms::roadmap::{NodeRole, Roadmap};
//!
//! let mut roadmap = Roadmap::new();
//! let a = roadmap.add_node((0.0, 0.0), 1.0, NodeRole::Init).unwrap();
//! let b = roadmap.add_node((3.0, 4.0), 1.0, NodeRole::Guard).unwrap();
//! let c = roadmap.add_node((6.0, 8.0), 1.0, NodeRole::Goal).unwrap();
//! roadmap.connect(a, b);
//! roadmap.connect(b, c);
//!
//! let oracle = CollisionOracle::new(Vec::new());
//! let path = AStar::new(&oracle).search(&roadmap, a, c).unwrap();
//!
//! assert_eq!(path.nodes, vec![a, b, c]);
//! assert_eq!(path.cost, 10.0);
//! ```

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use tracing::debug;

use super::aabb::{euclidean_distance, Point};
use super::collision::CollisionOracle;
use super::roadmap::{Node, NodeId, Roadmap};
use crate::error::{PlanningError, PlanningResult};

/// Path found through the roadmap
#[derive(Debug, Clone, PartialEq)]
pub struct RoadmapPath {
    /// Nodes from init to goal
    pub nodes: Vec<NodeId>,
    /// Node centers from init to goal
    pub waypoints: Vec<Point>,
    /// Sum of Euclidean edge lengths
    pub cost: f64,
    /// Nodes popped from the frontier
    pub expanded: usize,
}

impl RoadmapPath {
    /// Total length of a polyline
    pub fn path_length(points: &[Point]) -> f64 {
        points
            .windows(2)
            .map(|w| euclidean_distance(w[0], w[1]))
            .sum()
    }
}

/// Frontier entry ordered so the heap pops the lowest f-score, oldest first
#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    f_score: f64,
    g_score: f64,
    order: u64,
    node: NodeId,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_score
            .total_cmp(&self.f_score)
            .then_with(|| other.order.cmp(&self.order))
    }
}

/// A* planner bound to a collision oracle
pub struct AStar<'a> {
    oracle: &'a CollisionOracle,
}

impl<'a> AStar<'a> {
    pub fn new(oracle: &'a CollisionOracle) -> Self {
        Self { oracle }
    }

    fn heuristic(from: &Node, goal: &Node) -> f64 {
        euclidean_distance(from.center(), goal.center())
    }

    fn lookup(roadmap: &Roadmap, from: NodeId, id: NodeId) -> PlanningResult<&Node> {
        roadmap.node(id).ok_or(PlanningError::MalformedRoadmap {
            node: from,
            missing: id,
        })
    }

    /// Find the shortest path from `start` to `goal`
    ///
    /// Fails with [`PlanningError::MalformedRoadmap`] when an adjacency list
    /// names a node outside the pool, and with [`PlanningError::NoPathExists`]
    /// when the frontier empties before reaching the goal.
    pub fn search(
        &self,
        roadmap: &Roadmap,
        start: NodeId,
        goal: NodeId,
    ) -> PlanningResult<RoadmapPath> {
        let start_node = Self::lookup(roadmap, start, start)?;
        let goal_node = Self::lookup(roadmap, goal, goal)?;

        let mut g_score: HashMap<NodeId, f64> = HashMap::new();
        let mut came_from: HashMap<NodeId, NodeId> = HashMap::new();
        let mut open = BinaryHeap::new();
        let mut order = 0u64;
        let mut expanded = 0usize;

        g_score.insert(start, 0.0);
        open.push(OpenEntry {
            f_score: Self::heuristic(start_node, goal_node),
            g_score: 0.0,
            order,
            node: start,
        });

        while let Some(entry) = open.pop() {
            let current = entry.node;
            let current_g = g_score.get(&current).copied().unwrap_or(f64::INFINITY);
            // Superseded by a cheaper entry pushed later
            if entry.g_score > current_g {
                continue;
            }
            expanded += 1;

            if current == goal {
                let path = Self::reconstruct_path(roadmap, &came_from, &g_score, goal, expanded);
                debug!(
                    "A* reached goal after expanding {} nodes, cost {:.2}",
                    expanded, path.cost
                );
                return Ok(path);
            }

            let current_node = Self::lookup(roadmap, current, current)?;

            for &neighbor in roadmap.neighbors(current) {
                let neighbor_node = Self::lookup(roadmap, current, neighbor)?;
                let tentative =
                    current_g + euclidean_distance(current_node.center(), neighbor_node.center());
                let known = g_score.get(&neighbor).copied().unwrap_or(f64::INFINITY);

                if tentative < known
                    && !self
                        .oracle
                        .crosses_obstacle(&current_node.configuration, &neighbor_node.configuration)
                {
                    came_from.insert(neighbor, current);
                    g_score.insert(neighbor, tentative);

                    order += 1;
                    open.push(OpenEntry {
                        f_score: tentative + Self::heuristic(neighbor_node, goal_node),
                        g_score: tentative,
                        order,
                        node: neighbor,
                    });
                }
            }
        }

        Err(PlanningError::NoPathExists {
            start: start_node.center(),
            goal: goal_node.center(),
            expanded,
        })
    }

    fn reconstruct_path(
        roadmap: &Roadmap,
        came_from: &HashMap<NodeId, NodeId>,
        g_score: &HashMap<NodeId, f64>,
        goal: NodeId,
        expanded: usize,
    ) -> RoadmapPath {
        let mut nodes = vec![goal];
        let mut current = goal;
        while let Some(&parent) = came_from.get(&current) {
            nodes.push(parent);
            current = parent;
        }
        nodes.reverse();

        let waypoints = nodes
            .iter()
            .filter_map(|id| roadmap.node(*id).map(Node::center))
            .collect();

        RoadmapPath {
            nodes,
            waypoints,
            cost: g_score.get(&goal).copied().unwrap_or(0.0),
            expanded,
        }
    }
}
