//! Roadmap Graph
//!
//! Node pool and adjacency store of the probabilistic roadmap.
//!
//! # Features
//!
//! - Nodes live in an arena and are addressed by [`NodeId`]
//! - Node centers are unique; inserting a second node at the same center fails
//! - Edges are recorded in both directions, so the search may treat the
//!   adjacency as undirected
//! - Query-time insertion of the init and goal configurations
//!
//! # Example
//!
//! ```rust
//! use visprm::algorithms::collision::CollisionOracle;
//! use visprm::algorithms::roadmap::{NodeRole, QueryKind, Roadmap};
//!
//! let mut roadmap = Roadmap::with_query_nodes((50.0, 50.0), (540.0, 380.0), 10.0);
//! roadmap.add_node((300.0, 200.0), 10.0, NodeRole::Guard);
//!
//! let oracle = CollisionOracle::new(Vec::new());
//! let edge = roadmap.insert_query_node(QueryKind::Init, &oracle);
//! assert_eq!(edge, Some(((50.0, 50.0), (300.0, 200.0))));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, warn};

use super::aabb::{euclidean_distance, Point};
use super::collision::{CollisionOracle, Configuration};

/// Index of a node in the roadmap's node pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Role assigned to a node when it is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    Guard,
    Connection,
    Init,
    Goal,
}

/// Which query configuration to connect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Init,
    Goal,
}

/// Roadmap node: a configuration tagged with its role
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub configuration: Configuration,
    pub role: NodeRole,
}

impl Node {
    pub fn center(&self) -> Point {
        self.configuration.center
    }
}

/// Roadmap: node pool plus verified collision-free adjacency
#[derive(Debug, Clone, Default)]
pub struct Roadmap {
    nodes: Vec<Node>,
    neighbors: BTreeMap<NodeId, Vec<NodeId>>,
    init: Option<NodeId>,
    goal: Option<NodeId>,
}

impl Roadmap {
    /// Create an empty roadmap
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a roadmap whose pool already holds the init and goal nodes
    ///
    /// If both share a center the single node serves as init and goal.
    pub fn with_query_nodes(start: Point, goal: Point, radius: f64) -> Self {
        let mut roadmap = Self::new();
        let init = roadmap.push_node(start, radius, NodeRole::Init);
        let goal = roadmap
            .add_node(goal, radius, NodeRole::Goal)
            .unwrap_or(init);
        roadmap.init = Some(init);
        roadmap.goal = Some(goal);
        roadmap
    }

    /// Add a node, refusing centers that are already taken
    pub fn add_node(&mut self, center: Point, radius: f64, role: NodeRole) -> Option<NodeId> {
        if self.find(center).is_some() {
            return None;
        }
        Some(self.push_node(center, radius, role))
    }

    fn push_node(&mut self, center: Point, radius: f64, role: NodeRole) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            id,
            configuration: Configuration::new(center, radius),
            role,
        });
        id
    }

    /// Look up the node placed at exactly this center
    pub fn find(&self, center: Point) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|node| node.center() == center)
            .map(|node| node.id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node registered for the given query, if any
    pub fn query_node(&self, kind: QueryKind) -> Option<NodeId> {
        match kind {
            QueryKind::Init => self.init,
            QueryKind::Goal => self.goal,
        }
    }

    /// Record an edge in both directions
    ///
    /// Ids are not checked against the pool; the search reports dangling
    /// references as a malformed roadmap.
    pub fn connect(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            return;
        }
        Self::push_neighbor(self.neighbors.entry(a).or_default(), b);
        Self::push_neighbor(self.neighbors.entry(b).or_default(), a);
    }

    fn push_neighbor(list: &mut Vec<NodeId>, id: NodeId) {
        if !list.contains(&id) {
            list.push(id);
        }
    }

    /// Recorded neighbors of a node, empty when it has none
    pub fn neighbors(&self, id: NodeId) -> &[NodeId] {
        self.neighbors.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.neighbors(a).contains(&b)
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.neighbors.values().map(Vec::len).sum::<usize>() / 2
    }

    /// Adjacency by node center, for display
    pub fn neighbor_map(&self) -> Vec<(Point, Vec<Point>)> {
        self.neighbors
            .iter()
            .filter_map(|(id, list)| {
                let node = self.node(*id)?;
                let centers = list
                    .iter()
                    .filter_map(|n| self.node(*n).map(Node::center))
                    .collect();
                Some((node.center(), centers))
            })
            .collect()
    }

    /// Pool members other than `id`, nearest first
    fn candidates_by_distance(&self, id: NodeId, center: Point) -> Vec<(f64, NodeId)> {
        let mut candidates: Vec<(f64, NodeId)> = self
            .nodes
            .iter()
            .filter(|node| node.id != id && node.center() != center)
            .map(|node| (euclidean_distance(center, node.center()), node.id))
            .collect();
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        candidates
    }

    /// Connect the init or goal node to its nearest visible pool member
    ///
    /// Candidates are tried nearest first, except the farthest one, and the
    /// first whose segment crosses no obstacle is linked. Returns the edge as
    /// `(init, nearest)` or `(nearest, goal)`, or `None` when the query node
    /// stays isolated.
    pub fn insert_query_node(
        &mut self,
        kind: QueryKind,
        oracle: &CollisionOracle,
    ) -> Option<(Point, Point)> {
        let id = self.query_node(kind)?;
        let query = *self.node(id)?;
        let candidates = self.candidates_by_distance(id, query.center());
        let tried = candidates.len().saturating_sub(1);

        let nearest = candidates[..tried].iter().find_map(|(_, candidate)| {
            let node = self.node(*candidate)?;
            if oracle.crosses_obstacle(&query.configuration, &node.configuration) {
                None
            } else {
                Some(*node)
            }
        });

        let Some(nearest) = nearest else {
            warn!(
                "{:?} node at {:?} could not be connected to any of {} candidates",
                kind,
                query.center(),
                tried
            );
            return None;
        };

        self.connect(id, nearest.id);
        debug!(
            "{:?} node at {:?} linked to {:?} node at {:?}",
            kind,
            query.center(),
            nearest.role,
            nearest.center()
        );

        Some(match kind {
            QueryKind::Init => (query.center(), nearest.center()),
            QueryKind::Goal => (nearest.center(), query.center()),
        })
    }

    /// The `k` pool members closest to `point`
    pub fn k_nearest(&self, point: Point, k: usize) -> Vec<NodeId> {
        let mut by_distance: Vec<(f64, NodeId)> = self
            .nodes
            .iter()
            .map(|node| (euclidean_distance(point, node.center()), node.id))
            .collect();
        by_distance.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        by_distance.into_iter().take(k).map(|(_, id)| id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::aabb::Rect;

    const RADIUS: f64 = 10.0;

    #[test]
    fn test_unique_centers() {
        let mut roadmap = Roadmap::new();

        let first = roadmap.add_node((10.0, 10.0), RADIUS, NodeRole::Guard);
        let duplicate = roadmap.add_node((10.0, 10.0), RADIUS, NodeRole::Connection);

        assert_eq!(first, Some(NodeId(0)));
        assert_eq!(duplicate, None);
        assert_eq!(roadmap.len(), 1);
        assert_eq!(roadmap.find((10.0, 10.0)), Some(NodeId(0)));
    }

    #[test]
    fn test_query_nodes_preseeded() {
        let roadmap = Roadmap::with_query_nodes((50.0, 50.0), (540.0, 380.0), RADIUS);

        let init = roadmap.query_node(QueryKind::Init).unwrap();
        let goal = roadmap.query_node(QueryKind::Goal).unwrap();

        assert_eq!(roadmap.node(init).unwrap().role, NodeRole::Init);
        assert_eq!(roadmap.node(goal).unwrap().role, NodeRole::Goal);
        assert_eq!(roadmap.node(goal).unwrap().center(), (540.0, 380.0));
    }

    #[test]
    fn test_query_nodes_same_center() {
        let roadmap = Roadmap::with_query_nodes((50.0, 50.0), (50.0, 50.0), RADIUS);

        assert_eq!(roadmap.len(), 1);
        assert_eq!(
            roadmap.query_node(QueryKind::Init),
            roadmap.query_node(QueryKind::Goal)
        );
    }

    #[test]
    fn test_connect_is_symmetric_and_deduplicated() {
        let mut roadmap = Roadmap::new();
        let a = roadmap.add_node((0.0, 0.0), RADIUS, NodeRole::Guard).unwrap();
        let b = roadmap.add_node((10.0, 0.0), RADIUS, NodeRole::Guard).unwrap();

        roadmap.connect(a, b);
        roadmap.connect(b, a);
        roadmap.connect(a, a);

        assert_eq!(roadmap.neighbors(a), &[b]);
        assert_eq!(roadmap.neighbors(b), &[a]);
        assert_eq!(roadmap.edge_count(), 1);
    }

    #[test]
    fn test_missing_entry_has_no_neighbors() {
        let mut roadmap = Roadmap::new();
        let a = roadmap.add_node((0.0, 0.0), RADIUS, NodeRole::Guard).unwrap();

        assert!(roadmap.neighbors(a).is_empty());
        assert!(roadmap.neighbors(NodeId(42)).is_empty());
    }

    #[test]
    fn test_neighbor_map_uses_centers() {
        let mut roadmap = Roadmap::new();
        let a = roadmap.add_node((0.0, 0.0), RADIUS, NodeRole::Guard).unwrap();
        let b = roadmap.add_node((10.0, 0.0), RADIUS, NodeRole::Connection).unwrap();
        roadmap.connect(a, b);

        let map = roadmap.neighbor_map();
        assert_eq!(
            map,
            vec![((0.0, 0.0), vec![(10.0, 0.0)]), ((10.0, 0.0), vec![(0.0, 0.0)])]
        );
    }

    #[test]
    fn test_insert_init_links_nearest() {
        let mut roadmap = Roadmap::with_query_nodes((50.0, 50.0), (540.0, 380.0), RADIUS);
        let near = roadmap.add_node((100.0, 50.0), RADIUS, NodeRole::Guard).unwrap();
        roadmap.add_node((300.0, 300.0), RADIUS, NodeRole::Guard);
        let oracle = CollisionOracle::new(Vec::new());

        let edge = roadmap.insert_query_node(QueryKind::Init, &oracle);

        assert_eq!(edge, Some(((50.0, 50.0), (100.0, 50.0))));
        let init = roadmap.query_node(QueryKind::Init).unwrap();
        assert!(roadmap.has_edge(init, near));
        assert!(roadmap.has_edge(near, init));
    }

    #[test]
    fn test_insert_goal_edge_orientation() {
        let mut roadmap = Roadmap::with_query_nodes((50.0, 50.0), (540.0, 380.0), RADIUS);
        roadmap.add_node((500.0, 380.0), RADIUS, NodeRole::Guard);
        roadmap.add_node((100.0, 100.0), RADIUS, NodeRole::Guard);
        let oracle = CollisionOracle::new(Vec::new());

        let edge = roadmap.insert_query_node(QueryKind::Goal, &oracle);

        assert_eq!(edge, Some(((500.0, 380.0), (540.0, 380.0))));
    }

    #[test]
    fn test_insert_skips_blocked_candidates() {
        let mut roadmap = Roadmap::with_query_nodes((50.0, 240.0), (600.0, 240.0), RADIUS);
        // Nearest candidate sits behind a wall, second nearest is clear
        roadmap.add_node((150.0, 240.0), RADIUS, NodeRole::Guard);
        let clear = roadmap.add_node((50.0, 400.0), RADIUS, NodeRole::Guard).unwrap();
        let oracle = CollisionOracle::new(vec![Rect::new(90.0, 200.0, 20.0, 80.0)]);

        let edge = roadmap.insert_query_node(QueryKind::Init, &oracle);

        assert_eq!(edge, Some(((50.0, 240.0), (50.0, 400.0))));
        let init = roadmap.query_node(QueryKind::Init).unwrap();
        assert_eq!(roadmap.neighbors(init), &[clear]);
    }

    #[test]
    fn test_insert_never_tries_farthest_candidate() {
        // Only the goal is in the pool besides init, and it is the last entry
        let mut roadmap = Roadmap::with_query_nodes((50.0, 50.0), (540.0, 380.0), RADIUS);
        let oracle = CollisionOracle::new(Vec::new());

        assert_eq!(roadmap.insert_query_node(QueryKind::Init, &oracle), None);
        assert_eq!(roadmap.edge_count(), 0);
    }

    #[test]
    fn test_insert_unresolved_when_all_blocked() {
        let mut roadmap = Roadmap::with_query_nodes((50.0, 240.0), (600.0, 240.0), RADIUS);
        roadmap.add_node((400.0, 100.0), RADIUS, NodeRole::Guard);
        roadmap.add_node((400.0, 300.0), RADIUS, NodeRole::Guard);
        let oracle = CollisionOracle::new(vec![Rect::new(200.0, 0.0, 40.0, 480.0)]);

        assert_eq!(roadmap.insert_query_node(QueryKind::Init, &oracle), None);
    }

    #[test]
    fn test_k_nearest() {
        let mut roadmap = Roadmap::new();
        let a = roadmap.add_node((0.0, 0.0), RADIUS, NodeRole::Guard).unwrap();
        let b = roadmap.add_node((5.0, 0.0), RADIUS, NodeRole::Guard).unwrap();
        roadmap.add_node((50.0, 0.0), RADIUS, NodeRole::Guard);

        assert_eq!(roadmap.k_nearest((1.0, 0.0), 2), vec![a, b]);
        assert_eq!(roadmap.k_nearest((1.0, 0.0), 10).len(), 3);
        assert!(roadmap.k_nearest((1.0, 0.0), 0).is_empty());
    }
}
