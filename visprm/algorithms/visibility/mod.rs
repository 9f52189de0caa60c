//! Visibility Roadmap Construction
//!
//! Grows a sparse roadmap by classifying random free configurations:
//!
//! - **Guard**: sees none of the existing guards, starts a new component
//! - **Connection**: sees two guards whose pair has not been bridged yet,
//!   and links them
//! - **Rejected**: anything else
//!
//! The roadmap size follows the visibility structure of the free space
//! rather than the number of samples, and every pair of guards is bridged
//! at most once.
//!
//! A round of growth ends once the consecutive failure counter `ntry`
//! reaches the configured bound `M`. The counter resets whenever a guard is
//! inserted, so after a round `1 / ntry` estimates the share of free space
//! still outside every guard's visibility domain.
//!
//! # Example
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use visprm::algorithms::collision::CollisionOracle;
//! use visprm::algorithms::roadmap::Roadmap;
//! use visprm::algorithms::visibility::VisibilityRoadmapBuilder;
//!
//! let roadmap = Roadmap::with_query_nodes((50.0, 50.0), (540.0, 380.0), 10.0);
//! let oracle = CollisionOracle::new(Vec::new());
//! let mut builder = VisibilityRoadmapBuilder::new(roadmap, oracle, (640.0, 480.0), 10.0);
//! builder.set_max_failures(10);
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(7);
//! let summary = builder.grow_round(&mut rng);
//!
//! assert_eq!(builder.guards().len(), 1);
//! assert!(summary.ntry >= 10);
//! ```

use std::collections::HashSet;

use rand::Rng;
use tracing::{debug, info, warn};

use super::aabb::{Point, Rect};
use super::collision::{CollisionOracle, Configuration};
use super::roadmap::{NodeId, NodeRole, QueryKind, Roadmap};

/// Default consecutive failure bound `M`
pub const DEFAULT_MAX_FAILURES: usize = 10;

/// Default number of draws after which a round is abandoned
pub const DEFAULT_MAX_SAMPLES_PER_ROUND: usize = 200_000;

/// Classification of a sampled configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleRole {
    Guard,
    Connection,
    Rejected,
}

/// Result of one sampling step
#[derive(Debug, Clone, PartialEq)]
pub struct SampleOutcome {
    pub center: Point,
    pub role: SampleRole,
    /// Node created for guards and connections
    pub node: Option<NodeId>,
    /// The footprint overlapped an obstacle, so the sample was never classified
    pub in_collision: bool,
}

impl SampleOutcome {
    /// Sample was added to the roadmap
    pub fn accepted(&self) -> bool {
        self.role != SampleRole::Rejected
    }

    fn rejected(center: Point, in_collision: bool) -> Self {
        Self {
            center,
            role: SampleRole::Rejected,
            node: None,
            in_collision,
        }
    }
}

/// Statistics of one round of roadmap growth
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundSummary {
    pub samples: usize,
    pub guards_added: usize,
    pub connections_added: usize,
    pub rejected: usize,
    pub in_collision: usize,
    /// Failure counter when the round ended
    pub ntry: usize,
    /// Round stopped on the sample budget before `ntry` reached the bound
    pub budget_exhausted: bool,
}

impl RoundSummary {
    /// Estimated share of free space covered by guard visibility domains
    pub fn coverage_estimate(&self) -> Option<f64> {
        coverage_from_failures(self.ntry)
    }
}

fn coverage_from_failures(ntry: usize) -> Option<f64> {
    if ntry == 0 {
        None
    } else {
        Some(1.0 - 1.0 / ntry as f64)
    }
}

/// Incremental visibility roadmap builder
///
/// Owns the roadmap together with the guard and connection lists and the
/// record of bridged guard pairs.
pub struct VisibilityRoadmapBuilder {
    roadmap: Roadmap,
    oracle: CollisionOracle,
    bounds: (f64, f64),
    robot_radius: f64,

    guards: Vec<NodeId>,
    connections: Vec<NodeId>,
    bridged: HashSet<(NodeId, NodeId)>,
    ntry: usize,

    max_failures: usize,
    max_samples_per_round: usize,
}

impl VisibilityRoadmapBuilder {
    /// Create builder sampling over `[0, width) x [0, height)`
    pub fn new(
        roadmap: Roadmap,
        oracle: CollisionOracle,
        bounds: (f64, f64),
        robot_radius: f64,
    ) -> Self {
        Self {
            roadmap,
            oracle,
            bounds,
            robot_radius,
            guards: Vec::new(),
            connections: Vec::new(),
            bridged: HashSet::new(),
            ntry: 0,
            max_failures: DEFAULT_MAX_FAILURES,
            max_samples_per_round: DEFAULT_MAX_SAMPLES_PER_ROUND,
        }
    }

    /// Set the consecutive failure bound `M`
    pub fn set_max_failures(&mut self, max_failures: usize) {
        self.max_failures = max_failures;
    }

    /// Set the number of draws after which a round gives up
    pub fn set_max_samples_per_round(&mut self, max_samples: usize) {
        self.max_samples_per_round = max_samples;
    }

    /// Install a fresh obstacle set for the following samples
    pub fn set_obstacles(&mut self, obstacles: Vec<Rect>) {
        self.oracle.set_obstacles(obstacles);
    }

    /// Clear the failure counter so another round can run
    pub fn reset_failures(&mut self) {
        self.ntry = 0;
    }

    pub fn roadmap(&self) -> &Roadmap {
        &self.roadmap
    }

    pub fn oracle(&self) -> &CollisionOracle {
        &self.oracle
    }

    pub fn guards(&self) -> &[NodeId] {
        &self.guards
    }

    pub fn connections(&self) -> &[NodeId] {
        &self.connections
    }

    /// Guard pairs already linked by a connection node, smaller id first
    pub fn bridged_pairs(&self) -> impl Iterator<Item = &(NodeId, NodeId)> {
        self.bridged.iter()
    }

    pub fn ntry(&self) -> usize {
        self.ntry
    }

    pub fn max_failures(&self) -> usize {
        self.max_failures
    }

    /// Estimated share of free space covered by guard visibility domains
    pub fn coverage_estimate(&self) -> Option<f64> {
        coverage_from_failures(self.ntry)
    }

    /// Connect the init or goal node to the roadmap
    pub fn insert_query_node(&mut self, kind: QueryKind) -> Option<(Point, Point)> {
        self.roadmap.insert_query_node(kind, &self.oracle)
    }

    /// Draw one configuration uniformly over the map and classify it
    ///
    /// Coordinates are truncated to whole units.
    pub fn sample_and_classify(&mut self, rng: &mut impl Rng) -> SampleOutcome {
        let x = rng.gen_range(0.0..self.bounds.0).trunc();
        let y = rng.gen_range(0.0..self.bounds.1).trunc();
        self.classify((x, y))
    }

    /// Classify a configuration centered at `center`
    pub fn classify(&mut self, center: Point) -> SampleOutcome {
        let candidate = Configuration::new(center, self.robot_radius);

        if !self.oracle.is_free(&candidate) {
            return SampleOutcome::rejected(center, true);
        }

        if self.roadmap.find(center).is_some() {
            self.ntry += 1;
            return SampleOutcome::rejected(center, false);
        }

        if self.guards.is_empty() {
            return self.add_guard(center);
        }

        let visible: Vec<bool> = self
            .guards
            .iter()
            .map(|guard| self.sees_guard(&candidate, *guard))
            .collect();
        let failures = visible.iter().filter(|seen| !**seen).count();

        if failures == self.guards.len() {
            return self.add_guard(center);
        }

        let mut pairs = Vec::new();
        for i in 0..self.guards.len() {
            if !visible[i] {
                continue;
            }
            for j in (i + 1)..self.guards.len() {
                if !visible[j] {
                    continue;
                }
                let pair = ordered_pair(self.guards[i], self.guards[j]);
                if self.bridged.contains(&pair) {
                    continue;
                }
                self.bridged.insert(pair);
                pairs.push(pair);
            }
        }

        if pairs.is_empty() {
            self.ntry += failures.max(1);
            return SampleOutcome::rejected(center, false);
        }

        self.ntry += failures;
        self.add_connection(center, &pairs)
    }

    fn sees_guard(&self, candidate: &Configuration, guard: NodeId) -> bool {
        match self.roadmap.node(guard) {
            Some(node) => self.oracle.is_visible(candidate, &node.configuration),
            None => false,
        }
    }

    fn add_guard(&mut self, center: Point) -> SampleOutcome {
        match self
            .roadmap
            .add_node(center, self.robot_radius, NodeRole::Guard)
        {
            Some(id) => {
                self.guards.push(id);
                self.ntry = 0;
                debug!("guard {} placed at {:?}", id, center);
                SampleOutcome {
                    center,
                    role: SampleRole::Guard,
                    node: Some(id),
                    in_collision: false,
                }
            }
            None => SampleOutcome::rejected(center, false),
        }
    }

    fn add_connection(&mut self, center: Point, pairs: &[(NodeId, NodeId)]) -> SampleOutcome {
        let Some(id) = self
            .roadmap
            .add_node(center, self.robot_radius, NodeRole::Connection)
        else {
            return SampleOutcome::rejected(center, false);
        };

        for (a, b) in pairs {
            self.roadmap.connect(id, *a);
            self.roadmap.connect(id, *b);
        }
        self.connections.push(id);
        debug!(
            "connection {} placed at {:?} bridging {} guard pair(s)",
            id,
            center,
            pairs.len()
        );

        SampleOutcome {
            center,
            role: SampleRole::Connection,
            node: Some(id),
            in_collision: false,
        }
    }

    /// Sample until `ntry` reaches the failure bound
    pub fn grow_round(&mut self, rng: &mut impl Rng) -> RoundSummary {
        let mut summary = RoundSummary::default();

        while self.ntry < self.max_failures {
            if summary.samples >= self.max_samples_per_round {
                summary.budget_exhausted = true;
                warn!(
                    "round abandoned after {} samples with ntry {} of {}",
                    summary.samples, self.ntry, self.max_failures
                );
                break;
            }

            let outcome = self.sample_and_classify(rng);
            summary.samples += 1;
            match outcome.role {
                SampleRole::Guard => summary.guards_added += 1,
                SampleRole::Connection => summary.connections_added += 1,
                SampleRole::Rejected if outcome.in_collision => summary.in_collision += 1,
                SampleRole::Rejected => summary.rejected += 1,
            }
        }

        summary.ntry = self.ntry;
        info!(
            "roadmap round: {} samples, +{} guards, +{} connections, {} rejected, {} in collision",
            summary.samples,
            summary.guards_added,
            summary.connections_added,
            summary.rejected,
            summary.in_collision
        );
        if let Some(coverage) = summary.coverage_estimate() {
            info!(
                "estimated free space covered by visibility domains {:.4}%",
                100.0 * coverage
            );
        }

        summary
    }
}

fn ordered_pair(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
