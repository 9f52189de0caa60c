//! Planning session
//!
//! [`VisibilityPrm`] owns one roadmap for the lifetime of a session and
//! exposes the operations a host (viewer, CLI, test harness) drives:
//! sampling steps, whole growth rounds, query insertion, search and the
//! neighbor map for display.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::algorithms::aabb::{Point, Rect};
use crate::algorithms::astar::{AStar, RoadmapPath};
use crate::algorithms::collision::Configuration;
use crate::algorithms::roadmap::{QueryKind, Roadmap};
use crate::algorithms::smoothing::PathSmoother;
use crate::algorithms::visibility::{RoundSummary, SampleOutcome, VisibilityRoadmapBuilder};
use crate::config::PlannerConfig;
use crate::error::{PlanningError, PlanningResult};

/// Successful query result
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedPath {
    /// Roadmap nodes from init to goal
    pub path: RoadmapPath,
    /// Dense trajectory from init to goal
    pub smoothed: Vec<Point>,
}

/// Visibility PRM planning session
pub struct VisibilityPrm {
    config: PlannerConfig,
    builder: VisibilityRoadmapBuilder,
    smoother: PathSmoother,
    rng: ChaCha8Rng,
}

impl VisibilityPrm {
    /// Start a session with the init and goal nodes already in the pool
    pub fn new(config: PlannerConfig) -> PlanningResult<Self> {
        config.validate()?;

        let oracle = config.oracle();
        for (name, point) in [("start", config.start), ("goal", config.goal)] {
            if !oracle.is_free(&Configuration::new(point, config.robot_radius)) {
                warn!("{} {:?} overlaps an obstacle", name, point);
            }
        }

        let roadmap = Roadmap::with_query_nodes(config.start, config.goal, config.robot_radius);
        let mut builder = VisibilityRoadmapBuilder::new(
            roadmap,
            oracle,
            (config.width, config.height),
            config.robot_radius,
        );
        builder.set_max_failures(config.max_failures);
        builder.set_max_samples_per_round(config.max_samples_per_round);

        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        info!(
            "visibility PRM session on {} x {} map, {} obstacles, M = {}",
            config.width,
            config.height,
            config.obstacles.len(),
            config.max_failures
        );

        Ok(Self {
            smoother: config.smoother(),
            config,
            builder,
            rng,
        })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn builder(&self) -> &VisibilityRoadmapBuilder {
        &self.builder
    }

    pub fn roadmap(&self) -> &Roadmap {
        self.builder.roadmap()
    }

    /// One sampling step
    pub fn sample_and_classify(&mut self) -> SampleOutcome {
        self.builder.sample_and_classify(&mut self.rng)
    }

    /// Sample until the failure bound is reached
    pub fn grow_round(&mut self) -> RoundSummary {
        self.builder.grow_round(&mut self.rng)
    }

    /// Clear the failure counter so the next round keeps growing the roadmap
    pub fn reset_failures(&mut self) {
        self.builder.reset_failures();
    }

    /// Replace the obstacle set used by later samples and searches
    pub fn set_obstacles(&mut self, obstacles: Vec<Rect>) {
        self.config.obstacles = obstacles.clone();
        self.builder.set_obstacles(obstacles);
    }

    /// Link the init or goal node to the roadmap
    pub fn insert_query_node(&mut self, kind: QueryKind) -> Option<(Point, Point)> {
        self.builder.insert_query_node(kind)
    }

    /// Search the roadmap from init to goal and smooth the result
    pub fn search(&self) -> PlanningResult<PlannedPath> {
        let roadmap = self.builder.roadmap();
        let (Some(init), Some(goal)) = (
            roadmap.query_node(QueryKind::Init),
            roadmap.query_node(QueryKind::Goal),
        ) else {
            return Err(PlanningError::NoPathExists {
                start: self.config.start,
                goal: self.config.goal,
                expanded: 0,
            });
        };

        let path = match AStar::new(self.builder.oracle()).search(roadmap, init, goal) {
            Ok(path) => path,
            Err(err) => {
                warn!("search failed: {}", err);
                return Err(err);
            }
        };

        let smoothed = self.smoother.smooth(&path.waypoints);
        info!(
            "path found through {} nodes, length {:.2}, {} smoothed points",
            path.nodes.len(),
            path.cost,
            smoothed.len()
        );

        Ok(PlannedPath { path, smoothed })
    }

    /// Grow one round, connect init and goal, then search
    pub fn plan(&mut self) -> PlanningResult<PlannedPath> {
        self.grow_round();
        self.insert_query_node(QueryKind::Init);
        self.insert_query_node(QueryKind::Goal);
        self.search()
    }

    /// Adjacency by node center, for display
    pub fn neighbor_map(&self) -> Vec<(Point, Vec<Point>)> {
        self.builder.roadmap().neighbor_map()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::visibility::SampleRole;

    fn seeded(config: PlannerConfig, seed: u64) -> VisibilityPrm {
        VisibilityPrm::new(PlannerConfig {
            seed: Some(seed),
            ..config
        })
        .unwrap()
    }

    #[test]
    fn test_session_starts_with_query_nodes() {
        let prm = seeded(PlannerConfig::default(), 1);

        assert_eq!(prm.roadmap().len(), 2);
        assert_eq!(prm.roadmap().edge_count(), 0);
        assert!(prm.neighbor_map().is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = VisibilityPrm::new(PlannerConfig {
            max_failures: 0,
            ..PlannerConfig::default()
        });

        assert!(matches!(result, Err(PlanningError::InvalidConfig(_))));
    }

    #[test]
    fn test_search_before_growth_fails() {
        let prm = seeded(PlannerConfig::open_map(), 2);

        let err = prm.search().unwrap_err();

        assert!(err.is_insufficient_connectivity());
    }

    #[test]
    fn test_sampling_stays_on_map() {
        let mut prm = seeded(PlannerConfig::default(), 3);

        for _ in 0..200 {
            let outcome = prm.sample_and_classify();
            assert!(outcome.center.0 >= 0.0 && outcome.center.0 < 640.0);
            assert!(outcome.center.1 >= 0.0 && outcome.center.1 < 480.0);
            assert_eq!(outcome.center.0, outcome.center.0.trunc());
            assert_eq!(outcome.accepted(), outcome.node.is_some());
            if outcome.in_collision {
                assert_eq!(outcome.role, SampleRole::Rejected);
            }
        }
    }

    #[test]
    fn test_same_seed_same_roadmap() {
        let mut a = seeded(PlannerConfig::default(), 42);
        let mut b = seeded(PlannerConfig::default(), 42);

        a.grow_round();
        b.grow_round();

        assert_eq!(a.roadmap().nodes(), b.roadmap().nodes());
        assert_eq!(a.neighbor_map(), b.neighbor_map());
    }

    #[test]
    fn test_plan_on_open_map() {
        let mut prm = seeded(PlannerConfig::open_map(), 5);

        let planned = prm.plan().unwrap();

        assert_eq!(planned.path.waypoints.first(), Some(&(50.0, 50.0)));
        assert_eq!(planned.path.waypoints.last(), Some(&(540.0, 380.0)));
        assert_eq!(planned.smoothed.first(), Some(&(50.0, 50.0)));
        assert_eq!(planned.smoothed.last(), Some(&(540.0, 380.0)));
        assert_eq!(
            planned.smoothed.len(),
            21 * (planned.path.waypoints.len() - 1)
        );
    }

    #[test]
    fn test_set_obstacles_updates_oracle() {
        let mut prm = seeded(PlannerConfig::open_map(), 6);
        let wall = vec![Rect::new(300.0, 0.0, 40.0, 480.0)];

        prm.set_obstacles(wall.clone());

        assert_eq!(prm.builder().oracle().obstacles(), wall.as_slice());
        assert_eq!(prm.config().obstacles, wall);
    }

    #[test]
    fn test_reset_failures_resumes_growth() {
        let mut prm = seeded(PlannerConfig::default(), 7);
        prm.grow_round();
        assert!(prm.builder().ntry() >= prm.config().max_failures);

        prm.reset_failures();

        assert_eq!(prm.builder().ntry(), 0);
        assert!(prm.grow_round().samples > 0);
    }
}
