//! Planner configuration
//!
//! Map size, robot footprint, failure bound, query endpoints and the
//! obstacle set, loadable from TOML or YAML.
//!
//! ```toml
//! width = 640.0
//! height = 480.0
//! robot_radius = 10.0
//! max_failures = 30
//! start = [50.0, 50.0]
//! goal = [540.0, 380.0]
//! seed = 42
//!
//! [[obstacles]]
//! x = 300.0
//! y = 0.0
//! width = 40.0
//! height = 300.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::algorithms::aabb::{Point, Rect};
use crate::algorithms::collision::{CollisionOracle, DEFAULT_COLLISION_SAMPLES};
use crate::algorithms::smoothing::{PathSmoother, DEFAULT_SMOOTHING_SAMPLES};
use crate::algorithms::visibility::{DEFAULT_MAX_FAILURES, DEFAULT_MAX_SAMPLES_PER_ROUND};
use crate::error::{PlanningError, PlanningResult};

/// Configuration of a planning session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub width: f64,
    pub height: f64,
    pub robot_radius: f64,
    /// Consecutive failures before a round of roadmap growth ends
    pub max_failures: usize,
    pub start: Point,
    pub goal: Point,
    pub obstacles: Vec<Rect>,
    /// Footprint placements per swept-segment check
    pub collision_samples: usize,
    /// Points per path segment in the smoothed trajectory
    pub smoothing_samples: usize,
    pub max_samples_per_round: usize,
    /// Fixed RNG seed for reproducible roadmaps
    pub seed: Option<u64>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 480.0,
            robot_radius: 10.0,
            max_failures: DEFAULT_MAX_FAILURES,
            start: (50.0, 50.0),
            goal: (540.0, 380.0),
            obstacles: default_obstacles(),
            collision_samples: DEFAULT_COLLISION_SAMPLES,
            smoothing_samples: DEFAULT_SMOOTHING_SAMPLES,
            max_samples_per_round: DEFAULT_MAX_SAMPLES_PER_ROUND,
            seed: None,
        }
    }
}

/// A "T" at (350, 200) and an "L" at (150, 20), built from 50 x 150 bars
pub fn default_obstacles() -> Vec<Rect> {
    let (bar, long) = (50.0, 150.0);

    let (tx, ty) = (350.0, 200.0);
    let t_top = Rect::new(tx, ty, long, bar);
    let t_stem = Rect::new(tx + long / 2.0 - bar / 2.0, ty, bar, long);

    let (lx, ly) = (150.0, 20.0);
    let l_upright = Rect::new(lx, ly, bar, long);
    let l_foot = Rect::new(lx, ly + long - bar, long, bar);

    vec![t_top, t_stem, l_upright, l_foot]
}

impl PlannerConfig {
    /// Obstacle-free map with default settings
    pub fn open_map() -> Self {
        Self {
            obstacles: Vec::new(),
            ..Self::default()
        }
    }

    /// Load from a file, TOML for `.toml` and YAML otherwise
    pub fn load(path: impl AsRef<Path>) -> PlanningResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let is_toml = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);
        if is_toml {
            Self::from_toml_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    pub fn from_toml_str(content: &str) -> PlanningResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> PlanningResult<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> PlanningResult<()> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(PlanningError::invalid_config(format!(
                "map size must be positive, got {} x {}",
                self.width, self.height
            )));
        }
        if !(self.robot_radius > 0.0) {
            return Err(PlanningError::invalid_config(format!(
                "robot_radius must be positive, got {}",
                self.robot_radius
            )));
        }
        if self.max_failures == 0 {
            return Err(PlanningError::invalid_config("max_failures must be at least 1"));
        }
        if self.collision_samples < 2 {
            return Err(PlanningError::invalid_config(
                "collision_samples must be at least 2",
            ));
        }
        if self.smoothing_samples < 2 {
            return Err(PlanningError::invalid_config(
                "smoothing_samples must be at least 2",
            ));
        }
        for (name, point) in [("start", self.start), ("goal", self.goal)] {
            if !self.contains(point) {
                return Err(PlanningError::invalid_config(format!(
                    "{} {:?} lies outside the {} x {} map",
                    name, point, self.width, self.height
                )));
            }
        }
        for (i, obstacle) in self.obstacles.iter().enumerate() {
            if !(obstacle.width >= 0.0 && obstacle.height >= 0.0) {
                return Err(PlanningError::invalid_config(format!(
                    "obstacle {} has negative size {} x {}",
                    i, obstacle.width, obstacle.height
                )));
            }
        }
        Ok(())
    }

    fn contains(&self, point: Point) -> bool {
        (0.0..=self.width).contains(&point.0) && (0.0..=self.height).contains(&point.1)
    }

    /// Collision oracle over the configured obstacles
    pub fn oracle(&self) -> CollisionOracle {
        CollisionOracle::with_samples(self.obstacles.clone(), self.collision_samples)
    }

    pub fn smoother(&self) -> PathSmoother {
        PathSmoother::with_samples(self.smoothing_samples)
    }
}
