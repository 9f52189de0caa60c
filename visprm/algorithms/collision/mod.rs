//! Collision Oracle
//!
//! Point and swept-segment tests of a disc robot against a set of
//! axis-aligned rectangular obstacles. Every edge decision made while
//! building or searching the roadmap goes through this module.
//!
//! The robot is approximated by the square footprint enclosing its disc.
//! A segment is checked by sliding a copy of the moving configuration's
//! footprint to evenly spaced points along it, so fidelity scales with the
//! sample count.
//!
//! # Example
//!
//! ```rust
//! use visprm::algorithms::aabb::Rect;
//! use visprm::algorithms::collision::{CollisionOracle, Configuration};
//!
//! let oracle = CollisionOracle::new(vec![Rect::new(300.0, 0.0, 40.0, 480.0)]);
//!
//! let left = Configuration::new((100.0, 240.0), 10.0);
//! let right = Configuration::new((500.0, 240.0), 10.0);
//!
//! assert!(oracle.is_free(&left));
//! assert!(oracle.crosses_obstacle(&left, &right));
//! ```

use super::aabb::{blend, Point, Rect};

/// Number of footprint placements used to check a segment
pub const DEFAULT_COLLISION_SAMPLES: usize = 101;

/// Disc-shaped robot placed at a point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Configuration {
    pub center: Point,
    pub radius: f64,
}

impl Configuration {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Square enclosing the robot disc
    pub fn footprint(&self) -> Rect {
        let side = 2.0 * self.radius;
        Rect::from_center(self.center, side, side)
    }
}

/// Collision checker over a fixed obstacle set
#[derive(Debug, Clone)]
pub struct CollisionOracle {
    obstacles: Vec<Rect>,
    samples: usize,
}

impl CollisionOracle {
    /// Create oracle with the default segment sampling
    pub fn new(obstacles: Vec<Rect>) -> Self {
        Self {
            obstacles,
            samples: DEFAULT_COLLISION_SAMPLES,
        }
    }

    /// Create oracle with a custom number of segment samples (at least 2)
    pub fn with_samples(obstacles: Vec<Rect>, samples: usize) -> Self {
        Self {
            obstacles,
            samples: samples.max(2),
        }
    }

    /// Replace the obstacle set
    pub fn set_obstacles(&mut self, obstacles: Vec<Rect>) {
        self.obstacles = obstacles;
    }

    pub fn obstacles(&self) -> &[Rect] {
        &self.obstacles
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Check that the configuration's footprint overlaps no obstacle
    pub fn is_free(&self, configuration: &Configuration) -> bool {
        let footprint = configuration.footprint();
        !self
            .obstacles
            .iter()
            .any(|obstacle| obstacle.intersects(&footprint))
    }

    /// Check whether sweeping `moving`'s footprint along the segment from
    /// `from` to `moving` hits any obstacle
    pub fn crosses_obstacle(&self, from: &Configuration, moving: &Configuration) -> bool {
        let footprint = moving.footprint();
        let last = (self.samples - 1) as f64;

        for obstacle in &self.obstacles {
            for i in 0..self.samples {
                let u = i as f64 / last;
                let placed = footprint.with_center(blend(from.center, moving.center, u));
                if obstacle.intersects(&placed) {
                    return true;
                }
            }
        }

        false
    }

    /// Two configurations see each other when the segment between them is clear
    pub fn is_visible(&self, a: &Configuration, b: &Configuration) -> bool {
        !self.crosses_obstacle(a, b)
    }
}
