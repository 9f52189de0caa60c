//! Path Smoothing
//!
//! Turns the node chain returned by the search into a dense trajectory for
//! playback by linear interpolation between consecutive nodes.
//!
//! # Example
//!
//! ```rust
//! use visprm::algorithms::smoothing::PathSmoother;
//!
//! let smoother = PathSmoother::new();
//! let trajectory = smoother.smooth(&[(0.0, 0.0), (20.0, 0.0), (20.0, 40.0)]);
//!
//! assert_eq!(trajectory.len(), 42);
//! assert_eq!(trajectory[0], (0.0, 0.0));
//! assert_eq!(trajectory[41], (20.0, 40.0));
//! ```

use super::aabb::{blend, Point};

/// Points produced per path segment, both endpoints included
pub const DEFAULT_SMOOTHING_SAMPLES: usize = 21;

/// Linear interpolator over path segments
#[derive(Debug, Clone, Copy)]
pub struct PathSmoother {
    samples: usize,
}

impl Default for PathSmoother {
    fn default() -> Self {
        Self::new()
    }
}

impl PathSmoother {
    pub fn new() -> Self {
        Self {
            samples: DEFAULT_SMOOTHING_SAMPLES,
        }
    }

    /// Create smoother with a custom number of points per segment (at least 2)
    pub fn with_samples(samples: usize) -> Self {
        Self {
            samples: samples.max(2),
        }
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Evenly spaced points running from `p2` to `p1`
    pub fn interpolate(&self, p1: Point, p2: Point) -> Vec<Point> {
        let last = (self.samples - 1) as f64;
        (0..self.samples)
            .map(|i| blend(p1, p2, i as f64 / last))
            .collect()
    }

    /// Smooth a parent-pointer chain given from goal back to init
    ///
    /// The result runs from init to goal. Segments are concatenated as-is,
    /// so each interior node appears twice.
    pub fn smooth_chain(&self, goal_to_init: &[Point]) -> Vec<Point> {
        match goal_to_init {
            [] => Vec::new(),
            [single] => vec![*single],
            chain => {
                let segments: Vec<Vec<Point>> = chain
                    .windows(2)
                    .map(|w| self.interpolate(w[0], w[1]))
                    .collect();
                segments.into_iter().rev().flatten().collect()
            }
        }
    }

    /// Smooth a path given from init to goal
    pub fn smooth(&self, init_to_goal: &[Point]) -> Vec<Point> {
        let chain: Vec<Point> = init_to_goal.iter().rev().copied().collect();
        self.smooth_chain(&chain)
    }
}
