//! # VISPRM
//!
//! Visibility-based probabilistic roadmap planner for a square-footprint
//! robot among axis-aligned rectangular obstacles.
//!
//! ## Structure
//!
//! ```text
//! visprm/
//! ── algorithms/     # Geometry, collision, roadmap, visibility sampling, A*, smoothing
//! ── config.rs       # PlannerConfig (TOML / YAML)
//! ── error.rs        # PlanningError
//! ── planner.rs      # VisibilityPrm session
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use visprm::{PlannerConfig, VisibilityPrm};
//!
//! let config = PlannerConfig {
//!     seed: Some(7),
//!     ..PlannerConfig::open_map()
//! };
//! let mut prm = VisibilityPrm::new(config).unwrap();
//!
//! match prm.plan() {
//!     Ok(planned) => assert_eq!(planned.smoothed.first(), Some(&(50.0, 50.0))),
//!     Err(err) if err.is_insufficient_connectivity() => {
//!         // Denser roadmap: raise max_failures, or reset and grow again
//!     }
//!     Err(err) => panic!("{err}"),
//! }
//! ```
//!
//! Rendering, input handling and obstacle layout generation are left to the
//! host; the crate only needs the obstacle rectangles.

pub mod algorithms;
pub mod config;
pub mod error;
pub mod planner;

pub use algorithms::aabb::{Point, Rect};
pub use algorithms::roadmap::{NodeId, NodeRole, QueryKind, Roadmap};
pub use algorithms::visibility::{RoundSummary, SampleOutcome, SampleRole};
pub use config::PlannerConfig;
pub use error::{PlanningError, PlanningResult};
pub use planner::{PlannedPath, VisibilityPrm};
