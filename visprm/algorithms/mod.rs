//! Pure computational algorithms for visibility roadmap planning
//!
//! No I/O and no shared state: every stage takes what it needs by reference
//! and can be driven on its own.
//!
//! # Pipeline
//!
//! - **aabb**: points, rectangles and rectangle overlap
//! - **collision**: free-configuration and swept-segment tests against obstacles
//! - **visibility**: guard/connection classification that grows the roadmap
//! - **roadmap**: node pool, adjacency and init/goal insertion
//! - **astar**: shortest path over the recorded adjacency
//! - **smoothing**: dense interpolated trajectory for playback

pub mod aabb;
pub mod astar;
pub mod collision;
pub mod roadmap;
pub mod smoothing;
pub mod visibility;
