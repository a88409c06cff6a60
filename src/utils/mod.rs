//! # Utilities Module
//!
//! The stateless engines that run over a grid: pathfinding, visibility, and
//! the interpolation helpers used by noise synthesis.

pub mod math;
pub mod pathfinding;
pub mod visibility;

pub use math::*;
pub use pathfinding::*;
pub use visibility::*;
