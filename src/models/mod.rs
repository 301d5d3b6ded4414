//! Route and solution model.
//!
//! - [`Node`] / [`Edge`]: immutable grid waypoints and flight legs
//! - [`Route`]: one drone's closed path with cost and nominal reward
//! - [`Solution`]: the fleet's routes plus nominal and simulated reward
//! - [`Assignment`]: the mutable working copy engines search over

mod assignment;
mod node;
mod route;
mod solution;

pub use assignment::Assignment;
pub use node::{Edge, Node};
pub use route::Route;
pub use solution::Solution;
