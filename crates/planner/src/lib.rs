//! Greedy semester planning over a requirement dependency graph.
//!
//! The planner runs in rounds; each round fills one semester under the
//! credit cap, then folds its courses into the taken set for the next round.
//! It is an explicitly greedy heuristic search, not a shortest-path search:
//! the produced plan satisfies every section when one is reachable, with no
//! minimality guarantee on semester count.

#![warn(missing_docs)]

pub mod plan;
pub mod scheduler;

pub use plan::{Plan, PlanStatus, Semester};
pub use scheduler::{PlanError, Planner, PlannerConfig};
