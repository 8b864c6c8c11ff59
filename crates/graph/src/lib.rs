//! Dependency graph construction and satisfaction evaluation.
//!
//! [`GraphBuilder`] expands parsed requirement sections into one deduplicated
//! [`DependencyGraph`], hydrating course references against the prerequisite
//! corpus. The graph is built once per catalog+corpus pair and read-only
//! afterwards; the evaluator and the planner only query it.

#![warn(missing_docs)]

pub mod builder;
pub mod dot;
pub mod graph;
pub mod satisfy;

pub use builder::{GraphBuilder, GraphError};
pub use dot::to_dot;
pub use graph::{DependencyGraph, Edge, EdgeKind, Node, NodeKey, NodePayload, SyntheticId};
pub use satisfy::{expr_satisfied, is_satisfied, prereqs_satisfied, EvalError};
