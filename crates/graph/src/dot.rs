//! DOT rendering of a dependency graph, for external visualization tooling.

use std::fmt::Write;

use crate::graph::{DependencyGraph, EdgeKind, NodeKey, NodePayload};

fn dot_id(key: &NodeKey) -> String {
    match key {
        NodeKey::Course(id) => format!("\"{} {}\"", id.subject, id.number),
        NodeKey::Synthetic(id) => format!("\"syn{}\"", id.0),
    }
}

/// Render the graph as DOT text.
///
/// Requires edges are solid, coreq edges dashed. Output is deterministic for
/// a given graph (node insertion order).
pub fn to_dot(graph: &DependencyGraph) -> String {
    let mut out = String::from("digraph requirements {\n");
    for node in graph.nodes() {
        let label = match &node.payload {
            NodePayload::Course(course) => {
                format!("{}\\n{} cr", course.id, course.credits)
            }
            NodePayload::And => "AND".to_string(),
            NodePayload::Or => "OR".to_string(),
            NodePayload::Section { title } => title.clone(),
        };
        let shape = match &node.payload {
            NodePayload::Course(_) => "ellipse",
            NodePayload::Section { .. } => "box",
            NodePayload::And | NodePayload::Or => "diamond",
        };
        let _ = writeln!(
            out,
            "    {} [label=\"{}\", shape={}];",
            dot_id(&node.key),
            label,
            shape
        );
    }
    for (from, edge) in graph.edges() {
        let style = match edge.kind {
            EdgeKind::Requires => "",
            EdgeKind::Coreq => " [style=dashed]",
        };
        let _ = writeln!(out, "    {} -> {}{};", dot_id(from), dot_id(&edge.to), style);
    }
    out.push_str("}\n");
    out
}
