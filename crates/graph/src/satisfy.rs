//! Requirement satisfaction evaluation.
//!
//! Pure, side-effect-free queries over a built graph or a requirement tree.
//! Evaluation is total for well-formed inputs; a reference to a node the
//! graph does not contain is a consistency error, never silently true or
//! false.

use std::collections::HashSet;

use degreeplan_core::{CourseId, Requirement};

use crate::graph::{DependencyGraph, EdgeKind, NodeKey, NodePayload};

/// Errors from graph-backed evaluation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EvalError {
    /// The referenced node is not part of the graph
    #[error("unknown node reference: {0}")]
    UnknownNodeReference(NodeKey),
}

/// Decide whether the requirement rooted at `key` is met by `taken`.
///
/// A course node is met iff its id is in `taken` (its own prerequisites are
/// a separate question, see [`prereqs_satisfied`]). And/Section nodes need
/// every requires-child met, an empty child list counts as met. Or nodes
/// need at least one, an empty child list counts as unmet.
pub fn is_satisfied(
    graph: &DependencyGraph,
    key: &NodeKey,
    taken: &HashSet<CourseId>,
) -> Result<bool, EvalError> {
    let node = graph
        .node(key)
        .ok_or_else(|| EvalError::UnknownNodeReference(key.clone()))?;
    match &node.payload {
        NodePayload::Course(course) => Ok(taken.contains(&course.id)),
        NodePayload::And | NodePayload::Section { .. } => {
            for edge in node.edges.iter().filter(|e| e.kind == EdgeKind::Requires) {
                if !is_satisfied(graph, &edge.to, taken)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        NodePayload::Or => {
            for edge in node.edges.iter().filter(|e| e.kind == EdgeKind::Requires) {
                if is_satisfied(graph, &edge.to, taken)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}

/// Decide whether the prerequisites of the course at `key` are met: every
/// requires-child of the course node must be satisfied.
pub fn prereqs_satisfied(
    graph: &DependencyGraph,
    key: &NodeKey,
    taken: &HashSet<CourseId>,
) -> Result<bool, EvalError> {
    let node = graph
        .node(key)
        .ok_or_else(|| EvalError::UnknownNodeReference(key.clone()))?;
    for edge in node.edges.iter().filter(|e| e.kind == EdgeKind::Requires) {
        if !is_satisfied(graph, &edge.to, taken)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Decide whether a requirement expression tree is met by `taken`.
///
/// Callers treat a missing expression (`None`) as trivially satisfied.
pub fn expr_satisfied(expr: &Requirement, taken: &HashSet<CourseId>) -> bool {
    match expr {
        Requirement::AlwaysSatisfied => true,
        Requirement::Course { subject, number } => {
            taken.contains(&CourseId::new(subject.clone(), *number))
        }
        Requirement::Full(course) => taken.contains(&course.id),
        Requirement::And(children) => children.iter().all(|c| expr_satisfied(c, taken)),
        Requirement::Or(children) => children.iter().any(|c| expr_satisfied(c, taken)),
        Requirement::Section { children, .. } => {
            children.iter().all(|c| expr_satisfied(c, taken))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use degreeplan_core::{Corpus, CorpusEntry, SectionSpec};

    fn course(subject: &str, number: u16) -> Requirement {
        Requirement::Course {
            subject: subject.to_string(),
            number,
        }
    }

    fn taken(ids: &[(&str, u16)]) -> HashSet<CourseId> {
        ids.iter().map(|(s, n)| CourseId::new(*s, *n)).collect()
    }

    #[test]
    fn test_expr_and_matches_all() {
        let expr = Requirement::And(vec![course("CS", 2500), course("CS", 2510)]);
        assert!(!expr_satisfied(&expr, &taken(&[("CS", 2500)])));
        assert!(expr_satisfied(
            &expr,
            &taken(&[("CS", 2500), ("CS", 2510)])
        ));
    }

    #[test]
    fn test_expr_or_matches_any() {
        let expr = Requirement::Or(vec![course("CS", 2500), course("DS", 2500)]);
        assert!(expr_satisfied(&expr, &taken(&[("DS", 2500)])));
        assert!(!expr_satisfied(&expr, &taken(&[("MATH", 1341)])));
    }

    #[test]
    fn test_expr_empty_children_edge_cases() {
        assert!(expr_satisfied(&Requirement::And(vec![]), &taken(&[])));
        assert!(!expr_satisfied(&Requirement::Or(vec![]), &taken(&[])));
    }

    #[test]
    fn test_expr_always_satisfied() {
        assert!(expr_satisfied(&Requirement::AlwaysSatisfied, &taken(&[])));
    }

    #[test]
    fn test_expr_hydrated_course_is_membership() {
        let expr = Requirement::Full(degreeplan_core::FullCourse {
            id: CourseId::new("CS", 2500),
            credits: 4,
            prereqs: None,
            coreqs: None,
        });
        assert!(expr_satisfied(&expr, &taken(&[("CS", 2500)])));
        assert!(!expr_satisfied(&expr, &taken(&[])));
    }

    #[test]
    fn test_expr_section_is_and_over_children() {
        let expr = Requirement::Section {
            title: "Core".to_string(),
            children: vec![course("CS", 2500), Requirement::AlwaysSatisfied],
        };
        assert!(expr_satisfied(&expr, &taken(&[("CS", 2500)])));
        assert!(!expr_satisfied(&expr, &taken(&[])));
    }

    #[test]
    fn test_graph_section_satisfaction() {
        let mut corpus = Corpus::new();
        corpus.insert(
            CourseId::new("CS", 2500),
            CorpusEntry {
                min_credits: 4,
                max_credits: 4,
                ..Default::default()
            },
        );
        corpus.insert(
            CourseId::new("CS", 2510),
            CorpusEntry {
                min_credits: 4,
                max_credits: 4,
                prereqs: Some(course("CS", 2500)),
                ..Default::default()
            },
        );

        let sections = vec![SectionSpec {
            title: "Core".to_string(),
            requirements: vec![course("CS", 2500), course("CS", 2510)],
            skipped: Vec::new(),
        }];
        let graph = GraphBuilder::new(&corpus).build(&sections).unwrap();
        let root = graph.roots()[0].clone();

        assert!(!is_satisfied(&graph, &root, &taken(&[("CS", 2500)])).unwrap());
        assert!(
            is_satisfied(&graph, &root, &taken(&[("CS", 2500), ("CS", 2510)])).unwrap()
        );
    }

    #[test]
    fn test_graph_course_membership_ignores_own_prereqs() {
        let mut corpus = Corpus::new();
        corpus.insert(
            CourseId::new("CS", 3500),
            CorpusEntry {
                min_credits: 4,
                max_credits: 4,
                prereqs: Some(course("CS", 2510)),
                ..Default::default()
            },
        );
        corpus.insert(
            CourseId::new("CS", 2510),
            CorpusEntry {
                min_credits: 4,
                max_credits: 4,
                ..Default::default()
            },
        );

        let sections = vec![SectionSpec {
            title: "Core".to_string(),
            requirements: vec![course("CS", 3500)],
            skipped: Vec::new(),
        }];
        let graph = GraphBuilder::new(&corpus).build(&sections).unwrap();
        let key = NodeKey::Course(CourseId::new("CS", 3500));

        // membership, not prerequisite completion
        assert!(is_satisfied(&graph, &key, &taken(&[("CS", 3500)])).unwrap());
        assert!(!prereqs_satisfied(&graph, &key, &taken(&[("CS", 3500)])).unwrap());
        assert!(prereqs_satisfied(&graph, &key, &taken(&[("CS", 2510)])).unwrap());
    }

    #[test]
    fn test_unknown_node_reference_is_an_error() {
        let graph = GraphBuilder::new(&Corpus::new()).build(&[]).unwrap();
        let key = NodeKey::Course(CourseId::new("CS", 2500));
        let err = is_satisfied(&graph, &key, &taken(&[])).unwrap_err();
        assert!(matches!(err, EvalError::UnknownNodeReference(_)));
    }

    #[test]
    fn test_empty_section_root_is_satisfied() {
        let sections = vec![SectionSpec {
            title: "Empty".to_string(),
            requirements: vec![],
            skipped: Vec::new(),
        }];
        let graph = GraphBuilder::new(&Corpus::new()).build(&sections).unwrap();
        assert!(is_satisfied(&graph, &graph.roots()[0], &taken(&[])).unwrap());
    }
}
