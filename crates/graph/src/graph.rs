//! The deduplicated requirement dependency graph.

use std::collections::HashMap;

use degreeplan_core::{CourseId, FullCourse};

use crate::builder::GraphError;

/// Surrogate key for a synthetic (And/Or/Section) node.
///
/// Assigned by the graph arena at insertion time; independent of any display
/// label, stable across runs for the same input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SyntheticId(pub(crate) u32);

impl std::fmt::Display for SyntheticId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of a graph node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKey {
    /// A real course; exactly one node exists per course id
    Course(CourseId),
    /// A synthetic combinator node; never merged with another
    Synthetic(SyntheticId),
}

impl std::fmt::Display for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Course(id) => id.fmt(f),
            Self::Synthetic(id) => id.fmt(f),
        }
    }
}

/// Edge relation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// The parent needs the child satisfied
    Requires,
    /// Same-semester pairing; present in both directions
    Coreq,
}

/// A directed edge to another node.
#[derive(Debug, Clone)]
pub struct Edge {
    /// Target node
    pub to: NodeKey,
    /// Relation kind
    pub kind: EdgeKind,
}

/// Payload carried by a graph node.
#[derive(Debug, Clone)]
pub enum NodePayload {
    /// A hydrated course
    Course(FullCourse),
    /// Satisfied iff every requires-child is satisfied
    And,
    /// Satisfied iff at least one requires-child is satisfied
    Or,
    /// Named grouping with `And` semantics; always a root
    Section {
        /// Display title
        title: String,
    },
}

/// A graph node: identity, payload, and outgoing edges.
#[derive(Debug, Clone)]
pub struct Node {
    /// Node identity
    pub key: NodeKey,
    /// Payload
    pub payload: NodePayload,
    /// Outgoing edges, in insertion order
    pub edges: Vec<Edge>,
}

/// Directed graph of requirement nodes.
///
/// Nodes live in an insertion-ordered arena with a key index on top, so
/// iteration order is the catalog encounter order and lookups stay O(1).
/// Mutation is crate-internal: a graph escapes the builder only after
/// validation and is read-only from then on.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: Vec<Node>,
    index: HashMap<NodeKey, usize>,
    roots: Vec<NodeKey>,
    missing: Vec<CourseId>,
    next_synthetic: u32,
}

impl DependencyGraph {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Insert a hydrated course node. The caller checks for an existing node
    /// first; a duplicate insert would break the one-node-per-course
    /// invariant.
    pub(crate) fn insert_course(&mut self, course: FullCourse) -> NodeKey {
        let key = NodeKey::Course(course.id.clone());
        debug_assert!(!self.index.contains_key(&key));
        self.index.insert(key.clone(), self.nodes.len());
        self.nodes.push(Node {
            key: key.clone(),
            payload: NodePayload::Course(course),
            edges: Vec::new(),
        });
        key
    }

    /// Insert a synthetic node, assigning it a fresh surrogate key.
    pub(crate) fn insert_synthetic(&mut self, payload: NodePayload) -> NodeKey {
        let key = NodeKey::Synthetic(SyntheticId(self.next_synthetic));
        self.next_synthetic += 1;
        self.index.insert(key.clone(), self.nodes.len());
        self.nodes.push(Node {
            key: key.clone(),
            payload,
            edges: Vec::new(),
        });
        key
    }

    /// Add an edge, ignoring an exact duplicate.
    pub(crate) fn add_edge(&mut self, from: &NodeKey, to: NodeKey, kind: EdgeKind) {
        debug_assert!(self.index.contains_key(from));
        let Some(&idx) = self.index.get(from) else {
            return;
        };
        let edges = &mut self.nodes[idx].edges;
        if edges.iter().any(|e| e.to == to && e.kind == kind) {
            return;
        }
        edges.push(Edge { to, kind });
    }

    pub(crate) fn add_root(&mut self, key: NodeKey) {
        self.roots.push(key);
    }

    pub(crate) fn note_missing(&mut self, id: CourseId) {
        self.missing.push(id);
    }

    /// Look up a node by key.
    pub fn node(&self, key: &NodeKey) -> Option<&Node> {
        self.index.get(key).map(|&idx| &self.nodes[idx])
    }

    /// Whether a node with this key exists.
    pub fn contains(&self, key: &NodeKey) -> bool {
        self.index.contains_key(key)
    }

    /// All nodes, in insertion (catalog encounter) order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Section root keys, in catalog order.
    pub fn roots(&self) -> &[NodeKey] {
        &self.roots
    }

    /// Courses that had no corpus entry and were hydrated without
    /// requirements.
    pub fn missing_courses(&self) -> &[CourseId] {
        &self.missing
    }

    /// Look up a hydrated course by id.
    pub fn course(&self, id: &CourseId) -> Option<&FullCourse> {
        match &self.node(&NodeKey::Course(id.clone()))?.payload {
            NodePayload::Course(course) => Some(course),
            _ => None,
        }
    }

    /// All hydrated courses, in insertion order.
    pub fn courses(&self) -> impl Iterator<Item = &FullCourse> {
        self.nodes.iter().filter_map(|n| match &n.payload {
            NodePayload::Course(course) => Some(course),
            _ => None,
        })
    }

    /// All edges as `(from, edge)` pairs, in node insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&NodeKey, &Edge)> {
        self.nodes
            .iter()
            .flat_map(|n| n.edges.iter().map(move |e| (&n.key, e)))
    }

    /// Verify the requires-edge relation is acyclic.
    ///
    /// Coreq edges are exempt: they are symmetric by construction. A cycle
    /// here is a data-quality defect in the corpus and fatal to the build.
    pub(crate) fn validate_acyclic(&self) -> Result<(), GraphError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            White,
            Grey,
            Black,
        }

        fn visit(
            graph: &DependencyGraph,
            idx: usize,
            marks: &mut [Mark],
            path: &mut Vec<NodeKey>,
        ) -> Result<(), GraphError> {
            marks[idx] = Mark::Grey;
            path.push(graph.nodes[idx].key.clone());
            for edge in &graph.nodes[idx].edges {
                if edge.kind != EdgeKind::Requires {
                    continue;
                }
                let Some(&next) = graph.index.get(&edge.to) else {
                    continue;
                };
                match marks[next] {
                    Mark::Black => {}
                    Mark::White => visit(graph, next, marks, path)?,
                    Mark::Grey => {
                        let start = path
                            .iter()
                            .position(|k| *k == edge.to)
                            .unwrap_or(0);
                        let mut cycle: Vec<NodeKey> = path[start..].to_vec();
                        cycle.push(edge.to.clone());
                        return Err(GraphError::CircularRequirement { cycle });
                    }
                }
            }
            path.pop();
            marks[idx] = Mark::Black;
            Ok(())
        }

        let mut marks = vec![Mark::White; self.nodes.len()];
        let mut path = Vec::new();
        for idx in 0..self.nodes.len() {
            if marks[idx] == Mark::White {
                visit(self, idx, &mut marks, &mut path)?;
            }
        }
        Ok(())
    }
}
