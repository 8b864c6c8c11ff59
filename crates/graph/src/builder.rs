//! Expands section requirement trees into a deduplicated dependency graph.

use degreeplan_core::{Corpus, CourseId, FullCourse, Requirement, SectionSpec};
use tracing::warn;

use crate::graph::{DependencyGraph, EdgeKind, NodeKey, NodePayload};

/// Errors fatal to graph construction.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The requires-edge relation contains a cycle
    #[error("circular requirement chain: {}", render_cycle(.cycle))]
    CircularRequirement {
        /// The nodes forming the cycle, in order, first repeated last
        cycle: Vec<NodeKey>,
    },
}

fn render_cycle(cycle: &[NodeKey]) -> String {
    cycle
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Builds a [`DependencyGraph`] from parsed sections and the prerequisite
/// corpus.
///
/// Each section becomes a root node; course references are hydrated against
/// the corpus and deduplicated so that exactly one node exists per real
/// course, no matter how many sections or prerequisite chains reference it.
pub struct GraphBuilder<'a> {
    corpus: &'a Corpus,
    graph: DependencyGraph,
}

impl<'a> GraphBuilder<'a> {
    /// Create a builder over a corpus.
    pub fn new(corpus: &'a Corpus) -> Self {
        Self {
            corpus,
            graph: DependencyGraph::new(),
        }
    }

    /// Expand every section and return the finished graph.
    ///
    /// Fails only on a requires-edge cycle; a course missing from the corpus
    /// is recovered locally (zero-requirement hydration plus a warning).
    pub fn build(mut self, sections: &[SectionSpec]) -> Result<DependencyGraph, GraphError> {
        for section in sections {
            let root = self.graph.insert_synthetic(NodePayload::Section {
                title: section.title.clone(),
            });
            self.graph.add_root(root.clone());
            for req in &section.requirements {
                self.expand(&root, req, EdgeKind::Requires);
            }
        }
        self.graph.validate_acyclic()?;
        Ok(self.graph)
    }

    fn expand(&mut self, parent: &NodeKey, req: &Requirement, kind: EdgeKind) {
        match req {
            Requirement::AlwaysSatisfied => {}
            Requirement::Course { subject, number } => {
                let key = self.course_node(CourseId::new(subject.clone(), *number));
                self.graph.add_edge(parent, key, kind);
            }
            Requirement::Full(course) => {
                let key = self.course_node(course.id.clone());
                self.graph.add_edge(parent, key, kind);
            }
            Requirement::And(children) => {
                let node = self.graph.insert_synthetic(NodePayload::And);
                self.graph.add_edge(parent, node.clone(), kind);
                for child in children {
                    self.expand(&node, child, EdgeKind::Requires);
                }
            }
            Requirement::Or(children) => {
                let node = self.graph.insert_synthetic(NodePayload::Or);
                self.graph.add_edge(parent, node.clone(), kind);
                for child in children {
                    self.expand(&node, child, EdgeKind::Requires);
                }
            }
            Requirement::Section { title, children } => {
                let node = self.graph.insert_synthetic(NodePayload::Section {
                    title: title.clone(),
                });
                self.graph.add_edge(parent, node.clone(), kind);
                for child in children {
                    self.expand(&node, child, EdgeKind::Requires);
                }
            }
        }
    }

    /// Insert-or-reuse the node for a course.
    ///
    /// A new course is hydrated from the corpus and its own prereq/coreq
    /// expressions expanded beneath it; an existing node only gains the new
    /// edge, its subtree is never re-expanded. This bounds recursion and
    /// keeps shared prerequisites as one subgraph.
    fn course_node(&mut self, id: CourseId) -> NodeKey {
        let key = NodeKey::Course(id.clone());
        if self.graph.contains(&key) {
            return key;
        }

        let course = self.hydrate(id);
        let prereqs = course.prereqs.clone();
        let coreqs = course.coreqs.clone();
        let key = self.graph.insert_course(course);

        if let Some(expr) = prereqs.as_deref() {
            self.expand(&key, expr, EdgeKind::Requires);
        }
        if let Some(expr) = coreqs.as_deref() {
            self.link_coreqs(&key, expr);
        }
        key
    }

    fn hydrate(&mut self, id: CourseId) -> FullCourse {
        match self.corpus.get(&id) {
            Some(entry) => FullCourse {
                id,
                credits: entry.credits(),
                prereqs: entry.prereqs.clone().map(Box::new),
                coreqs: entry.coreqs.clone().map(Box::new),
            },
            None => {
                warn!(course = %id, "course missing from corpus, hydrating without requirements");
                self.graph.note_missing(id.clone());
                FullCourse {
                    id,
                    credits: 0,
                    prereqs: None,
                    coreqs: None,
                }
            }
        }
    }

    /// Corequisite expressions flatten to their course leaves; each leaf is
    /// paired with the owner by a coreq edge in both directions. A leaf not
    /// yet in the graph is expanded like any other course so its own
    /// prerequisites are represented.
    fn link_coreqs(&mut self, owner: &NodeKey, expr: &Requirement) {
        match expr {
            Requirement::AlwaysSatisfied => {}
            Requirement::Course { subject, number } => {
                self.coreq_pair(owner, CourseId::new(subject.clone(), *number));
            }
            Requirement::Full(course) => {
                self.coreq_pair(owner, course.id.clone());
            }
            Requirement::And(children)
            | Requirement::Or(children)
            | Requirement::Section { children, .. } => {
                for child in children {
                    self.link_coreqs(owner, child);
                }
            }
        }
    }

    fn coreq_pair(&mut self, owner: &NodeKey, id: CourseId) {
        let key = self.course_node(id);
        if key == *owner {
            return;
        }
        self.graph.add_edge(owner, key.clone(), EdgeKind::Coreq);
        self.graph.add_edge(&key, owner.clone(), EdgeKind::Coreq);
    }
}
