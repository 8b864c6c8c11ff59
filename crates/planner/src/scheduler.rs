//! The greedy round scheduler.

use std::collections::HashSet;

use degreeplan_core::CourseId;
use degreeplan_graph::{
    is_satisfied, prereqs_satisfied, DependencyGraph, EdgeKind, EvalError, NodeKey, NodePayload,
};
use tracing::debug;

use crate::plan::{Plan, PlanStatus, Semester};

/// Assumed course count per semester when translating unmet sections into
/// remaining time.
const AVERAGE_COURSES_PER_SEMESTER: f64 = 4.0;

/// Credit total treated as a full load by the heuristic.
const FULL_LOAD_CREDITS: u32 = 18;

/// Planner errors: consistency problems surfaced by the evaluator.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// Satisfaction evaluation failed
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Tunables for a planning run.
#[derive(Debug, Clone, Copy)]
pub struct PlannerConfig {
    /// Per-semester credit cap
    pub credit_cap: u32,

    /// Defensive bound on scheduling rounds
    pub max_rounds: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            credit_cap: 18,
            max_rounds: 32,
        }
    }
}

impl PlannerConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-semester credit cap.
    pub fn with_credit_cap(mut self, cap: u32) -> Self {
        self.credit_cap = cap;
        self
    }

    /// Set the round bound.
    pub fn with_max_rounds(mut self, rounds: usize) -> Self {
        self.max_rounds = rounds;
        self
    }
}

/// Greedy semester planner over a built dependency graph.
///
/// Each round produces one semester: the planner repeatedly scans the
/// untaken courses in graph insertion order, keeps those whose prerequisites
/// were complete before the round began and whose corequisite unit fits
/// under the cap, and adds the unit with the lowest heuristic value. Rounds
/// are strictly sequential; the graph is never mutated.
pub struct Planner<'a> {
    graph: &'a DependencyGraph,
    config: PlannerConfig,
}

impl<'a> Planner<'a> {
    /// Create a planner with the default configuration.
    pub fn new(graph: &'a DependencyGraph) -> Self {
        Self {
            graph,
            config: PlannerConfig::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    /// Produce a plan that tries to satisfy every section root.
    ///
    /// Terminates when every section is satisfied (`Complete`), when a round
    /// schedules nothing (`Incomplete`, the empty semester is kept), or when
    /// the round bound is hit (`RoundLimitExceeded`).
    pub fn plan(
        &self,
        starting: &HashSet<CourseId>,
        required_credits: u32,
    ) -> Result<Plan, PlanError> {
        let mut taken = starting.clone();
        let mut credits_overall = self.credits_of(&taken);
        let mut semesters: Vec<Semester> = Vec::new();

        let status = loop {
            let unsatisfied = self.unsatisfied_sections(&taken)?;
            if unsatisfied == 0 {
                break PlanStatus::Complete;
            }
            if semesters.len() >= self.config.max_rounds {
                break PlanStatus::RoundLimitExceeded {
                    unsatisfied_sections: unsatisfied,
                };
            }

            let semester = self.schedule_round(&taken, credits_overall)?;
            let stalled = semester.courses.is_empty();
            for id in &semester.courses {
                taken.insert(id.clone());
            }
            credits_overall += semester.total_credits;
            debug!(
                round = semesters.len(),
                courses = semester.courses.len(),
                credits = semester.total_credits,
                "scheduled semester"
            );
            semesters.push(semester);

            if stalled {
                break PlanStatus::Incomplete {
                    unsatisfied_sections: unsatisfied,
                };
            }
        };

        Ok(Plan {
            semesters,
            status,
            required_credits,
        })
    }

    /// Fill one semester against a fixed round-start taken set.
    fn schedule_round(
        &self,
        taken: &HashSet<CourseId>,
        credits_overall: u32,
    ) -> Result<Semester, PlanError> {
        let mut courses: Vec<CourseId> = Vec::new();
        let mut chosen: HashSet<CourseId> = HashSet::new();
        let mut round_credits = 0u32;

        loop {
            // Satisfaction base for the heuristic: everything taken so far
            // plus this round's picks.
            let mut base = taken.clone();
            base.extend(chosen.iter().cloned());
            let unsat_before = self.unsatisfied_sections(&base)?;

            let mut best: Option<(Vec<(CourseId, u32)>, f64)> = None;
            for node in self.graph.nodes() {
                let NodePayload::Course(course) = &node.payload else {
                    continue;
                };
                if taken.contains(&course.id) || chosen.contains(&course.id) {
                    continue;
                }
                // Prerequisites must be complete before the round begins,
                // not merely picked earlier in it.
                if !prereqs_satisfied(self.graph, &node.key, taken)? {
                    continue;
                }
                let Some(unit) = self.coreq_unit(&course.id, taken, &chosen)? else {
                    continue;
                };
                let unit_credits: u32 = unit.iter().map(|(_, c)| *c).sum();
                if round_credits + unit_credits > self.config.credit_cap {
                    continue;
                }
                let h = self.heuristic(
                    &base,
                    unsat_before,
                    credits_overall + round_credits,
                    &unit,
                )?;
                // strict less-than keeps the first candidate on ties
                if best.as_ref().map_or(true, |(_, best_h)| h < *best_h) {
                    best = Some((unit, h));
                }
            }

            let Some((unit, _)) = best else {
                break;
            };
            for (id, credits) in unit {
                round_credits += credits;
                chosen.insert(id.clone());
                courses.push(id);
            }
        }

        Ok(Semester {
            courses,
            total_credits: round_credits,
        })
    }

    /// The candidate plus the transitive closure of its not-yet-taken
    /// corequisites, to be scheduled as one atomic unit.
    ///
    /// Returns `None` when some member of the unit has unmet prerequisites:
    /// a corequisite that cannot be added this round blocks the whole unit.
    fn coreq_unit(
        &self,
        id: &CourseId,
        taken: &HashSet<CourseId>,
        chosen: &HashSet<CourseId>,
    ) -> Result<Option<Vec<(CourseId, u32)>>, PlanError> {
        let mut unit: Vec<(CourseId, u32)> = Vec::new();
        let mut seen: HashSet<CourseId> = HashSet::new();
        let mut stack = vec![id.clone()];

        while let Some(id) = stack.pop() {
            if !seen.insert(id.clone()) {
                continue;
            }
            if taken.contains(&id) || chosen.contains(&id) {
                continue;
            }
            let key = NodeKey::Course(id.clone());
            let Some(course) = self.graph.course(&id) else {
                continue;
            };
            if !prereqs_satisfied(self.graph, &key, taken)? {
                return Ok(None);
            }
            unit.push((id.clone(), course.credits));
            if let Some(node) = self.graph.node(&key) {
                for edge in node.edges.iter().filter(|e| e.kind == EdgeKind::Coreq) {
                    if let NodeKey::Course(coreq_id) = &edge.to {
                        stack.push(coreq_id.clone());
                    }
                }
            }
        }
        Ok(Some(unit))
    }

    /// Estimated remaining work if the unit were added; lower is better.
    ///
    /// Unmet-section delta over the per-semester course average, minus the
    /// credit overflow past a full load. Deliberately ignores how many other
    /// courses a pick unlocks and the corequisite contribution; ties fall to
    /// the first candidate in graph order.
    fn heuristic(
        &self,
        base: &HashSet<CourseId>,
        unsat_before: usize,
        credits_base: u32,
        unit: &[(CourseId, u32)],
    ) -> Result<f64, PlanError> {
        let mut with_unit = base.clone();
        for (id, _) in unit {
            with_unit.insert(id.clone());
        }
        let unsat_after = self.unsatisfied_sections(&with_unit)?;
        let remaining =
            unsat_after.saturating_sub(unsat_before) as f64 / AVERAGE_COURSES_PER_SEMESTER;

        let unit_credits: u32 = unit.iter().map(|(_, c)| *c).sum();
        let overflow = (credits_base + unit_credits).saturating_sub(FULL_LOAD_CREDITS);
        Ok(remaining - f64::from(overflow) / f64::from(FULL_LOAD_CREDITS))
    }

    fn unsatisfied_sections(&self, taken: &HashSet<CourseId>) -> Result<usize, PlanError> {
        let mut count = 0;
        for root in self.graph.roots() {
            if !is_satisfied(self.graph, root, taken)? {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Credits of an arbitrary taken set, counting only courses the graph
    /// knows about.
    fn credits_of(&self, taken: &HashSet<CourseId>) -> u32 {
        taken
            .iter()
            .filter_map(|id| self.graph.course(id))
            .map(|c| c.credits)
            .sum()
    }
}
