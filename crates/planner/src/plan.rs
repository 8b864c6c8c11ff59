//! Plan output types.

use degreeplan_core::CourseId;
use serde::Serialize;

/// One semester: the chosen courses and their combined credit load.
#[derive(Debug, Clone, Serialize)]
pub struct Semester {
    /// Courses placed in this semester, in pick order
    pub courses: Vec<CourseId>,

    /// Combined credits; never above the planner's cap
    pub total_credits: u32,
}

/// Final status of a planning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlanStatus {
    /// Every section is satisfied
    Complete,

    /// A round made no progress while sections remain unsatisfied
    Incomplete {
        /// Sections still unsatisfied when planning stalled
        unsatisfied_sections: usize,
    },

    /// The defensive round bound was hit before completion
    RoundLimitExceeded {
        /// Sections still unsatisfied at the bound
        unsatisfied_sections: usize,
    },
}

/// An ordered semester-by-semester course plan.
///
/// Built one semester per scheduling round; immutable once the run
/// terminates.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    /// Semesters in order
    pub semesters: Vec<Semester>,

    /// How the run ended
    pub status: PlanStatus,

    /// Degree credit total the caller asked for; carried for reporting
    pub required_credits: u32,
}

impl Plan {
    /// Total credits across all semesters.
    pub fn earned_credits(&self) -> u32 {
        self.semesters.iter().map(|s| s.total_credits).sum()
    }

    /// Whether the run satisfied every section.
    pub fn is_complete(&self) -> bool {
        matches!(self.status, PlanStatus::Complete)
    }
}
