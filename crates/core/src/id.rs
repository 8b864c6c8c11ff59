//! Course identity.

use serde::{Deserialize, Serialize};

/// Identity of a real course: subject code plus catalog number.
///
/// Used both as a graph node identity and as the membership key for sets of
/// completed courses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CourseId {
    /// Subject code, e.g. `"CS"`
    pub subject: String,

    /// Catalog number, e.g. `2500`
    pub number: u16,
}

impl CourseId {
    /// Create a new course id.
    pub fn new(subject: impl Into<String>, number: u16) -> Self {
        Self {
            subject: subject.into(),
            number,
        }
    }
}

impl std::fmt::Display for CourseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.subject, self.number)
    }
}

impl std::str::FromStr for CourseId {
    type Err = ParseCourseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (subject, number) = s
            .trim()
            .rsplit_once(' ')
            .ok_or_else(|| ParseCourseIdError(s.to_string()))?;
        let number = number
            .parse()
            .map_err(|_| ParseCourseIdError(s.to_string()))?;
        Ok(Self::new(subject, number))
    }
}

/// Error parsing a course id from text.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid course id {0:?}, expected \"SUBJECT NUMBER\"")]
pub struct ParseCourseIdError(String);
