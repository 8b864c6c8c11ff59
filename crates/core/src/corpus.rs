//! Prerequisite corpus: per-course credit ranges and requirement expressions.

use std::collections::HashMap;

use serde::Deserialize;

use crate::{CourseId, ModelError, RawRequirement, Requirement};

/// Raw course record as it appears in the corpus file.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCourseRecord {
    /// Subject code
    pub subject: String,

    /// Catalog number; accepted as integer or numeric string
    #[serde(rename = "classId", deserialize_with = "crate::requirement::class_id")]
    pub class_id: u16,

    /// Minimum credit value
    #[serde(rename = "minCredits", default)]
    pub min_credits: u32,

    /// Maximum credit value
    #[serde(rename = "maxCredits", default)]
    pub max_credits: u32,

    /// Prerequisite group
    #[serde(default)]
    pub prereqs: Option<RawGroup>,

    /// Corequisite group
    #[serde(default)]
    pub coreqs: Option<RawGroup>,
}

impl RawCourseRecord {
    /// The course identity this record describes.
    pub fn id(&self) -> CourseId {
        CourseId::new(self.subject.clone(), self.class_id)
    }
}

/// A `{type, values}` requirement group from the corpus.
#[derive(Debug, Clone, Deserialize)]
pub struct RawGroup {
    /// Group combinator, `and` or `or` (case-insensitive); defaults to `and`
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    /// Member entries
    #[serde(default)]
    pub values: Vec<RawRequirement>,
}

impl RawGroup {
    /// Convert the group into a requirement expression.
    ///
    /// An empty group means no requirement at all (`None`).
    pub fn to_requirement(&self) -> Result<Option<Requirement>, ModelError> {
        if self.values.is_empty() {
            return Ok(None);
        }
        let children: Vec<Requirement> = self
            .values
            .iter()
            .map(Requirement::from_raw)
            .collect::<Result<_, _>>()?;
        let kind = self.kind.as_deref().unwrap_or("and");
        match kind.to_ascii_lowercase().as_str() {
            "and" => Ok(Some(Requirement::And(children))),
            "or" => Ok(Some(Requirement::Or(children))),
            other => Err(ModelError::InvalidRequirementFormat(format!(
                "unrecognized group type {other:?}"
            ))),
        }
    }
}

/// Hydration data for one course.
#[derive(Debug, Clone, Default)]
pub struct CorpusEntry {
    /// Minimum credit value
    pub min_credits: u32,

    /// Maximum credit value
    pub max_credits: u32,

    /// Prerequisite expression, if any
    pub prereqs: Option<Requirement>,

    /// Corequisite expression, if any
    pub coreqs: Option<Requirement>,
}

impl CorpusEntry {
    /// Credit value used for hydration: the floor midpoint of the range.
    pub fn credits(&self) -> u32 {
        (self.min_credits + self.max_credits) / 2
    }
}

/// The prerequisite corpus, keyed by course identity.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    entries: HashMap<CourseId, CorpusEntry>,
}

impl Corpus {
    /// Create an empty corpus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any previous record for the same course.
    pub fn insert(&mut self, id: CourseId, entry: CorpusEntry) {
        self.entries.insert(id, entry);
    }

    /// Look up the entry for a course.
    pub fn get(&self, id: &CourseId) -> Option<&CorpusEntry> {
        self.entries.get(id)
    }

    /// Number of courses in the corpus.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the corpus has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a corpus from raw records.
    ///
    /// A record whose requirement groups fail to parse is kept with the bad
    /// group dropped, and the failure is reported back alongside the corpus
    /// so the caller can surface it.
    pub fn from_records(records: &[RawCourseRecord]) -> (Self, Vec<(CourseId, ModelError)>) {
        let mut corpus = Self::new();
        let mut issues = Vec::new();
        for record in records {
            let id = record.id();
            let prereqs = match record.prereqs.as_ref().map(RawGroup::to_requirement) {
                Some(Ok(req)) => req,
                Some(Err(err)) => {
                    issues.push((id.clone(), err));
                    None
                }
                None => None,
            };
            let coreqs = match record.coreqs.as_ref().map(RawGroup::to_requirement) {
                Some(Ok(req)) => req,
                Some(Err(err)) => {
                    issues.push((id.clone(), err));
                    None
                }
                None => None,
            };
            corpus.insert(
                id,
                CorpusEntry {
                    min_credits: record.min_credits,
                    max_credits: record.max_credits,
                    prereqs,
                    coreqs,
                },
            );
        }
        (corpus, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_credits_is_floor_midpoint() {
        let entry = CorpusEntry {
            min_credits: 3,
            max_credits: 4,
            ..Default::default()
        };
        assert_eq!(entry.credits(), 3);

        let entry = CorpusEntry {
            min_credits: 4,
            max_credits: 4,
            ..Default::default()
        };
        assert_eq!(entry.credits(), 4);
    }

    #[test]
    fn test_from_records_parses_groups() {
        let records: Vec<RawCourseRecord> = serde_json::from_value(json!([
            {
                "subject": "CS", "classId": 3000,
                "minCredits": 4, "maxCredits": 4,
                "prereqs": {"type": "or", "values": [
                    {"type": "course", "subject": "CS", "classId": 2500},
                    {"type": "course", "subject": "DS", "classId": 2500}
                ]},
                "coreqs": {"type": "and", "values": [
                    {"type": "course", "subject": "CS", "classId": 3001}
                ]}
            }
        ]))
        .unwrap();

        let (corpus, issues) = Corpus::from_records(&records);
        assert!(issues.is_empty());
        let entry = corpus.get(&CourseId::new("CS", 3000)).unwrap();
        assert!(matches!(entry.prereqs, Some(Requirement::Or(_))));
        assert!(matches!(entry.coreqs, Some(Requirement::And(_))));
    }

    #[test]
    fn test_empty_group_is_none() {
        let records: Vec<RawCourseRecord> = serde_json::from_value(json!([
            {
                "subject": "CS", "classId": 2500,
                "minCredits": 4, "maxCredits": 4,
                "prereqs": {"type": "and", "values": []}
            }
        ]))
        .unwrap();

        let (corpus, issues) = Corpus::from_records(&records);
        assert!(issues.is_empty());
        let entry = corpus.get(&CourseId::new("CS", 2500)).unwrap();
        assert!(entry.prereqs.is_none());
        assert!(entry.coreqs.is_none());
    }

    #[test]
    fn test_sentinel_inside_group_values() {
        let records: Vec<RawCourseRecord> = serde_json::from_value(json!([
            {
                "subject": "CS", "classId": 5010,
                "minCredits": 4, "maxCredits": 4,
                "prereqs": {"type": "and", "values": ["Graduate Admission"]}
            }
        ]))
        .unwrap();

        let (corpus, issues) = Corpus::from_records(&records);
        assert!(issues.is_empty());
        let entry = corpus.get(&CourseId::new("CS", 5010)).unwrap();
        assert_eq!(
            entry.prereqs,
            Some(Requirement::And(vec![Requirement::AlwaysSatisfied]))
        );
    }

    #[test]
    fn test_bad_group_degrades_to_none_with_issue() {
        let records: Vec<RawCourseRecord> = serde_json::from_value(json!([
            {
                "subject": "CS", "classId": 4400,
                "minCredits": 4, "maxCredits": 4,
                "prereqs": {"type": "xor", "values": [
                    {"type": "course", "subject": "CS", "classId": 3500}
                ]}
            }
        ]))
        .unwrap();

        let (corpus, issues) = Corpus::from_records(&records);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].0, CourseId::new("CS", 4400));
        let entry = corpus.get(&CourseId::new("CS", 4400)).unwrap();
        assert!(entry.prereqs.is_none());
    }
}
