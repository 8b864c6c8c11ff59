//! Requirement expressions and the structural parser for raw catalog entries.

use serde::{Deserialize, Serialize};

use crate::CourseId;

/// Catalog sentinel text that gates on admission status rather than a course.
///
/// Parses to [`Requirement::AlwaysSatisfied`], never to a course reference.
pub const GRADUATE_ADMISSION: &str = "Graduate Admission";

/// A hydrated course: identity, credit value, and its own requirement
/// expressions resolved from the prerequisite corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullCourse {
    /// Course identity
    pub id: CourseId,

    /// Credit value (floor midpoint of the corpus credit range)
    pub credits: u32,

    /// Prerequisite expression, if the corpus declares one
    pub prereqs: Option<Box<Requirement>>,

    /// Corequisite expression, if the corpus declares one
    pub coreqs: Option<Box<Requirement>>,
}

/// A boolean requirement expression over courses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Requirement {
    /// Unhydrated reference to a course
    Course {
        /// Subject code
        subject: String,
        /// Catalog number
        number: u16,
    },

    /// Hydrated course carrying credits and its own expressions
    Full(FullCourse),

    /// Satisfied iff every child is satisfied; empty means satisfied
    And(Vec<Requirement>),

    /// Satisfied iff at least one child is satisfied; empty means not
    Or(Vec<Requirement>),

    /// Named grouping with `And` semantics over its children
    Section {
        /// Display title
        title: String,
        /// Member requirements
        children: Vec<Requirement>,
    },

    /// Sentinel requirement that holds unconditionally and contributes no
    /// graph node
    AlwaysSatisfied,
}

impl Requirement {
    /// Parse a raw catalog entry into a requirement expression.
    ///
    /// Purely structural: no corpus lookup, no graph mutation. The admission
    /// sentinel maps to [`Requirement::AlwaysSatisfied`]; any other bare
    /// string, and any unrecognized type tag, is a format error.
    pub fn from_raw(raw: &RawRequirement) -> Result<Self, ModelError> {
        match raw {
            RawRequirement::Text(s) if s == GRADUATE_ADMISSION => Ok(Self::AlwaysSatisfied),
            RawRequirement::Text(s) => Err(ModelError::InvalidRequirementFormat(format!(
                "bare string {s:?}"
            ))),
            RawRequirement::Entry(entry) => Self::from_entry(entry),
        }
    }

    fn from_entry(entry: &RawEntry) -> Result<Self, ModelError> {
        match entry.kind.to_ascii_lowercase().as_str() {
            "course" | "full_course" => {
                let subject = entry.subject.clone().ok_or_else(|| {
                    ModelError::InvalidRequirementFormat("course entry without subject".into())
                })?;
                let number = entry.class_id.ok_or_else(|| {
                    ModelError::InvalidRequirementFormat("course entry without classId".into())
                })?;
                Ok(Self::Course { subject, number })
            }
            "and" => Ok(Self::And(Self::children_of(entry)?)),
            "or" => Ok(Self::Or(Self::children_of(entry)?)),
            "section" => Ok(Self::Section {
                title: entry.title.clone().unwrap_or_default(),
                children: Self::children_of(entry)?,
            }),
            other => Err(ModelError::InvalidRequirementFormat(format!(
                "unrecognized type {other:?}"
            ))),
        }
    }

    /// Child entries live under `courses`, `values`, or (for sections)
    /// `requirements`, depending on the producer.
    fn children_of(entry: &RawEntry) -> Result<Vec<Requirement>, ModelError> {
        let raw_children = entry
            .courses
            .as_deref()
            .or(entry.values.as_deref())
            .or(entry.requirements.as_deref())
            .unwrap_or(&[]);
        raw_children.iter().map(Self::from_raw).collect()
    }
}

/// Errors raised while parsing raw requirement entries.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelError {
    /// The entry is not one of the recognized forms
    #[error("invalid requirement format: {0}")]
    InvalidRequirementFormat(String),
}

/// A raw requirement entry as it appears in catalog and corpus JSON: either a
/// bare string (only the admission sentinel is legal) or a tagged object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawRequirement {
    /// A bare string entry
    Text(String),
    /// A tagged object entry
    Entry(RawEntry),
}

/// Object form of a raw requirement entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEntry {
    /// Declared type tag: course, full_course, and, or, section
    #[serde(rename = "type")]
    pub kind: String,

    /// Subject code, for course entries
    #[serde(default)]
    pub subject: Option<String>,

    /// Catalog number, for course entries; accepted as integer or numeric
    /// string
    #[serde(rename = "classId", default, deserialize_with = "opt_class_id")]
    pub class_id: Option<u16>,

    /// Child entries under the `courses` key
    #[serde(default)]
    pub courses: Option<Vec<RawRequirement>>,

    /// Child entries under the `values` key
    #[serde(default)]
    pub values: Option<Vec<RawRequirement>>,

    /// Section title
    #[serde(default)]
    pub title: Option<String>,

    /// Section child entries
    #[serde(default)]
    pub requirements: Option<Vec<RawRequirement>>,
}

/// Accept a catalog number as either a JSON integer or a numeric string.
pub(crate) fn class_id<'de, D>(de: D) -> Result<u16, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u16),
        Text(String),
    }

    match Raw::deserialize(de)? {
        Raw::Num(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn opt_class_id<'de, D>(de: D) -> Result<Option<u16>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u16),
        Text(String),
    }

    match Option::<Raw>::deserialize(de)? {
        None => Ok(None),
        Some(Raw::Num(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) => s.trim().parse().map(Some).map_err(serde::de::Error::custom),
    }
}
