//! Catalog input: ordered top-level requirement sections.

use serde::Deserialize;

use crate::{ModelError, RawRequirement, Requirement};

/// Raw catalog document as stored on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCatalog {
    /// Top-level requirement sections
    #[serde(rename = "requirementSections", default)]
    pub requirement_sections: Vec<RawSection>,

    /// Total credits the degree requires
    #[serde(rename = "totalCreditsRequired", default)]
    pub total_credits_required: u32,
}

/// Raw section entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSection {
    /// Section title
    pub title: String,

    /// Raw requirement entries
    #[serde(default)]
    pub requirements: Vec<RawRequirement>,
}

/// A parsed top-level section: title plus requirement trees.
///
/// Entries that fail to parse become holes recorded in `skipped`; a bad entry
/// never aborts the section or the catalog.
#[derive(Debug, Clone)]
pub struct SectionSpec {
    /// Display title
    pub title: String,

    /// Parsed requirement trees, in catalog order
    pub requirements: Vec<Requirement>,

    /// Parse failures for entries that were skipped
    pub skipped: Vec<ModelError>,
}

impl SectionSpec {
    /// Parse a raw section, keeping going past bad entries.
    pub fn from_raw(raw: &RawSection) -> Self {
        let mut requirements = Vec::with_capacity(raw.requirements.len());
        let mut skipped = Vec::new();
        for entry in &raw.requirements {
            match Requirement::from_raw(entry) {
                Ok(req) => requirements.push(req),
                Err(err) => skipped.push(err),
            }
        }
        Self {
            title: raw.title.clone(),
            requirements,
            skipped,
        }
    }
}

/// A parsed catalog: ordered sections plus the degree credit total.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Ordered top-level sections
    pub sections: Vec<SectionSpec>,

    /// Total credits the degree requires
    pub total_credits_required: u32,
}

impl Catalog {
    /// Parse a raw catalog document.
    pub fn from_raw(raw: &RawCatalog) -> Self {
        Self {
            sections: raw
                .requirement_sections
                .iter()
                .map(SectionSpec::from_raw)
                .collect(),
            total_credits_required: raw.total_credits_required,
        }
    }

    /// Count of entries skipped across all sections.
    pub fn skipped_entries(&self) -> usize {
        self.sections.iter().map(|s| s.skipped.len()).sum()
    }
}
