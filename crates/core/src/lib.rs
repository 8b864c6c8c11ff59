//! Degreeplan core data models.
//!
//! This crate defines the requirement expression model, the catalog and
//! prerequisite-corpus input types, and the structural parser that turns raw
//! catalog entries into requirement trees. Everything here is pure data:
//! graph construction and scheduling live in the downstream crates.

#![warn(missing_docs)]

// Course identity
mod id;

// Requirement expressions and raw-entry parsing
mod requirement;

// Catalog and corpus inputs
mod catalog;
mod corpus;

// Re-exports
pub use id::{CourseId, ParseCourseIdError};

pub use requirement::{
    FullCourse, ModelError, RawEntry, RawRequirement, Requirement, GRADUATE_ADMISSION,
};

pub use catalog::{Catalog, RawCatalog, RawSection, SectionSpec};
pub use corpus::{Corpus, CorpusEntry, RawCourseRecord, RawGroup};
