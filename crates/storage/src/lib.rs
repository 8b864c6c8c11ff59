//! File loading for degreeplan inputs.
//!
//! Thin synchronous wrappers around the catalog and prerequisite-corpus JSON
//! files. All parsing semantics live in `degreeplan-core`; this crate only
//! reads files and surfaces data-quality recoveries in the log.

#![warn(missing_docs)]

pub mod json_input;

pub use json_input::{load_catalog, load_corpus, Result, StorageError};
