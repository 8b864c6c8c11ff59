//! JSON file loading for the catalog and the prerequisite corpus.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use degreeplan_core::{Catalog, Corpus, RawCatalog, RawCourseRecord};
use serde::Deserialize;
use tracing::warn;

/// Result type for loading operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur while loading input files.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The corpus file has no data for the requested school
    #[error("no corpus data for school {0:?}")]
    MissingSchool(String),
}

/// Corpus file layout: per-school course lists.
#[derive(Debug, Deserialize)]
struct RawCorpusFile(HashMap<String, RawSchool>);

#[derive(Debug, Deserialize)]
struct RawSchool {
    #[serde(default)]
    classes: Vec<RawCourseRecord>,
}

/// Load and parse a catalog file.
///
/// Unparsable requirement entries are skipped with a warning; they never
/// fail the load.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog> {
    let text = fs::read_to_string(path)?;
    let raw: RawCatalog = serde_json::from_str(&text)?;
    let catalog = Catalog::from_raw(&raw);
    for section in &catalog.sections {
        for err in &section.skipped {
            warn!(section = %section.title, error = %err, "skipped catalog entry");
        }
    }
    Ok(catalog)
}

/// Load the corpus for one school from a corpus file.
///
/// A malformed requirement group inside a course record is dropped with a
/// warning; the record itself is kept.
pub fn load_corpus(path: impl AsRef<Path>, school: &str) -> Result<Corpus> {
    let text = fs::read_to_string(path)?;
    let raw: RawCorpusFile = serde_json::from_str(&text)?;
    let school_data = raw
        .0
        .get(school)
        .ok_or_else(|| StorageError::MissingSchool(school.to_string()))?;
    let (corpus, issues) = Corpus::from_records(&school_data.classes);
    for (id, err) in &issues {
        warn!(course = %id, error = %err, "dropped malformed corpus requirement group");
    }
    Ok(corpus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use degreeplan_core::CourseId;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "catalog.json",
            r#"{
                "requirementSections": [
                    {"title": "Core", "requirements": [
                        {"type": "course", "subject": "CS", "classId": 2500},
                        {"type": "wat"}
                    ]}
                ],
                "totalCreditsRequired": 134
            }"#,
        );

        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.total_credits_required, 134);
        assert_eq!(catalog.sections.len(), 1);
        assert_eq!(catalog.sections[0].requirements.len(), 1);
        assert_eq!(catalog.skipped_entries(), 1);
    }

    #[test]
    fn test_load_corpus_for_school() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "corpus.json",
            r#"{
                "neu": {
                    "classes": [
                        {
                            "subject": "CS", "classId": "2500",
                            "minCredits": 4, "maxCredits": 4,
                            "prereqs": {"type": "and", "values": []},
                            "coreqs": {"type": "and", "values": []}
                        }
                    ]
                }
            }"#,
        );

        let corpus = load_corpus(&path, "neu").unwrap();
        assert_eq!(corpus.len(), 1);
        let entry = corpus.get(&CourseId::new("CS", 2500)).unwrap();
        assert_eq!(entry.credits(), 4);

        let err = load_corpus(&path, "other").unwrap_err();
        assert!(matches!(err, StorageError::MissingSchool(_)));
    }

    #[test]
    fn test_load_corpus_missing_file() {
        let err = load_corpus("/nonexistent/corpus.json", "neu").unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
    }
}
