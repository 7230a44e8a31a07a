//! Job-posting records and their conversion into indexable documents.
//!
//! Postings are read from the CSV export of the jobs board (one row per
//! posting). Each posting becomes one [`Document`] whose text lists the
//! title, type, involvement, location, and description on separate lines.

use std::collections::HashMap;
use std::io::Read;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::document::{
    Document, META_DESIGNATION, META_INVOLVEMENT, META_LOCATION, META_WORK_TYPE,
};
use crate::error::{RagError, Result};

const NOT_AVAILABLE: &str = "N/A";

/// A single job posting as exported by the jobs board.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JobPosting {
    /// Job title.
    #[serde(default)]
    pub designation: Option<String>,
    /// Remote / on-site / hybrid.
    #[serde(default)]
    pub work_type: Option<String>,
    /// Full-time / part-time.
    #[serde(default)]
    pub involvement: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default, rename = "City")]
    pub city: Option<String>,
    #[serde(default, rename = "State")]
    pub state: Option<String>,
    /// Free-text job description.
    #[serde(default)]
    pub job_details: Option<String>,
}

impl JobPosting {
    /// `"City, State"`, with missing parts left empty.
    pub fn location(&self) -> String {
        format!(
            "{}, {}",
            self.city.as_deref().unwrap_or_default(),
            self.state.as_deref().unwrap_or_default()
        )
    }

    /// Render this posting as a [`Document`] with the given id.
    ///
    /// The document carries the `designation`, `location`, `work_type`, and
    /// `involvement` metadata fields that every derived chunk inherits.
    pub fn to_document(&self, id: impl Into<String>) -> Document {
        let designation = self.designation.as_deref().unwrap_or_default();
        let work_type = self.work_type.as_deref().unwrap_or(NOT_AVAILABLE);
        let involvement = self.involvement.as_deref().unwrap_or(NOT_AVAILABLE);
        let location = self.location();
        let details = self.job_details.as_deref().unwrap_or_default();

        let text = format!(
            "Job Title: {designation}\n\
             Job Type: {work_type}\n\
             Involvement: {involvement}\n\
             Location: {location}\n\
             Job Description: {details}\n"
        );

        let metadata = HashMap::from([
            (META_DESIGNATION.to_string(), designation.to_string()),
            (META_LOCATION.to_string(), location),
            (META_WORK_TYPE.to_string(), work_type.to_string()),
            (META_INVOLVEMENT.to_string(), involvement.to_string()),
        ]);

        Document { id: id.into(), text, metadata }
    }
}

/// Read job postings from CSV with a header row.
///
/// Unknown columns are ignored and empty cells become `None`.
///
/// # Errors
///
/// Returns [`RagError::ChunkingError`] naming the offending row if a record
/// cannot be decoded.
pub fn read_postings_csv<R: Read>(reader: R) -> Result<Vec<JobPosting>> {
    let mut csv_reader =
        csv::ReaderBuilder::new().has_headers(true).flexible(true).from_reader(reader);

    let mut postings = Vec::new();
    for (row, record) in csv_reader.deserialize::<JobPosting>().enumerate() {
        let posting = record.map_err(|e| {
            RagError::ChunkingError(format!("failed to decode posting at row {}: {e}", row + 1))
        })?;
        postings.push(posting);
    }

    info!(posting_count = postings.len(), "read job postings");
    Ok(postings)
}

/// Convert postings into documents with ids `posting_{row}`.
pub fn postings_to_documents(postings: &[JobPosting]) -> Vec<Document> {
    let documents: Vec<Document> = postings
        .iter()
        .enumerate()
        .map(|(row, posting)| posting.to_document(format!("posting_{row}")))
        .collect();
    debug!(document_count = documents.len(), "rendered postings as documents");
    documents
}
