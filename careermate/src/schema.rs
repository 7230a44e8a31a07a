//! Extraction schemas: which directive to send and how to read the answer.

use tracing::{debug, warn};

use crate::config::MAX_JOB_LISTINGS;
use crate::parser::{ParsedJob, parse_job_blocks, parse_skills};
use crate::prompts::{JOB_LISTINGS_DIRECTIVE, SKILLS_DIRECTIVE};

/// The record shape requested from one extraction call.
pub trait ExtractionSchema: Send + Sync {
    /// The record type parsed out of a model response.
    type Record: Send;

    /// Short name used in log fields.
    fn name(&self) -> &'static str;

    /// Instruction block sent ahead of the retrieved context.
    fn directive(&self) -> &'static str;

    /// Parse `raw` model output, dropping records that fail to parse.
    fn parse(&self, raw: &str) -> Vec<Self::Record>;
}

/// A bullet list of skill names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkillsSchema;

impl ExtractionSchema for SkillsSchema {
    type Record = String;

    fn name(&self) -> &'static str {
        "skills"
    }

    fn directive(&self) -> &'static str {
        SKILLS_DIRECTIVE
    }

    fn parse(&self, raw: &str) -> Vec<String> {
        parse_skills(raw)
    }
}

/// Up to `max_records` job listings (never more than three).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobListingsSchema {
    pub max_records: usize,
}

impl JobListingsSchema {
    pub const fn new(max_records: usize) -> Self {
        Self { max_records }
    }
}

impl Default for JobListingsSchema {
    fn default() -> Self {
        Self::new(MAX_JOB_LISTINGS)
    }
}

impl ExtractionSchema for JobListingsSchema {
    type Record = ParsedJob;

    fn name(&self) -> &'static str {
        "job_listings"
    }

    fn directive(&self) -> &'static str {
        JOB_LISTINGS_DIRECTIVE
    }

    fn parse(&self, raw: &str) -> Vec<ParsedJob> {
        let limit = self.max_records.min(MAX_JOB_LISTINGS);
        let mut jobs = Vec::new();
        let mut dropped = 0usize;
        for (block, result) in parse_job_blocks(raw).into_iter().enumerate() {
            match result {
                Ok(job) => jobs.push(job),
                Err(e) => {
                    dropped += 1;
                    debug!(block, error = %e, "skipped job block");
                }
            }
        }
        if dropped > 0 {
            warn!(parsed = jobs.len(), dropped, "dropped unparseable job blocks");
        }
        jobs.truncate(limit);
        jobs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(count: usize) -> String {
        (0..count)
            .map(|i| {
                format!("**Job {i}** at Co (City {i})\n- Requirements: Rust\n- Description: Work.")
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    #[test]
    fn job_listings_are_capped() {
        let jobs = JobListingsSchema::default().parse(&blocks(5));
        let titles: Vec<&str> = jobs.iter().map(|j| j.listing.title.as_str()).collect();
        assert_eq!(titles, vec!["Job 0", "Job 1", "Job 2"]);
    }

    #[test]
    fn larger_requested_cap_is_clamped() {
        assert_eq!(JobListingsSchema::new(10).parse(&blocks(5)).len(), 3);
        assert_eq!(JobListingsSchema::new(1).parse(&blocks(5)).len(), 1);
    }

    #[test]
    fn skills_schema_uses_skills_directive() {
        assert_eq!(SkillsSchema.directive(), SKILLS_DIRECTIVE);
        assert_eq!(SkillsSchema.parse("- SQL\n- Excel"), vec!["SQL", "Excel"]);
    }
}
