//! Skill-gap analysis and job search on top of retrieval and extraction.
//!
//! Each request runs retrieval, then extraction, then parsing, in that order.

use careermate_rag::HybridRetriever;
use tracing::{debug, info};

use crate::context::UserContext;
use crate::error::Result;
use crate::extractor::StructuredExtractor;
use crate::parser::ParsedJob;
use crate::prompts::skills_query;
use crate::records::{JobListing, SkillGapResult};

/// Finds the skills a job title requires, and which of them a user lacks.
#[derive(Debug, Clone)]
pub struct SkillGapService {
    retriever: HybridRetriever,
    extractor: StructuredExtractor,
}

impl SkillGapService {
    pub fn new(retriever: HybridRetriever, extractor: StructuredExtractor) -> Self {
        Self { retriever, extractor }
    }

    /// Every skill the corpus lists for `job_title`, in the model's order.
    pub async fn required_skills(&self, job_title: &str) -> Result<SkillGapResult> {
        let query = skills_query(job_title);
        let context = self.retriever.retrieve(&query).await?;
        let skills = self.extractor.extract_skills(&query, &context).await?;
        Ok(SkillGapResult { missing_skills: skills })
    }

    /// Required skills for `job_title` minus `current_skills` (exact match).
    pub async fn skill_gap(
        &self,
        job_title: &str,
        current_skills: &[String],
    ) -> Result<SkillGapResult> {
        let required = self.required_skills(job_title).await?;
        let missing = filter_known(required.missing_skills, current_skills);
        info!(job_title, missing = missing.len(), "skill gap computed");
        Ok(SkillGapResult { missing_skills: missing })
    }

    /// [`skill_gap`](Self::skill_gap) for the user's own skills, recorded on
    /// their context as the new target job and missing skills.
    pub async fn analyze(&self, user: &mut UserContext, job_title: &str) -> Result<SkillGapResult> {
        let result = self.skill_gap(job_title, &user.current_skills).await?;
        user.record_skill_gap(job_title, &result.missing_skills);
        Ok(result)
    }
}

fn filter_known(skills: Vec<String>, known: &[String]) -> Vec<String> {
    skills.into_iter().filter(|skill| !known.contains(skill)).collect()
}

/// Filters for one job search. Empty optional filters are left out of the query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobSearchRequest {
    pub skills: Vec<String>,
    pub location: Option<String>,
    pub involvement: Option<String>,
    pub work_type: Option<String>,
}

impl JobSearchRequest {
    pub fn new<I, S>(skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { skills: skills.into_iter().map(Into::into).collect(), ..Self::default() }
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn involvement(mut self, involvement: impl Into<String>) -> Self {
        self.involvement = Some(involvement.into());
        self
    }

    pub fn work_type(mut self, work_type: impl Into<String>) -> Self {
        self.work_type = Some(work_type.into());
        self
    }

    /// Filters taken from a user's profile.
    pub fn from_context(user: &UserContext) -> Self {
        Self {
            skills: user.current_skills.clone(),
            location: user.preferred_location.clone(),
            involvement: user.involvement.clone(),
            work_type: user.work_type.clone(),
        }
    }

    /// The natural-language retrieval query, e.g.
    /// `Find jobs requiring: SQL, Python. Location: Delhi.`
    pub fn to_query(&self) -> String {
        let mut parts = vec![format!("Find jobs requiring: {}.", self.skills.join(", "))];
        let optional = [
            ("Location", &self.location),
            ("Involvement", &self.involvement),
            ("Work type", &self.work_type),
        ];
        for (label, value) in optional {
            if let Some(value) = non_empty(value) {
                parts.push(format!("{label}: {value}."));
            }
        }
        parts.join(" ")
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Finds up to `max_listings` job listings matching a profile.
///
/// Listings are taken as the model returns them; the requested filters are
/// only compared against each listing's `Type:` tokens for logging.
#[derive(Debug, Clone)]
pub struct JobSearchService {
    retriever: HybridRetriever,
    extractor: StructuredExtractor,
    max_listings: usize,
}

impl JobSearchService {
    pub fn new(
        retriever: HybridRetriever,
        extractor: StructuredExtractor,
        max_listings: usize,
    ) -> Self {
        Self { retriever, extractor, max_listings }
    }

    pub async fn find_jobs(&self, request: &JobSearchRequest) -> Result<Vec<JobListing>> {
        let query = request.to_query();
        let context = self.retriever.retrieve(&query).await?;
        let jobs = self.extractor.extract_job_listings(&query, &context, self.max_listings).await?;

        for job in &jobs {
            log_type_mismatch(request, job);
        }
        info!(listings = jobs.len(), "job search completed");
        Ok(jobs.into_iter().map(|job| job.listing).collect())
    }

    pub async fn find_jobs_for(&self, user: &UserContext) -> Result<Vec<JobListing>> {
        self.find_jobs(&JobSearchRequest::from_context(user)).await
    }
}

fn log_type_mismatch(request: &JobSearchRequest, job: &ParsedJob) {
    let filters = [("involvement", &request.involvement), ("work_type", &request.work_type)];
    for (filter, wanted) in filters {
        let Some(wanted) = non_empty(wanted) else { continue };
        if !job.job_types.iter().any(|t| t.eq_ignore_ascii_case(wanted)) {
            debug!(
                title = %job.listing.title,
                filter,
                wanted,
                reported = ?job.job_types,
                "listing type does not match requested filter"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_includes_only_non_empty_filters() {
        let request = JobSearchRequest::new(["SQL", "Python"]).location("Delhi").work_type("  ");
        assert_eq!(request.to_query(), "Find jobs requiring: SQL, Python. Location: Delhi.");

        let full = JobSearchRequest::new(["Java"])
            .location("Pune")
            .involvement("full-time")
            .work_type("remote");
        assert_eq!(
            full.to_query(),
            "Find jobs requiring: Java. Location: Pune. Involvement: full-time. Work type: remote."
        );
    }

    #[test]
    fn filtering_is_exact_and_keeps_order() {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let required = strings(&["SQL", "Python", "sql", "Excel"]);
        let known = strings(&["SQL", "Excel"]);
        assert_eq!(filter_known(required, &known), vec!["Python", "sql"]);
    }

    #[test]
    fn request_from_context() {
        let user = UserContext::new("u").with_skills(["C#"]).with_involvement("part-time");
        let request = JobSearchRequest::from_context(&user);
        assert_eq!(request.skills, vec!["C#"]);
        assert_eq!(request.involvement.as_deref(), Some("part-time"));
        assert_eq!(request.location, None);
    }
}
