//! Per-user state carried between requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What CareerMate knows about one user.
///
/// A context belongs to exactly one user's request flow. Services borrow it
/// mutably for the duration of a call, so concurrent users never share one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    pub user_id: String,
    #[serde(default)]
    pub current_skills: Vec<String>,
    #[serde(default)]
    pub target_job: Option<String>,
    #[serde(default)]
    pub preferred_location: Option<String>,
    /// Full-time / part-time.
    #[serde(default)]
    pub involvement: Option<String>,
    /// Remote / on-site / hybrid.
    #[serde(default)]
    pub work_type: Option<String>,
    /// Result of the latest skill-gap analysis.
    #[serde(default)]
    pub missing_skills: Vec<String>,
    pub session_start: DateTime<Utc>,
}

impl UserContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            current_skills: Vec::new(),
            target_job: None,
            preferred_location: None,
            involvement: None,
            work_type: None,
            missing_skills: Vec::new(),
            session_start: Utc::now(),
        }
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.current_skills = skills.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.preferred_location = Some(location.into());
        self
    }

    pub fn with_involvement(mut self, involvement: impl Into<String>) -> Self {
        self.involvement = Some(involvement.into());
        self
    }

    pub fn with_work_type(mut self, work_type: impl Into<String>) -> Self {
        self.work_type = Some(work_type.into());
        self
    }

    /// Remember the outcome of a skill-gap analysis.
    pub(crate) fn record_skill_gap(&mut self, target_job: &str, missing_skills: &[String]) {
        self.target_job = Some(target_job.to_string());
        self.missing_skills = missing_skills.to_vec();
    }
}
