//! Structured records returned to callers.

use serde::{Deserialize, Serialize};

/// A job listing extracted from model output. Every field except `contact`
/// is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobListing {
    pub title: String,
    pub company: String,
    pub location: String,
    pub requirements: Vec<String>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

/// Skills in the order the model listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGapResult {
    pub missing_skills: Vec<String>,
}

/// Courses for one skill, from the static catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecommendation {
    pub skill: String,
    pub courses: Vec<String>,
}
