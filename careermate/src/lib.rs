//! # careermate
//!
//! Career guidance over a job-postings corpus.
//!
//! ## Overview
//!
//! - [`CareerMate`] - retrieval, skill gaps, job search, and course lookup behind one handle
//! - [`StructuredExtractor`] - one model call per request, parsed defensively into records
//! - [`parser`] - pure functions from raw model text to records
//! - [`SkillGapService`] / [`JobSearchService`] - the two retrieval-backed use cases
//! - [`CourseCatalog`] - static skill-to-course table
//! - [`UserContext`] - per-user profile and latest skill gap
//!
//! Unparseable model output never fails a request: malformed blocks are
//! dropped and the caller gets fewer (possibly zero) records. Only model,
//! embedding, and index failures are errors.

pub mod assistant;
pub mod config;
pub mod context;
pub mod courses;
pub mod error;
pub mod extractor;
pub mod parser;
pub mod prompts;
pub mod records;
pub mod schema;
pub mod services;
pub mod telemetry;

pub use assistant::CareerMate;
pub use config::{CareerMateConfig, CareerMateConfigBuilder, MAX_JOB_LISTINGS};
pub use context::UserContext;
pub use courses::{CourseCatalog, NO_COURSES_FOUND};
pub use error::{CareerError, ParseError, Result};
pub use extractor::StructuredExtractor;
pub use records::{CourseRecommendation, JobListing, SkillGapResult};
pub use schema::{ExtractionSchema, JobListingsSchema, SkillsSchema};
pub use services::{JobSearchRequest, JobSearchService, SkillGapService};
pub use telemetry::init_tracing;
