//! The `CareerMate` entry point used by the dispatching layer.

use std::path::Path;
use std::sync::Arc;

use careermate_model::TextGenerator;
use careermate_rag::{
    CorpusIndex, CorpusSnapshot, EmbeddingProvider, HybridRetriever, RetrievalResult,
};
use tracing::{error, info};

use crate::config::CareerMateConfig;
use crate::context::UserContext;
use crate::courses::CourseCatalog;
use crate::error::Result;
use crate::extractor::StructuredExtractor;
use crate::records::{CourseRecommendation, JobListing, SkillGapResult};
use crate::services::{JobSearchRequest, JobSearchService, SkillGapService};

/// Retrieval, skill-gap analysis, job search, and course recommendation over
/// one shared corpus index.
///
/// Cloning is cheap; clones share the index and the model client.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use careermate::{CareerMate, CareerMateConfig, UserContext};
/// use careermate_model::openai::{OpenAIClient, OpenAIConfig};
/// use careermate_rag::HashEmbeddingProvider;
///
/// let assistant = CareerMate::open_snapshot(
///     "corpus.json",
///     Arc::new(HashEmbeddingProvider::default()),
///     Arc::new(OpenAIClient::new(OpenAIConfig::from_env()?)?),
///     CareerMateConfig::default(),
/// )
/// .await?;
///
/// let mut user = UserContext::new("u-42").with_skills(["SQL"]);
/// let gap = assistant.analyze_skill_gap(&mut user, "Data Analyst").await?;
/// let courses = assistant.recommend_courses(&gap.missing_skills);
/// ```
#[derive(Debug, Clone)]
pub struct CareerMate {
    retriever: HybridRetriever,
    skill_gap: SkillGapService,
    job_search: JobSearchService,
    catalog: CourseCatalog,
    config: CareerMateConfig,
}

impl CareerMate {
    /// Wire the services over an already-built index.
    pub fn new(
        index: Arc<CorpusIndex>,
        generator: Arc<dyn TextGenerator>,
        config: CareerMateConfig,
    ) -> Self {
        let mut retriever = HybridRetriever::new(index, config.top_k);
        if let Some(timeout) = config.retrieval_timeout {
            retriever = retriever.with_timeout(timeout);
        }
        let extractor =
            StructuredExtractor::new(generator).with_generation_timeout(config.generation_timeout);

        Self {
            skill_gap: SkillGapService::new(retriever.clone(), extractor.clone()),
            job_search: JobSearchService::new(
                retriever.clone(),
                extractor,
                config.max_job_listings,
            ),
            retriever,
            catalog: CourseCatalog::default(),
            config,
        }
    }

    /// Load a previously built corpus and wire the services over it.
    ///
    /// # Errors
    ///
    /// Fails with an index-unavailable error if the snapshot cannot be read
    /// or does not match `embedding_provider`.
    pub async fn open_snapshot(
        path: impl AsRef<Path>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn TextGenerator>,
        config: CareerMateConfig,
    ) -> Result<Self> {
        let path = path.as_ref();
        let index = load_index(path, embedding_provider).await.inspect_err(|e| {
            error!(path = %path.display(), error = %e, "corpus index unavailable");
        })?;

        info!(path = %path.display(), chunk_count = index.len(), "career assistant ready");
        Ok(Self::new(Arc::new(index), generator, config))
    }

    /// Replace the built-in course catalog.
    pub fn with_course_catalog(mut self, catalog: CourseCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn config(&self) -> &CareerMateConfig {
        &self.config
    }

    pub fn index(&self) -> &Arc<CorpusIndex> {
        self.retriever.index()
    }

    /// Up to `k` deduplicated chunks for `query`.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<RetrievalResult<'_>> {
        Ok(self.retriever.retrieve_k(query, k).await?)
    }

    /// Skills the corpus lists for `job_title`, unfiltered.
    pub async fn extract_skills(&self, job_title: &str) -> Result<SkillGapResult> {
        self.skill_gap.required_skills(job_title).await
    }

    /// Skills required for `job_title` that are not in `current_skills`.
    pub async fn skill_gap(
        &self,
        job_title: &str,
        current_skills: &[String],
    ) -> Result<SkillGapResult> {
        self.skill_gap.skill_gap(job_title, current_skills).await
    }

    /// Skill gap for `user`, stored on their context for later course lookup.
    pub async fn analyze_skill_gap(
        &self,
        user: &mut UserContext,
        job_title: &str,
    ) -> Result<SkillGapResult> {
        self.skill_gap.analyze(user, job_title).await
    }

    /// At most three listings matching the given skills and filters.
    pub async fn find_jobs(
        &self,
        skills: &[String],
        location: Option<&str>,
        involvement: Option<&str>,
        work_type: Option<&str>,
    ) -> Result<Vec<JobListing>> {
        let request = JobSearchRequest {
            skills: skills.to_vec(),
            location: location.map(str::to_string),
            involvement: involvement.map(str::to_string),
            work_type: work_type.map(str::to_string),
        };
        self.job_search.find_jobs(&request).await
    }

    /// Job search using the filters on `user`'s profile.
    pub async fn find_jobs_for(&self, user: &UserContext) -> Result<Vec<JobListing>> {
        self.job_search.find_jobs_for(user).await
    }

    pub fn recommend_courses(&self, skills: &[String]) -> Vec<CourseRecommendation> {
        self.catalog.recommend(skills)
    }

    /// Courses for the missing skills recorded on `user`.
    pub fn recommend_courses_for(&self, user: &UserContext) -> Vec<CourseRecommendation> {
        self.catalog.recommend(&user.missing_skills)
    }
}

async fn load_index(
    path: &Path,
    embedding_provider: Arc<dyn EmbeddingProvider>,
) -> careermate_rag::Result<CorpusIndex> {
    let snapshot = CorpusSnapshot::read_json(path).await?;
    CorpusIndex::builder().embedding_provider(embedding_provider).load(snapshot).await
}
