//! Retrieved context in, validated records out.

use std::sync::Arc;
use std::time::Duration;

use careermate_model::{GenerateRequest, TextGenerator};
use careermate_rag::RetrievalResult;
use tracing::{debug, error, info};

use crate::error::{CareerError, Result};
use crate::parser::ParsedJob;
use crate::prompts::system_instruction;
use crate::schema::{ExtractionSchema, JobListingsSchema, SkillsSchema};

/// Calls the language model once per request and parses its answer.
///
/// Model failures and timeouts are returned as errors. Output that yields no
/// valid records is an empty, successful result.
#[derive(Clone)]
pub struct StructuredExtractor {
    generator: Arc<dyn TextGenerator>,
    generation_timeout: Option<Duration>,
}

impl std::fmt::Debug for StructuredExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructuredExtractor")
            .field("generator", &self.generator.name())
            .field("generation_timeout", &self.generation_timeout)
            .finish()
    }
}

impl StructuredExtractor {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator, generation_timeout: None }
    }

    /// Fail with [`CareerError::Timeout`] if the model has not answered within `timeout`.
    pub fn with_generation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.generation_timeout = timeout;
        self
    }

    /// Build the request for `schema`, call the model, and parse the answer.
    pub async fn extract<S: ExtractionSchema>(
        &self,
        schema: &S,
        query: &str,
        context: &RetrievalResult<'_>,
    ) -> Result<Vec<S::Record>> {
        let system = system_instruction(schema.directive(), &context.to_context());
        let request = GenerateRequest::new(system, query);
        debug!(schema = schema.name(), context_chunks = context.len(), query, "extracting records");

        let raw = self.generate(request).await?;
        let records = schema.parse(&raw);
        info!(
            schema = schema.name(),
            records = records.len(),
            response_len = raw.len(),
            "extraction completed"
        );
        Ok(records)
    }

    pub async fn extract_skills(
        &self,
        query: &str,
        context: &RetrievalResult<'_>,
    ) -> Result<Vec<String>> {
        self.extract(&SkillsSchema, query, context).await
    }

    pub async fn extract_job_listings(
        &self,
        query: &str,
        context: &RetrievalResult<'_>,
        max_records: usize,
    ) -> Result<Vec<ParsedJob>> {
        self.extract(&JobListingsSchema::new(max_records), query, context).await
    }

    async fn generate(&self, request: GenerateRequest) -> Result<String> {
        let call = self.generator.generate(request);
        let outcome = match self.generation_timeout {
            Some(timeout) => tokio::time::timeout(timeout, call).await.map_err(|_| {
                error!(model = self.generator.name(), ?timeout, "generation timed out");
                CareerError::Timeout { operation: "generation", timeout }
            })?,
            None => call.await,
        };
        outcome.map_err(|e| {
            error!(model = self.generator.name(), error = %e, "generation failed");
            CareerError::Model(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use careermate_model::{MockGenerator, ModelError};

    use super::*;

    #[tokio::test]
    async fn sends_directive_with_context_and_query_as_input() {
        let model = Arc::new(MockGenerator::new("- SQL"));
        let extractor = StructuredExtractor::new(model.clone());

        let skills = extractor
            .extract_skills(
                "What are the required skills for a Data Analyst?",
                &RetrievalResult::default(),
            )
            .await
            .unwrap();
        assert_eq!(skills, vec!["SQL"]);

        let requests = model.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].system_instruction.contains("Do NOT make up"));
        assert!(requests[0].system_instruction.ends_with("Context:\n"));
        assert_eq!(requests[0].input, "What are the required skills for a Data Analyst?");
    }

    #[tokio::test]
    async fn model_failure_is_an_error() {
        let extractor =
            StructuredExtractor::new(Arc::new(MockGenerator::failing(ModelError::EmptyContent)));
        let err = extractor.extract_skills("q", &RetrievalResult::default()).await.unwrap_err();
        assert!(matches!(err, CareerError::Model(ModelError::EmptyContent)));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_model_times_out() {
        let extractor = StructuredExtractor::new(Arc::new(
            MockGenerator::new("- SQL").with_delay(Duration::from_secs(300)),
        ))
        .with_generation_timeout(Some(Duration::from_secs(5)));
        let err = extractor.extract_skills("q", &RetrievalResult::default()).await.unwrap_err();
        assert!(matches!(err, CareerError::Timeout { operation: "generation", .. }));
    }

    #[tokio::test]
    async fn unparseable_answer_is_empty_not_error() {
        let model = MockGenerator::new("I could not find any jobs.");
        let extractor = StructuredExtractor::new(Arc::new(model));
        let context = RetrievalResult::default();
        let jobs = extractor.extract_job_listings("q", &context, 3).await.unwrap();
        assert!(jobs.is_empty());
    }
}
