//! Request-path configuration for the CareerMate services.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CareerError, Result};

/// Upper bound on job listings returned by a single search.
pub const MAX_JOB_LISTINGS: usize = 3;

/// Settings shared by skill-gap analysis, job search, and plain retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CareerMateConfig {
    /// Chunks retrieved as context for each extraction.
    pub top_k: usize,
    /// Job listings kept from one model response, at most [`MAX_JOB_LISTINGS`].
    pub max_job_listings: usize,
    /// Deadline for dense retrieval. `None` waits indefinitely.
    pub retrieval_timeout: Option<Duration>,
    /// Deadline for the language-model call. `None` waits indefinitely.
    pub generation_timeout: Option<Duration>,
}

impl Default for CareerMateConfig {
    fn default() -> Self {
        Self {
            top_k: 20,
            max_job_listings: MAX_JOB_LISTINGS,
            retrieval_timeout: None,
            generation_timeout: Some(Duration::from_secs(120)),
        }
    }
}

impl CareerMateConfig {
    pub fn builder() -> CareerMateConfigBuilder {
        CareerMateConfigBuilder::default()
    }
}

/// Builder for a validated [`CareerMateConfig`].
#[derive(Debug, Clone, Default)]
pub struct CareerMateConfigBuilder {
    config: CareerMateConfig,
}

impl CareerMateConfigBuilder {
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    pub fn max_job_listings(mut self, max: usize) -> Self {
        self.config.max_job_listings = max;
        self
    }

    pub fn retrieval_timeout(mut self, timeout: Duration) -> Self {
        self.config.retrieval_timeout = Some(timeout);
        self
    }

    pub fn generation_timeout(mut self, timeout: Duration) -> Self {
        self.config.generation_timeout = Some(timeout);
        self
    }

    /// Wait for the language model without a deadline.
    pub fn no_generation_timeout(mut self) -> Self {
        self.config.generation_timeout = None;
        self
    }

    /// # Errors
    ///
    /// Returns [`CareerError::Config`] if `top_k` is zero, `max_job_listings`
    /// is outside `1..=3`, or a timeout is zero.
    pub fn build(self) -> Result<CareerMateConfig> {
        let config = self.config;
        if config.top_k == 0 {
            return Err(CareerError::Config("top_k must be greater than zero".to_string()));
        }
        if !(1..=MAX_JOB_LISTINGS).contains(&config.max_job_listings) {
            return Err(CareerError::Config(format!(
                "max_job_listings must be within 1..={MAX_JOB_LISTINGS}, got {}",
                config.max_job_listings
            )));
        }
        if config.retrieval_timeout.is_some_and(|t| t.is_zero())
            || config.generation_timeout.is_some_and(|t| t.is_zero())
        {
            return Err(CareerError::Config("timeouts must be non-zero".to_string()));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = CareerMateConfig::default();
        assert_eq!(config.max_job_listings, 3);
        assert_eq!(config.retrieval_timeout, None);
        assert_eq!(config.generation_timeout, Some(Duration::from_secs(120)));
    }

    #[test]
    fn rejects_more_than_three_listings() {
        let err = CareerMateConfig::builder().max_job_listings(5).build().unwrap_err();
        assert!(matches!(err, CareerError::Config(_)));
    }

    #[test]
    fn rejects_zero_timeout() {
        assert!(CareerMateConfig::builder().retrieval_timeout(Duration::ZERO).build().is_err());
    }

    #[test]
    fn round_trips_through_json() {
        let config = CareerMateConfig::builder()
            .top_k(8)
            .retrieval_timeout(Duration::from_millis(1500))
            .build()
            .unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<CareerMateConfig>(&json).unwrap(), config);
    }
}
