//! Configuration for the query pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};
use crate::prompt::PromptContract;

/// Extraction demands near-zero temperature; anything above this is
/// rejected at build time.
const MAX_TEMPERATURE: f32 = 0.1;

/// Configuration parameters for the query pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryConfig {
    /// Number of passages to request from the retriever.
    pub top_k: usize,
    /// Sampling temperature forwarded to the completion model.
    pub temperature: f32,
    /// Which prompt contract to issue.
    pub contract: PromptContract,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self { top_k: 5, temperature: 0.0, contract: PromptContract::Detailed }
    }
}

impl QueryConfig {
    /// Create a new builder for constructing a [`QueryConfig`].
    pub fn builder() -> QueryConfigBuilder {
        QueryConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`QueryConfig`].
#[derive(Debug, Clone, Default)]
pub struct QueryConfigBuilder {
    config: QueryConfig,
}

impl QueryConfigBuilder {
    /// Set the number of passages to retrieve.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the sampling temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = temperature;
        self
    }

    /// Select the prompt contract variant.
    pub fn contract(mut self, contract: PromptContract) -> Self {
        self.config.contract = contract;
        self
    }

    /// Build the [`QueryConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if:
    /// - `top_k == 0`
    /// - `temperature` is outside `0.0..=0.1`
    pub fn build(self) -> Result<QueryConfig> {
        if self.config.top_k == 0 {
            return Err(RagError::Config("top_k must be greater than zero".to_string()));
        }
        if !(0.0..=MAX_TEMPERATURE).contains(&self.config.temperature) {
            return Err(RagError::Config(format!(
                "temperature ({}) must stay within 0.0..={MAX_TEMPERATURE}",
                self.config.temperature
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = QueryConfig::default();
        assert_eq!(config.top_k, 5);
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.contract, PromptContract::Detailed);
    }

    #[test]
    fn rejects_zero_top_k() {
        let err = QueryConfig::builder().top_k(0).build().unwrap_err();
        assert!(matches!(err, RagError::Config(_)));
    }

    #[test]
    fn rejects_creative_temperature() {
        let err = QueryConfig::builder().temperature(0.9).build().unwrap_err();
        assert!(matches!(err, RagError::Config(_)));
    }

    #[test]
    fn accepts_edge_of_band() {
        let config = QueryConfig::builder().temperature(0.1).top_k(3).build().unwrap();
        assert_eq!(config.top_k, 3);
    }
}
