pub mod gemini;
pub mod prompt;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::catalog::CloudService;
use crate::domain::{Codebase, SourceLanguage};

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("missing credential: {0}")]
    MissingCredential(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("empty response")]
    EmptyResponse,

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Port to an external model. Implementations are best-effort string
/// producers; the adapter around them never lets a failure escape.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// Free-form description of what a migration of `file_path` should do.
    async fn generate_refactoring_intent(
        &self,
        codebase: &Codebase,
        file_path: &str,
        target: &str,
    ) -> Result<String, LlmError> {
        let prompt = prompt::intent_prompt(codebase, file_path, target);
        self.generate(&prompt).await
    }

    /// Free-form transformation recipe text from an analysis summary.
    async fn generate_recipe(&self, analysis: &str) -> Result<String, LlmError> {
        let prompt = prompt::recipe_prompt(analysis);
        self.generate(&prompt).await
    }
}

/// Refinement adapter: wraps a provider with the fixed prompt template, a
/// hard wall-clock timeout, and fence stripping. Failures of any kind
/// (credentials, quota, timeout, empty output) degrade to the unmodified
/// input with a warning; the adapter never raises.
pub struct RefinementAdapter {
    provider: Arc<dyn LlmProvider>,
    timeout: Duration,
}

impl RefinementAdapter {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(90);

    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(provider: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Asks the model to convert residual source-cloud code. Returns the
    /// refined text, or the input unchanged on any failure.
    pub async fn refine(
        &self,
        source: &str,
        services: &[CloudService],
        language: SourceLanguage,
        retry: bool,
        guidance: Option<&str>,
    ) -> String {
        let prompt = prompt::refinement_prompt(source, services, language, retry, guidance);
        let call = self.provider.generate(&prompt);
        let response = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!(error = %e, "refinement call failed, keeping input");
                return source.to_string();
            }
            Err(_) => {
                warn!(timeout = ?self.timeout, "refinement call timed out, keeping input");
                return source.to_string();
            }
        };
        let cleaned = prompt::extract_code(&response, language);
        if cleaned.trim().is_empty() {
            warn!("refinement returned no code, keeping input");
            return source.to_string();
        }
        info!(retry, "refinement applied");
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProvider(&'static str);

    #[async_trait]
    impl LlmProvider for FixedProvider {
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl LlmProvider for FailingProvider {
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            Err(LlmError::MissingCredential("GEMINI_API_KEY".into()))
        }
    }

    struct HangingProvider;

    #[async_trait]
    impl LlmProvider for HangingProvider {
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(String::new())
        }
    }

    #[tokio::test]
    async fn test_refine_strips_fences() {
        let adapter = RefinementAdapter::new(Arc::new(FixedProvider(
            "```python\nfrom google.cloud import storage\n```",
        )));
        let out = adapter
            .refine("x", &[CloudService::AwsS3], SourceLanguage::Python, false, None)
            .await;
        assert_eq!(out, "from google.cloud import storage");
    }

    #[tokio::test]
    async fn test_refine_failure_returns_input() {
        let adapter = RefinementAdapter::new(Arc::new(FailingProvider));
        let out = adapter
            .refine("original", &[CloudService::AwsS3], SourceLanguage::Python, false, None)
            .await;
        assert_eq!(out, "original");
    }

    #[tokio::test]
    async fn test_refine_empty_response_returns_input() {
        let adapter = RefinementAdapter::new(Arc::new(FixedProvider("   ")));
        let out = adapter
            .refine("original", &[CloudService::AwsS3], SourceLanguage::Python, false, None)
            .await;
        assert_eq!(out, "original");
    }

    #[tokio::test(start_paused = true)]
    async fn test_refine_timeout_returns_input() {
        let adapter =
            RefinementAdapter::with_timeout(Arc::new(HangingProvider), Duration::from_secs(90));
        let out = adapter
            .refine("original", &[CloudService::AwsS3], SourceLanguage::Python, false, None)
            .await;
        assert_eq!(out, "original");
    }
}
