use async_trait::async_trait;

/// Trait for retrieval-augmented generation backends.
///
/// The prompt is grounded against the syllabus knowledge base; the backend
/// returns the model's text output verbatim.
#[async_trait]
pub trait RetrieveAndGenerate: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("generation service error: {0}")]
    Service(String),

    #[error("model returned an empty response")]
    EmptyResponse,

    #[error("generation backend not configured: {0}")]
    NotConfigured(String),
}
