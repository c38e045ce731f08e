use thiserror::Error;

#[derive(Debug, Error)]
pub enum KbError {
    #[error("knowledge base not configured: {0}")]
    NotConfigured(String),

    #[error("bedrock error: {0}")]
    Bedrock(String),
}
