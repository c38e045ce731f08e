use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("uploaded file is not a PDF")]
    NotPdf,

    #[error("subject name is empty after sanitization")]
    EmptySubject,

    #[error("intake not configured: {0}")]
    NotConfigured(String),

    #[error("object store error: {0}")]
    Store(#[from] object_store::Error),
}
