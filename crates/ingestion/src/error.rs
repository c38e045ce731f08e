use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("ingestion service error: {0}")]
    Service(String),

    #[error("ingestion job not found: {0}")]
    JobNotFound(String),

    #[error("polling gave up after {polls} polls")]
    TimedOut { polls: u32 },
}

impl IngestionError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, IngestionError::TimedOut { .. })
    }
}
