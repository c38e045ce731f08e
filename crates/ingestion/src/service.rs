//! Trait boundary for the managed ingestion service.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::IngestionError;
use crate::status::JobStatus;

/// Identifies the document collection a job ingests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub knowledge_base_id: String,
    pub data_source_id: String,
}

impl SourceRef {
    pub fn new(knowledge_base_id: impl Into<String>, data_source_id: impl Into<String>) -> Self {
        Self {
            knowledge_base_id: knowledge_base_id.into(),
            data_source_id: data_source_id.into(),
        }
    }
}

/// Opaque job identifier assigned by the external service on start.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl JobId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        JobId(s.to_string())
    }
}

/// Point-in-time snapshot of one job, as returned by a listing call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    pub job_id: JobId,
    pub status: JobStatus,
}

/// The managed ingestion service. The service is the sole owner and sole
/// writer of job state; implementations only read and submit.
#[async_trait]
pub trait IngestionService: Send + Sync {
    /// List the most recent jobs for a source, newest first.
    async fn list_recent_jobs(
        &self,
        source: &SourceRef,
        limit: u32,
    ) -> Result<Vec<JobSummary>, IngestionError>;

    /// Submit a new ingestion job and return its assigned id.
    async fn start_job(&self, source: &SourceRef) -> Result<JobId, IngestionError>;

    /// Fetch the current status of one job.
    async fn get_job_status(
        &self,
        source: &SourceRef,
        job_id: &JobId,
    ) -> Result<JobStatus, IngestionError>;
}
