//! Job starter — submit a new job once the gate clears.

use tracing::info;

use crate::error::IngestionError;
use crate::gate::{wait_for_clearance, GateDecision};
use crate::poll::PollPolicy;
use crate::service::{IngestionService, JobId, SourceRef};

/// Result of a gate-then-start attempt.
///
/// `NotStarted` is a sentinel, not an error: the caller should retry later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    Started(JobId),
    NotStarted(GateDecision),
}

impl StartOutcome {
    pub fn job_id(&self) -> Option<&JobId> {
        match self {
            StartOutcome::Started(id) => Some(id),
            StartOutcome::NotStarted(_) => None,
        }
    }
}

/// Wait for the gate, then submit exactly one new ingestion job.
///
/// Issues no start call at all when the gate refuses clearance.
pub async fn start_when_clear(
    service: &dyn IngestionService,
    source: &SourceRef,
    policy: PollPolicy,
) -> Result<StartOutcome, IngestionError> {
    let decision = wait_for_clearance(service, source, policy).await?;
    if !decision.is_clear() {
        return Ok(StartOutcome::NotStarted(decision));
    }

    let job_id = service.start_job(source).await?;
    info!(job_id = %job_id, "ingestion job started");
    Ok(StartOutcome::Started(job_id))
}
