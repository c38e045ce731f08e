//! Job gate — wait until no prior job is active for a source.

use tracing::{debug, warn};

use crate::error::IngestionError;
use crate::poll::PollPolicy;
use crate::service::{IngestionService, SourceRef};
use crate::status::JobStatus;

/// Outcome of waiting for prior ingestion work to clear.
///
/// All three variants are ordinary return values; only a failed service call
/// surfaces as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// No job is active — new work may start.
    Clear,
    /// The most recent job reported a status outside the known set. The gate
    /// fails closed: do not start new work.
    Indeterminate { status: JobStatus },
    /// The active job did not reach a terminal state within the poll budget.
    TimedOut { polls: u32 },
}

impl GateDecision {
    pub fn is_clear(&self) -> bool {
        matches!(self, GateDecision::Clear)
    }
}

/// Poll the most recent job for `source` until it is safe to start new work.
///
/// - No prior job, or latest job terminal: returns [`GateDecision::Clear`]
///   without waiting.
/// - Latest job active (`STARTING` / `IN_PROGRESS`): pauses one interval and
///   re-polls, up to `policy.max_polls` waits, then reports
///   [`GateDecision::TimedOut`].
/// - Any unrecognized status: returns [`GateDecision::Indeterminate`]
///   immediately, without waiting.
pub async fn wait_for_clearance(
    service: &dyn IngestionService,
    source: &SourceRef,
    policy: PollPolicy,
) -> Result<GateDecision, IngestionError> {
    let mut waits = 0u32;
    loop {
        let jobs = service.list_recent_jobs(source, 1).await?;
        let Some(latest) = jobs.first() else {
            return Ok(GateDecision::Clear);
        };

        if latest.status.is_terminal() {
            return Ok(GateDecision::Clear);
        }

        if latest.status.is_active() {
            if waits >= policy.max_polls {
                warn!(
                    job_id = %latest.job_id,
                    polls = waits,
                    "gate gave up waiting for prior ingestion job"
                );
                return Ok(GateDecision::TimedOut { polls: waits });
            }
            debug!(
                job_id = %latest.job_id,
                status = %latest.status,
                "prior ingestion job still active — waiting"
            );
            waits += 1;
            policy.pause().await;
            continue;
        }

        warn!(
            job_id = %latest.job_id,
            status = %latest.status,
            "prior ingestion job in unrecognized state — refusing to start new work"
        );
        return Ok(GateDecision::Indeterminate {
            status: latest.status.clone(),
        });
    }
}
