//! Job tracker — observe a started job until it reaches a terminal state.

use std::sync::Arc;

use futures::stream::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::IngestionError;
use crate::poll::PollPolicy;
use crate::service::{IngestionService, JobId, SourceRef};
use crate::status::JobStatus;

/// Final disposition of a tracked job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOutcome {
    Complete,
    Failed,
    /// The job reported a status outside the known set; polling stopped
    /// (same fail-closed policy as the gate).
    Indeterminate,
    /// The poll budget ran out before a terminal state was observed.
    TimedOut,
}

/// Summary of one full tracking run.
#[derive(Debug, Clone, Serialize)]
pub struct TrackReport {
    pub outcome: SyncOutcome,
    /// Number of statuses observed. The tracker checks status before
    /// deciding to stop, so a completed run always has at least one.
    pub observations: u32,
    pub final_status: Option<JobStatus>,
}

/// Lazily poll `job_id` until a terminal status is observed.
///
/// Yields every observed status in order. The stream is finite and not
/// restartable: each call starts a fresh poll sequence against live state.
/// The first status is fetched without waiting; each subsequent poll is
/// separated by one [`PollPolicy`] interval. The stream ends after the
/// first terminal status, after an unrecognized status, or — once the poll
/// budget is spent — after yielding [`IngestionError::TimedOut`].
///
/// Dropping the stream cancels polling.
pub fn track_job(
    service: Arc<dyn IngestionService>,
    source: SourceRef,
    job_id: JobId,
    policy: PollPolicy,
) -> impl Stream<Item = Result<JobStatus, IngestionError>> {
    struct PollState {
        polls: u32,
        done: bool,
    }

    futures::stream::unfold(
        PollState {
            polls: 0,
            done: false,
        },
        move |mut st| {
            let service = service.clone();
            let source = source.clone();
            let job_id = job_id.clone();
            async move {
                if st.done {
                    return None;
                }
                if st.polls > 0 {
                    if st.polls >= policy.max_polls {
                        st.done = true;
                        return Some((Err(IngestionError::TimedOut { polls: st.polls }), st));
                    }
                    policy.pause().await;
                }
                st.polls += 1;

                match service.get_job_status(&source, &job_id).await {
                    Ok(status) => {
                        debug!(job_id = %job_id, status = %status, "ingestion job status observed");
                        if status.is_terminal() || !status.is_recognized() {
                            st.done = true;
                        }
                        Some((Ok(status), st))
                    }
                    Err(e) => {
                        st.done = true;
                        Some((Err(e), st))
                    }
                }
            }
        },
    )
}

/// Drain [`track_job`], invoking `on_status` for every observation.
///
/// Timeouts become [`SyncOutcome::TimedOut`] in the report; service-call
/// failures propagate as errors.
pub async fn track_to_completion<F>(
    service: Arc<dyn IngestionService>,
    source: SourceRef,
    job_id: JobId,
    policy: PollPolicy,
    mut on_status: F,
) -> Result<TrackReport, IngestionError>
where
    F: FnMut(&JobStatus),
{
    let stream = track_job(service, source, job_id, policy);
    futures::pin_mut!(stream);

    let mut observations = 0u32;
    let mut last: Option<JobStatus> = None;

    while let Some(item) = stream.next().await {
        match item {
            Ok(status) => {
                observations += 1;
                on_status(&status);
                last = Some(status);
            }
            Err(IngestionError::TimedOut { .. }) => {
                return Ok(TrackReport {
                    outcome: SyncOutcome::TimedOut,
                    observations,
                    final_status: last,
                });
            }
            Err(e) => return Err(e),
        }
    }

    let outcome = match last {
        Some(JobStatus::Complete) => SyncOutcome::Complete,
        Some(JobStatus::Failed) => SyncOutcome::Failed,
        _ => SyncOutcome::Indeterminate,
    };

    Ok(TrackReport {
        outcome,
        observations,
        final_status: last,
    })
}
