//! In-memory sync-job store and background sync runner.
//!
//! [`spawn_sync_job`] registers a [`SyncJob`] record and runs the
//! gate → start → track sequence in a background tokio task, appending
//! every observed status to the record. Finished runs stay in the store
//! so callers can inspect them.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use examgen_ingestion::{
    start_when_clear, track_to_completion, GateDecision, JobId, StartOutcome, SyncOutcome,
};

use crate::state::{AppState, SyncContext};

/// Lifecycle state of one sync run as seen by API callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    Pending,
    Running,
    Complete,
    Failed,
    /// A job reported a status outside the known set.
    Indeterminate,
    /// The poll budget ran out before a terminal state.
    TimedOut,
    /// The gate refused clearance; no job was started.
    NotStarted,
    /// The ingestion service call itself failed.
    Error,
}

/// One sync run. Mutable fields use `RwLock` — they change at most a
/// handful of times over the run's life.
#[derive(Debug)]
pub struct SyncJob {
    pub id: Uuid,
    pub subject: Option<String>,
    pub state: RwLock<SyncState>,
    /// Id assigned by the external service once started.
    pub external_id: RwLock<Option<JobId>>,
    /// Every status observed by the tracker, in order.
    pub observed: RwLock<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub completed_at: RwLock<Option<DateTime<Utc>>>,
    pub error: RwLock<Option<String>>,
}

/// In-memory store for active and recent sync jobs.
///
/// `IndexMap` preserves insertion order (newest last) while allowing O(1)
/// lookups by id.
#[derive(Debug, Default)]
pub struct SyncJobStore {
    pub jobs: Arc<RwLock<IndexMap<Uuid, Arc<SyncJob>>>>,
}

impl SyncJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Register a sync job and run it in a background task. Returns the job id
/// immediately.
pub fn spawn_sync_job(state: Arc<AppState>, ctx: SyncContext, subject: Option<String>) -> Uuid {
    let id = Uuid::new_v4();
    let job = Arc::new(SyncJob {
        id,
        subject,
        state: RwLock::new(SyncState::Pending),
        external_id: RwLock::new(None),
        observed: RwLock::new(Vec::new()),
        created_at: Utc::now(),
        completed_at: RwLock::new(None),
        error: RwLock::new(None),
    });

    {
        let mut store = state.sync_jobs.jobs.write().unwrap();
        store.insert(id, job.clone());
    }

    tokio::spawn(async move {
        run_sync_job(state, ctx, job).await;
    });

    id
}

fn finish(job: &SyncJob, state: SyncState, error: Option<String>) {
    *job.state.write().unwrap() = state;
    *job.completed_at.write().unwrap() = Some(Utc::now());
    *job.error.write().unwrap() = error;
}

async fn run_sync_job(state: Arc<AppState>, ctx: SyncContext, job: Arc<SyncJob>) {
    // Gate-then-start must not interleave with another caller's.
    let outcome = {
        let _guard = state.sync_gate.lock().await;
        start_when_clear(ctx.service.as_ref(), &ctx.source, state.poll).await
    };

    let job_id = match outcome {
        Err(e) => {
            error!(sync_id = %job.id, error = %e, "sync failed before start");
            finish(&job, SyncState::Error, Some(e.to_string()));
            return;
        }
        Ok(StartOutcome::NotStarted(decision)) => {
            let detail = match decision {
                GateDecision::Indeterminate { status } => {
                    format!("prior job in unrecognized state: {status}")
                }
                GateDecision::TimedOut { polls } => {
                    format!("prior job still active after {polls} polls")
                }
                GateDecision::Clear => unreachable!("clear gate always starts"),
            };
            info!(sync_id = %job.id, detail = %detail, "sync not started");
            finish(&job, SyncState::NotStarted, Some(detail));
            return;
        }
        Ok(StartOutcome::Started(job_id)) => job_id,
    };

    *job.external_id.write().unwrap() = Some(job_id.clone());
    *job.state.write().unwrap() = SyncState::Running;
    info!(sync_id = %job.id, job_id = %job_id, "tracking ingestion job");

    let report = track_to_completion(
        ctx.service.clone(),
        ctx.source.clone(),
        job_id.clone(),
        state.poll,
        |status| {
            job.observed.write().unwrap().push(status.to_string());
        },
    )
    .await;

    match report {
        Ok(report) => {
            let (sync_state, detail) = match report.outcome {
                SyncOutcome::Complete => (SyncState::Complete, None),
                SyncOutcome::Failed => (SyncState::Failed, None),
                SyncOutcome::Indeterminate => (
                    SyncState::Indeterminate,
                    report
                        .final_status
                        .as_ref()
                        .map(|s| format!("job reported unrecognized status: {s}")),
                ),
                SyncOutcome::TimedOut => (
                    SyncState::TimedOut,
                    Some(format!(
                        "gave up after {} observations",
                        report.observations
                    )),
                ),
            };
            info!(
                sync_id = %job.id,
                job_id = %job_id,
                observations = report.observations,
                outcome = ?report.outcome,
                "ingestion tracking finished"
            );
            finish(&job, sync_state, detail);
        }
        Err(e) => {
            error!(sync_id = %job.id, job_id = %job_id, error = %e, "tracking failed");
            finish(&job, SyncState::Error, Some(e.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_state_serde() {
        assert_eq!(
            serde_json::to_string(&SyncState::NotStarted).unwrap(),
            r#""not_started""#
        );
        let state: SyncState = serde_json::from_str(r#""timed_out""#).unwrap();
        assert_eq!(state, SyncState::TimedOut);
    }

    #[test]
    fn store_starts_empty() {
        let store = SyncJobStore::new();
        assert!(store.jobs.read().unwrap().is_empty());
    }
}
