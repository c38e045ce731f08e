//! Lifecycle tests for the gate / starter / tracker against a scripted
//! in-memory ingestion service. Uses tokio's paused clock so exact wait
//! counts can be asserted from elapsed virtual time.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;

use examgen_ingestion::{
    start_when_clear, track_job, track_to_completion, wait_for_clearance, GateDecision,
    IngestionError, IngestionService, JobId, JobStatus, JobSummary, PollPolicy, SourceRef,
    StartOutcome, SyncOutcome,
};

/// Service double that replays scripted responses, one per call.
#[derive(Default)]
struct ScriptedService {
    /// One entry per expected `list_recent_jobs` call.
    list_responses: Mutex<VecDeque<Vec<JobSummary>>>,
    /// One entry per expected `get_job_status` call.
    status_responses: Mutex<VecDeque<JobStatus>>,
    started: Mutex<Vec<JobId>>,
    list_calls: AtomicU32,
    status_calls: AtomicU32,
    fail_list: bool,
}

impl ScriptedService {
    fn with_listings(listings: Vec<Vec<&str>>) -> Self {
        let scripted = listings
            .into_iter()
            .map(|statuses| {
                statuses
                    .into_iter()
                    .map(|s| JobSummary {
                        job_id: JobId::from("PRIOR"),
                        status: JobStatus::parse(s),
                    })
                    .collect()
            })
            .collect();
        Self {
            list_responses: Mutex::new(scripted),
            ..Default::default()
        }
    }

    fn with_statuses(statuses: Vec<&str>) -> Self {
        Self {
            status_responses: Mutex::new(statuses.into_iter().map(JobStatus::parse).collect()),
            ..Default::default()
        }
    }
}

#[async_trait]
impl IngestionService for ScriptedService {
    async fn list_recent_jobs(
        &self,
        _source: &SourceRef,
        limit: u32,
    ) -> Result<Vec<JobSummary>, IngestionError> {
        assert_eq!(limit, 1, "gate should only ever ask for the latest job");
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list {
            return Err(IngestionError::Service("connection reset".into()));
        }
        self.list_responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| IngestionError::Service("listing script exhausted".into()))
    }

    async fn start_job(&self, _source: &SourceRef) -> Result<JobId, IngestionError> {
        let id = JobId::from("J1");
        self.started.lock().unwrap().push(id.clone());
        Ok(id)
    }

    async fn get_job_status(
        &self,
        _source: &SourceRef,
        _job_id: &JobId,
    ) -> Result<JobStatus, IngestionError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.status_responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| IngestionError::Service("status script exhausted".into()))
    }
}

fn source() -> SourceRef {
    SourceRef::new("KB", "DS")
}

fn policy() -> PollPolicy {
    PollPolicy::default()
}

// ── Gate ────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn gate_clears_immediately_with_no_prior_jobs() {
    let service = ScriptedService::with_listings(vec![vec![]]);
    let before = tokio::time::Instant::now();

    let decision = wait_for_clearance(&service, &source(), policy())
        .await
        .unwrap();

    assert_eq!(decision, GateDecision::Clear);
    assert_eq!(before.elapsed(), Duration::ZERO, "no waits expected");
    assert_eq!(service.list_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn gate_clears_immediately_on_terminal_status() {
    for terminal in ["COMPLETE", "FAILED"] {
        let service = ScriptedService::with_listings(vec![vec![terminal]]);
        let before = tokio::time::Instant::now();

        let decision = wait_for_clearance(&service, &source(), policy())
            .await
            .unwrap();

        assert_eq!(decision, GateDecision::Clear, "status {terminal}");
        assert_eq!(before.elapsed(), Duration::ZERO);
    }
}

#[tokio::test(start_paused = true)]
async fn gate_fails_closed_on_unrecognized_status() {
    let service = ScriptedService::with_listings(vec![vec!["UNKNOWN"]]);
    let before = tokio::time::Instant::now();

    let decision = wait_for_clearance(&service, &source(), policy())
        .await
        .unwrap();

    assert_eq!(
        decision,
        GateDecision::Indeterminate {
            status: JobStatus::Other("UNKNOWN".into())
        }
    );
    assert_eq!(before.elapsed(), Duration::ZERO, "fail-closed means no waiting");
    assert_eq!(service.list_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn gate_waits_exactly_twice_through_two_active_polls() {
    let service = ScriptedService::with_listings(vec![
        vec!["IN_PROGRESS"],
        vec!["IN_PROGRESS"],
        vec!["COMPLETE"],
    ]);
    let before = tokio::time::Instant::now();

    let decision = wait_for_clearance(&service, &source(), policy())
        .await
        .unwrap();

    assert_eq!(decision, GateDecision::Clear);
    assert_eq!(before.elapsed(), Duration::from_secs(20), "two 10s waits");
    assert_eq!(service.list_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn gate_times_out_when_prior_job_never_finishes() {
    let service =
        ScriptedService::with_listings(vec![vec!["IN_PROGRESS"]; 10]);
    let bounded = PollPolicy::new(Duration::from_secs(10), 3);

    let decision = wait_for_clearance(&service, &source(), bounded)
        .await
        .unwrap();

    assert_eq!(decision, GateDecision::TimedOut { polls: 3 });
    // One initial poll plus one per allowed wait.
    assert_eq!(service.list_calls.load(Ordering::SeqCst), 4);
}

#[tokio::test(start_paused = true)]
async fn gate_propagates_service_errors() {
    let service = ScriptedService {
        fail_list: true,
        ..Default::default()
    };

    let err = wait_for_clearance(&service, &source(), policy())
        .await
        .unwrap_err();

    assert!(matches!(err, IngestionError::Service(_)));
}

// ── Starter ─────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn starter_issues_no_start_call_when_gate_refuses() {
    let service = ScriptedService::with_listings(vec![vec!["UNKNOWN"]]);

    let outcome = start_when_clear(&service, &source(), policy())
        .await
        .unwrap();

    assert!(matches!(outcome, StartOutcome::NotStarted(_)));
    assert!(outcome.job_id().is_none());
    assert!(service.started.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn starter_starts_exactly_one_job_when_clear() {
    let service = ScriptedService::with_listings(vec![vec![]]);

    let outcome = start_when_clear(&service, &source(), policy())
        .await
        .unwrap();

    assert_eq!(outcome, StartOutcome::Started(JobId::from("J1")));
    assert_eq!(service.started.lock().unwrap().len(), 1);
}

// ── Tracker ─────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn tracker_yields_every_status_up_to_first_terminal() {
    let service = Arc::new(ScriptedService::with_statuses(vec![
        "STARTING",
        "IN_PROGRESS",
        "COMPLETE",
        // Never reached — the stream must stop at COMPLETE.
        "FAILED",
    ]));

    let stream = track_job(service.clone(), source(), JobId::from("J1"), policy());
    let observed: Vec<JobStatus> = stream.map(|item| item.unwrap()).collect().await;

    assert_eq!(
        observed,
        vec![
            JobStatus::Starting,
            JobStatus::InProgress,
            JobStatus::Complete
        ]
    );
    assert_eq!(service.status_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn tracker_pauses_between_observations() {
    let service = Arc::new(ScriptedService::with_statuses(vec![
        "IN_PROGRESS",
        "IN_PROGRESS",
        "COMPLETE",
    ]));
    let before = tokio::time::Instant::now();

    let report = track_to_completion(service, source(), JobId::from("J1"), policy(), |_| {})
        .await
        .unwrap();

    assert_eq!(report.outcome, SyncOutcome::Complete);
    assert_eq!(before.elapsed(), Duration::from_secs(20));
}

#[tokio::test(start_paused = true)]
async fn tracker_stops_at_failed_without_further_polls() {
    let service = Arc::new(ScriptedService::with_statuses(vec!["IN_PROGRESS", "FAILED"]));

    let mut seen = Vec::new();
    let report = track_to_completion(
        service.clone(),
        source(),
        JobId::from("J1"),
        policy(),
        |status| seen.push(status.clone()),
    )
    .await
    .unwrap();

    assert_eq!(report.outcome, SyncOutcome::Failed);
    assert_eq!(report.observations, 2);
    assert_eq!(seen, vec![JobStatus::InProgress, JobStatus::Failed]);
    assert_eq!(service.status_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn tracker_ends_on_unrecognized_status_with_indeterminate_outcome() {
    let service = Arc::new(ScriptedService::with_statuses(vec![
        "IN_PROGRESS",
        "STOPPING",
    ]));

    let report = track_to_completion(service.clone(), source(), JobId::from("J1"), policy(), |_| {})
        .await
        .unwrap();

    assert_eq!(report.outcome, SyncOutcome::Indeterminate);
    assert_eq!(report.observations, 2);
    assert_eq!(report.final_status, Some(JobStatus::Other("STOPPING".into())));
    assert_eq!(service.status_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn tracker_reports_timeout_when_budget_is_spent() {
    let service = Arc::new(ScriptedService::with_statuses(vec!["IN_PROGRESS"; 10]));
    let bounded = PollPolicy::new(Duration::from_secs(10), 3);

    let report = track_to_completion(service.clone(), source(), JobId::from("J1"), bounded, |_| {})
        .await
        .unwrap();

    assert_eq!(report.outcome, SyncOutcome::TimedOut);
    assert_eq!(report.observations, 3);
    assert_eq!(service.status_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn tracker_propagates_service_errors() {
    // Empty status script: the first poll hits "script exhausted".
    let service = Arc::new(ScriptedService::with_statuses(vec![]));

    let err = track_to_completion(service, source(), JobId::from("J1"), policy(), |_| {})
        .await
        .unwrap_err();

    assert!(matches!(err, IngestionError::Service(_)));
}

// ── End to end ──────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn end_to_end_sync_completes() {
    let service = Arc::new(ScriptedService {
        list_responses: Mutex::new(VecDeque::from([vec![]])),
        status_responses: Mutex::new(
            ["STARTING", "IN_PROGRESS", "COMPLETE"]
                .into_iter()
                .map(JobStatus::parse)
                .collect(),
        ),
        ..Default::default()
    });

    let outcome = start_when_clear(service.as_ref(), &source(), policy())
        .await
        .unwrap();
    let StartOutcome::Started(job_id) = outcome else {
        panic!("expected a started job");
    };
    assert_eq!(job_id, JobId::from("J1"));

    let mut seen = Vec::new();
    let report = track_to_completion(service.clone(), source(), job_id, policy(), |status| {
        seen.push(status.to_string())
    })
    .await
    .unwrap();

    assert_eq!(report.outcome, SyncOutcome::Complete);
    assert_eq!(report.observations, 3);
    assert_eq!(seen, vec!["STARTING", "IN_PROGRESS", "COMPLETE"]);
    assert_eq!(report.final_status, Some(JobStatus::Complete));
}

#[tokio::test(start_paused = true)]
async fn end_to_end_sync_fails() {
    let service = Arc::new(ScriptedService {
        list_responses: Mutex::new(VecDeque::from([vec![]])),
        status_responses: Mutex::new(
            ["IN_PROGRESS", "FAILED"]
                .into_iter()
                .map(JobStatus::parse)
                .collect(),
        ),
        ..Default::default()
    });

    let outcome = start_when_clear(service.as_ref(), &source(), policy())
        .await
        .unwrap();
    let job_id = outcome.job_id().cloned().expect("job should start");

    let report = track_to_completion(service.clone(), source(), job_id, policy(), |_| {})
        .await
        .unwrap();

    assert_eq!(report.outcome, SyncOutcome::Failed);
    assert_eq!(report.observations, 2);
    assert_eq!(service.status_calls.load(Ordering::SeqCst), 2);
}
