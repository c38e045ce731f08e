use std::sync::Arc;

use examgen_auth::UserStore;
use examgen_exam::ExamGenerator;
use examgen_ingestion::{IngestionService, PollPolicy, SourceRef};
use examgen_intake::DocumentStore;

use crate::jobs::SyncJobStore;

/// Everything a sync run needs to reach the ingestion service.
#[derive(Clone)]
pub struct SyncContext {
    pub service: Arc<dyn IngestionService>,
    pub source: SourceRef,
}

pub struct AppState {
    pub users: UserStore,
    pub documents: DocumentStore,
    /// `None` when the knowledge base is not configured — sync endpoints
    /// answer 503.
    pub sync: Option<SyncContext>,
    /// `None` when the generation backend is not configured.
    pub generator: Option<ExamGenerator>,
    pub poll: PollPolicy,
    pub sync_jobs: SyncJobStore,
    /// Serializes gate-then-start across concurrent callers in this
    /// process. Cross-process callers still race (no distributed lock).
    pub sync_gate: tokio::sync::Mutex<()>,
}
