mod api;
mod cli;
mod jobs;
mod router;
mod state;

use std::sync::Arc;

use tracing::{info, warn};

use examgen_auth::UserStore;
use examgen_exam::ExamGenerator;
use examgen_ingestion::{PollPolicy, SourceRef};
use examgen_intake::{DocumentStore, IntakeBackend};
use examgen_kb::{BedrockAgentClient, BedrockRetrieveClient};

use crate::jobs::SyncJobStore;
use crate::state::{AppState, SyncContext};

fn load_config() -> examgen_core::Config {
    examgen_core::config::load_dotenv();
    examgen_core::Config::from_env()
}

async fn serve(config: &examgen_core::Config) -> anyhow::Result<()> {
    config.log_summary();

    let backend = IntakeBackend::from_config(&config.intake, &config.aws)?;
    let documents = DocumentStore::from_backend(&backend, config.intake.prefix.clone());

    let sync = match (
        &config.knowledge_base.knowledge_base_id,
        &config.knowledge_base.data_source_id,
    ) {
        (Some(kb_id), Some(ds_id)) => Some(SyncContext {
            service: Arc::new(BedrockAgentClient::new(&config.aws)),
            source: SourceRef::new(kb_id, ds_id),
        }),
        _ => {
            warn!("knowledge base not configured — sync endpoints disabled");
            None
        }
    };

    let generator = match BedrockRetrieveClient::new(&config.aws, &config.knowledge_base) {
        Ok(client) => Some(ExamGenerator::new(Box::new(client))),
        Err(e) => {
            warn!("exam generation not available: {} — /api/exam endpoints disabled", e);
            None
        }
    };

    let state = Arc::new(AppState {
        users: UserStore::new(config.auth.credentials_path.clone()),
        documents,
        sync,
        generator,
        poll: PollPolicy::from_config(&config.ingestion),
        sync_jobs: SyncJobStore::new(),
        sync_gate: tokio::sync::Mutex::new(()),
    });

    let app = router::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://localhost:{}", config.server.port);
    axum::serve(listener, app).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let config = load_config();
    let args: Vec<String> = std::env::args().collect();

    if cli::dispatch(&config, &args).await? {
        return Ok(());
    }
    serve(&config).await
}
