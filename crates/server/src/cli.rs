//! CLI argument parsing and subcommand dispatch.

use std::sync::Arc;

use tracing::info;

use examgen_auth::{RegisterOutcome, Role, UserStore};
use examgen_core::Config;
use examgen_ingestion::{
    start_when_clear, track_to_completion, PollPolicy, SourceRef, StartOutcome, SyncOutcome,
};
use examgen_intake::{DocumentStore, IntakeBackend};
use examgen_kb::BedrockAgentClient;

/// Parse CLI arguments and dispatch to the appropriate subcommand.
///
/// Returns `Ok(true)` if a subcommand was handled, `Ok(false)` if `serve`
/// should be started (handled by the caller).
pub async fn dispatch(config: &Config, args: &[String]) -> anyhow::Result<bool> {
    match args.get(1).map(|s| s.as_str()) {
        Some("sync") => {
            sync_once(config).await?;
            Ok(true)
        }
        Some("upload") => {
            let path = args.get(2).expect("Usage: server upload <pdf_path> <subject>");
            let subject = args.get(3).expect("Usage: server upload <pdf_path> <subject>");
            upload(config, path, subject).await?;
            Ok(true)
        }
        Some("register") => {
            let username = args.get(2).expect("Usage: server register <username> <role>");
            let role = args.get(3).expect("Usage: server register <username> <role>");
            register(config, username, role)?;
            Ok(true)
        }
        Some("serve") => Ok(false),
        _ => {
            print_usage();
            Ok(true)
        }
    }
}

/// One-shot gate → start → track against the configured knowledge base.
/// The process exit code reflects the final outcome.
async fn sync_once(config: &Config) -> anyhow::Result<()> {
    let (Some(kb_id), Some(ds_id)) = (
        config.knowledge_base.knowledge_base_id.as_deref(),
        config.knowledge_base.data_source_id.as_deref(),
    ) else {
        anyhow::bail!("sync requires KNOWLEDGE_BASE_ID and DATA_SOURCE_ID");
    };

    let service: Arc<BedrockAgentClient> = Arc::new(BedrockAgentClient::new(&config.aws));
    let source = SourceRef::new(kb_id, ds_id);
    let policy = PollPolicy::from_config(&config.ingestion);

    let outcome = start_when_clear(service.as_ref(), &source, policy).await?;
    let job_id = match outcome {
        StartOutcome::Started(id) => id,
        StartOutcome::NotStarted(decision) => {
            anyhow::bail!(
                "could not start ingestion ({decision:?}) — another job may still be running, try again shortly"
            );
        }
    };

    let report = track_to_completion(service, source, job_id, policy, |status| {
        info!("ingestion status: {status}");
    })
    .await?;

    match report.outcome {
        SyncOutcome::Complete => {
            info!(observations = report.observations, "ingestion complete");
            Ok(())
        }
        SyncOutcome::Failed => anyhow::bail!("ingestion failed"),
        SyncOutcome::Indeterminate => anyhow::bail!(
            "ingestion ended in unrecognized state: {:?}",
            report.final_status
        ),
        SyncOutcome::TimedOut => anyhow::bail!(
            "gave up tracking after {} observations",
            report.observations
        ),
    }
}

async fn upload(config: &Config, path: &str, subject: &str) -> anyhow::Result<()> {
    let bytes = std::fs::read(path)?;
    let backend = IntakeBackend::from_config(&config.intake, &config.aws)?;
    let documents = DocumentStore::from_backend(&backend, config.intake.prefix.clone());

    let stored = documents.put_syllabus(subject, bytes.into()).await?;
    info!(key = %stored.key, size = stored.size, "syllabus uploaded");
    Ok(())
}

fn register(config: &Config, username: &str, role: &str) -> anyhow::Result<()> {
    let role = Role::parse(role)
        .ok_or_else(|| anyhow::anyhow!("role must be 'admin' or 'user', got '{role}'"))?;
    let password = std::env::var("EXAMGEN_PASSWORD")
        .map_err(|_| anyhow::anyhow!("set EXAMGEN_PASSWORD to the new user's password"))?;

    let store = UserStore::new(config.auth.credentials_path.clone());
    match store.register(username, &password, role)? {
        RegisterOutcome::Created => {
            info!(username = %username, "user registered");
            Ok(())
        }
        RegisterOutcome::AlreadyExists => anyhow::bail!("username '{username}' already exists"),
    }
}

fn print_usage() {
    println!("examgen v{}", env!("CARGO_PKG_VERSION"));
    println!("Usage: server <command>");
    println!("  upload <pdf_path> <subject>   Upload a syllabus PDF to the intake store");
    println!("  sync                          Start and track a knowledge-base ingestion job");
    println!("  register <username> <role>    Add a user (password from EXAMGEN_PASSWORD)");
    println!("  serve                         Start the HTTP server");
}
