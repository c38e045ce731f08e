//! Bedrock Agent control-plane client for ingestion jobs.

use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sdk_bedrockagent::config::BehaviorVersion;
use aws_sdk_bedrockagent::Client;
use tracing::{debug, info};

use examgen_core::config::AwsConfig;
use examgen_ingestion::{IngestionError, IngestionService, JobId, JobSummary, JobStatus, SourceRef};

/// Bedrock-backed implementation of the ingestion service boundary.
pub struct BedrockAgentClient {
    client: Client,
}

impl BedrockAgentClient {
    /// Create a client from project config.
    pub fn new(aws: &AwsConfig) -> Self {
        let region = aws_sdk_bedrockagent::config::Region::new(aws.region.clone());

        // Build the Bedrock client config directly — do NOT use
        // aws_config::defaults(), which reads AWS_ENDPOINT_URL from the
        // environment; that variable points at the intake S3 endpoint and
        // would route Bedrock requests to the wrong service.
        let mut conf = aws_sdk_bedrockagent::Config::builder()
            .region(region)
            .behavior_version(BehaviorVersion::latest());

        if let (Some(key_id), Some(secret)) = (&aws.access_key_id, &aws.secret_access_key) {
            let creds = Credentials::new(
                key_id,
                secret,
                aws.session_token.clone(),
                None,
                "examgen-kb-static",
            );
            conf = conf.credentials_provider(creds);
        }

        let client = Client::from_conf(conf.build());
        info!(region = %aws.region, "Bedrock agent client initialized");

        Self { client }
    }
}

#[async_trait]
impl IngestionService for BedrockAgentClient {
    async fn list_recent_jobs(
        &self,
        source: &SourceRef,
        limit: u32,
    ) -> Result<Vec<JobSummary>, IngestionError> {
        debug!(limit, "listing recent ingestion jobs");

        let resp = self
            .client
            .list_ingestion_jobs()
            .knowledge_base_id(&source.knowledge_base_id)
            .data_source_id(&source.data_source_id)
            .max_results(limit as i32)
            .send()
            .await
            .map_err(|e| IngestionError::Service(format!("list ingestion jobs failed: {e:?}")))?;

        let summaries = resp
            .ingestion_job_summaries()
            .iter()
            .map(|s| JobSummary {
                job_id: JobId::from(s.ingestion_job_id()),
                status: JobStatus::parse(s.status().as_str()),
            })
            .collect();

        Ok(summaries)
    }

    async fn start_job(&self, source: &SourceRef) -> Result<JobId, IngestionError> {
        let resp = self
            .client
            .start_ingestion_job()
            .knowledge_base_id(&source.knowledge_base_id)
            .data_source_id(&source.data_source_id)
            .send()
            .await
            .map_err(|e| IngestionError::Service(format!("start ingestion job failed: {e:?}")))?;

        let job = resp.ingestion_job().ok_or_else(|| {
            IngestionError::Service("start response carried no ingestion job".into())
        })?;

        Ok(JobId::from(job.ingestion_job_id()))
    }

    async fn get_job_status(
        &self,
        source: &SourceRef,
        job_id: &JobId,
    ) -> Result<JobStatus, IngestionError> {
        let resp = self
            .client
            .get_ingestion_job()
            .knowledge_base_id(&source.knowledge_base_id)
            .data_source_id(&source.data_source_id)
            .ingestion_job_id(job_id.as_str())
            .send()
            .await
            .map_err(|e| IngestionError::Service(format!("get ingestion job failed: {e:?}")))?;

        let job = resp
            .ingestion_job()
            .ok_or_else(|| IngestionError::JobNotFound(job_id.to_string()))?;

        Ok(JobStatus::parse(job.status().as_str()))
    }
}
