use std::sync::Arc;

use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::ObjectStore;
use tracing::info;

use examgen_core::config::{AwsConfig, IntakeConfig};

use crate::error::IntakeError;

/// Unified intake backend wrapping object_store.
pub enum IntakeBackend {
    Local(LocalBackend),
    S3(S3Backend),
}

impl IntakeBackend {
    /// Pick S3 when a bucket is configured, local otherwise.
    pub fn from_config(intake: &IntakeConfig, aws: &AwsConfig) -> Result<Self, IntakeError> {
        if intake.is_remote() {
            Ok(IntakeBackend::S3(S3Backend::new(intake, aws)?))
        } else {
            Ok(IntakeBackend::Local(LocalBackend::new(intake)?))
        }
    }

    pub fn store(&self) -> Arc<dyn ObjectStore> {
        match self {
            IntakeBackend::Local(b) => b.store.clone(),
            IntakeBackend::S3(b) => b.store.clone(),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, IntakeBackend::S3(_))
    }
}

/// Local filesystem backend.
pub struct LocalBackend {
    pub store: Arc<dyn ObjectStore>,
}

impl LocalBackend {
    pub fn new(intake: &IntakeConfig) -> Result<Self, IntakeError> {
        std::fs::create_dir_all(&intake.local_dir)
            .map_err(|e| IntakeError::NotConfigured(format!("intake dir: {e}")))?;
        let canonical = std::fs::canonicalize(&intake.local_dir)
            .unwrap_or_else(|_| intake.local_dir.clone());
        let store = LocalFileSystem::new_with_prefix(&canonical)
            .map_err(|e| IntakeError::NotConfigured(format!("local filesystem: {e}")))?;
        info!("Intake: local backend at {}", canonical.display());
        Ok(Self {
            store: Arc::new(store),
        })
    }
}

/// S3 backend.
pub struct S3Backend {
    pub store: Arc<dyn ObjectStore>,
    pub bucket: String,
}

impl S3Backend {
    pub fn new(intake: &IntakeConfig, aws: &AwsConfig) -> Result<Self, IntakeError> {
        let bucket = intake
            .bucket
            .as_deref()
            .ok_or_else(|| IntakeError::NotConfigured("S3_BUCKET not set".into()))?;

        let mut builder = AmazonS3Builder::new().with_region(&aws.region);

        if let Some(ref key) = aws.access_key_id {
            builder = builder.with_access_key_id(key);
        }
        if let Some(ref secret) = aws.secret_access_key {
            builder = builder.with_secret_access_key(secret);
        }
        if let Some(ref token) = aws.session_token {
            builder = builder.with_token(token);
        }

        if let Some(ref endpoint) = aws.endpoint_url {
            if !endpoint.is_empty() {
                // object_store requires absolute URLs for endpoint overrides
                let endpoint_url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
                    endpoint.clone()
                } else {
                    format!("https://{}", endpoint)
                };
                builder = builder
                    .with_bucket_name(bucket)
                    .with_endpoint(&endpoint_url)
                    .with_allow_http(endpoint_url.starts_with("http://"));
            }
        } else {
            let url = format!("s3://{}", bucket);
            builder = builder.with_url(&url);
        }

        let store = builder.build()?;

        info!(
            "Intake: S3 backend s3://{}/{} (region: {})",
            bucket, intake.prefix, aws.region
        );

        Ok(Self {
            store: Arc::new(store),
            bucket: bucket.to_string(),
        })
    }
}
