use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u16(profile: &str, key: &str, default: u16) -> u16 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_u32(profile: &str, key: &str, default: u32) -> u32 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_u64(profile: &str, key: &str, default: u64) -> u64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub server: ServerConfig,
    pub aws: AwsConfig,
    pub intake: IntakeConfig,
    pub knowledge_base: KnowledgeBaseConfig,
    pub ingestion: IngestionConfig,
    pub auth: AuthConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `EXAMGEN_PROFILE`. When set (e.g. `PROD`), every
    /// key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("EXAMGEN_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            server: ServerConfig::from_env_profiled(p),
            aws: AwsConfig::from_env_profiled(p),
            intake: IntakeConfig::from_env_profiled(p),
            knowledge_base: KnowledgeBaseConfig::from_env_profiled(p),
            ingestion: IngestionConfig::from_env_profiled(p),
            auth: AuthConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() {
            "default"
        } else {
            &self.profile
        }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  server:     port={}", self.server.port);
        tracing::info!(
            "  aws:        region={}, configured={}",
            self.aws.region,
            self.aws.is_configured()
        );
        tracing::info!(
            "  intake:     bucket={}, prefix={}",
            self.intake.bucket.as_deref().unwrap_or("(local)"),
            self.intake.prefix
        );
        tracing::info!(
            "  knowledge:  kb={}, data_source={}",
            self.knowledge_base
                .knowledge_base_id
                .as_deref()
                .unwrap_or("(none)"),
            self.knowledge_base
                .data_source_id
                .as_deref()
                .unwrap_or("(none)")
        );
        tracing::info!(
            "  ingestion:  poll_interval={}s, max_polls={}",
            self.ingestion.poll_interval_secs,
            self.ingestion.max_polls
        );
        tracing::info!("  auth:       store={}", self.auth.credentials_path.display());
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
}

impl ServerConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            host: profiled_env_or(p, "HOST", "0.0.0.0"),
            port: profiled_env_u16(p, "PORT", 3001),
            cors_origin: profiled_env_or(p, "CORS_ORIGIN", "*"),
        }
    }
}

// ── AWS ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
    pub endpoint_url: Option<String>,
}

impl AwsConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            region: profiled_env_or(p, "AWS_REGION", "us-east-1"),
            access_key_id: profiled_env_opt(p, "AWS_ACCESS_KEY_ID"),
            secret_access_key: profiled_env_opt(p, "AWS_SECRET_ACCESS_KEY"),
            session_token: profiled_env_opt(p, "AWS_SESSION_TOKEN"),
            endpoint_url: profiled_env_opt(p, "AWS_ENDPOINT_URL"),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.access_key_id.is_some() && self.secret_access_key.is_some()
    }
}

// ── Syllabus intake (S3 or local) ─────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeConfig {
    /// S3 bucket holding syllabus uploads. Unset = local backend.
    pub bucket: Option<String>,
    /// Key prefix under which syllabi are stored.
    pub prefix: String,
    /// Local directory used when no bucket is configured.
    pub local_dir: PathBuf,
}

impl IntakeConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            bucket: profiled_env_opt(p, "S3_BUCKET"),
            prefix: profiled_env_or(p, "S3_PREFIX", "knowledgebase"),
            local_dir: PathBuf::from(profiled_env_or(p, "INTAKE_DIR", "data/intake")),
        }
    }

    pub fn is_remote(&self) -> bool {
        self.bucket.is_some()
    }
}

// ── Knowledge base (Bedrock) ──────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBaseConfig {
    pub knowledge_base_id: Option<String>,
    pub data_source_id: Option<String>,
    /// Foundation model used for retrieve-and-generate.
    pub model_arn: String,
}

impl KnowledgeBaseConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            knowledge_base_id: profiled_env_opt(p, "KNOWLEDGE_BASE_ID"),
            data_source_id: profiled_env_opt(p, "DATA_SOURCE_ID"),
            model_arn: profiled_env_or(
                p,
                "MODEL_ARN",
                "arn:aws:bedrock:us-east-1::foundation-model/anthropic.claude-3-haiku-20240307-v1:0",
            ),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.knowledge_base_id.is_some() && self.data_source_id.is_some()
    }
}

// ── Ingestion polling ─────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// Seconds between successive status polls.
    pub poll_interval_secs: u64,
    /// Maximum polls before a wait is reported as timed out.
    pub max_polls: u32,
}

impl IngestionConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            poll_interval_secs: profiled_env_u64(p, "POLL_INTERVAL_SECS", 10),
            max_polls: profiled_env_u32(p, "MAX_POLLS", 180),
        }
    }
}

// ── Auth ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Path to the JSON credential store.
    pub credentials_path: PathBuf,
}

impl AuthConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            credentials_path: PathBuf::from(profiled_env_or(
                p,
                "CREDENTIALS_FILE",
                "data/credentials.json",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kb_config_requires_both_ids() {
        let kb = KnowledgeBaseConfig {
            knowledge_base_id: Some("KB123".into()),
            data_source_id: None,
            model_arn: "arn".into(),
        };
        assert!(!kb.is_configured());

        let kb = KnowledgeBaseConfig {
            knowledge_base_id: Some("KB123".into()),
            data_source_id: Some("DS456".into()),
            model_arn: "arn".into(),
        };
        assert!(kb.is_configured());
    }

    #[test]
    fn intake_remote_only_with_bucket() {
        let intake = IntakeConfig {
            bucket: None,
            prefix: "knowledgebase".into(),
            local_dir: PathBuf::from("data/intake"),
        };
        assert!(!intake.is_remote());
    }

    #[test]
    fn profile_label() {
        let mut config = Config::for_profile("");
        assert_eq!(config.profile_label(), "default");
        config.profile = "PROD".into();
        assert_eq!(config.profile_label(), "PROD");
    }
}
