//! Bedrock Agent runtime client for retrieve-and-generate.

use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sdk_bedrockagentruntime::config::BehaviorVersion;
use aws_sdk_bedrockagentruntime::types::{
    KnowledgeBaseRetrieveAndGenerateConfiguration, RetrieveAndGenerateConfiguration,
    RetrieveAndGenerateInput, RetrieveAndGenerateType,
};
use aws_sdk_bedrockagentruntime::Client;
use tracing::{debug, info};

use examgen_core::config::{AwsConfig, KnowledgeBaseConfig};
use examgen_exam::{GenerateError, RetrieveAndGenerate};

use crate::error::KbError;

/// Retrieval-augmented generation against a Bedrock knowledge base.
pub struct BedrockRetrieveClient {
    client: Client,
    knowledge_base_id: String,
    model_arn: String,
}

impl BedrockRetrieveClient {
    /// Create a client from project config. Fails when the knowledge base
    /// id is missing — there is nothing to retrieve against.
    pub fn new(aws: &AwsConfig, kb: &KnowledgeBaseConfig) -> Result<Self, KbError> {
        let knowledge_base_id = kb
            .knowledge_base_id
            .clone()
            .ok_or_else(|| KbError::NotConfigured("KNOWLEDGE_BASE_ID not set".into()))?;

        let region = aws_sdk_bedrockagentruntime::config::Region::new(aws.region.clone());
        let mut conf = aws_sdk_bedrockagentruntime::Config::builder()
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
        info!(
            region = %aws.region,
            knowledge_base = %knowledge_base_id,
            "Bedrock retrieve-and-generate client initialized"
        );

        Ok(Self {
            client,
            knowledge_base_id,
            model_arn: kb.model_arn.clone(),
        })
    }
}

#[async_trait]
impl RetrieveAndGenerate for BedrockRetrieveClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let input = RetrieveAndGenerateInput::builder()
            .text(prompt)
            .build()
            .map_err(|e| GenerateError::Service(format!("invalid input: {e:?}")))?;

        let kb_conf = KnowledgeBaseRetrieveAndGenerateConfiguration::builder()
            .knowledge_base_id(&self.knowledge_base_id)
            .model_arn(&self.model_arn)
            .build()
            .map_err(|e| GenerateError::Service(format!("invalid kb configuration: {e:?}")))?;

        let conf = RetrieveAndGenerateConfiguration::builder()
            .r#type(RetrieveAndGenerateType::KnowledgeBase)
            .knowledge_base_configuration(kb_conf)
            .build()
            .map_err(|e| GenerateError::Service(format!("invalid configuration: {e:?}")))?;

        debug!(prompt_len = prompt.len(), "retrieve-and-generate request");

        let resp = self
            .client
            .retrieve_and_generate()
            .input(input)
            .retrieve_and_generate_configuration(conf)
            .send()
            .await
            .map_err(|e| GenerateError::Service(format!("retrieve and generate failed: {e:?}")))?;

        let text = resp
            .output()
            .map(|o| o.text().trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(GenerateError::EmptyResponse);
        }
        Ok(text)
    }
}
