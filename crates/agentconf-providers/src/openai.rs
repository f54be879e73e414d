//! OpenAI analysis adapter
//!
//! Sends one chat-completion request per artifact and interprets the reply
//! through the tolerant parser in [`crate::parse`].

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use agentconf_domain::{Artifact, PackageConfiguration, VariableDeclaration};

use crate::{
    analyzer::DeclarationAnalyzer,
    error::AnalysisError,
    parse::parse_declarations,
    prompt::{build_extraction_prompt, SYSTEM_INSTRUCTION},
};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// OpenAI chat-completions adapter
pub struct OpenAiAnalyzer {
    api_key: String,
    client: Arc<Client>,
    base_url: String,
    model: String,
}

impl OpenAiAnalyzer {
    /// Create a new OpenAI analyzer
    pub fn new(api_key: String) -> Result<Self, AnalysisError> {
        Self::with_client(Arc::new(Client::new()), api_key)
    }

    /// Create a new OpenAI analyzer with a custom HTTP client
    pub fn with_client(client: Arc<Client>, api_key: String) -> Result<Self, AnalysisError> {
        Self::with_client_and_base_url(client, api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Create a new OpenAI analyzer with a custom HTTP client and base URL
    pub fn with_client_and_base_url(
        client: Arc<Client>,
        api_key: String,
        base_url: String,
    ) -> Result<Self, AnalysisError> {
        if api_key.is_empty() {
            return Err(AnalysisError::ConfigError(
                "OpenAI API key is required".to_string(),
            ));
        }

        Ok(Self {
            api_key,
            client,
            base_url,
            model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Override the model used for extraction requests
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl DeclarationAnalyzer for OpenAiAnalyzer {
    fn id(&self) -> &str {
        "openai"
    }

    async fn extract(
        &self,
        artifact: &Artifact,
        known: Option<&PackageConfiguration>,
    ) -> Result<Vec<VariableDeclaration>, AnalysisError> {
        let request = OpenAiChatRequest {
            model: self.model.clone(),
            messages: vec![
                OpenAiMessage {
                    role: "system".to_string(),
                    content: SYSTEM_INSTRUCTION.to_string(),
                },
                OpenAiMessage {
                    role: "user".to_string(),
                    content: build_extraction_prompt(artifact, known),
                },
            ],
            temperature: 0.0,
        };

        debug!(
            path = %artifact.path.display(),
            model = %self.model,
            "Sending extraction request"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("OpenAI API request failed: {}", e);
                AnalysisError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("OpenAI API error ({}): {}", status, error_text);

            return match status.as_u16() {
                401 => Err(AnalysisError::AuthError),
                429 => Err(AnalysisError::RateLimited(60)),
                _ => Err(AnalysisError::ServiceError(format!(
                    "OpenAI API error: {}",
                    status
                ))),
            };
        }

        let body: OpenAiChatResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::ServiceError(e.to_string()))?;

        let content = match body.choices.first() {
            Some(choice) => choice.message.content.as_str(),
            None => {
                warn!(
                    path = %artifact.path.display(),
                    "OpenAI response contained no choices"
                );
                return Ok(Vec::new());
            }
        };

        let declarations = parse_declarations(content);
        debug!(
            path = %artifact.path.display(),
            count = declarations.len(),
            "Extraction complete"
        );
        Ok(declarations)
    }
}

/// OpenAI chat-completions request format
#[derive(Debug, Serialize)]
struct OpenAiChatRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    temperature: f32,
}

/// OpenAI message format
#[derive(Debug, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

/// OpenAI chat-completions response format
#[derive(Debug, Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

/// One completion choice
#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}
