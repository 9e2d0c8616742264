use std::str::FromStr;

use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which provider protocol the gateway speaks. Selection is a configuration
/// value, never inferred from the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Local open-model server speaking the Ollama chat protocol.
    Ollama,
    /// Hosted OpenAI-compatible completion API.
    OpenAi,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::OpenAi => "openai",
        }
    }

    /// Endpoint used when no base URL is configured.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Ollama => "http://localhost:11434",
            Self::OpenAi => "https://api.openai.com",
        }
    }
}

impl FromStr for Provider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAi),
            other => anyhow::bail!("Unknown provider '{other}' (expected 'ollama' or 'openai')"),
        }
    }
}

/// Configuration for the model gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub provider: Provider,
    /// Base URL of the provider endpoint.
    pub base_url: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Bearer credential; required for the hosted provider.
    pub api_key: Option<String>,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl GatewayConfig {
    /// Create config from environment variables, defaulting to a local
    /// Ollama server.
    ///
    /// Reads `CLINSCRIBE_PROVIDER`, `CLINSCRIBE_BASE_URL`, `CLINSCRIBE_MODEL`
    /// and `CLINSCRIBE_API_KEY`. A missing credential is not an error here;
    /// callers validate it once overrides are applied.
    pub fn from_env() -> Result<Self> {
        let provider = match std::env::var("CLINSCRIBE_PROVIDER") {
            Ok(value) => value.parse()?,
            Err(_) => Provider::Ollama,
        };
        let base_url = std::env::var("CLINSCRIBE_BASE_URL")
            .unwrap_or_else(|_| provider.default_base_url().to_string());
        let model =
            std::env::var("CLINSCRIBE_MODEL").unwrap_or_else(|_| "llama3.1".to_string());
        let api_key = std::env::var("CLINSCRIBE_API_KEY").ok();

        Ok(Self {
            provider,
            base_url,
            model,
            api_key,
            temperature: 0.2,
            max_tokens: 2048,
        })
    }

    /// Config for a local Ollama server.
    pub fn ollama(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: Provider::Ollama,
            base_url: base_url.into(),
            model: model.into(),
            api_key: None,
            temperature: 0.2,
            max_tokens: 2048,
        }
    }

    /// Config for a hosted OpenAI-compatible endpoint.
    pub fn open_ai(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: Provider::OpenAi,
            base_url: Provider::OpenAi.default_base_url().to_string(),
            model: model.into(),
            api_key: Some(api_key.into()),
            temperature: 0.2,
            max_tokens: 2048,
        }
    }
}

/// Gateway failure taxonomy. All variants are fatal to the in-progress run;
/// no retry is performed here.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("{provider} unreachable: {detail}")]
    ProviderUnavailable {
        provider: &'static str,
        detail: String,
    },
    #[error("{provider} returned status {status}: {body}")]
    ProviderError {
        provider: &'static str,
        status: u16,
        body: String,
    },
    #[error("{provider} response contained no text")]
    EmptyResponse { provider: &'static str },
}

/// Uniform text-generation interface.
///
/// The production implementation is [`ModelGateway`]; tests substitute
/// scripted implementations returning canned text.
#[allow(async_fn_in_trait)]
pub trait TextGenerator {
    /// Send one (system, user) prompt pair and return the generated text.
    async fn generate(&self, system: &str, user: &str) -> Result<String, GatewayError>;
}

/// HTTP client normalizing the two provider protocols behind one
/// `generate` call.
pub struct ModelGateway {
    client: Client,
    config: GatewayConfig,
}

impl ModelGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Lightweight liveness probe; status only, no body requirement.
    pub async fn check_availability(&self) -> bool {
        let url = match self.config.provider {
            Provider::Ollama => format!("{}/api/tags", self.config.base_url),
            Provider::OpenAi => format!("{}/v1/models", self.config.base_url),
        };
        let mut request = self.client.get(&url);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }
        match request.send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// Issue a trivial generation against the given model and report whether
    /// it completed. Used for status display only, never to gate core logic.
    pub async fn check_model_ready(&self, model: &str) -> bool {
        self.generate_with(model, "You are a readiness probe.", "Reply with the word ready.")
            .await
            .is_ok()
    }

    async fn generate_with(
        &self,
        model: &str,
        system: &str,
        user: &str,
    ) -> Result<String, GatewayError> {
        debug!(provider = self.config.provider.as_str(), model, "model call");
        match self.config.provider {
            Provider::Ollama => self.generate_ollama(model, system, user).await,
            Provider::OpenAi => self.generate_open_ai(model, system, user).await,
        }
    }

    async fn generate_ollama(
        &self,
        model: &str,
        system: &str,
        user: &str,
    ) -> Result<String, GatewayError> {
        const PROVIDER: &str = "ollama";

        let request = OllamaRequest {
            model: model.to_string(),
            messages: chat_messages(system, user),
            options: OllamaOptions {
                temperature: self.config.temperature,
                num_predict: self.config.max_tokens,
            },
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.config.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::ProviderUnavailable {
                provider: PROVIDER,
                detail: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::ProviderError {
                provider: PROVIDER,
                status,
                body,
            });
        }

        let envelope: OllamaResponse = response
            .json()
            .await
            .map_err(|_| GatewayError::EmptyResponse { provider: PROVIDER })?;

        if envelope.message.content.is_empty() {
            return Err(GatewayError::EmptyResponse { provider: PROVIDER });
        }
        Ok(envelope.message.content)
    }

    async fn generate_open_ai(
        &self,
        model: &str,
        system: &str,
        user: &str,
    ) -> Result<String, GatewayError> {
        const PROVIDER: &str = "openai";

        let request = OpenAiRequest {
            model: model.to_string(),
            messages: chat_messages(system, user),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let mut builder = self
            .client
            .post(format!("{}/v1/chat/completions", self.config.base_url))
            .json(&request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| GatewayError::ProviderUnavailable {
                provider: PROVIDER,
                detail: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::ProviderError {
                provider: PROVIDER,
                status,
                body,
            });
        }

        let envelope: OpenAiResponse = response
            .json()
            .await
            .map_err(|_| GatewayError::EmptyResponse { provider: PROVIDER })?;

        envelope
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(GatewayError::EmptyResponse { provider: PROVIDER })
    }
}

impl TextGenerator for ModelGateway {
    async fn generate(&self, system: &str, user: &str) -> Result<String, GatewayError> {
        let model = self.config.model.clone();
        self.generate_with(&model, system, user).await
    }
}

fn chat_messages(system: &str, user: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage {
            role: "system".to_string(),
            content: system.to_string(),
        },
        ChatMessage {
            role: "user".to_string(),
            content: user.to_string(),
        },
    ]
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<ChatMessage>,
    options: OllamaOptions,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f64,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: OllamaMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    #[serde(default)]
    content: String,
}
