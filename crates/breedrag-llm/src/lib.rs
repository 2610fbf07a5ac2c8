//! Adapter for an OpenAI-compatible chat-completion backend.
//!
//! [`GenerationClient::complete`] reports every call as a [`GenerationOutcome`].
//! Timeouts and refused connections become a degraded answer built from the
//! supplied context; everything else is a [`GenerationFailure`].

mod outcome;
mod wire;

pub use outcome::{fallback_response, GenerationFailure, GenerationOutcome, Unavailability, APOLOGY, DEGRADED_NOTE};
pub use wire::ChatMessage;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument, warn};

use breedrag_core::config::{AppConfig, LlmConfig, RagConfig};
use breedrag_core::error::{Error, Result};
use breedrag_core::traits::TextGenerator;
use breedrag_core::types::BackendHealth;

use wire::{ChatRequest, ChatResponse};

pub struct GenerationClient {
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    system_prompt: String,
    timeout: Duration,
    health_timeout: Duration,
    fallback_excerpt_chars: usize,
    client: Client,
}

impl GenerationClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| Error::InvalidConfig(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            system_prompt: config.system_prompt.clone(),
            timeout: Duration::from_millis(config.timeout_ms),
            health_timeout: Duration::from_millis(config.health_timeout_ms),
            fallback_excerpt_chars: RagConfig::default().fallback_excerpt_chars,
            client,
        })
    }

    pub fn from_app_config(app: &AppConfig) -> Result<Self> {
        Ok(Self::new(&app.llm)?.with_fallback_excerpt(app.rag.fallback_excerpt_chars))
    }

    #[must_use]
    pub fn with_fallback_excerpt(mut self, chars: usize) -> Self {
        self.fallback_excerpt_chars = chars;
        self
    }

    /// Fixed instruction, then the context (when present), then the question.
    pub fn build_messages(&self, query: &str, context: &str) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage::system(self.system_prompt.clone())];
        if !context.is_empty() {
            messages.push(ChatMessage::system(format!("Context information:\n{context}")));
        }
        messages.push(ChatMessage::user(query));
        messages
    }

    #[instrument(skip(self, context), fields(backend = %self.base_url, context_len = context.len()))]
    pub async fn complete(&self, query: &str, context: &str) -> GenerationOutcome {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: self.build_messages(query, context),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let resp = match self.client.post(&url).timeout(self.timeout).json(&request).send().await {
            Ok(resp) => resp,
            Err(e) => return self.transport_outcome(&e, context),
        };
        let status = resp.status();
        if !status.is_success() {
            let body = status_body(resp.text().await);
            return GenerationOutcome::Failed(GenerationFailure::Status { status: status.as_u16(), body });
        }
        let body: ChatResponse = match resp.json().await {
            Ok(body) => body,
            Err(e) if e.is_timeout() => return self.transport_outcome(&e, context),
            Err(e) => return GenerationOutcome::Failed(GenerationFailure::InvalidResponse(e.to_string())),
        };
        match body.choices.into_iter().next() {
            Some(choice) => match choice.message.content {
                Some(text) => {
                    debug!(answer_len = text.len(), "generation succeeded");
                    GenerationOutcome::Answer(text)
                }
                None => GenerationOutcome::Failed(GenerationFailure::InvalidResponse("message has no content".into())),
            },
            None => GenerationOutcome::Failed(GenerationFailure::EmptyChoices),
        }
    }

    pub async fn generate(&self, query: &str, context: &str) -> Result<String> {
        self.complete(query, context).await.into_result()
    }

    /// Best-effort probe of `{base_url}/health`. Never fails.
    pub async fn check_health(&self) -> BackendHealth {
        let url = format!("{}/health", self.base_url);
        let resp = match self.client.get(&url).timeout(self.health_timeout).send().await {
            Ok(resp) => resp,
            Err(e) => return BackendHealth::unavailable(e.to_string()),
        };
        if !resp.status().is_success() {
            return BackendHealth::unavailable(format!("HTTP {}", resp.status()));
        }
        let status = match resp.json::<serde_json::Value>().await {
            Ok(body) => body.get("status").and_then(|s| s.as_str()).unwrap_or("unknown").to_string(),
            Err(e) => return BackendHealth::unavailable(e.to_string()),
        };
        BackendHealth { status, error: None }
    }

    fn transport_outcome(&self, err: &reqwest::Error, context: &str) -> GenerationOutcome {
        match classify(err) {
            Some(reason) => {
                warn!(?reason, error = %err, "LLM server unavailable, using fallback response");
                GenerationOutcome::Degraded { reason, text: fallback_response(context, self.fallback_excerpt_chars) }
            }
            None => GenerationOutcome::Failed(GenerationFailure::Transport(err.to_string())),
        }
    }
}

/// Only timeouts and refused connections are fallback-eligible; DNS, TLS
/// and other connect failures propagate.
fn classify(err: &reqwest::Error) -> Option<Unavailability> {
    if err.is_timeout() {
        Some(Unavailability::Timeout)
    } else if err.is_connect() && is_connection_refused(err) {
        Some(Unavailability::Unreachable)
    } else {
        None
    }
}

fn is_connection_refused(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io) = e.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::ConnectionRefused {
                return true;
            }
        }
        current = e.source();
    }
    false
}

fn status_body<E: std::fmt::Display>(body: std::result::Result<String, E>) -> String {
    body.unwrap_or_else(|e| format!("<unreadable body: {e}>"))
}


#[async_trait]
impl TextGenerator for GenerationClient {
    async fn generate(&self, query: &str, context: &str) -> Result<String> {
        GenerationClient::generate(self, query, context).await
    }

    async fn check_health(&self) -> BackendHealth {
        GenerationClient::check_health(self).await
    }
}
