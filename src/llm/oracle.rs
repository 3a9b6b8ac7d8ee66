use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::LlmConfig;

/// An external capability that answers free-text prompts.
///
/// The re-ranker only needs a single prompt/reply exchange per call; what sits
/// behind it (a local model, a hosted API, a test double) is up to the
/// implementation.
#[async_trait]
pub trait RankingOracle: Send + Sync {
    /// Establish the session. May be called more than once; callers guard
    /// against concurrent starts.
    async fn initialize(&self) -> Result<()>;

    /// Send one prompt and return the raw reply text.
    async fn evaluate(&self, prompt: &str) -> Result<String>;
}

/// Oracle backed by a chat-completion endpoint (Ollama or OpenAI-compatible).
pub struct LlmOracle {
    client: reqwest::Client,
    config: LlmConfig,
}

impl LlmOracle {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(config.timeout_secs.min(60)))
            .build()
            .context("Failed to build LLM HTTP client")?;
        Ok(Self { client, config })
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }
}

#[async_trait]
impl RankingOracle for LlmOracle {
    /// Ping the provider so a dead endpoint is detected before the first prompt.
    async fn initialize(&self) -> Result<()> {
        let url = match self.config.provider.as_str() {
            "ollama" => format!("{}/api/tags", self.base_url()),
            "openai" => format!("{}/v1/models", self.base_url()),
            other => anyhow::bail!("Unknown LLM provider: {other}"),
        };

        let mut req = self.client.get(&url);
        if let Some(key) = self.config.api_key.as_deref() {
            req = req.header("Authorization", format!("Bearer {key}"));
        }

        let resp = req
            .send()
            .await
            .with_context(|| format!("Failed to reach LLM provider at {url}"))?;

        if !resp.status().is_success() {
            anyhow::bail!("LLM provider health check returned {}", resp.status());
        }

        tracing::info!(
            "LLM oracle ready: {} ({}) model {}",
            self.config.provider,
            self.config.base_url,
            self.config.chat_model
        );
        Ok(())
    }

    async fn evaluate(&self, prompt: &str) -> Result<String> {
        let reply = match self.config.provider.as_str() {
            "ollama" => call_ollama(&self.client, &self.config, prompt).await?,
            "openai" => call_openai(&self.client, &self.config, prompt).await?,
            other => anyhow::bail!("Unknown LLM provider: {other}"),
        };

        if reply.trim().is_empty() {
            anyhow::bail!("LLM returned an empty reply");
        }
        Ok(reply)
    }
}

// ─── Ollama ──────────────────────────────────────────────

#[derive(Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: ChatMessage,
}

async fn call_ollama(client: &reqwest::Client, config: &LlmConfig, prompt: &str) -> Result<String> {
    let url = format!("{}/api/chat", config.base_url.trim_end_matches('/'));

    let req = OllamaChatRequest {
        model: config.chat_model.clone(),
        messages: vec![ChatMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        }],
        stream: false,
        options: OllamaOptions { temperature: 0.0 },
    };

    let resp = client
        .post(&url)
        .json(&req)
        .send()
        .await
        .context("Failed to call Ollama for ranking")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("Ollama ranking call returned {status}: {body}");
    }

    let body: OllamaChatResponse = resp
        .json()
        .await
        .context("Failed to parse Ollama response")?;
    Ok(body.message.content)
}

// ─── OpenAI-compatible ───────────────────────────────────

#[derive(Serialize)]
struct OpenAiChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Deserialize)]
struct OpenAiResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

async fn call_openai(client: &reqwest::Client, config: &LlmConfig, prompt: &str) -> Result<String> {
    let url = format!("{}/v1/chat/completions", config.base_url.trim_end_matches('/'));
    let api_key = config.api_key.as_deref().unwrap_or_default();

    let req = OpenAiChatRequest {
        model: config.chat_model.clone(),
        messages: vec![ChatMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        }],
        temperature: 0.0,
        max_tokens: 100,
    };

    let resp = client
        .post(&url)
        .header("Authorization", format!("Bearer {api_key}"))
        .json(&req)
        .send()
        .await
        .context("Failed to call OpenAI for ranking")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("OpenAI ranking call returned {status}: {body}");
    }

    let body: OpenAiChatResponse = resp
        .json()
        .await
        .context("Failed to parse OpenAI response")?;
    Ok(body
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default())
}
