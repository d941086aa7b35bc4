//! # LLM Module
//!
//! Blocking chat-completion clients for the supported providers.
//!
//! Each client sends one user message and returns the reply text together
//! with the raw `usage` object from the response, untouched, so the ledger
//! can normalize it per provider.
//!
//! Environment:
//! - `OPENAI_API_KEY`, `ANTHROPIC_API_KEY`
//! - `ACTIVITY_QA_OPENAI_BASE_URL`, `ACTIVITY_QA_ANTHROPIC_BASE_URL`
//! - `ACTIVITY_QA_TIMEOUT_SECS`

use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::models::Provider;
use crate::utils::{env_non_empty, request_timeout};

const OPENAI_BASE_URL: &str = "https://api.openai.com";
const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const ANTHROPIC_MAX_TOKENS: u32 = 1024;

/// Reply from a provider
#[derive(Debug, Clone, Default)]
pub struct Completion {
    pub text: String,
    /// Provider-shaped usage block, if the response carried one
    pub usage: Option<Value>,
}

pub trait CompletionProvider: Send + Sync {
    fn provider(&self) -> Provider;

    fn complete(&self, prompt: &str, model: &str) -> Result<Completion>;
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
}

fn build_agent(timeout: Duration) -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

fn post_json<B: Serialize>(
    agent: &ureq::Agent,
    url: &str,
    headers: &[(&str, &str)],
    body: &B,
) -> Result<Value> {
    let mut req = agent.post(url);
    for (k, v) in headers {
        req = req.header(*k, *v);
    }
    let mut resp = req
        .send_json(body)
        .with_context(|| format!("request to {url} failed"))?;
    let status = resp.status();
    let text = resp
        .body_mut()
        .read_to_string()
        .context("read response body")?;
    debug!(url, status = status.as_u16(), bytes = text.len(), "provider response");
    if !status.is_success() {
        bail!("{} returned HTTP {}: {}", url, status.as_u16(), text.trim());
    }
    serde_json::from_str(&text).context("parse provider response json")
}

fn usage_of(response: &Value) -> Option<Value> {
    response.get("usage").filter(|u| !u.is_null()).cloned()
}

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    agent: ureq::Agent,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            agent: build_agent(request_timeout()),
            api_key,
            base_url: OPENAI_BASE_URL.to_string(),
        }
    }

    pub fn from_env() -> Result<Self> {
        let key = env_non_empty("OPENAI_API_KEY").context("OPENAI_API_KEY is not set")?;
        let mut client = Self::new(key);
        if let Some(url) = env_non_empty("ACTIVITY_QA_OPENAI_BASE_URL") {
            client = client.with_base_url(url);
        }
        Ok(client)
    }

    #[must_use]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }
}

/// Text of the first choice of a chat completion
pub fn openai_reply_text(response: &Value) -> Option<String> {
    response
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
        .map(str::to_string)
}

impl CompletionProvider for OpenAiClient {
    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    fn complete(&self, prompt: &str, model: &str) -> Result<Completion> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = OpenAiRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };
        debug!(model, "calling OpenAI chat completions");
        let auth = format!("Bearer {}", self.api_key);
        let response = post_json(&self.agent, &url, &[("Authorization", auth.as_str())], &body)?;
        let text = openai_reply_text(&response)
            .ok_or_else(|| anyhow!("OpenAI response has no message content"))?;
        Ok(Completion {
            text,
            usage: usage_of(&response),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ClaudeClient {
    agent: ureq::Agent,
    api_key: String,
    base_url: String,
}

impl ClaudeClient {
    pub fn new(api_key: String) -> Self {
        Self {
            agent: build_agent(request_timeout()),
            api_key,
            base_url: ANTHROPIC_BASE_URL.to_string(),
        }
    }

    pub fn from_env() -> Result<Self> {
        let key = env_non_empty("ANTHROPIC_API_KEY").context("ANTHROPIC_API_KEY is not set")?;
        let mut client = Self::new(key);
        if let Some(url) = env_non_empty("ACTIVITY_QA_ANTHROPIC_BASE_URL") {
            client = client.with_base_url(url);
        }
        Ok(client)
    }

    #[must_use]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }
}

/// Concatenated text blocks of a messages response
pub fn claude_reply_text(response: &Value) -> Option<String> {
    let blocks = response.get("content")?.as_array()?;
    let text: Vec<&str> = blocks
        .iter()
        .filter(|b| b.get("type").and_then(Value::as_str).unwrap_or("text") == "text")
        .filter_map(|b| b.get("text").and_then(Value::as_str))
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(text.join(""))
    }
}

impl CompletionProvider for ClaudeClient {
    fn provider(&self) -> Provider {
        Provider::Claude
    }

    fn complete(&self, prompt: &str, model: &str) -> Result<Completion> {
        let url = format!("{}/v1/messages", self.base_url);
        let body = AnthropicRequest {
            model,
            max_tokens: ANTHROPIC_MAX_TOKENS,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };
        debug!(model, "calling Anthropic messages");
        let response = post_json(
            &self.agent,
            &url,
            &[
                ("x-api-key", self.api_key.as_str()),
                ("anthropic-version", ANTHROPIC_VERSION),
            ],
            &body,
        )?;
        let text = claude_reply_text(&response)
            .ok_or_else(|| anyhow!("Anthropic response has no text content"))?;
        Ok(Completion {
            text,
            usage: usage_of(&response),
        })
    }
}

/// Client for `provider` configured from the environment
pub fn provider_from_env(provider: Provider) -> Result<Box<dyn CompletionProvider>> {
    let client: Box<dyn CompletionProvider> = match provider {
        Provider::OpenAi => Box::new(OpenAiClient::from_env()?),
        Provider::Claude => Box::new(ClaudeClient::from_env()?),
    };
    Ok(client)
}
