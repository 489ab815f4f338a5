use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ProviderConfig;
use crate::wire::Artifact;
use super::{parse_artifact, Instruction, Provider};

/// Any OpenAI-compatible `/chat/completions` endpoint (OpenAI itself,
/// OpenRouter, local gateways).
pub struct ChatCompletions {
    name: String,
    url: String,
    model: String,
    api_key: String,
    temperature: f32,
    max_tokens: u32,
    client: Client,
    transcripts: Option<PathBuf>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Msg<'a>; 2],
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    r#type: &'static str,
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

impl ChatCompletions {
    pub fn new(
        cfg: &ProviderConfig,
        api_key: String,
        timeout: Duration,
        transcripts: Option<PathBuf>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("building http client")?;
        Ok(Self {
            name: cfg.kind.as_str().to_string(),
            url: format!("{}/chat/completions", cfg.api_base.trim_end_matches('/')),
            model: cfg.model.clone(),
            api_key,
            temperature: cfg.temperature,
            max_tokens: cfg.max_tokens,
            client,
            transcripts,
        })
    }
}

#[async_trait]
impl Provider for ChatCompletions {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, ins: &Instruction) -> Result<Artifact> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                Msg { role: "system", content: &ins.system },
                Msg { role: "user", content: &ins.user },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            response_format: ResponseFormat { r#type: "json_object" },
        };

        debug!(provider = %self.name, url = %self.url, "POST chat completion");

        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("{} request failed", self.name))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .with_context(|| format!("{} read body failed", self.name))?;

        debug!(provider = %self.name, %status, "raw response:\n{}", text);

        if let Some(root) = &self.transcripts {
            match crate::log::save_exchange(root, ins.tx, &self.name, status.as_u16(), &body, &text) {
                Ok(saved) => debug!(
                    dir = %saved.dir.display(),
                    request = %saved.request.display(),
                    response = %saved.response.display(),
                    "saved exchange"
                ),
                Err(e) => warn!(provider = %self.name, "could not save exchange: {e:#}"),
            }
        }

        if !status.is_success() {
            return Err(anyhow!("{} API error ({}): {}", self.name, status, text));
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("{} response parse error: {e}", self.name))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| anyhow!("{}: empty completion", self.name))?;

        parse_artifact(&content).with_context(|| format!("{} returned an unusable component", self.name))
    }
}
