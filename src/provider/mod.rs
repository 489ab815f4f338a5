use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use crate::config::Config;
use crate::wire::Artifact;

pub mod openai;

/// What every backend receives: a system and a user message, plus the id
/// transcripts are filed under.
#[derive(Debug, Clone)]
pub struct Instruction {
    pub tx: Uuid,
    pub system: String,
    pub user: String,
}

#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;
    async fn send(&self, ins: &Instruction) -> Result<Artifact>;
}

pub type DynProvider = Box<dyn Provider + Send + Sync>;

/// Build the providers that hold a credential, in configured order.
/// Providers without one are dropped here and never contacted.
pub fn make_providers(cfg: &Config) -> Result<Vec<DynProvider>> {
    let transcripts = cfg.save_exchanges.then(|| PathBuf::from(&cfg.exchange_dir));
    let timeout = Duration::from_secs(cfg.timeout_secs);
    let mut out: Vec<DynProvider> = Vec::new();
    for p in &cfg.providers {
        match p.credential() {
            Some(key) => out.push(Box::new(openai::ChatCompletions::new(
                p,
                key.to_string(),
                timeout,
                transcripts.clone(),
            )?)),
            None => debug!(provider = p.kind.as_str(), "no credential, skipping provider"),
        }
    }
    Ok(out)
}

/// Parse a completion into an artifact. Accepts a bare JSON object or one
/// wrapped in prose/code fences; both fields must carry content.
pub fn parse_artifact(content: &str) -> Result<Artifact> {
    let artifact = match serde_json::from_str::<Artifact>(content.trim()) {
        Ok(a) => a,
        Err(strict) => {
            let obj = extract_first_json_object(content)
                .ok_or_else(|| anyhow!("completion is not a JSON object: {strict}"))?;
            serde_json::from_str::<Artifact>(obj)
                .map_err(|e| anyhow!("completion JSON has wrong shape: {e}"))?
        }
    };
    if !artifact.is_complete() {
        return Err(anyhow!("completion JSON has empty markup or stylesheet"));
    }
    Ok(artifact)
}

/// First balanced top-level `{...}` in `s`. Braces inside JSON strings are
/// skipped, since markup and stylesheets are full of them.
fn extract_first_json_object(s: &str) -> Option<&str> {
    let mut start = None;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, b) in s.bytes().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' if start.is_some() => in_string = true,
            b'{' => {
                if start.is_none() {
                    start = Some(i);
                }
                depth += 1;
            }
            b'}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return start.map(|st| &s[st..=i]);
                }
            }
            _ => {}
        }
    }
    None
}
