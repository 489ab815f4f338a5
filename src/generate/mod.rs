//! Remote generation with a deterministic local fallback.

use std::fmt;
use tracing::{info, warn};
use uuid::Uuid;

use crate::classify;
use crate::errors::ForgeError;
use crate::prompt;
use crate::provider::{DynProvider, Instruction};
use crate::refine::{self, Rule};
use crate::template::{self, ComponentKind};
use crate::wire::Artifact;

/// Result of asking the remote providers.
#[derive(Debug)]
pub enum RemoteOutcome {
    Generated { provider: String, artifact: Artifact },
    /// No provider produced a usable component. One entry per provider that
    /// was tried; empty when none was configured.
    NeedsFallback { failures: Vec<ForgeError> },
}

impl RemoteOutcome {
    /// Keep a remote artifact, or run `local` for the fallback variant.
    pub fn or_fallback<F>(self, local: F) -> (Source, Artifact)
    where
        F: FnOnce() -> (Source, Artifact),
    {
        match self {
            RemoteOutcome::Generated { provider, artifact } => (Source::Remote { provider }, artifact),
            RemoteOutcome::NeedsFallback { .. } => local(),
        }
    }
}

/// Where an artifact came from. Logged, never shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Remote { provider: String },
    Template(ComponentKind),
    Refined(Rule),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Remote { provider } => write!(f, "remote:{provider}"),
            Source::Template(kind) => write!(f, "template:{}", kind.as_str()),
            Source::Refined(rule) => write!(f, "refined:{rule:?}"),
        }
    }
}

pub struct RemoteGenerator {
    providers: Vec<DynProvider>,
}

impl RemoteGenerator {
    pub fn new(providers: Vec<DynProvider>) -> Self {
        Self { providers }
    }

    pub fn is_configured(&self) -> bool {
        !self.providers.is_empty()
    }

    /// Try each provider in order. Every failure is logged and the next one
    /// is tried; nothing is retried.
    pub async fn generate(&self, prompt: &str, context: Option<&Artifact>) -> RemoteOutcome {
        if self.providers.is_empty() {
            return RemoteOutcome::NeedsFallback { failures: Vec::new() };
        }

        let ins = Instruction {
            tx: Uuid::new_v4(),
            system: prompt::system_prompt(context.is_some()),
            user: prompt::user_prompt(prompt, context),
        };

        let mut failures = Vec::new();
        for p in &self.providers {
            match p.send(&ins).await {
                Ok(artifact) => {
                    return RemoteOutcome::Generated { provider: p.name().to_string(), artifact };
                }
                Err(e) => {
                    warn!(provider = p.name(), tx = %ins.tx, "remote generation failed: {e:#}");
                    failures.push(ForgeError::Provider(format!("{}: {e:#}", p.name())));
                }
            }
        }
        RemoteOutcome::NeedsFallback { failures }
    }
}

/// Local path: a fresh template for new-component prompts, otherwise a
/// rewrite of `context` when there is one, otherwise a template again.
pub fn generate_locally(prompt: &str, context: Option<&Artifact>) -> (Source, Artifact) {
    if classify::is_new_component_request(prompt) {
        let (kind, artifact) = template::for_prompt(prompt);
        return (Source::Template(kind), artifact);
    }
    match context.filter(|c| c.is_complete()) {
        Some(current) => {
            let (rule, artifact) = refine::refine(current, prompt);
            (Source::Refined(rule), artifact)
        }
        None => {
            let (kind, artifact) = template::for_prompt(prompt);
            (Source::Template(kind), artifact)
        }
    }
}

pub struct ComponentGenerator {
    remote: RemoteGenerator,
}

impl ComponentGenerator {
    pub fn new(remote: RemoteGenerator) -> Self {
        Self { remote }
    }

    #[cfg(test)]
    pub fn offline() -> Self {
        Self::new(RemoteGenerator::new(Vec::new()))
    }

    pub async fn generate(&self, prompt: &str, context: Option<&Artifact>) -> (Source, Artifact) {
        let outcome = self.remote.generate(prompt, context).await;
        if let RemoteOutcome::NeedsFallback { failures } = &outcome {
            if self.remote.is_configured() {
                info!(failures = failures.len(), "using local component fallback");
            }
        }
        let (source, artifact) = outcome.or_fallback(|| generate_locally(prompt, context));
        info!(source = %source, "component ready");
        (source, artifact)
    }
}
