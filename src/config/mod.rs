use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::errors::{ForgeError, ForgeResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[serde(alias = "open-ai")]
    OpenAI,
    #[serde(alias = "open-router")]
    OpenRouter,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "openai",
            ProviderKind::OpenRouter => "openrouter",
        }
    }

    /// Environment variable carrying this provider's bearer token.
    pub fn key_env(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "OPENAI_API_KEY",
            ProviderKind::OpenRouter => "OPENROUTER_API_KEY",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub api_base: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_model() -> String { "gpt-4o-mini".into() }
fn default_temperature() -> f32 { 0.7 }
fn default_max_tokens() -> u32 { 2000 }

impl ProviderConfig {
    pub fn openai() -> Self {
        Self {
            kind: ProviderKind::OpenAI,
            api_base: "https://api.openai.com/v1".into(),
            model: default_model(),
            api_key: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }

    pub fn openrouter() -> Self {
        Self {
            kind: ProviderKind::OpenRouter,
            api_base: "https://openrouter.ai/api/v1".into(),
            ..Self::openai()
        }
    }

    /// A provider is only attempted when it holds a non-blank credential.
    pub fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Bearer token -> user id.
    #[serde(default, skip_serializing)]
    pub tokens: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind: String,
    pub database: String,
    pub timeout_secs: u64,
    pub save_exchanges: bool,
    pub exchange_dir: String,
    /// Tried in order; the first usable reply wins.
    pub providers: Vec<ProviderConfig>,
    pub auth: AuthConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".into(),
            database: "component_forge.sqlite".into(),
            timeout_secs: 60,
            save_exchanges: false,
            exchange_dir: ".forge/tx".into(),
            providers: vec![ProviderConfig::openai(), ProviderConfig::openrouter()],
            auth: AuthConfig::default(),
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> ForgeResult<Self> {
        toml::from_str(text).map_err(|e| ForgeError::Config(e.to_string()))
    }

    /// Defaults, overlaid by the TOML file at `path` when one is given.
    pub fn load(path: Option<&Path>) -> ForgeResult<Self> {
        match path {
            Some(p) => {
                let text = fs::read_to_string(p).map_err(|e| ForgeError::Config(e.to_string()))?;
                Self::from_toml(&text)
            }
            None => Ok(Self::default()),
        }
    }

    /// Fill credentials the file left empty from `lookup` (normally the process
    /// environment). Keys already set in the file take precedence.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for p in &mut self.providers {
            if p.credential().is_none() {
                p.api_key = lookup(p.kind.key_env());
            }
        }
        if let (Some(token), Some(user)) = (lookup("FORGE_AUTH_TOKEN"), lookup("FORGE_AUTH_USER")) {
            self.auth.tokens.insert(token, user);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_try_openai_then_openrouter() {
        let cfg = Config::default();
        let kinds: Vec<_> = cfg.providers.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![ProviderKind::OpenAI, ProviderKind::OpenRouter]);
        assert!(cfg.providers.iter().all(|p| p.credential().is_none()));
        assert_eq!(cfg.providers[1].api_base, "https://openrouter.ai/api/v1");
        assert_eq!(cfg.providers[1].model, "gpt-4o-mini");
    }

    #[test]
    fn toml_overrides_and_defaults_missing_fields() {
        let cfg = Config::from_toml(
            r#"
bind = "0.0.0.0:8080"

[[providers]]
kind = "openrouter"
api_base = "http://localhost:9999/v1"
api_key = "sk-or"

[auth.tokens]
"t-1" = "alice"
"#,
        )
        .unwrap();
        assert_eq!(cfg.bind, "0.0.0.0:8080");
        assert_eq!(cfg.timeout_secs, 60);
        assert_eq!(cfg.providers.len(), 1);
        assert_eq!(cfg.providers[0].credential(), Some("sk-or"));
        assert_eq!(cfg.providers[0].max_tokens, 2000);
        assert_eq!(cfg.auth.tokens.get("t-1").map(String::as_str), Some("alice"));
    }

    #[test]
    fn bad_toml_is_config_error() {
        assert!(matches!(Config::from_toml("bind = ["), Err(ForgeError::Config(_))));
    }

    #[test]
    fn env_fills_only_missing_credentials() {
        let mut cfg = Config::default();
        cfg.providers[0].api_key = Some("from-file".into());
        cfg.apply_env(|k| match k {
            "OPENAI_API_KEY" => Some("from-env".into()),
            "OPENROUTER_API_KEY" => Some("or-env".into()),
            "FORGE_AUTH_TOKEN" => Some("tok".into()),
            "FORGE_AUTH_USER" => Some("bob".into()),
            _ => None,
        });
        assert_eq!(cfg.providers[0].credential(), Some("from-file"));
        assert_eq!(cfg.providers[1].credential(), Some("or-env"));
        assert_eq!(cfg.auth.tokens.get("tok").map(String::as_str), Some("bob"));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let mut p = ProviderConfig::openai();
        p.api_key = Some("   ".into());
        assert!(p.credential().is_none());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forge.toml");
        fs::write(&path, "database = \"x.sqlite\"\n").unwrap();
        let cfg = Config::load(Some(&path)).unwrap();
        assert_eq!(cfg.database, "x.sqlite");
        assert!(Config::load(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
