use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ========================================
/// Artifacts, sessions and the HTTP wire shapes
/// ========================================

/// One generated UI component. Replaced wholesale, never patched in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    #[serde(alias = "jsx")]
    pub markup: String,
    #[serde(alias = "css")]
    pub stylesheet: String,
}

impl Artifact {
    pub fn new(markup: impl Into<String>, stylesheet: impl Into<String>) -> Self {
        Self { markup: markup.into(), stylesheet: stylesheet.into() }
    }

    /// Both halves carry content. Remote replies failing this are discarded.
    pub fn is_complete(&self) -> bool {
        !self.markup.trim().is_empty() && !self.stylesheet.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into(), timestamp: Utc::now() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_artifact: Option<Artifact>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /generate`. Fields are optional so that a missing one maps
/// to a 400 of our own rather than a deserializer rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub message: String,
    pub session: Session,
    pub is_iterative: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_accepts_jsx_css_aliases() {
        let a: Artifact = serde_json::from_str(r#"{"jsx":"<b/>","css":".b{}"}"#).unwrap();
        assert_eq!(a, Artifact::new("<b/>", ".b{}"));
    }

    #[test]
    fn blank_halves_are_incomplete() {
        assert!(!Artifact::new("<b/>", "  ").is_complete());
        assert!(!Artifact::new("", ".b{}").is_complete());
        assert!(Artifact::new("<b/>", ".b{}").is_complete());
    }

    #[test]
    fn generate_request_tolerates_missing_fields() {
        let r: GenerateRequest = serde_json::from_str(r#"{"prompt":"hi"}"#).unwrap();
        assert_eq!(r.prompt.as_deref(), Some("hi"));
        assert!(r.session_id.is_none());

        let r: GenerateRequest = serde_json::from_str(r#"{"sessionId":"s1"}"#).unwrap();
        assert_eq!(r.session_id.as_deref(), Some("s1"));
    }

    #[test]
    fn session_serializes_camel_case() {
        let now = Utc::now();
        let s = Session {
            id: "s1".into(),
            user_id: "u1".into(),
            title: "t".into(),
            messages: vec![Message::new(Role::User, "hello")],
            current_artifact: Some(Artifact::new("<b/>", ".b{}")),
            created_at: now,
            updated_at: now,
        };
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["userId"], "u1");
        assert_eq!(v["messages"][0]["role"], "user");
        assert_eq!(v["currentArtifact"]["markup"], "<b/>");
    }
}
