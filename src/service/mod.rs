//! The `/generate` request flow, independent of the HTTP layer.

use chrono::Utc;
use tracing::info;

use crate::classify::{self, Mode};
use crate::errors::{ForgeError, ForgeResult};
use crate::generate::ComponentGenerator;
use crate::session::{blocking, SharedStore};
use crate::wire::{GenerateRequest, GenerateResponse, Message, Role};

pub const MISSING_FIELDS: &str = "Prompt and sessionId are required";
pub const SESSION_NOT_FOUND: &str = "Session not found";

fn required(field: Option<String>) -> ForgeResult<String> {
    field
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ForgeError::Validation(MISSING_FIELDS.into()))
}

fn assistant_reply(mode: Mode, prompt: &str) -> String {
    match mode {
        Mode::Refine => format!(
            "I've updated the component based on your request: \"{prompt}\". The component has been modified with the new styling and properties."
        ),
        Mode::New => format!(
            "I've generated a React component based on your request: \"{prompt}\". The component includes both JSX and CSS styling."
        ),
    }
}

/// Classify, generate, record both messages and the new artifact, persist.
/// The stored session is only written after generation succeeded.
pub async fn generate(
    store: &SharedStore,
    generator: &ComponentGenerator,
    user_id: &str,
    req: GenerateRequest,
) -> ForgeResult<GenerateResponse> {
    let prompt = required(req.prompt)?;
    let session_id = required(req.session_id)?;

    let owner = user_id.to_string();
    let mut session = blocking(store, move |s| s.find(&session_id, &owner))
        .await?
        .ok_or_else(|| ForgeError::NotFound(SESSION_NOT_FOUND.into()))?;

    let analysis = classify::analyze(&prompt, session.current_artifact.as_ref());
    info!(
        session = %session.id,
        mode = ?analysis.mode,
        new_component_request = analysis.new_component_request,
        has_existing_artifact = analysis.has_existing_artifact,
        "request analysis"
    );

    let context = match analysis.mode {
        Mode::Refine => session.current_artifact.as_ref(),
        Mode::New => None,
    };
    let (_source, artifact) = generator.generate(&prompt, context).await;

    session.messages.push(Message::new(Role::User, prompt.as_str()));
    session.messages.push(Message::new(Role::Assistant, assistant_reply(analysis.mode, &prompt)));
    session.current_artifact = Some(artifact);
    session.updated_at = Utc::now();
    let session = blocking(store, move |s| s.save(&session).map(|()| session)).await?;

    let message = if analysis.is_iterative() {
        "Component updated successfully"
    } else {
        "Component generated successfully"
    };
    Ok(GenerateResponse {
        message: message.into(),
        session,
        is_iterative: analysis.is_iterative(),
    })
}
