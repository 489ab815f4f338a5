use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequestParts, Path, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::errors::ForgeError;
use crate::generate::ComponentGenerator;
use crate::service::{self, MISSING_FIELDS, SESSION_NOT_FOUND};
use crate::session::{blocking, SharedStore};
use crate::wire::{CreateSessionRequest, ErrorBody, GenerateRequest, GenerateResponse, Session};

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub generator: Arc<ComponentGenerator>,
    /// Bearer token -> user id.
    pub tokens: Arc<HashMap<String, String>>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/generate", post(generate))
        .route("/sessions", post(create_session).get(list_sessions))
        .route("/sessions/:id", get(get_session))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(addr: &str, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    /// 4xx keep their message; anything else is logged and replaced by
    /// `internal`.
    fn from_forge(err: ForgeError, internal: &str) -> Self {
        match err {
            ForgeError::Validation(m) => Self::new(StatusCode::BAD_REQUEST, m),
            ForgeError::Unauthorized(m) => Self::new(StatusCode::UNAUTHORIZED, m),
            ForgeError::NotFound(m) => Self::new(StatusCode::NOT_FOUND, m),
            other => {
                error!("request failed: {other}");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, internal)
            }
        }
    }
}

impl From<ForgeError> for ApiError {
    fn from(err: ForgeError) -> Self {
        Self::from_forge(err, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

/// Token of an `Authorization` value; the scheme name is case-insensitive.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim_start().split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then(|| token.trim())
}

/// Authenticated caller, resolved from `Authorization: Bearer <token>`.
pub struct Caller {
    pub user_id: String,
}

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(|| ForgeError::Unauthorized("No token, authorization denied".into()))?;
        state
            .tokens
            .get(token)
            .map(|user_id| Caller { user_id: user_id.clone() })
            .ok_or_else(|| ForgeError::Unauthorized("Token is not valid".into()).into())
    }
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn generate(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(req) = body.map_err(|_| ApiError::new(StatusCode::BAD_REQUEST, MISSING_FIELDS))?;
    service::generate(&state.store, &state.generator, &caller.user_id, req)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_forge(e, "Failed to generate component"))
}

async fn create_session(
    State(state): State<AppState>,
    caller: Caller,
    body: Option<Json<CreateSessionRequest>>,
) -> Result<(StatusCode, Json<Session>), ApiError> {
    let title = body.and_then(|Json(b)| b.title);
    let session = blocking(&state.store, move |s| s.create(&caller.user_id, title.as_deref())).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

async fn list_sessions(State(state): State<AppState>, caller: Caller) -> Result<Json<Vec<Session>>, ApiError> {
    let sessions = blocking(&state.store, move |s| s.list(&caller.user_id)).await?;
    Ok(Json(sessions))
}

async fn get_session(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<Session>, ApiError> {
    blocking(&state.store, move |s| s.find(&id, &caller.user_id))
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, SESSION_NOT_FOUND))
}
