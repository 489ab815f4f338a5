use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("invalid request: {0}")] Validation(String),
    #[error("unauthorized: {0}")] Unauthorized(String),
    #[error("not found: {0}")] NotFound(String),
    #[error("provider error: {0}")] Provider(String),
    #[error("session store error: {0}")] Store(#[from] rusqlite::Error),
    #[error("config error: {0}")] Config(String),
    #[error("serialization error: {0}")] Serde(#[from] serde_json::Error),
    #[error("blocking task failed: {0}")] Join(#[from] tokio::task::JoinError),
}

pub type ForgeResult<T> = Result<T, ForgeError>;
