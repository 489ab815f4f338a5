use fs_err as fs;
use serde::Serialize;
use serde_json::{to_string_pretty, Value};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Install the global subscriber. `RUST_LOG` wins over the `-v` count.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn,component_forge=info"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[derive(Debug)]
pub struct SavedPaths {
    pub dir: PathBuf,
    pub request: PathBuf,
    pub response: PathBuf,
}

fn tx_dir(root: &Path, tx: Uuid) -> PathBuf {
    root.join(tx.to_string())
}

/// Write one provider exchange under `<root>/<tx>/`. The response body is kept
/// as parsed JSON when it is JSON, otherwise as a string.
pub fn save_exchange<R: Serialize>(
    root: &Path,
    tx: Uuid,
    provider: &str,
    status: u16,
    request: &R,
    response_body: &str,
) -> anyhow::Result<SavedPaths> {
    let dir = tx_dir(root, tx);
    fs::create_dir_all(&dir)?;

    let request_path = dir.join(format!("{provider}.request.json"));
    fs::write(&request_path, to_string_pretty(request)?)?;

    let body = serde_json::from_str::<Value>(response_body)
        .unwrap_or_else(|_| Value::String(response_body.to_string()));
    let response_path = dir.join(format!("{provider}.response.json"));
    fs::write(&response_path, to_string_pretty(&serde_json::json!({ "status": status, "body": body }))?)?;

    Ok(SavedPaths { dir, request: request_path, response: response_path })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn exchange_lands_under_tx_dir() {
        let root = tempfile::tempdir().unwrap();
        let tx = Uuid::new_v4();
        let saved = save_exchange(
            root.path(),
            tx,
            "openai",
            200,
            &json!({ "model": "m" }),
            r#"{"choices":[]}"#,
        )
        .unwrap();

        assert_eq!(saved.dir, root.path().join(tx.to_string()));
        let req: Value = serde_json::from_str(&fs::read_to_string(&saved.request).unwrap()).unwrap();
        assert_eq!(req["model"], "m");
        let resp: Value = serde_json::from_str(&fs::read_to_string(&saved.response).unwrap()).unwrap();
        assert_eq!(resp["status"], 200);
        assert!(resp["body"]["choices"].is_array());
    }

    #[test]
    fn non_json_body_is_kept_as_text() {
        let root = tempfile::tempdir().unwrap();
        let saved = save_exchange(root.path(), Uuid::new_v4(), "openrouter", 502, &json!({}), "Bad Gateway").unwrap();
        let resp: Value = serde_json::from_str(&fs::read_to_string(&saved.response).unwrap()).unwrap();
        assert_eq!(resp["body"], "Bad Gateway");
        assert_eq!(resp["status"], 502);
    }
}
