use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::ForgeResult;
use crate::wire::{Artifact, Message, Session};

pub const DEFAULT_TITLE: &str = "New Session";

/// Storage for sessions, always scoped by owner.
pub trait SessionStore: Send + Sync {
    fn create(&self, user_id: &str, title: Option<&str>) -> ForgeResult<Session>;
    fn find(&self, id: &str, user_id: &str) -> ForgeResult<Option<Session>>;
    fn list(&self, user_id: &str) -> ForgeResult<Vec<Session>>;
    /// Overwrite the stored copy of an existing session.
    fn save(&self, session: &Session) -> ForgeResult<()>;
}

pub type SharedStore = Arc<dyn SessionStore>;

/// Run one store call on the blocking pool.
pub async fn blocking<T, F>(store: &SharedStore, call: F) -> ForgeResult<T>
where
    T: Send + 'static,
    F: FnOnce(&dyn SessionStore) -> ForgeResult<T> + Send + 'static,
{
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || call(store.as_ref())).await?
}

pub struct SqliteSessionStore {
    conn: Mutex<Connection>,
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS sessions (
    id          TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL,
    title       TEXT NOT NULL,
    messages    TEXT NOT NULL,
    artifact    TEXT,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS sessions_user ON sessions(user_id, updated_at);
"#;

const COLUMNS: &str = "id, user_id, title, messages, artifact, created_at, updated_at";

pub const IN_MEMORY: &str = ":memory:";

impl SqliteSessionStore {
    /// `database` is a file path, or `:memory:` for a store that lives only
    /// as long as the process.
    pub fn connect(database: &str) -> ForgeResult<Self> {
        if database == IN_MEMORY {
            Self::open_in_memory()
        } else {
            Self::open(Path::new(database))
        }
    }

    pub fn open(path: &Path) -> ForgeResult<Self> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> ForgeResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> ForgeResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn: Mutex::new(conn) })
    }
}

/// Raw column values; JSON decoding happens outside the rusqlite closure so
/// its errors keep their own type.
struct StoredRow {
    id: String,
    user_id: String,
    title: String,
    messages: String,
    artifact: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl StoredRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            title: row.get(2)?,
            messages: row.get(3)?,
            artifact: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }

    fn into_session(self) -> ForgeResult<Session> {
        let messages: Vec<Message> = serde_json::from_str(&self.messages)?;
        let current_artifact = self
            .artifact
            .as_deref()
            .map(serde_json::from_str::<Artifact>)
            .transpose()?;
        Ok(Session {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            messages,
            current_artifact,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl SessionStore for SqliteSessionStore {
    fn create(&self, user_id: &str, title: Option<&str>) -> ForgeResult<Session> {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title: title.map(str::trim).filter(|t| !t.is_empty()).unwrap_or(DEFAULT_TITLE).to_string(),
            messages: Vec::new(),
            current_artifact: None,
            created_at: now,
            updated_at: now,
        };
        self.conn.lock().execute(
            &format!("INSERT INTO sessions ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
            params![
                session.id,
                session.user_id,
                session.title,
                serde_json::to_string(&session.messages)?,
                Option::<String>::None,
                session.created_at,
                session.updated_at,
            ],
        )?;
        Ok(session)
    }

    fn find(&self, id: &str, user_id: &str) -> ForgeResult<Option<Session>> {
        let row = self
            .conn
            .lock()
            .query_row(
                &format!("SELECT {COLUMNS} FROM sessions WHERE id = ?1 AND user_id = ?2"),
                params![id, user_id],
                StoredRow::from_row,
            )
            .optional()?;
        row.map(StoredRow::into_session).transpose()
    }

    fn list(&self, user_id: &str) -> ForgeResult<Vec<Session>> {
        let rows = {
            let conn = self.conn.lock();
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM sessions WHERE user_id = ?1 ORDER BY updated_at DESC"
            ))?;
            let rows = stmt
                .query_map(params![user_id], StoredRow::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows
        };
        rows.into_iter().map(StoredRow::into_session).collect()
    }

    fn save(&self, session: &Session) -> ForgeResult<()> {
        let artifact = session.current_artifact.as_ref().map(serde_json::to_string).transpose()?;
        let changed = self.conn.lock().execute(
            "UPDATE sessions SET title = ?3, messages = ?4, artifact = ?5, updated_at = ?6
             WHERE id = ?1 AND user_id = ?2",
            params![
                session.id,
                session.user_id,
                session.title,
                serde_json::to_string(&session.messages)?,
                artifact,
                session.updated_at,
            ],
        )?;
        if changed == 0 {
            return Err(crate::errors::ForgeError::NotFound(format!("session {}", session.id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::Role;

    #[test]
    fn create_then_find_scoped_by_owner() {
        let store = SqliteSessionStore::open_in_memory().unwrap();
        let s = store.create("alice", None).unwrap();
        assert_eq!(s.title, DEFAULT_TITLE);
        assert!(s.messages.is_empty());

        assert_eq!(store.find(&s.id, "alice").unwrap(), Some(s.clone()));
        assert!(store.find(&s.id, "mallory").unwrap().is_none());
        assert!(store.find("nope", "alice").unwrap().is_none());
    }

    #[test]
    fn save_round_trips_messages_and_artifact() {
        let store = SqliteSessionStore::open_in_memory().unwrap();
        let mut s = store.create("alice", Some("Buttons")).unwrap();
        s.messages.push(Message::new(Role::User, "create a button"));
        s.messages.push(Message::new(Role::Assistant, "done"));
        s.current_artifact = Some(Artifact::new("<b/>", ".b{}"));
        s.updated_at = Utc::now();
        store.save(&s).unwrap();

        let loaded = store.find(&s.id, "alice").unwrap().unwrap();
        assert_eq!(loaded, s);
        assert_eq!(loaded.title, "Buttons");
    }

    #[test]
    fn save_of_unknown_session_is_not_found() {
        let store = SqliteSessionStore::open_in_memory().unwrap();
        let mut s = store.create("alice", None).unwrap();
        s.id = "missing".into();
        assert!(matches!(store.save(&s), Err(crate::errors::ForgeError::NotFound(_))));
    }

    #[test]
    fn list_is_per_owner_newest_first() {
        let store = SqliteSessionStore::open_in_memory().unwrap();
        let first = store.create("alice", Some("one")).unwrap();
        let second = store.create("alice", Some("two")).unwrap();
        store.create("bob", None).unwrap();

        let mut bumped = first.clone();
        bumped.updated_at = second.updated_at + chrono::Duration::seconds(5);
        store.save(&bumped).unwrap();

        let titles: Vec<_> = store.list("alice").unwrap().into_iter().map(|s| s.title).collect();
        assert_eq!(titles, vec!["one", "two"]);
    }

    #[test]
    fn memory_target_needs_no_file() {
        let store = SqliteSessionStore::connect(IN_MEMORY).unwrap();
        let s = store.create("alice", None).unwrap();
        assert!(store.find(&s.id, "alice").unwrap().is_some());
        assert!(!Path::new(IN_MEMORY).exists());
    }

    #[tokio::test]
    async fn blocking_runs_the_call_off_the_runtime() {
        let store: SharedStore = Arc::new(SqliteSessionStore::open_in_memory().unwrap());
        let s = blocking(&store, |st| st.create("alice", Some("pooled"))).await.unwrap();
        let found = blocking(&store, move |st| st.find(&s.id, "alice")).await.unwrap();
        assert_eq!(found.map(|f| f.title).as_deref(), Some("pooled"));
    }

    #[test]
    fn file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.sqlite");
        let id = {
            let store = SqliteSessionStore::open(&path).unwrap();
            store.create("alice", None).unwrap().id
        };
        let store = SqliteSessionStore::connect(path.to_str().unwrap()).unwrap();
        assert!(store.find(&id, "alice").unwrap().is_some());
    }
}
