use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use quiz_core::model::{AnswerValue, AttemptState, QuestionId, TestId};

/// Storage key of the in-progress attempt snapshot.
pub const SESSION_KEY: &str = "studentTestSession";

/// Snapshots older than this are dropped on load.
#[must_use]
pub fn session_ttl() -> Duration {
    Duration::hours(2)
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionStoreError {
    #[error("session storage unavailable: {0}")]
    Io(#[from] io::Error),

    #[error("corrupt session snapshot: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persisted shape of an in-progress attempt.
///
/// Field names and the epoch-millisecond `startTime` match the browser
/// payload this replaces, so snapshots round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub test_id: TestId,
    pub current_question_index: usize,
    pub user_answers: HashMap<QuestionId, AnswerValue>,
    pub start_time: i64,
}

impl SessionSnapshot {
    #[must_use]
    pub fn from_state(state: &AttemptState) -> Self {
        Self {
            test_id: state.test_id(),
            current_question_index: state.current_index(),
            user_answers: state.answers().clone(),
            start_time: state.started_at().timestamp_millis(),
        }
    }

    /// Rebuilds attempt state; the start instant falls back to `now` if the
    /// stored timestamp is unrepresentable.
    #[must_use]
    pub fn into_state(self, now: DateTime<Utc>) -> AttemptState {
        let started_at = DateTime::<Utc>::from_timestamp_millis(self.start_time).unwrap_or(now);
        AttemptState::from_parts(
            self.test_id,
            self.current_question_index,
            self.user_answers,
            started_at,
        )
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp_millis() - self.start_time > session_ttl().num_milliseconds()
    }
}

/// Transient single-slot store for the attempt snapshot.
pub trait AttemptSessionStore: Send + Sync {
    /// Reads the snapshot without expiry handling.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError` when the backing storage fails.
    fn load_raw(&self) -> Result<Option<SessionSnapshot>, SessionStoreError>;

    /// # Errors
    ///
    /// Returns `SessionStoreError` when the backing storage fails.
    fn save(&self, snapshot: &SessionSnapshot) -> Result<(), SessionStoreError>;

    /// # Errors
    ///
    /// Returns `SessionStoreError` when the backing storage fails.
    fn clear(&self) -> Result<(), SessionStoreError>;

    /// Reads the snapshot, dropping and clearing it once past the TTL.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError` when the backing storage fails.
    fn load(&self, now: DateTime<Utc>) -> Result<Option<SessionSnapshot>, SessionStoreError> {
        match self.load_raw()? {
            Some(snapshot) if snapshot.is_expired(now) => {
                self.clear()?;
                Ok(None)
            }
            other => Ok(other),
        }
    }
}

/// In-memory store for tests and the view harness.
#[derive(Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<SessionSnapshot>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl AttemptSessionStore for MemorySessionStore {
    fn load_raw(&self) -> Result<Option<SessionSnapshot>, SessionStoreError> {
        Ok(self.slot.lock().expect("session slot poisoned").clone())
    }

    fn save(&self, snapshot: &SessionSnapshot) -> Result<(), SessionStoreError> {
        *self.slot.lock().expect("session slot poisoned") = Some(snapshot.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        *self.slot.lock().expect("session slot poisoned") = None;
        Ok(())
    }
}

/// Single JSON scratch file, the desktop stand-in for browser session
/// storage.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store under `dir`, named after [`SESSION_KEY`].
    #[must_use]
    pub fn in_dir(dir: &std::path::Path) -> Self {
        Self::new(dir.join(format!("{SESSION_KEY}.json")))
    }
}

impl AttemptSessionStore for FileSessionStore {
    fn load_raw(&self) -> Result<Option<SessionSnapshot>, SessionStoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&self, snapshot: &SessionSnapshot) -> Result<(), SessionStoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string(snapshot)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
