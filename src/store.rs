//! Ordered session history with optional SQLite persistence

use std::path::PathBuf;

use log::info;

use crate::db;
use crate::error::StudioError;
use crate::models::{Session, SessionSummary};

/// Newest-first list of completed sessions. With a database path the list is
/// durable across runs; without one it lives for the process only.
pub struct SessionStore {
    sessions: Vec<Session>,
    db_path: Option<PathBuf>,
}

impl SessionStore {
    /// Store without persistence
    pub fn in_memory() -> Self {
        Self {
            sessions: Vec::new(),
            db_path: None,
        }
    }

    /// Opens a persistent store, loading any previously recorded sessions
    pub fn open(db_path: PathBuf) -> Result<Self, StudioError> {
        let sessions = db::load_sessions(&db_path)?;
        info!("[open] loaded {} stored sessions", sessions.len());
        Ok(Self {
            sessions,
            db_path: Some(db_path),
        })
    }

    /// Records one completed batch at the head of the history.
    ///
    /// Only called on all-success, a failed batch never reaches the store.
    pub fn record_session(&mut self, session: Session) -> Result<(), StudioError> {
        if let Some(db_path) = &self.db_path {
            db::insert_session(db_path, &session)?;
        }

        info!(
            "[record_session] recorded {} with {} outputs",
            session.id,
            session.outputs.len()
        );

        self.sessions.insert(0, session);
        Ok(())
    }

    pub fn load_session(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|session| session.id == id)
    }

    /// All sessions, newest first
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Compact listing for history browsing, newest first
    pub fn history(&self) -> Vec<SessionSummary> {
        self.sessions
            .iter()
            .map(|session| SessionSummary {
                id: session.id.clone(),
                timestamp: session.timestamp,
                gender: session.parameters.gender,
                background_mode: session.parameters.background_mode,
                pose_ids: session.parameters.pose_ids.clone(),
                model: session.parameters.model,
                output_count: session.outputs.len(),
                thumbnail: session.thumbnail.clone(),
            })
            .collect()
    }

    /// Removes one session, returning it so callers can clean up its files
    pub fn delete_session(&mut self, id: &str) -> Result<Option<Session>, StudioError> {
        let Some(position) = self.sessions.iter().position(|session| session.id == id) else {
            return Ok(None);
        };

        if let Some(db_path) = &self.db_path {
            db::delete_session(db_path, id)?;
        }

        Ok(Some(self.sessions.remove(position)))
    }

    /// Removes every session, returning them for file cleanup
    pub fn clear(&mut self) -> Result<Vec<Session>, StudioError> {
        if let Some(db_path) = &self.db_path {
            db::clear_sessions(db_path)?;
        }
        Ok(std::mem::take(&mut self.sessions))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
