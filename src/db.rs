//! Database operations for session history

use std::path::Path;

use log::warn;
use rusqlite::{params, Connection};

use crate::error::StudioError;
use crate::models::{
    BackgroundMode, Gender, GenerationInputs, GenerationParameters, ModelTier, Session,
};

/// Opens the SQLite database, creating the schema if needed
pub fn init_database(db_path: &Path) -> Result<Connection, StudioError> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(db_path)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS sessions (
            id TEXT PRIMARY KEY,
            timestamp INTEGER NOT NULL,
            gender TEXT NOT NULL,
            background_mode TEXT NOT NULL,
            pose_ids TEXT NOT NULL,
            model TEXT NOT NULL,
            inputs TEXT NOT NULL,
            outputs TEXT NOT NULL,
            thumbnail TEXT
        )",
        [],
    )?;

    Ok(conn)
}

/// Stores one completed session
pub fn insert_session(db_path: &Path, session: &Session) -> Result<(), StudioError> {
    let conn = init_database(db_path)?;
    conn.execute(
        "INSERT INTO sessions (id, timestamp, gender, background_mode, pose_ids, model, inputs, outputs, thumbnail)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            session.id,
            session.timestamp,
            session.parameters.gender.as_str(),
            session.parameters.background_mode.as_str(),
            serde_json::to_string(&session.parameters.pose_ids)?,
            session.parameters.model.model_name(),
            serde_json::to_string(&session.inputs)?,
            serde_json::to_string(&session.outputs)?,
            session.thumbnail,
        ],
    )?;
    Ok(())
}

/// Loads all sessions, newest first. Rows that no longer parse are skipped
/// so one corrupt entry cannot take the whole history down.
pub fn load_sessions(db_path: &Path) -> Result<Vec<Session>, StudioError> {
    let conn = init_database(db_path)?;
    let mut stmt = conn.prepare(
        "SELECT id, timestamp, gender, background_mode, pose_ids, model, inputs, outputs, thumbnail
         FROM sessions ORDER BY timestamp DESC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(SessionRow {
            id: row.get(0)?,
            timestamp: row.get(1)?,
            gender: row.get(2)?,
            background_mode: row.get(3)?,
            pose_ids: row.get(4)?,
            model: row.get(5)?,
            inputs: row.get(6)?,
            outputs: row.get(7)?,
            thumbnail: row.get(8)?,
        })
    })?;

    let mut sessions = Vec::new();
    for row in rows.filter_map(|r| r.ok()) {
        let id = row.id.clone();
        match parse_row(row) {
            Some(session) => sessions.push(session),
            None => warn!("[load_sessions] skipping corrupt session row {}", id),
        }
    }
    Ok(sessions)
}

/// Deletes one session; returns whether a row was removed
pub fn delete_session(db_path: &Path, id: &str) -> Result<bool, StudioError> {
    let conn = init_database(db_path)?;
    let affected = conn.execute("DELETE FROM sessions WHERE id = ?1", params![id])?;
    Ok(affected > 0)
}

/// Deletes all sessions; returns how many were removed
pub fn clear_sessions(db_path: &Path) -> Result<usize, StudioError> {
    let conn = init_database(db_path)?;
    let affected = conn.execute("DELETE FROM sessions", [])?;
    Ok(affected)
}

struct SessionRow {
    id: String,
    timestamp: i64,
    gender: String,
    background_mode: String,
    pose_ids: String,
    model: String,
    inputs: String,
    outputs: String,
    thumbnail: Option<String>,
}

fn parse_row(row: SessionRow) -> Option<Session> {
    let gender = Gender::parse(&row.gender)?;
    let background_mode = BackgroundMode::parse(&row.background_mode)?;
    let model = ModelTier::parse(&row.model)?;
    let pose_ids: Vec<String> = serde_json::from_str(&row.pose_ids).ok()?;
    let inputs: GenerationInputs = serde_json::from_str(&row.inputs).ok()?;
    let outputs: Vec<String> = serde_json::from_str(&row.outputs).ok()?;

    Some(Session {
        id: row.id,
        timestamp: row.timestamp,
        inputs,
        parameters: GenerationParameters {
            gender,
            background_mode,
            model,
            pose_ids,
        },
        outputs,
        thumbnail: row.thumbnail,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample_session(id: &str, timestamp: i64) -> Session {
        Session {
            id: id.to_string(),
            timestamp,
            inputs: GenerationInputs::default(),
            parameters: GenerationParameters {
                gender: Gender::Female,
                background_mode: BackgroundMode::White,
                model: ModelTier::Pro,
                pose_ids: vec!["F1".to_string(), "F2".to_string()],
            },
            outputs: vec![format!("/outputs/{}_0.png", id)],
            thumbnail: Some(format!("/outputs/{}_thumb.png", id)),
        }
    }

    fn temp_db() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.db");
        (dir, path)
    }

    #[test]
    fn sessions_round_trip_newest_first() {
        let (_dir, db_path) = temp_db();
        insert_session(&db_path, &sample_session("older", 1000)).unwrap();
        insert_session(&db_path, &sample_session("newer", 2000)).unwrap();

        let sessions = load_sessions(&db_path).unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].id, "newer");
        assert_eq!(sessions[1].id, "older");
        assert_eq!(sessions[0].parameters.pose_ids, vec!["F1", "F2"]);
        assert_eq!(sessions[0].outputs, vec!["/outputs/newer_0.png"]);
        assert_eq!(
            sessions[0].thumbnail.as_deref(),
            Some("/outputs/newer_thumb.png")
        );
    }

    #[test]
    fn delete_removes_only_the_named_session() {
        let (_dir, db_path) = temp_db();
        insert_session(&db_path, &sample_session("a", 1)).unwrap();
        insert_session(&db_path, &sample_session("b", 2)).unwrap();

        assert!(delete_session(&db_path, "a").unwrap());
        assert!(!delete_session(&db_path, "missing").unwrap());

        let sessions = load_sessions(&db_path).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, "b");
    }

    #[test]
    fn clear_empties_the_table() {
        let (_dir, db_path) = temp_db();
        insert_session(&db_path, &sample_session("a", 1)).unwrap();
        insert_session(&db_path, &sample_session("b", 2)).unwrap();

        assert_eq!(clear_sessions(&db_path).unwrap(), 2);
        assert!(load_sessions(&db_path).unwrap().is_empty());
    }

    #[test]
    fn corrupt_rows_are_skipped_not_fatal() {
        let (_dir, db_path) = temp_db();
        insert_session(&db_path, &sample_session("good", 10)).unwrap();

        let conn = init_database(&db_path).unwrap();
        conn.execute(
            "INSERT INTO sessions (id, timestamp, gender, background_mode, pose_ids, model, inputs, outputs, thumbnail)
             VALUES ('bad', 20, 'unknown', 'white', 'not json', 'gemini-3-pro-image-preview', '{}', '[]', NULL)",
            [],
        )
        .unwrap();

        let sessions = load_sessions(&db_path).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, "good");
    }
}
