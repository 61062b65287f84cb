//! SQLite-backed note store over the single `notes` table.
//!
//! # Invariants
//! - `timestamp` is assigned by the column default at insert time.
//! - Address and text are stored trimmed, matching the flat-file store.
//! - Listing orders by `timestamp DESC, id DESC`; the id tie-break keeps
//!   same-second inserts in insertion order.
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::db::{migrations::apply_migrations, open_db, open_db_in_memory};
use crate::model::note::{NoteDraft, NoteRecord};
use crate::repo::note_store::{NoteStore, StoreError, StoreResult};
use log::{debug, error};
use rusqlite::{params, Connection, Row};
use std::path::Path;

const NOTE_SELECT_SQL: &str = "SELECT id, url, note, timestamp FROM notes";

/// Structured note store. Owns its connection; dropping the store closes it.
pub struct SqliteNoteStore {
    conn: Connection,
}

impl SqliteNoteStore {
    /// Opens (or creates) the database file and ensures the schema exists.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Wraps an existing connection, applying any pending migrations first.
    pub fn try_new(mut conn: Connection) -> StoreResult<Self> {
        apply_migrations(&mut conn)?;
        Ok(Self { conn })
    }
}

impl NoteStore for SqliteNoteStore {
    fn append(&self, draft: &NoteDraft) -> StoreResult<NoteRecord> {
        draft.validate()?;
        let address = draft.address.trim();
        let text = draft.text.trim();

        // Id and timestamp come from the INSERT itself, not a follow-up read.
        let inserted = self.conn.query_row(
            "INSERT INTO notes (url, note) VALUES (?1, ?2) RETURNING id, timestamp;",
            params![address, text],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, Option<String>>(1)?)),
        );

        match inserted {
            Ok((id, captured_at)) => {
                debug!(
                    "event=note_append module=store backend=sqlite status=ok id={} text_len={}",
                    id,
                    text.len()
                );
                Ok(NoteRecord {
                    id: Some(id),
                    address: address.to_string(),
                    text: text.to_string(),
                    captured_at,
                })
            }
            Err(err) => {
                error!(
                    "event=note_append module=store backend=sqlite status=error error={}",
                    err
                );
                Err(err.into())
            }
        }
    }

    fn list_all(&self) -> StoreResult<Vec<NoteRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL} ORDER BY timestamp DESC, id DESC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();

        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }

        debug!(
            "event=note_list module=store backend=sqlite status=ok count={}",
            notes.len()
        );
        Ok(notes)
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}

fn parse_note_row(row: &Row<'_>) -> StoreResult<NoteRecord> {
    let id: i64 = row.get("id")?;
    let address: String = row.get("url")?;
    let text: String = row.get("note")?;

    if address.trim().is_empty() {
        return Err(StoreError::InvalidData(format!(
            "empty url in notes row {id}"
        )));
    }
    if text.trim().is_empty() {
        return Err(StoreError::InvalidData(format!(
            "empty note in notes row {id}"
        )));
    }

    Ok(NoteRecord {
        id: Some(id),
        address,
        text,
        captured_at: row.get("timestamp")?,
    })
}
