//! Read-side use-cases: on-screen listing and JSON export.
//!
//! # Invariants
//! - Both outputs follow `NoteStore::list_all` order (newest first).
//! - An empty store renders the placeholder text, never an error.
//! - Export JSON is an array of `{url, note, timestamp?}` objects indented
//!   with four spaces.

use crate::model::note::NoteRecord;
use crate::repo::note_store::{NoteStore, StoreError};
use log::{error, info};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Shown by "View Notes" when nothing has been saved.
pub const NO_NOTES_PLACEHOLDER: &str = "No notes saved yet.";
const ENTRY_DELIMITER: &str = "----------------------------------------";
const JSON_INDENT: &[u8] = b"    ";

#[derive(Debug)]
pub enum ExportError {
    /// Notes could not be read back from the store.
    Store(StoreError),
    /// Destination could not be created or written.
    Io(std::io::Error),
    Serialize(serde_json::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "failed to write export file: {err}"),
            Self::Serialize(err) => write!(f, "failed to encode notes: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<StoreError> for ExportError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// "View Notes" / "Export Notes" facade over a note store.
pub struct NoteViewer<S: NoteStore> {
    store: S,
}

impl<S: NoteStore> NoteViewer<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Renders every note as one human-readable text blob.
    pub fn render_for_display(&self) -> Result<String, StoreError> {
        let notes = self.store.list_all()?;
        Ok(render_notes(&notes))
    }

    /// Writes all notes as pretty-printed JSON to `destination`.
    ///
    /// Returns the number of exported notes.
    pub fn export_json(&self, destination: impl AsRef<Path>) -> Result<usize, ExportError> {
        let destination = destination.as_ref();
        let result = self
            .store
            .list_all()
            .map_err(ExportError::from)
            .and_then(|notes| write_json(&notes, destination).map(|()| notes.len()));

        match &result {
            Ok(count) => info!(
                "event=notes_export module=viewer status=ok count={} path={}",
                count,
                destination.display()
            ),
            Err(err) => error!(
                "event=notes_export module=viewer status=error path={} error={}",
                destination.display(),
                err
            ),
        }
        result
    }
}

/// Formats notes for the read-only notes window.
pub fn render_notes(notes: &[NoteRecord]) -> String {
    if notes.is_empty() {
        return NO_NOTES_PLACEHOLDER.to_string();
    }

    let mut out = String::new();
    for note in notes {
        out.push_str("URL: ");
        out.push_str(&note.address);
        out.push_str("\nNote: ");
        out.push_str(&note.text);
        out.push('\n');
        if let Some(captured_at) = &note.captured_at {
            out.push_str("Saved: ");
            out.push_str(captured_at);
            out.push('\n');
        }
        out.push_str(ENTRY_DELIMITER);
        out.push('\n');
    }
    out
}

/// Encodes notes as a JSON array with four-space indentation.
pub fn notes_to_json(notes: &[NoteRecord]) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(JSON_INDENT));
    notes.serialize(&mut serializer)?;
    Ok(buf)
}

fn write_json(notes: &[NoteRecord], destination: &Path) -> Result<(), ExportError> {
    let encoded = notes_to_json(notes)?;
    let mut writer = BufWriter::new(File::create(destination)?);
    writer.write_all(&encoded)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
