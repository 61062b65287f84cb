//! Note draft and record types.
//!
//! # Responsibility
//! - Carry the caller-supplied `address + text` pair before persistence.
//! - Define the canonical read shape shared by the flat-file and SQLite stores.
//!
//! # Invariants
//! - Neither `address` nor `text` may be empty (after trimming) when written.
//! - `captured_at` is assigned by the store, never by the caller.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failures for note input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteValidationError {
    /// Source document address is empty or whitespace-only.
    EmptyAddress,
    /// Note text is empty or whitespace-only.
    EmptyText,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyAddress => write!(f, "note address must not be empty"),
            Self::EmptyText => write!(f, "note text must not be empty"),
        }
    }
}

impl Error for NoteValidationError {}

/// Input for a new note, before the store assigns identity and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub address: String,
    pub text: String,
}

impl NoteDraft {
    pub fn new(address: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            text: text.into(),
        }
    }

    /// Checks the write-side invariants.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.address.trim().is_empty() {
            return Err(NoteValidationError::EmptyAddress);
        }
        if self.text.trim().is_empty() {
            return Err(NoteValidationError::EmptyText);
        }
        Ok(())
    }
}

/// A persisted note.
///
/// Serialized with the export wire names (`url`, `note`, `timestamp`).
/// The row id is an internal detail and never leaves the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRecord {
    /// Row id for the SQLite store; `None` for flat-file notes.
    #[serde(skip)]
    pub id: Option<i64>,
    #[serde(rename = "url")]
    pub address: String,
    #[serde(rename = "note")]
    pub text: String,
    /// Store-assigned capture time (`YYYY-MM-DD HH:MM:SS`, UTC).
    /// The flat-file store does not track it.
    #[serde(
        rename = "timestamp",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub captured_at: Option<String>,
}

impl NoteRecord {
    /// Builds a record that carries no store-assigned metadata.
    pub fn untimed(address: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: None,
            address: address.into(),
            text: text.into(),
            captured_at: None,
        }
    }
}
