//! `NoteStore` contract and its error type.

use crate::db::DbError;
use crate::model::note::{NoteDraft, NoteRecord, NoteValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure while writing or reading persisted notes.
#[derive(Debug)]
pub enum StoreError {
    /// Draft rejected before any storage access.
    Validation(NoteValidationError),
    /// SQLite open, migration or query failure.
    Db(DbError),
    /// Flat-file open, write or read failure.
    Io(std::io::Error),
    /// Persisted content could not be turned back into a valid note.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "notes database error: {err}"),
            Self::Io(err) => write!(f, "notes file error: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<NoteValidationError> for StoreError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Append-only persistence for captured notes.
///
/// There is deliberately no update or delete operation.
pub trait NoteStore {
    /// Persists one note and returns it as stored (with any assigned id/timestamp).
    fn append(&self, draft: &NoteDraft) -> StoreResult<NoteRecord>;
    /// Returns every stored note, newest first.
    fn list_all(&self) -> StoreResult<Vec<NoteRecord>>;
    /// Short backend label used in log events.
    fn backend_name(&self) -> &'static str;
}

impl<S: NoteStore + ?Sized> NoteStore for &S {
    fn append(&self, draft: &NoteDraft) -> StoreResult<NoteRecord> {
        (**self).append(draft)
    }

    fn list_all(&self) -> StoreResult<Vec<NoteRecord>> {
        (**self).list_all()
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}

impl<S: NoteStore + ?Sized> NoteStore for Box<S> {
    fn append(&self, draft: &NoteDraft) -> StoreResult<NoteRecord> {
        (**self).append(draft)
    }

    fn list_all(&self) -> StoreResult<Vec<NoteRecord>> {
        (**self).list_all()
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}

impl<S: NoteStore + ?Sized> NoteStore for Rc<S> {
    fn append(&self, draft: &NoteDraft) -> StoreResult<NoteRecord> {
        (**self).append(draft)
    }

    fn list_all(&self) -> StoreResult<Vec<NoteRecord>> {
        (**self).list_all()
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}
