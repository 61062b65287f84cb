//! Note store contract and persistence implementations.
//!
//! # Responsibility
//! - Define the append-only `NoteStore` contract shared by every backend.
//! - Isolate SQL and flat-file format details from capture/export logic.
//!
//! # Invariants
//! - Writes validate `NoteDraft` before touching storage.
//! - Reads return newest-first and treat missing storage as "no notes".

pub mod flat_file_store;
pub mod note_store;
pub mod sqlite_store;

use crate::config::{StoreBackend, StoreConfig};
use flat_file_store::FlatFileNoteStore;
use log::info;
use note_store::{NoteStore, StoreResult};
use sqlite_store::SqliteNoteStore;

/// Opens the backend selected by `config`.
///
/// The returned handle is the only owner of the backing storage for the
/// lifetime of the process; dropping it releases the file or connection.
pub fn open_store(config: &StoreConfig) -> StoreResult<Box<dyn NoteStore>> {
    let path = config.store_path();
    info!(
        "event=store_open module=store backend={} path={}",
        config.backend.as_str(),
        path.display()
    );

    match config.backend {
        StoreBackend::Sqlite => Ok(Box::new(SqliteNoteStore::open(path)?)),
        StoreBackend::FlatFile => Ok(Box::new(FlatFileNoteStore::open(path)?)),
    }
}
