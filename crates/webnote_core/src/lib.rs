//! Core logic for the web-page note taker.
//!
//! The shell (window, web view, buttons, file dialogs) lives outside this
//! crate. It hands in a [`RenderingSurface`] and a [`ManualEntry`] and calls
//! the three user actions on [`NoteTakerApp`].

pub mod app;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod surface;

pub use app::{ActionResponse, NoteTakerApp, StartError};
pub use config::{AppConfig, ConfigError, StoreBackend, StoreConfig, DEFAULT_START_URL};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{NoteDraft, NoteRecord, NoteValidationError};
pub use repo::flat_file_store::FlatFileNoteStore;
pub use repo::note_store::{NoteStore, StoreError, StoreResult};
pub use repo::open_store;
pub use repo::sqlite_store::SqliteNoteStore;
pub use service::capture_service::{
    resolve_note_text, CaptureController, CaptureError, CaptureState, NoteSource, SaveOutcome,
};
pub use service::viewer_service::{ExportError, NoteViewer, NO_NOTES_PLACEHOLDER};
pub use surface::{selection_channel, ManualEntry, RenderingSurface, SelectionReply, SelectionRequest};

/// Minimal health-check API for shell integration probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
