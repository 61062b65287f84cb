//! Shell-facing application facade.
//!
//! # Responsibility
//! - Acquire the note store once at startup and release it at shutdown.
//! - Expose the three user actions (save/view/export) as calls that never
//!   panic and always answer with a displayable envelope.
//!
//! # Invariants
//! - The store handle is owned here and shared only within this thread.
//! - Storage failures are reported in the envelope; the process keeps running.

use crate::config::AppConfig;
use crate::logging::init_logging;
use crate::repo::note_store::{NoteStore, StoreError};
use crate::repo::open_store;
use crate::service::capture_service::{CaptureController, SaveOutcome};
use crate::service::viewer_service::NoteViewer;
use crate::surface::{ManualEntry, RenderingSurface};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::rc::Rc;

/// Result envelope for one user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the action succeeded (including benign no-ops).
    pub ok: bool,
    /// Text for the shell to show: status line, or the notes listing.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Startup failure.
#[derive(Debug)]
pub enum StartError {
    Logging(String),
    Store(StoreError),
}

impl Display for StartError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(message) => write!(f, "failed to initialize logging: {message}"),
            Self::Store(err) => write!(f, "failed to open note store: {err}"),
        }
    }
}

impl Error for StartError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for StartError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

type SharedStore = Rc<dyn NoteStore>;

/// Running note-taker instance.
pub struct NoteTakerApp {
    config: AppConfig,
    capture: CaptureController<SharedStore>,
    viewer: NoteViewer<SharedStore>,
}

impl NoteTakerApp {
    /// Initializes logging (when configured) and opens the note store.
    pub fn start(config: AppConfig) -> Result<Self, StartError> {
        if let Some(log_dir) = &config.log_dir {
            let log_dir = log_dir.to_string_lossy();
            init_logging(&config.log_level, &log_dir).map_err(StartError::Logging)?;
        }

        let store: SharedStore = Rc::from(open_store(&config.store)?);
        Ok(Self::with_store(config, store))
    }

    /// Builds an app around an already-open store.
    pub fn with_store(config: AppConfig, store: SharedStore) -> Self {
        info!(
            "event=app_start module=app status=ok backend={}",
            store.backend_name()
        );
        Self {
            config,
            capture: CaptureController::new(Rc::clone(&store)),
            viewer: NoteViewer::new(store),
        }
    }

    /// Address the rendering surface should load first.
    pub fn start_url(&self) -> &str {
        &self.config.start_url
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn capture(&self) -> &CaptureController<SharedStore> {
        &self.capture
    }

    /// "Save Note".
    pub async fn save_note<R, E>(&self, surface: &R, entry: &E) -> ActionResponse
    where
        R: RenderingSurface + ?Sized,
        E: ManualEntry + ?Sized,
    {
        match self.capture.save(surface, entry).await {
            Ok(SaveOutcome::Saved { .. }) => ActionResponse::success("Note saved!"),
            Ok(SaveOutcome::NothingToSave) => {
                ActionResponse::success("No text selected or entered.")
            }
            Err(err) => ActionResponse::failure(err.to_string()),
        }
    }

    /// "View Notes": the full listing, or the placeholder when empty.
    pub fn view_notes(&self) -> ActionResponse {
        match self.viewer.render_for_display() {
            Ok(text) => ActionResponse::success(text),
            Err(err) => ActionResponse::failure(format!("Error reading notes: {err}")),
        }
    }

    /// "Export Notes". `None` means the save dialog was cancelled.
    pub fn export_notes(&self, destination: Option<&Path>) -> ActionResponse {
        let Some(destination) = destination else {
            return ActionResponse::success("");
        };
        match self.viewer.export_json(destination) {
            Ok(_) => ActionResponse::success("Notes exported successfully."),
            Err(err) => ActionResponse::failure(format!("Error exporting notes: {err}")),
        }
    }

    /// Releases the note store. Dropping the app has the same effect.
    pub fn shutdown(self) {
        drop(self);
    }
}

impl Drop for NoteTakerApp {
    fn drop(&mut self) {
        info!("event=app_shutdown module=app status=ok");
    }
}
