//! Note capture use-case.
//!
//! # Responsibility
//! - Resolve the note text for a save request: trimmed page selection
//!   first, typed note second.
//! - Persist the resolved note against the surface's current address.
//!
//! # Invariants
//! - Nothing is persisted when both the selection and typed note are blank.
//! - The typed note is cleared only after a successful append.
//! - Racing save requests are not serialized; each append stands alone.

use crate::model::note::{NoteDraft, NoteRecord};
use crate::repo::note_store::{NoteStore, StoreError};
use crate::surface::{ManualEntry, RenderingSurface};
use log::{error, info, warn};
use std::cell::Cell;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Controller state as observed by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    /// At least one save request is waiting for its selection callback.
    AwaitingSelection,
}

/// Where the saved note text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteSource {
    Selection,
    Manual,
}

impl NoteSource {
    fn as_str(self) -> &'static str {
        match self {
            Self::Selection => "selection",
            Self::Manual => "manual",
        }
    }
}

/// Non-error result of a save request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved {
        record: NoteRecord,
        source: NoteSource,
    },
    /// Selection and typed note were both blank; nothing was written.
    NothingToSave,
}

#[derive(Debug)]
pub enum CaptureError {
    Store(StoreError),
}

impl Display for CaptureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "failed to save note: {err}"),
        }
    }
}

impl Error for CaptureError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for CaptureError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Picks the note text for a save request.
///
/// Returns `None` when there is nothing worth saving.
pub fn resolve_note_text(selection: &str, manual: &str) -> Option<(String, NoteSource)> {
    let selection = selection.trim();
    if !selection.is_empty() {
        return Some((selection.to_string(), NoteSource::Selection));
    }
    let manual = manual.trim();
    if !manual.is_empty() {
        return Some((manual.to_string(), NoteSource::Manual));
    }
    None
}

/// Orchestrates selection lookup and persistence for "Save Note".
pub struct CaptureController<S: NoteStore> {
    store: S,
    in_flight: Cell<usize>,
}

impl<S: NoteStore> CaptureController<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            in_flight: Cell::new(0),
        }
    }

    pub fn state(&self) -> CaptureState {
        if self.in_flight.get() == 0 {
            CaptureState::Idle
        } else {
            CaptureState::AwaitingSelection
        }
    }

    /// Handles one save request.
    ///
    /// Suspends only while the surface answers the selection query; the
    /// address and typed note are read after it resumes.
    pub async fn save<R, E>(&self, surface: &R, entry: &E) -> Result<SaveOutcome, CaptureError>
    where
        R: RenderingSurface + ?Sized,
        E: ManualEntry + ?Sized,
    {
        let selection = {
            let _awaiting = InFlightGuard::enter(&self.in_flight);
            surface.request_selection().resolve().await
        };
        let selection = selection.unwrap_or_else(|| {
            warn!("event=note_save module=capture status=selection_dropped");
            String::new()
        });

        let Some((text, source)) = resolve_note_text(&selection, &entry.text()) else {
            info!("event=note_save module=capture status=skipped reason=nothing_to_save");
            return Ok(SaveOutcome::NothingToSave);
        };

        let draft = NoteDraft::new(surface.current_address(), text);
        match self.store.append(&draft) {
            Ok(record) => {
                entry.clear();
                info!(
                    "event=note_save module=capture status=ok source={} backend={}",
                    source.as_str(),
                    self.store.backend_name()
                );
                Ok(SaveOutcome::Saved { record, source })
            }
            Err(err) => {
                error!(
                    "event=note_save module=capture status=error source={} backend={} error={}",
                    source.as_str(),
                    self.store.backend_name(),
                    err
                );
                Err(err.into())
            }
        }
    }
}

struct InFlightGuard<'a> {
    counter: &'a Cell<usize>,
}

impl<'a> InFlightGuard<'a> {
    fn enter(counter: &'a Cell<usize>) -> Self {
        counter.set(counter.get() + 1);
        Self { counter }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.counter.set(self.counter.get().saturating_sub(1));
    }
}
