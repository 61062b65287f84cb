//! Domain model for captured web-page notes.
//!
//! # Invariants
//! - A persisted note is immutable; no update or delete shape exists.
//! - Both store variants project into the same `NoteRecord` type.

pub mod note;
