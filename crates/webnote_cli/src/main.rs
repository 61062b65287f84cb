//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `webnote_core` linkage without a GUI shell.
//! - Exercise an in-memory store so the SQLite bundle is known to work.

use webnote_core::{NoteStore, NoteViewer, SqliteNoteStore};

fn main() {
    println!("webnote_core ping={}", webnote_core::ping());
    println!("webnote_core version={}", webnote_core::core_version());

    match SqliteNoteStore::open_in_memory() {
        Ok(store) => {
            let backend = store.backend_name();
            let status = match NoteViewer::new(store).render_for_display() {
                Ok(_) => "ok",
                Err(_) => "error",
            };
            println!("webnote_core store={backend} status={status}");
        }
        Err(err) => {
            println!("webnote_core store=sqlite status=error error={err}");
            std::process::exit(1);
        }
    }
}
