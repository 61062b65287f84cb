use std::cell::RefCell;
use std::fs;
use webnote_core::{
    AppConfig, ManualEntry, NoteTakerApp, RenderingSurface, SelectionRequest, StoreBackend,
    StoreConfig, DEFAULT_START_URL, NO_NOTES_PLACEHOLDER,
};

struct StaticSurface {
    address: &'static str,
    selection: &'static str,
}

impl RenderingSurface for StaticSurface {
    fn current_address(&self) -> String {
        self.address.to_string()
    }

    fn request_selection(&self) -> SelectionRequest {
        SelectionRequest::ready(self.selection)
    }
}

struct TextPane(RefCell<String>);

impl ManualEntry for TextPane {
    fn text(&self) -> String {
        self.0.borrow().clone()
    }

    fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

fn config_in(dir: &std::path::Path, backend: StoreBackend) -> AppConfig {
    AppConfig {
        store: StoreConfig {
            backend,
            data_dir: dir.to_path_buf(),
            file_name: None,
        },
        ..AppConfig::default()
    }
}

#[tokio::test]
async fn save_view_export_with_sqlite_backend() {
    let dir = tempfile::tempdir().unwrap();
    let app = NoteTakerApp::start(config_in(dir.path(), StoreBackend::Sqlite)).unwrap();
    assert_eq!(app.start_url(), DEFAULT_START_URL);
    assert_eq!(app.view_notes().message, NO_NOTES_PLACEHOLDER);

    let pane = TextPane(RefCell::new("typed".to_string()));
    let saved = app
        .save_note(
            &StaticSurface {
                address: "https://a.test",
                selection: "",
            },
            &pane,
        )
        .await;
    assert!(saved.ok);
    assert_eq!(saved.message, "Note saved!");
    assert_eq!(pane.text(), "");

    let view = app.view_notes();
    assert!(view.ok);
    assert!(view.message.contains("URL: https://a.test\nNote: typed\n"));

    let destination = dir.path().join("export.json");
    let exported = app.export_notes(Some(destination.as_path()));
    assert!(exported.ok, "{}", exported.message);
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&destination).unwrap()).unwrap();
    assert_eq!(json[0]["note"], "typed");

    app.shutdown();
    assert!(dir.path().join("notes.db").exists());
}

#[tokio::test]
async fn nothing_to_save_is_informational() {
    let dir = tempfile::tempdir().unwrap();
    let app = NoteTakerApp::start(config_in(dir.path(), StoreBackend::FlatFile)).unwrap();

    let response = app
        .save_note(
            &StaticSurface {
                address: "https://a.test",
                selection: "  ",
            },
            &TextPane(RefCell::new(String::new())),
        )
        .await;

    assert!(response.ok);
    assert_eq!(response.message, "No text selected or entered.");
    assert!(!dir.path().join("notes.txt").exists());
}

#[test]
fn cancelled_export_is_a_silent_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let app = NoteTakerApp::start(config_in(dir.path(), StoreBackend::FlatFile)).unwrap();

    let response = app.export_notes(None);
    assert!(response.ok);
    assert!(response.message.is_empty());
}

#[test]
fn failed_export_is_reported_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let app = NoteTakerApp::start(config_in(dir.path(), StoreBackend::Sqlite)).unwrap();

    let destination = dir.path().join("no-such-dir").join("out.json");
    let response = app.export_notes(Some(destination.as_path()));
    assert!(!response.ok);
    assert!(response.message.starts_with("Error exporting notes:"));
    assert!(app.view_notes().ok);
}

#[test]
fn notes_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("notes.txt"),
        "URL: https://a.test\nNote: from last session\n\n",
    )
    .unwrap();

    let app = NoteTakerApp::start(config_in(dir.path(), StoreBackend::FlatFile)).unwrap();
    assert!(app.view_notes().message.contains("from last session"));
    drop(app);

    let app = NoteTakerApp::start(config_in(dir.path(), StoreBackend::FlatFile)).unwrap();
    assert!(app.view_notes().message.contains("from last session"));
}
