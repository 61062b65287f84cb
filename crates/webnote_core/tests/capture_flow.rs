use std::cell::{Cell, RefCell};
use webnote_core::{
    selection_channel, CaptureController, CaptureError, CaptureState, ManualEntry, NoteDraft,
    NoteRecord, NoteSource, NoteStore, RenderingSurface, SaveOutcome, SelectionReply,
    SelectionRequest, SqliteNoteStore, StoreError, StoreResult,
};

/// Web view stand-in. With `selection = None` the query stays pending until
/// the test answers it through `answer_next`.
struct FakeSurface {
    address: String,
    selection: Option<String>,
    pending: RefCell<Vec<SelectionReply>>,
}

impl FakeSurface {
    fn answering(address: &str, selection: &str) -> Self {
        Self {
            address: address.to_string(),
            selection: Some(selection.to_string()),
            pending: RefCell::new(Vec::new()),
        }
    }

    fn deferred(address: &str) -> Self {
        Self {
            address: address.to_string(),
            selection: None,
            pending: RefCell::new(Vec::new()),
        }
    }

    fn answer_next(&self, selection: &str) {
        let reply = self.pending.borrow_mut().remove(0);
        reply.deliver(selection);
    }

    fn drop_next(&self) {
        drop(self.pending.borrow_mut().remove(0));
    }
}

impl RenderingSurface for FakeSurface {
    fn current_address(&self) -> String {
        self.address.clone()
    }

    fn request_selection(&self) -> SelectionRequest {
        match &self.selection {
            Some(selection) => SelectionRequest::ready(selection.clone()),
            None => {
                let (reply, request) = selection_channel();
                self.pending.borrow_mut().push(reply);
                request
            }
        }
    }
}

struct FakeEntry {
    text: RefCell<String>,
    clears: Cell<usize>,
}

impl FakeEntry {
    fn with_text(text: &str) -> Self {
        Self {
            text: RefCell::new(text.to_string()),
            clears: Cell::new(0),
        }
    }
}

impl ManualEntry for FakeEntry {
    fn text(&self) -> String {
        self.text.borrow().clone()
    }

    fn clear(&self) {
        self.text.borrow_mut().clear();
        self.clears.set(self.clears.get() + 1);
    }
}

#[derive(Default)]
struct RecordingStore {
    appended: RefCell<Vec<NoteDraft>>,
}

impl NoteStore for RecordingStore {
    fn append(&self, draft: &NoteDraft) -> StoreResult<NoteRecord> {
        self.appended.borrow_mut().push(draft.clone());
        Ok(NoteRecord::untimed(draft.address.clone(), draft.text.clone()))
    }

    fn list_all(&self) -> StoreResult<Vec<NoteRecord>> {
        Ok(Vec::new())
    }

    fn backend_name(&self) -> &'static str {
        "recording"
    }
}

struct BrokenStore;

impl NoteStore for BrokenStore {
    fn append(&self, _draft: &NoteDraft) -> StoreResult<NoteRecord> {
        Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only volume",
        )))
    }

    fn list_all(&self) -> StoreResult<Vec<NoteRecord>> {
        Ok(Vec::new())
    }

    fn backend_name(&self) -> &'static str {
        "broken"
    }
}

#[tokio::test]
async fn empty_selection_falls_back_to_typed_note() {
    let store = RecordingStore::default();
    let controller = CaptureController::new(&store);
    let surface = FakeSurface::answering("https://a.test", "");
    let entry = FakeEntry::with_text("typed thought");

    let outcome = controller.save(&surface, &entry).await.unwrap();

    assert!(matches!(
        outcome,
        SaveOutcome::Saved {
            source: NoteSource::Manual,
            ..
        }
    ));
    assert_eq!(
        *store.appended.borrow(),
        vec![NoteDraft::new("https://a.test", "typed thought")]
    );
    assert_eq!(entry.text(), "");
    assert_eq!(entry.clears.get(), 1);
}

#[tokio::test]
async fn selection_is_trimmed_and_wins_over_typed_note() {
    let store = RecordingStore::default();
    let controller = CaptureController::new(&store);
    let surface = FakeSurface::answering("https://a.test", "  highlighted words \n");
    let entry = FakeEntry::with_text("typed thought");

    let outcome = controller.save(&surface, &entry).await.unwrap();

    match outcome {
        SaveOutcome::Saved { record, source } => {
            assert_eq!(source, NoteSource::Selection);
            assert_eq!(record.text, "highlighted words");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(
        *store.appended.borrow(),
        vec![NoteDraft::new("https://a.test", "highlighted words")]
    );
}

#[tokio::test]
async fn blank_selection_and_blank_note_save_nothing() {
    let store = RecordingStore::default();
    let controller = CaptureController::new(&store);
    let surface = FakeSurface::answering("https://a.test", "   ");
    let entry = FakeEntry::with_text(" \n\t ");

    let outcome = controller.save(&surface, &entry).await.unwrap();

    assert_eq!(outcome, SaveOutcome::NothingToSave);
    assert!(store.appended.borrow().is_empty());
    assert_eq!(entry.clears.get(), 0);
}

#[tokio::test]
async fn store_failure_is_reported_and_keeps_typed_note() {
    let controller = CaptureController::new(BrokenStore);
    let surface = FakeSurface::answering("https://a.test", "");
    let entry = FakeEntry::with_text("keep me");

    let err = controller.save(&surface, &entry).await.unwrap_err();

    assert!(matches!(err, CaptureError::Store(StoreError::Io(_))));
    assert_eq!(entry.text(), "keep me");
    assert_eq!(controller.state(), CaptureState::Idle);
}

#[tokio::test]
async fn state_is_awaiting_until_callback_arrives() {
    let store = RecordingStore::default();
    let controller = CaptureController::new(&store);
    let surface = FakeSurface::deferred("https://a.test");
    let entry = FakeEntry::with_text("");

    assert_eq!(controller.state(), CaptureState::Idle);
    let (outcome, ()) = tokio::join!(controller.save(&surface, &entry), async {
        tokio::task::yield_now().await;
        assert_eq!(controller.state(), CaptureState::AwaitingSelection);
        surface.answer_next("late selection");
    });

    assert!(matches!(outcome, Ok(SaveOutcome::Saved { .. })));
    assert_eq!(controller.state(), CaptureState::Idle);
    assert_eq!(store.appended.borrow()[0].text, "late selection");
}

#[tokio::test]
async fn typed_note_is_read_when_callback_resolves() {
    let store = RecordingStore::default();
    let controller = CaptureController::new(&store);
    let surface = FakeSurface::deferred("https://a.test");
    let entry = FakeEntry::with_text("");

    let (outcome, ()) = tokio::join!(controller.save(&surface, &entry), async {
        tokio::task::yield_now().await;
        *entry.text.borrow_mut() = "typed while waiting".to_string();
        surface.answer_next("");
    });

    assert!(matches!(outcome, Ok(SaveOutcome::Saved { .. })));
    assert_eq!(store.appended.borrow()[0].text, "typed while waiting");
}

#[tokio::test]
async fn dropped_callback_falls_back_to_typed_note() {
    let store = RecordingStore::default();
    let controller = CaptureController::new(&store);
    let surface = FakeSurface::deferred("https://a.test");
    let entry = FakeEntry::with_text("fallback");

    let (outcome, ()) = tokio::join!(controller.save(&surface, &entry), async {
        tokio::task::yield_now().await;
        surface.drop_next();
    });

    assert!(matches!(
        outcome,
        Ok(SaveOutcome::Saved {
            source: NoteSource::Manual,
            ..
        })
    ));
    assert_eq!(store.appended.borrow()[0].text, "fallback");
}

#[tokio::test]
async fn racing_saves_each_persist_one_note() {
    let store = SqliteNoteStore::open_in_memory().unwrap();
    let controller = CaptureController::new(&store);
    let surface = FakeSurface::deferred("https://a.test");
    let entry = FakeEntry::with_text("");

    let (first, second, ()) = tokio::join!(
        controller.save(&surface, &entry),
        controller.save(&surface, &entry),
        async {
            tokio::task::yield_now().await;
            assert_eq!(controller.state(), CaptureState::AwaitingSelection);
            surface.answer_next("one");
            surface.answer_next("two");
        }
    );

    assert!(first.is_ok());
    assert!(second.is_ok());
    assert_eq!(controller.state(), CaptureState::Idle);

    let mut texts = store
        .list_all()
        .unwrap()
        .into_iter()
        .map(|note| note.text)
        .collect::<Vec<_>>();
    texts.sort();
    assert_eq!(texts, vec!["one".to_string(), "two".to_string()]);
}
