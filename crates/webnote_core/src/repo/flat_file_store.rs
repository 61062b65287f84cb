//! Append-only flat-file note store (`notes.txt` format).
//!
//! # Format
//! ```text
//! URL: <address>
//! Note: <first line of text>
//!  <each further line, indented by one space>
//! <blank line>
//! ```
//!
//! # Invariants
//! - Every `append` writes one whole block with a single write call on a
//!   file opened in append mode; existing content is never rewritten.
//! - Note text may span lines. Continuation lines are written with a
//!   one-space indent, so no line of note text can start a new block.
//!   On read, text continues until the next `URL:` line and one leading
//!   space is stripped from each continuation line.
//! - A block without a `Note:` line is incomplete and skipped on read.
//! - There is no timestamp; recency is reverse file order.

use crate::model::note::{NoteDraft, NoteRecord};
use crate::repo::note_store::{NoteStore, StoreError, StoreResult};
use log::{debug, error, warn};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

const ADDRESS_PREFIX: &str = "URL:";
const NOTE_PREFIX: &str = "Note:";
const CONTINUATION_INDENT: &str = " ";

/// Flat-file note store rooted at a single text file.
#[derive(Debug, Clone)]
pub struct FlatFileNoteStore {
    path: PathBuf,
}

impl FlatFileNoteStore {
    /// Binds the store to `path`.
    ///
    /// The file itself is created lazily by the first `append`, so opening
    /// never touches existing notes.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        if path.is_dir() {
            return Err(StoreError::Io(std::io::Error::new(
                ErrorKind::InvalidInput,
                format!("notes path `{}` is a directory", path.display()),
            )));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_block(&self, block: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(block.as_bytes())?;
        file.flush()
    }
}

impl NoteStore for FlatFileNoteStore {
    fn append(&self, draft: &NoteDraft) -> StoreResult<NoteRecord> {
        draft.validate()?;

        let address = draft.address.trim();
        if address.contains(['\n', '\r']) {
            return Err(StoreError::InvalidData(
                "flat-file note address must be a single line".to_string(),
            ));
        }
        let text = draft.text.trim();
        let block = format_block(address, text);

        if let Err(err) = self.write_block(&block) {
            error!(
                "event=note_append module=store backend=flat_file status=error path={} error={}",
                self.path.display(),
                err
            );
            return Err(err.into());
        }

        debug!(
            "event=note_append module=store backend=flat_file status=ok text_len={}",
            text.len()
        );
        Ok(NoteRecord::untimed(address, text))
    }

    fn list_all(&self) -> StoreResult<Vec<NoteRecord>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let content = String::from_utf8(bytes).map_err(|err| {
            StoreError::InvalidData(format!(
                "notes file `{}` is not valid UTF-8: {err}",
                self.path.display()
            ))
        })?;

        let parsed = parse_blocks(&content);
        if parsed.skipped > 0 {
            warn!(
                "event=note_list module=store backend=flat_file status=partial skipped_blocks={}",
                parsed.skipped
            );
        }

        let mut notes = parsed.notes;
        notes.reverse();
        debug!(
            "event=note_list module=store backend=flat_file status=ok count={}",
            notes.len()
        );
        Ok(notes)
    }

    fn backend_name(&self) -> &'static str {
        "flat_file"
    }
}

fn format_block(address: &str, text: &str) -> String {
    let mut lines = text.lines();
    let first = lines.next().unwrap_or_default();
    let mut block = format!("{ADDRESS_PREFIX} {address}\n{NOTE_PREFIX} {first}\n");
    for line in lines {
        block.push_str(CONTINUATION_INDENT);
        block.push_str(line);
        block.push('\n');
    }
    block.push('\n');
    block
}

#[derive(Debug, Default)]
struct ParsedNotes {
    /// Complete notes in file order.
    notes: Vec<NoteRecord>,
    skipped: usize,
}

struct PendingBlock<'a> {
    address: &'a str,
    note_lines: Option<Vec<&'a str>>,
}

fn parse_blocks(content: &str) -> ParsedNotes {
    let mut parsed = ParsedNotes::default();
    let mut pending: Option<PendingBlock<'_>> = None;

    for line in content.lines() {
        if let Some(rest) = line.strip_prefix(ADDRESS_PREFIX) {
            if let Some(block) = pending.take() {
                flush_block(block, &mut parsed);
            }
            pending = Some(PendingBlock {
                address: rest.trim(),
                note_lines: None,
            });
            continue;
        }

        // Lines before the first `URL:` marker belong to no block.
        let Some(block) = pending.as_mut() else {
            continue;
        };
        match block.note_lines.as_mut() {
            Some(lines) => lines.push(line.strip_prefix(CONTINUATION_INDENT).unwrap_or(line)),
            None => {
                if let Some(rest) = line.strip_prefix(NOTE_PREFIX) {
                    block.note_lines = Some(vec![rest.trim_start()]);
                }
            }
        }
    }

    if let Some(block) = pending.take() {
        flush_block(block, &mut parsed);
    }
    parsed
}

fn flush_block(block: PendingBlock<'_>, parsed: &mut ParsedNotes) {
    let Some(lines) = block.note_lines else {
        parsed.skipped += 1;
        return;
    };
    let text = lines.join("\n");
    let text = text.trim();
    if block.address.is_empty() || text.is_empty() {
        parsed.skipped += 1;
        return;
    }
    parsed
        .notes
        .push(NoteRecord::untimed(block.address, text));
}
