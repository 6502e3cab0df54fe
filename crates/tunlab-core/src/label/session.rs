//! Labeling session: a cursor over the candidate image list.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use super::{FormValues, LabelRecord, LabelStore};
use crate::error::Result;

/// File extensions the labeler considers images.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Collect unlabeled images under `image_root`.
///
/// Recursive, in directory-walk order; files whose path is already a ledger
/// key are excluded, so a finished session yields no candidates on re-run.
pub fn scan_candidates(image_root: &Path, store: &impl LabelStore) -> Result<Vec<PathBuf>> {
    let mut candidates = Vec::new();

    for entry in WalkDir::new(image_root) {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            continue;
        }

        let key = path.to_string_lossy();
        if store.contains(&key) {
            debug!("Already labeled, excluding {}", key);
            continue;
        }
        candidates.push(path.to_path_buf());
    }

    debug!(
        "Found {} candidate images under {}",
        candidates.len(),
        image_root.display()
    );
    Ok(candidates)
}

/// Single-operator labeling session.
///
/// Owns the candidate list, the cursor and the ledger store. `submit` appends
/// one row keyed by the current image and advances; `skip` advances without
/// writing. The session is done once the cursor passes the last candidate,
/// after which no further writes are possible.
pub struct LabelSession<S: LabelStore> {
    candidates: Vec<PathBuf>,
    cursor: usize,
    store: S,
}

impl<S: LabelStore> LabelSession<S> {
    pub fn new(candidates: Vec<PathBuf>, store: S) -> Self {
        Self {
            candidates,
            cursor: 0,
            store,
        }
    }

    /// The image awaiting input, or `None` once the session is done.
    pub fn current(&self) -> Option<&Path> {
        self.candidates.get(self.cursor).map(PathBuf::as_path)
    }

    /// 0-based cursor position.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Total candidates in this session.
    pub fn total(&self) -> usize {
        self.candidates.len()
    }

    /// Candidates still awaiting a decision, including the current one.
    pub fn remaining(&self) -> usize {
        self.candidates.len().saturating_sub(self.cursor)
    }

    pub fn is_done(&self) -> bool {
        self.cursor >= self.candidates.len()
    }

    /// Persist the form for the current image and advance.
    ///
    /// Blank fields are normalized to "N/A". A no-op when the session is
    /// already done.
    pub fn submit(&mut self, form: &FormValues) -> Result<()> {
        let Some(path) = self.current() else {
            return Ok(());
        };

        let key = path.to_string_lossy().to_string();
        let record = LabelRecord::from_form(&key, form);
        self.store.append(&record)?;
        self.cursor += 1;
        Ok(())
    }

    /// Advance past the current image without writing.
    pub fn skip(&mut self) {
        if self.cursor < self.candidates.len() {
            self.cursor += 1;
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use crate::label::{CsvLedger, LedgerSchema};
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;
    use std::fs;

    /// In-memory store for driving the session without a filesystem.
    #[derive(Default)]
    struct MemoryStore {
        rows: Vec<LabelRecord>,
        keys: HashSet<String>,
    }

    impl LabelStore for MemoryStore {
        fn contains(&self, key: &str) -> bool {
            self.keys.contains(key)
        }

        fn append(&mut self, record: &LabelRecord) -> std::result::Result<(), LedgerError> {
            self.keys.insert(record.image.clone());
            self.rows.push(record.clone());
            Ok(())
        }

        fn len(&self) -> usize {
            self.rows.len()
        }
    }

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_submit_appends_and_advances() {
        let mut session = LabelSession::new(paths(&["a.png", "b.png"]), MemoryStore::default());
        let form = FormValues::blank(LedgerSchema::Granular);

        assert_eq!(session.current().unwrap(), Path::new("a.png"));
        session.submit(&form).unwrap();
        assert_eq!(session.current().unwrap(), Path::new("b.png"));
        assert_eq!(session.store().len(), 1);
        assert_eq!(session.store().rows[0].image, "a.png");
    }

    #[test]
    fn test_skip_advances_without_writing() {
        let mut session = LabelSession::new(paths(&["a.png", "b.png"]), MemoryStore::default());

        session.skip();
        assert_eq!(session.current().unwrap(), Path::new("b.png"));
        assert_eq!(session.store().len(), 0);
    }

    #[test]
    fn test_row_count_tracks_submits_only() {
        let mut session =
            LabelSession::new(paths(&["a.png", "b.png", "c.png"]), MemoryStore::default());
        let form = FormValues::blank(LedgerSchema::Granular);

        session.submit(&form).unwrap();
        session.skip();
        session.submit(&form).unwrap();

        assert_eq!(session.store().len(), 2);
        assert!(session.is_done());
    }

    #[test]
    fn test_done_session_refuses_writes() {
        let mut session = LabelSession::new(paths(&["a.png"]), MemoryStore::default());
        let form = FormValues::blank(LedgerSchema::Granular);

        session.submit(&form).unwrap();
        assert!(session.is_done());
        assert!(session.current().is_none());

        // Submit after done is a no-op
        session.submit(&form).unwrap();
        assert_eq!(session.store().len(), 1);
    }

    #[test]
    fn test_remaining_counts_down() {
        let mut session = LabelSession::new(paths(&["a.png", "b.png"]), MemoryStore::default());
        assert_eq!(session.remaining(), 2);
        session.skip();
        assert_eq!(session.remaining(), 1);
        session.skip();
        assert_eq!(session.remaining(), 0);
        session.skip();
        assert_eq!(session.remaining(), 0);
    }

    #[test]
    fn test_scan_finds_images_recursively() {
        let tmp = tempfile::tempdir().unwrap();
        let sub = tmp.path().join("report-a");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("page_1_img_1.png"), b"png").unwrap();
        fs::write(sub.join("page_1_img_2.JPG"), b"jpg").unwrap();
        fs::write(sub.join("notes.txt"), b"ignored").unwrap();

        let store = MemoryStore::default();
        let candidates = scan_candidates(tmp.path(), &store).unwrap();
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_scan_excludes_ledgered_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let sub = tmp.path().join("report-a");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("one.png"), b"png").unwrap();
        fs::write(sub.join("two.png"), b"png").unwrap();

        let mut store = MemoryStore::default();
        let labeled = sub.join("one.png").to_string_lossy().to_string();
        store.keys.insert(labeled);

        let candidates = scan_candidates(tmp.path(), &store).unwrap();
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].ends_with("two.png"));
    }

    #[test]
    fn test_full_session_is_idempotent_on_rescan() {
        let tmp = tempfile::tempdir().unwrap();
        let images = tmp.path().join("extracted-images");
        fs::create_dir_all(&images).unwrap();
        fs::write(images.join("a.png"), b"png").unwrap();
        fs::write(images.join("b.png"), b"png").unwrap();

        let ledger_path = tmp.path().join("manual_labels.csv");
        let ledger = CsvLedger::open(&ledger_path, LedgerSchema::Granular).unwrap();
        let candidates = scan_candidates(&images, &ledger).unwrap();
        assert_eq!(candidates.len(), 2);

        let mut session = LabelSession::new(candidates, ledger);
        let form = FormValues::blank(LedgerSchema::Granular);
        session.submit(&form).unwrap();
        session.submit(&form).unwrap();
        assert!(session.is_done());

        // Second run over the same tree finds nothing left to label
        let reopened = CsvLedger::open(&ledger_path, LedgerSchema::Granular).unwrap();
        let candidates = scan_candidates(&images, &reopened).unwrap();
        assert!(candidates.is_empty());
    }
}
