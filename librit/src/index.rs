//! The staging area: pending additions (name -> blob digest) and pending
//! removals (a name set), disjoint by construction.

use crate::fs;
use crate::hash::Digest;
use crate::obj::{Blob, Object};
use crate::store::ObjectStore;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub staged_add: BTreeMap<String, Digest>,
    pub staged_remove: BTreeSet<String>,
}

impl Index {
    pub fn is_empty(&self) -> bool {
        self.staged_add.is_empty() && self.staged_remove.is_empty()
    }

    pub fn clear(&mut self) {
        self.staged_add.clear();
        self.staged_remove.clear();
    }
}

/// Outcome of [`add`], distinguishing the user-facing no-op from an actual
/// staging mutation -- callers decide what (if anything) to print.
pub enum AddOutcome {
    FileMissing,
    Staged,
    NoChange,
}

/// `add(name)`: stage `name` for the next commit.
///
/// - If the file doesn't exist in the working directory, no-ops.
/// - If `name` was staged for removal, un-stages the removal (idempotent).
/// - If the working file's content matches what HEAD already tracks, clears
///   any stale staged-add entry and no-ops (the file is "unchanged").
/// - Otherwise writes a new blob and records it in `staged_add`.
pub fn add(
    index: &mut Index,
    store: &ObjectStore,
    working_dir: &Path,
    head_tracked: &BTreeMap<String, Digest>,
    name: &str,
) -> crate::error::RitResult<AddOutcome> {
    let path = working_dir.join(name);
    if !fs::exists(&path) {
        return Ok(AddOutcome::FileMissing);
    }

    if index.staged_remove.remove(name) {
        return Ok(AddOutcome::Staged);
    }

    let bytes = fs::read_file(&path)?;
    let blob = Blob::new(name, bytes);
    let digest = blob.digest();

    if head_tracked.get(name) == Some(&digest) {
        index.staged_add.remove(name);
        return Ok(AddOutcome::NoChange);
    }

    store.put_blob(&blob)?;
    index.staged_add.insert(name.to_owned(), digest);
    Ok(AddOutcome::Staged)
}

/// `rm(name)`: stage `name` for removal from the next commit.
pub enum RmOutcome {
    UnstagedAddition,
    StagedRemoval,
    NothingToRemove,
}

pub fn rm(
    index: &mut Index,
    working_dir: &Path,
    head_tracked: &BTreeMap<String, Digest>,
    name: &str,
) -> crate::error::RitResult<RmOutcome> {
    if index.staged_add.remove(name).is_some() {
        return Ok(RmOutcome::UnstagedAddition);
    }

    if head_tracked.contains_key(name) {
        index.staged_remove.insert(name.to_owned());
        fs::restricted_delete(working_dir, name)?;
        return Ok(RmOutcome::StagedRemoval);
    }

    Ok(RmOutcome::NothingToRemove)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    fn setup() -> (tempfile::TempDir, ObjectStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectStore::new(dir.path().join(".rit"));
        store.init_layout().unwrap();
        (dir, store)
    }

    #[quickcheck]
    fn add_is_idempotent_for_any_unchanged_file(bytes: Vec<u8>) -> bool {
        let (dir, store) = setup();
        std::fs::write(dir.path().join("f"), &bytes).unwrap();
        let mut index = Index::default();
        add(&mut index, &store, dir.path(), &BTreeMap::new(), "f").unwrap();
        let after_first = index.clone();
        add(&mut index, &store, dir.path(), &BTreeMap::new(), "f").unwrap();
        index == after_first
    }

    #[test]
    fn add_missing_file_is_noop() {
        let (dir, store) = setup();
        let mut index = Index::default();
        let outcome = add(&mut index, &store, dir.path(), &BTreeMap::new(), "nope.txt").unwrap();
        assert!(matches!(outcome, AddOutcome::FileMissing));
        assert!(index.is_empty());
    }

    #[test]
    fn add_then_add_unchanged_is_stable() {
        let (dir, store) = setup();
        std::fs::write(dir.path().join("wug.txt"), b"hello\n").unwrap();
        let mut index = Index::default();
        add(&mut index, &store, dir.path(), &BTreeMap::new(), "wug.txt").unwrap();
        assert_eq!(index.staged_add.len(), 1);
        let before = index.clone();
        add(&mut index, &store, dir.path(), &BTreeMap::new(), "wug.txt").unwrap();
        assert_eq!(index, before);
    }

    #[test]
    fn add_of_head_equivalent_content_clears_stage() {
        let (dir, store) = setup();
        std::fs::write(dir.path().join("wug.txt"), b"hello\n").unwrap();
        let digest = Blob::new("wug.txt", b"hello\n".to_vec()).digest();
        let mut head = BTreeMap::new();
        head.insert("wug.txt".to_owned(), digest);
        let mut index = Index::default();
        let outcome = add(&mut index, &store, dir.path(), &head, "wug.txt").unwrap();
        assert!(matches!(outcome, AddOutcome::NoChange));
        assert!(index.staged_add.is_empty());
    }

    #[test]
    fn rm_staged_addition_unstages() {
        let (dir, store) = setup();
        std::fs::write(dir.path().join("wug.txt"), b"hello\n").unwrap();
        let mut index = Index::default();
        add(&mut index, &store, dir.path(), &BTreeMap::new(), "wug.txt").unwrap();
        let outcome = rm(&mut index, dir.path(), &BTreeMap::new(), "wug.txt").unwrap();
        assert!(matches!(outcome, RmOutcome::UnstagedAddition));
        assert!(index.staged_add.is_empty());
    }

    #[test]
    fn rm_tracked_file_stages_removal_and_deletes() {
        let (dir, _store) = setup();
        std::fs::write(dir.path().join("wug.txt"), b"hello\n").unwrap();
        let mut head = BTreeMap::new();
        head.insert("wug.txt".to_owned(), Blob::new("wug.txt", b"whatever".to_vec()).digest());
        let mut index = Index::default();
        let outcome = rm(&mut index, dir.path(), &head, "wug.txt").unwrap();
        assert!(matches!(outcome, RmOutcome::StagedRemoval));
        assert!(index.staged_remove.contains("wug.txt"));
        assert!(!dir.path().join("wug.txt").exists());
    }

    #[test]
    fn rm_untracked_unstaged_file_is_noop() {
        let (dir, _store) = setup();
        let mut index = Index::default();
        let outcome = rm(&mut index, dir.path(), &BTreeMap::new(), "ghost.txt").unwrap();
        assert!(matches!(outcome, RmOutcome::NothingToRemove));
    }
}
