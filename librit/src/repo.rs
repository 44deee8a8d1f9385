//! The repository control record: refs, index, and commit summaries, loaded
//! from and saved back to a single file (`<control_dir>/repository`).
//!
//! Every command follows the same shape: load, mutate an in-memory copy,
//! perform working-tree side effects, then save -- there are no suspension
//! points within a command (§5 of the design doc).

use crate::error::{RitError, RitResult};
use crate::graph::Summaries;
use crate::hash::Digest;
use crate::index::Index;
use crate::obj::{Commit, CommitSummary};
use crate::refs::Refs;
use crate::store::{self, ObjectStore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const CONTROL_DIR_NAME: &str = ".rit";
const RECORD_FILE_NAME: &str = "repository";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlRecord {
    pub refs: Refs,
    pub index: Index,
    pub summaries: Summaries,
}

pub struct Repository {
    pub working_dir: PathBuf,
    pub control_dir: PathBuf,
    pub store: ObjectStore,
    pub record: ControlRecord,
}

impl Repository {
    fn record_path(control_dir: &Path) -> PathBuf {
        control_dir.join(RECORD_FILE_NAME)
    }

    /// `init`: creates the control directory, object-store layout, and the
    /// initial commit, or reports that a repository already exists.
    pub fn init(working_dir: impl Into<PathBuf>) -> RitResult<InitOutcome> {
        let working_dir = working_dir.into();
        let control_dir = store::control_dir_path(&working_dir, CONTROL_DIR_NAME);
        if control_dir.exists() {
            return Ok(InitOutcome::AlreadyExists);
        }

        let store = ObjectStore::new(&control_dir);
        store.init_layout()?;

        let initial = Commit {
            parent1: None,
            parent2: None,
            timestamp: crate::time::format_timestamp(crate::time::epoch()),
            message: "initial commit".to_owned(),
            tracked: BTreeMap::new(),
        };
        let digest = store.put_commit(&initial)?;

        let mut summaries = Summaries::new();
        summaries.insert(digest, CommitSummary::new(&initial, 0));

        let record = ControlRecord { refs: Refs::new(digest), index: Index::default(), summaries };

        let repo = Repository { working_dir, control_dir, store, record };
        repo.save()?;
        Ok(InitOutcome::Created(repo))
    }

    /// Loads an existing repository rooted at `working_dir`. Returns `Ok(None)`
    /// if no control directory is present there -- the caller translates that
    /// into the "not in an initialized directory" message.
    pub fn load(working_dir: impl Into<PathBuf>) -> RitResult<Option<Repository>> {
        let working_dir = working_dir.into();
        let control_dir = store::control_dir_path(&working_dir, CONTROL_DIR_NAME);
        let record_path = Self::record_path(&control_dir);
        if !record_path.exists() {
            return Ok(None);
        }
        let bytes = crate::fs::read_file(&record_path)?;
        let record: ControlRecord = serde_json::from_slice(&bytes)
            .map_err(|e| RitError::Corrupt(format!("repository record: {e}")))?;
        let store = ObjectStore::new(&control_dir);
        Ok(Some(Repository { working_dir, control_dir, store, record }))
    }

    /// Writes the control record back via a temp-file-then-rename, so a
    /// process killed mid-write never leaves a half-written `repository`
    /// file for the next command to choke on.
    pub fn save(&self) -> RitResult<()> {
        let bytes = serde_json::to_vec_pretty(&self.record)?;
        let final_path = Self::record_path(&self.control_dir);
        let tmp_path = final_path.with_extension("tmp");
        crate::fs::write_file(&tmp_path, &bytes)?;
        std::fs::rename(&tmp_path, &final_path)?;
        log::debug!("saved control record to {}", final_path.display());
        Ok(())
    }

    pub fn head_commit(&self) -> RitResult<Commit> {
        self.store.get_commit(self.record.refs.head)
    }

    pub fn head_tracked(&self) -> RitResult<BTreeMap<String, Digest>> {
        Ok(self.head_commit()?.tracked)
    }

    /// Resolves a full or abbreviated commit id to a digest known to the
    /// control record's summaries.
    pub fn resolve_commit(&self, id: &str) -> RitResult<Option<Digest>> {
        let Some(digest) = self.store.resolve_commit_prefix(id)? else {
            return Ok(None);
        };
        if self.record.summaries.contains_key(&digest) {
            Ok(Some(digest))
        } else {
            Ok(None)
        }
    }

    pub fn remote_path(&self, name: &str) -> Option<PathBuf> {
        self.record.refs.remotes.get(name).cloned()
    }
}

pub enum InitOutcome {
    Created(Repository),
    AlreadyExists,
}

pub const ALREADY_EXISTS_MESSAGE: &str =
    "A Gitlet version-control system already exists in the current directory.";
pub const NOT_INITIALIZED_MESSAGE: &str = "Not in an initialized Gitlet directory.";
