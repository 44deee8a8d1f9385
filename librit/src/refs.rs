//! Branch pointers, the active branch, HEAD, and remote name -> path
//! mappings. A plain map rather than git's file-per-ref layout, since the
//! whole control record already lives in one file (`crate::repo`).

use crate::hash::Digest;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const DEFAULT_BRANCH: &str = "master";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refs {
    pub branches: BTreeMap<String, Digest>,
    pub active_branch: String,
    pub head: Digest,
    pub remotes: BTreeMap<String, PathBuf>,
}

impl Refs {
    pub fn new(initial_commit: Digest) -> Self {
        let mut branches = BTreeMap::new();
        branches.insert(DEFAULT_BRANCH.to_owned(), initial_commit);
        Self {
            branches,
            active_branch: DEFAULT_BRANCH.to_owned(),
            head: initial_commit,
            remotes: BTreeMap::new(),
        }
    }

    pub fn active_branch_tip(&self) -> Digest {
        self.branches[&self.active_branch]
    }

    /// Moves both the active branch's tip and HEAD to `commit` -- the two
    /// always move together (§3 invariant: `HEAD == branches[active_branch]`).
    pub fn advance_active_branch(&mut self, commit: Digest) {
        self.branches.insert(self.active_branch.clone(), commit);
        self.head = commit;
    }

    pub fn switch_active_branch(&mut self, branch: &str) {
        self.active_branch = branch.to_owned();
        self.head = self.branches[branch];
    }
}
