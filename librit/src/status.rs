//! The read-only reporting operations: `log`, `global-log`, `find`, and the
//! five-block `status` summary. None of these mutate the control record.

use crate::graph::{self, Summaries};
use crate::hash::Digest;
use crate::index::Index;
use crate::obj::{Blob, Object};
use crate::store::ObjectStore;
use std::collections::BTreeMap;
use std::path::Path;

/// Renders one `log`/`global-log` block for a single commit. Matches the
/// four-line shape exactly, including the trailing blank line.
pub fn format_commit_block(digest: Digest, summary: &crate::obj::CommitSummary) -> String {
    let mut block = String::new();
    block.push_str("===\n");
    block.push_str(&format!("commit {}\n", digest));
    block.push_str(&format!("Date: {}\n", summary.timestamp));
    block.push_str(&summary.message);
    block.push('\n');
    block.push('\n');
    block
}

/// `log`: first-parent walk from HEAD, most recent first.
pub fn log(summaries: &Summaries, head: Digest) -> String {
    graph::first_parent_walk(summaries, head)
        .into_iter()
        .map(|d| format_commit_block(d, &summaries[&d]))
        .collect()
}

/// `global-log`: every commit ever made, newest first (tiebreak on digest).
pub fn global_log(summaries: &Summaries) -> String {
    graph::sorted_by_recency(summaries)
        .into_iter()
        .map(|d| format_commit_block(d, &summaries[&d]))
        .collect()
}

pub const NO_COMMIT_WITH_MESSAGE: &str = "Found no commit with that message.";

/// `find msg`: every commit digest whose message contains `msg`, newest first.
pub fn find(summaries: &Summaries, needle: &str) -> Vec<Digest> {
    graph::sorted_by_recency(summaries)
        .into_iter()
        .filter(|d| summaries[d].message.contains(needle))
        .collect()
}

/// One entry in the "Modifications Not Staged For Commit" block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkingChange {
    Modified(String),
    Deleted(String),
}

impl WorkingChange {
    fn sort_key(&self) -> String {
        match self {
            WorkingChange::Modified(n) | WorkingChange::Deleted(n) => n.to_lowercase(),
        }
    }

    fn render(&self) -> String {
        match self {
            WorkingChange::Modified(n) => format!("{} (modified)", n),
            WorkingChange::Deleted(n) => format!("{} (deleted)", n),
        }
    }
}

/// The five blocks `status` assembles, already computed and ready to render.
pub struct Status {
    pub branches: Vec<String>,
    pub active_branch: String,
    pub staged: Vec<String>,
    pub removed: Vec<String>,
    pub unstaged_changes: Vec<WorkingChange>,
    pub untracked: Vec<String>,
}

impl Status {
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("=== Branches ===\n");
        for name in &self.branches {
            if *name == self.active_branch {
                out.push('*');
            }
            out.push_str(name);
            out.push('\n');
        }
        out.push('\n');

        out.push_str("=== Staged Files ===\n");
        for name in &self.staged {
            out.push_str(name);
            out.push('\n');
        }
        out.push('\n');

        out.push_str("=== Removed Files ===\n");
        for name in &self.removed {
            out.push_str(name);
            out.push('\n');
        }
        out.push('\n');

        out.push_str("=== Modifications Not Staged For Commit ===\n");
        for change in &self.unstaged_changes {
            out.push_str(&change.render());
            out.push('\n');
        }
        out.push('\n');

        out.push_str("=== Untracked Files ===\n");
        for name in &self.untracked {
            out.push_str(name);
            out.push('\n');
        }
        out.push('\n');

        out
    }
}

/// Assembles every block of `status`. `branches` and `head_tracked` come from
/// the control record; the working directory is read fresh.
pub fn status(
    store: &ObjectStore,
    working_dir: &Path,
    control_dir_name: &str,
    branches: &BTreeMap<String, Digest>,
    active_branch: &str,
    index: &Index,
    head_tracked: &BTreeMap<String, Digest>,
) -> crate::error::RitResult<Status> {
    let mut working_bytes = BTreeMap::new();
    for relative in crate::fs::list_working_files(working_dir, control_dir_name)? {
        let name = relative.to_string_lossy().replace('\\', "/");
        let bytes = crate::fs::read_file(working_dir.join(&relative))?;
        working_bytes.insert(name, bytes);
    }

    let mut tracked_or_staged: BTreeMap<String, Digest> = head_tracked.clone();
    for name in &index.staged_remove {
        tracked_or_staged.remove(name);
    }
    for (name, digest) in &index.staged_add {
        tracked_or_staged.insert(name.clone(), *digest);
    }

    let mut unstaged_changes = Vec::new();
    for (name, expected_digest) in &tracked_or_staged {
        match working_bytes.get(name) {
            None => unstaged_changes.push(WorkingChange::Deleted(name.clone())),
            Some(bytes) => {
                let actual = Blob::new(name.clone(), bytes.clone()).digest();
                if actual != *expected_digest {
                    unstaged_changes.push(WorkingChange::Modified(name.clone()));
                }
            }
        }
    }
    unstaged_changes.sort_by_key(|c| c.sort_key());

    let mut untracked = Vec::new();
    for (name, bytes) in &working_bytes {
        if tracked_or_staged.contains_key(name) {
            continue;
        }
        let digest = Blob::new(name.clone(), bytes.clone()).digest();
        if !store.has(crate::store::ObjectKind::Blob, digest) {
            untracked.push(name.clone());
        }
    }

    Ok(Status {
        branches: branches.keys().cloned().collect(),
        active_branch: active_branch.to_owned(),
        staged: index.staged_add.keys().cloned().collect(),
        removed: index.staged_remove.iter().cloned().collect(),
        unstaged_changes,
        untracked,
    })
}
