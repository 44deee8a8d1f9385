//! Command layer: turns the primitives in the other modules into the
//! user-visible operations. Every command follows the same shape -- mutate
//! an in-memory copy of the control record, perform working-tree side
//! effects, then save -- and every user-facing precondition failure is
//! reported by returning the fixed message rather than an error, per the
//! three-way split in the error-handling design.

use crate::checkout;
use crate::error::RitResult;
use crate::graph::{self, Summaries};
use crate::hash::Digest;
use crate::index::{self, AddOutcome, RmOutcome};
use crate::merge;
use crate::obj::{Commit, CommitSummary};
use crate::repo::Repository;
use crate::status::{self, Status};
use crate::store::ObjectKind;
use std::collections::{BTreeMap, HashSet};

pub const FILE_DOES_NOT_EXIST: &str = "File does not exist.";
pub const NO_REASON_TO_REMOVE: &str = "No reason to remove the file.";
pub const EMPTY_COMMIT_MESSAGE: &str = "Please enter a commit message.";
pub const NOTHING_TO_COMMIT: &str = "No changes added to the commit.";
pub const FILE_NOT_IN_COMMIT: &str = "File does not exist in that commit.";
pub const NO_SUCH_BRANCH: &str = "No such branch exists.";
pub const ALREADY_ON_BRANCH: &str = "No need to checkout the current branch.";
pub const BRANCH_ALREADY_EXISTS: &str = "A branch with that name already exists.";
pub const RM_BRANCH_MISSING: &str = "A branch with that name does not exist.";
pub const CANNOT_REMOVE_CURRENT_BRANCH: &str = "Cannot remove the current branch.";
pub const NO_COMMIT_WITH_ID: &str = "No commit with that id exists.";
pub const MERGE_BRANCH_MISSING: &str = "A branch with that name does not exist.";
pub const CANNOT_MERGE_SELF: &str = "Cannot merge a branch with itself.";
pub const UNCOMMITTED_CHANGES: &str = "You have uncommitted changes.";
pub const GIVEN_BRANCH_IS_ANCESTOR: &str = "Given branch is an ancestor of the current branch.";
pub const FAST_FORWARDED: &str = "Current branch fast-forwarded.";
pub const MERGE_CONFLICT: &str = "Encountered a merge conflict.";
pub const REMOTE_ALREADY_EXISTS: &str = "A remote with that name already exists.";
pub const REMOTE_NAME_MISSING: &str = "A remote with that name does not exist.";
pub const REMOTE_DIR_NOT_FOUND: &str = "Remote directory not found.";
pub const REMOTE_BRANCH_MISSING: &str = "That remote does not have that branch.";
pub const PLEASE_PULL_FIRST: &str = "Please pull down remote changes before pushing.";

/// `add <file>`.
pub fn cmd_add(repo: &mut Repository, name: &str) -> RitResult<Option<String>> {
    let head_tracked = repo.head_tracked()?;
    let outcome = index::add(&mut repo.record.index, &repo.store, &repo.working_dir, &head_tracked, name)?;
    match outcome {
        AddOutcome::FileMissing => return Ok(Some(FILE_DOES_NOT_EXIST.to_owned())),
        AddOutcome::Staged | AddOutcome::NoChange => {}
    }
    repo.save()?;
    Ok(None)
}

/// `rm <file>`.
pub fn cmd_rm(repo: &mut Repository, name: &str) -> RitResult<Option<String>> {
    let head_tracked = repo.head_tracked()?;
    let outcome = index::rm(&mut repo.record.index, &repo.working_dir, &head_tracked, name)?;
    repo.save()?;
    match outcome {
        RmOutcome::NothingToRemove => Ok(Some(NO_REASON_TO_REMOVE.to_owned())),
        RmOutcome::UnstagedAddition | RmOutcome::StagedRemoval => Ok(None),
    }
}

/// `commit <message>`.
pub fn cmd_commit(repo: &mut Repository, message: &str) -> RitResult<Option<String>> {
    if message.is_empty() {
        return Ok(Some(EMPTY_COMMIT_MESSAGE.to_owned()));
    }
    if repo.record.index.is_empty() {
        return Ok(Some(NOTHING_TO_COMMIT.to_owned()));
    }

    let mut tracked = repo.head_tracked()?;
    for name in &repo.record.index.staged_remove {
        tracked.remove(name);
    }
    for (name, digest) in &repo.record.index.staged_add {
        tracked.insert(name.clone(), *digest);
    }

    let now = crate::time::now();
    let commit = Commit {
        parent1: Some(repo.record.refs.head),
        parent2: None,
        timestamp: crate::time::format_timestamp(now),
        message: message.to_owned(),
        tracked,
    };
    let digest = repo.store.put_commit(&commit)?;
    repo.record.summaries.insert(digest, CommitSummary::new(&commit, now.timestamp()));
    repo.record.refs.advance_active_branch(digest);
    repo.record.index.clear();
    repo.save()?;
    Ok(None)
}

/// `log`.
pub fn cmd_log(repo: &Repository) -> String {
    status::log(&repo.record.summaries, repo.record.refs.head)
}

/// `global-log`.
pub fn cmd_global_log(repo: &Repository) -> String {
    status::global_log(&repo.record.summaries)
}

/// `find <message>`.
pub fn cmd_find(repo: &Repository, needle: &str) -> String {
    let hits = status::find(&repo.record.summaries, needle);
    if hits.is_empty() {
        return format!("{}\n", status::NO_COMMIT_WITH_MESSAGE);
    }
    hits.into_iter().map(|d| format!("{}\n", d)).collect()
}

/// `status`.
pub fn cmd_status(repo: &Repository) -> RitResult<String> {
    let head_tracked = repo.head_tracked()?;
    let result: Status = status::status(
        &repo.store,
        &repo.working_dir,
        crate::repo::CONTROL_DIR_NAME,
        &repo.record.refs.branches,
        &repo.record.refs.active_branch,
        &repo.record.index,
        &head_tracked,
    )?;
    Ok(result.render())
}

/// `checkout -- <file>`: restore `name` from HEAD.
pub fn cmd_checkout_file(repo: &Repository, name: &str) -> RitResult<Option<String>> {
    let head_tracked = repo.head_tracked()?;
    checkout_named_commit_file(repo, &head_tracked, name)
}

/// `checkout <commitId> -- <file>`.
pub fn cmd_checkout_commit_file(repo: &Repository, commit_id: &str, name: &str) -> RitResult<Option<String>> {
    let Some(digest) = repo.resolve_commit(commit_id)? else {
        return Ok(Some(NO_COMMIT_WITH_ID.to_owned()));
    };
    let tracked = repo.store.get_commit(digest)?.tracked;
    checkout_named_commit_file(repo, &tracked, name)
}

fn checkout_named_commit_file(
    repo: &Repository,
    tracked: &BTreeMap<String, Digest>,
    name: &str,
) -> RitResult<Option<String>> {
    let restored = checkout::restore_file(&repo.store, &repo.working_dir, tracked, name)?;
    if restored {
        Ok(None)
    } else {
        Ok(Some(FILE_NOT_IN_COMMIT.to_owned()))
    }
}

/// `checkout <branch>`.
pub fn cmd_checkout_branch(repo: &mut Repository, branch: &str) -> RitResult<Option<String>> {
    if !repo.record.refs.branches.contains_key(branch) {
        return Ok(Some(NO_SUCH_BRANCH.to_owned()));
    }
    if branch == repo.record.refs.active_branch {
        return Ok(Some(ALREADY_ON_BRANCH.to_owned()));
    }
    if checkout::has_untracked_hazard(&repo.store, &repo.working_dir, crate::repo::CONTROL_DIR_NAME)? {
        return Ok(Some(checkout::HAZARD_MESSAGE.to_owned()));
    }

    let from = repo.head_tracked()?;
    let target = repo.record.refs.branches[branch];
    let to = repo.store.get_commit(target)?.tracked;
    let plan = checkout::plan_migration(&from, &to);
    checkout::apply_migration(&repo.store, &repo.working_dir, &plan)?;

    repo.record.index.clear();
    repo.record.refs.switch_active_branch(branch);
    repo.save()?;
    Ok(None)
}

/// `branch <name>`.
pub fn cmd_branch(repo: &mut Repository, name: &str) -> RitResult<Option<String>> {
    if repo.record.refs.branches.contains_key(name) {
        return Ok(Some(BRANCH_ALREADY_EXISTS.to_owned()));
    }
    repo.record.refs.branches.insert(name.to_owned(), repo.record.refs.head);
    repo.save()?;
    Ok(None)
}

/// `rm-branch <name>`.
pub fn cmd_rm_branch(repo: &mut Repository, name: &str) -> RitResult<Option<String>> {
    if name == repo.record.refs.active_branch {
        return Ok(Some(CANNOT_REMOVE_CURRENT_BRANCH.to_owned()));
    }
    if repo.record.refs.branches.remove(name).is_none() {
        return Ok(Some(RM_BRANCH_MISSING.to_owned()));
    }
    repo.save()?;
    Ok(None)
}

/// `reset <commitId>`.
pub fn cmd_reset(repo: &mut Repository, commit_id: &str) -> RitResult<Option<String>> {
    let Some(target) = repo.resolve_commit(commit_id)? else {
        return Ok(Some(NO_COMMIT_WITH_ID.to_owned()));
    };
    if checkout::has_untracked_hazard(&repo.store, &repo.working_dir, crate::repo::CONTROL_DIR_NAME)? {
        return Ok(Some(checkout::HAZARD_MESSAGE.to_owned()));
    }

    let from = repo.head_tracked()?;
    let to = repo.store.get_commit(target)?.tracked;
    let plan = checkout::plan_migration(&from, &to);
    checkout::apply_migration(&repo.store, &repo.working_dir, &plan)?;

    repo.record.index.clear();
    repo.record.refs.head = target;
    let active = repo.record.refs.active_branch.clone();
    repo.record.refs.branches.insert(active, target);
    repo.save()?;
    Ok(None)
}

/// `merge <branch>`.
pub fn cmd_merge(repo: &mut Repository, other_branch: &str) -> RitResult<Option<String>> {
    if !repo.record.index.is_empty() {
        return Ok(Some(UNCOMMITTED_CHANGES.to_owned()));
    }
    if !repo.record.refs.branches.contains_key(other_branch) {
        return Ok(Some(MERGE_BRANCH_MISSING.to_owned()));
    }
    if other_branch == repo.record.refs.active_branch {
        return Ok(Some(CANNOT_MERGE_SELF.to_owned()));
    }
    if checkout::has_untracked_hazard(&repo.store, &repo.working_dir, crate::repo::CONTROL_DIR_NAME)? {
        return Ok(Some(checkout::HAZARD_MESSAGE.to_owned()));
    }

    let head = repo.record.refs.head;
    let other = repo.record.refs.branches[other_branch];
    let split = graph::split_point(&repo.record.summaries, head, other);

    if split.primary == Some(other) || split.secondary == Some(other) {
        return Ok(Some(GIVEN_BRANCH_IS_ANCESTOR.to_owned()));
    }
    if split.primary == Some(head) || split.secondary == Some(head) {
        cmd_checkout_branch_force(repo, other_branch)?;
        return Ok(Some(FAST_FORWARDED.to_owned()));
    }

    let head_tracked = repo.head_tracked()?;
    let other_tracked = repo.store.get_commit(other)?.tracked;
    let split_tracked = split.primary.map(|d| repo.store.get_commit(d)).transpose()?.map(|c| c.tracked).unwrap_or_default();
    let split2_tracked = split.secondary.map(|d| repo.store.get_commit(d)).transpose()?.map(|c| c.tracked);

    let mut working_files = HashSet::new();
    for relative in crate::fs::list_working_files(&repo.working_dir, crate::repo::CONTROL_DIR_NAME)? {
        working_files.insert(relative.to_string_lossy().replace('\\', "/"));
    }
    let working_files: std::collections::BTreeSet<String> = working_files.into_iter().collect();

    let plan = merge::plan(&head_tracked, &other_tracked, &split_tracked, split2_tracked.as_ref(), &working_files);
    let (tracked, conflicted) = merge::apply(
        &repo.store,
        &repo.working_dir,
        &mut repo.record.index,
        &head_tracked,
        &other_tracked,
        &plan,
    )?;

    let message = merge::merge_commit_message(other_branch, &repo.record.refs.active_branch);
    let now = crate::time::now();
    let commit = Commit {
        parent1: Some(head),
        parent2: Some(other),
        timestamp: crate::time::format_timestamp(now),
        message,
        tracked,
    };
    let digest = repo.store.put_commit(&commit)?;
    repo.record.summaries.insert(digest, CommitSummary::new(&commit, now.timestamp()));
    repo.record.refs.advance_active_branch(digest);
    repo.record.index.clear();
    repo.save()?;

    if conflicted {
        Ok(Some(MERGE_CONFLICT.to_owned()))
    } else {
        Ok(None)
    }
}

/// Shared by the fast-forward branch of `merge` and plain `checkout
/// <branch>`: already past the hazard/ancestry checks, just migrate.
fn cmd_checkout_branch_force(repo: &mut Repository, branch: &str) -> RitResult<()> {
    let from = repo.head_tracked()?;
    let target = repo.record.refs.branches[branch];
    let to = repo.store.get_commit(target)?.tracked;
    let plan = checkout::plan_migration(&from, &to);
    checkout::apply_migration(&repo.store, &repo.working_dir, &plan)?;
    repo.record.index.clear();
    repo.record.refs.switch_active_branch(branch);
    repo.save()?;
    Ok(())
}

/// `add-remote <name> <path>`.
pub fn cmd_add_remote(repo: &mut Repository, name: &str, path: &str) -> RitResult<Option<String>> {
    if repo.record.refs.remotes.contains_key(name) {
        return Ok(Some(REMOTE_ALREADY_EXISTS.to_owned()));
    }
    let normalized = path.replace('/', &std::path::MAIN_SEPARATOR.to_string());
    repo.record.refs.remotes.insert(name.to_owned(), normalized.into());
    repo.save()?;
    Ok(None)
}

/// `rm-remote <name>`.
pub fn cmd_rm_remote(repo: &mut Repository, name: &str) -> RitResult<Option<String>> {
    if repo.record.refs.remotes.remove(name).is_none() {
        return Ok(Some(REMOTE_NAME_MISSING.to_owned()));
    }
    repo.save()?;
    Ok(None)
}

/// `push <remoteName> <remoteBranch>`.
pub fn cmd_push(repo: &mut Repository, remote_name: &str, branch: &str) -> RitResult<Option<String>> {
    let Some(remote_path) = repo.remote_path(remote_name) else {
        return Ok(Some(REMOTE_NAME_MISSING.to_owned()));
    };
    let Some(mut remote_repo) = Repository::load(remote_path)? else {
        return Ok(Some(REMOTE_DIR_NOT_FOUND.to_owned()));
    };

    let remote_tip = remote_repo.record.refs.branches.get(branch).copied().unwrap_or(remote_repo.record.refs.head);
    let local_ancestors = graph::reachable_all(&repo.record.summaries, repo.record.refs.head);
    if !local_ancestors.contains(&remote_tip) {
        return Ok(Some(PLEASE_PULL_FIRST.to_owned()));
    }

    copy_chain_into(
        &repo.store,
        &repo.record.summaries,
        &remote_repo.store,
        &mut remote_repo.record.summaries,
        repo.record.refs.head,
        Some(remote_tip),
    )?;
    remote_reset_branch(&mut remote_repo, branch, repo.record.refs.head)?;
    remote_repo.save()?;
    Ok(None)
}

/// `fetch <remoteName> <remoteBranch>`.
pub fn cmd_fetch(repo: &mut Repository, remote_name: &str, branch: &str) -> RitResult<Option<String>> {
    let Some(remote_path) = repo.remote_path(remote_name) else {
        return Ok(Some(REMOTE_NAME_MISSING.to_owned()));
    };
    let Some(remote_repo) = Repository::load(remote_path)? else {
        return Ok(Some(REMOTE_DIR_NOT_FOUND.to_owned()));
    };
    let Some(&remote_tip) = remote_repo.record.refs.branches.get(branch) else {
        return Ok(Some(REMOTE_BRANCH_MISSING.to_owned()));
    };

    copy_chain_into(
        &remote_repo.store,
        &remote_repo.record.summaries,
        &repo.store,
        &mut repo.record.summaries,
        remote_tip,
        None,
    )?;
    let local_branch_name = format!("{}/{}", remote_name, branch);
    repo.record.refs.branches.insert(local_branch_name, remote_tip);
    repo.save()?;
    Ok(None)
}

/// `pull <remoteName> <remoteBranch>`: fetch, then merge `remote/branch`.
pub fn cmd_pull(repo: &mut Repository, remote_name: &str, branch: &str) -> RitResult<Option<String>> {
    if let Some(message) = cmd_fetch(repo, remote_name, branch)? {
        return Ok(Some(message));
    }
    let local_branch_name = format!("{}/{}", remote_name, branch);
    cmd_merge(repo, &local_branch_name)
}

/// Copies every commit (and its blobs) on `tip`'s first-parent chain from
/// `from` into `to`, stopping before `stop_before` if given. Already-present
/// commits are skipped, so re-running (as `push`/`fetch` retries do) is
/// idempotent.
fn copy_chain_into(
    from: &crate::store::ObjectStore,
    from_summaries: &Summaries,
    to: &crate::store::ObjectStore,
    to_summaries: &mut Summaries,
    tip: Digest,
    stop_before: Option<Digest>,
) -> RitResult<()> {
    let mut chain = Vec::new();
    let mut seen = HashSet::new();
    let mut current = Some(tip);
    while let Some(digest) = current {
        if Some(digest) == stop_before || !seen.insert(digest) {
            break;
        }
        chain.push(digest);
        current = from_summaries.get(&digest).and_then(|s| s.parent1);
    }

    for digest in chain {
        if !to.has(ObjectKind::Commit, digest) {
            let commit = from.get_commit(digest)?;
            for blob_digest in commit.tracked.values() {
                if !to.has(ObjectKind::Blob, *blob_digest) {
                    let blob = from.get_blob(*blob_digest)?;
                    to.put_blob(&blob)?;
                }
            }
            to.put_commit(&commit)?;
        }
        if let Some(summary) = from_summaries.get(&digest) {
            to_summaries.entry(digest).or_insert_with(|| summary.clone());
        }
    }
    Ok(())
}

/// Advances `branch` on a remote repository to `target`, reconciling its
/// working directory too when `branch` happens to be the remote's active
/// branch -- remotes here are plain directories with working trees, not
/// bare repositories.
fn remote_reset_branch(remote_repo: &mut Repository, branch: &str, target: Digest) -> RitResult<()> {
    if branch == remote_repo.record.refs.active_branch {
        let from = remote_repo.head_tracked()?;
        let to = remote_repo.store.get_commit(target)?.tracked;
        let plan = checkout::plan_migration(&from, &to);
        checkout::apply_migration(&remote_repo.store, &remote_repo.working_dir, &plan)?;
        remote_repo.record.index.clear();
        remote_repo.record.refs.head = target;
    }
    remote_repo.record.refs.branches.insert(branch.to_owned(), target);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::{InitOutcome, Repository};

    fn init_repo() -> (tempfile::TempDir, Repository) {
        let dir = tempfile::tempdir().unwrap();
        let repo = match Repository::init(dir.path().to_path_buf()).unwrap() {
            InitOutcome::Created(repo) => repo,
            InitOutcome::AlreadyExists => unreachable!(),
        };
        (dir, repo)
    }

    #[test]
    fn commit_with_empty_index_reports_nothing_to_commit() {
        let (_dir, mut repo) = init_repo();
        let out = cmd_commit(&mut repo, "x").unwrap();
        assert_eq!(out, Some(NOTHING_TO_COMMIT.to_owned()));
    }

    #[test]
    fn empty_commit_message_is_rejected_before_checking_index() {
        let (dir, mut repo) = init_repo();
        std::fs::write(dir.path().join("wug.txt"), b"hello\n").unwrap();
        cmd_add(&mut repo, "wug.txt").unwrap();
        let out = cmd_commit(&mut repo, "").unwrap();
        assert_eq!(out, Some(EMPTY_COMMIT_MESSAGE.to_owned()));
    }

    #[test]
    fn whitespace_only_commit_message_is_accepted() {
        let (dir, mut repo) = init_repo();
        std::fs::write(dir.path().join("wug.txt"), b"hello\n").unwrap();
        cmd_add(&mut repo, "wug.txt").unwrap();
        let out = cmd_commit(&mut repo, "   ").unwrap();
        assert_eq!(out, None);
    }

    #[test]
    fn add_commit_rm_cycle_matches_contract() {
        let (dir, mut repo) = init_repo();
        std::fs::write(dir.path().join("wug.txt"), b"hello\n").unwrap();
        assert_eq!(cmd_add(&mut repo, "wug.txt").unwrap(), None);
        assert_eq!(cmd_commit(&mut repo, "added wug").unwrap(), None);
        assert_eq!(cmd_rm(&mut repo, "wug.txt").unwrap(), None);

        let rendered = cmd_status(&repo).unwrap();
        assert!(rendered.contains("=== Removed Files ===\nwug.txt\n"));
        assert!(!dir.path().join("wug.txt").exists());

        assert_eq!(cmd_commit(&mut repo, "removed wug").unwrap(), None);
        let log = cmd_log(&repo);
        assert_eq!(log.matches("===").count(), 3);
    }

    #[test]
    fn checkout_restores_old_version() {
        let (dir, mut repo) = init_repo();
        std::fs::write(dir.path().join("wug.txt"), b"hello\n").unwrap();
        cmd_add(&mut repo, "wug.txt").unwrap();
        cmd_commit(&mut repo, "added wug").unwrap();
        let first_commit = repo.record.refs.head;

        std::fs::write(dir.path().join("wug.txt"), b"goodbye\n").unwrap();
        cmd_add(&mut repo, "wug.txt").unwrap();
        cmd_commit(&mut repo, "changed").unwrap();

        cmd_checkout_file(&repo, "wug.txt").unwrap();
        assert_eq!(std::fs::read(dir.path().join("wug.txt")).unwrap(), b"goodbye\n");

        cmd_checkout_commit_file(&repo, &first_commit.to_hex(), "wug.txt").unwrap();
        assert_eq!(std::fs::read(dir.path().join("wug.txt")).unwrap(), b"hello\n");
    }

    #[test]
    fn branch_and_fast_forward_merge() {
        let (dir, mut repo) = init_repo();
        std::fs::write(dir.path().join("a.txt"), b"A").unwrap();
        cmd_add(&mut repo, "a.txt").unwrap();
        cmd_commit(&mut repo, "a").unwrap();

        cmd_branch(&mut repo, "side").unwrap();
        cmd_checkout_branch(&mut repo, "side").unwrap();
        std::fs::write(dir.path().join("b.txt"), b"B").unwrap();
        cmd_add(&mut repo, "b.txt").unwrap();
        cmd_commit(&mut repo, "b").unwrap();

        cmd_checkout_branch(&mut repo, "master").unwrap();
        let out = cmd_merge(&mut repo, "side").unwrap();
        assert_eq!(out, Some(FAST_FORWARDED.to_owned()));
        assert_eq!(std::fs::read(dir.path().join("a.txt")).unwrap(), b"A");
        assert_eq!(std::fs::read(dir.path().join("b.txt")).unwrap(), b"B");
        assert_eq!(repo.record.refs.branches["master"], repo.record.refs.branches["side"]);
    }

    #[test]
    fn conflicting_merge_emits_conflict_markers_and_two_parents() {
        let (dir, mut repo) = init_repo();
        std::fs::write(dir.path().join("f"), b"1").unwrap();
        cmd_add(&mut repo, "f").unwrap();
        cmd_commit(&mut repo, "c0").unwrap();

        cmd_branch(&mut repo, "other").unwrap();

        std::fs::write(dir.path().join("f"), b"2").unwrap();
        cmd_add(&mut repo, "f").unwrap();
        cmd_commit(&mut repo, "c1").unwrap();

        cmd_checkout_branch(&mut repo, "other").unwrap();
        std::fs::write(dir.path().join("f"), b"3").unwrap();
        cmd_add(&mut repo, "f").unwrap();
        cmd_commit(&mut repo, "c2").unwrap();

        cmd_checkout_branch(&mut repo, "master").unwrap();
        let out = cmd_merge(&mut repo, "other").unwrap();
        assert_eq!(out, Some(MERGE_CONFLICT.to_owned()));
        assert_eq!(std::fs::read(dir.path().join("f")).unwrap(), b"<<<<<<< HEAD\n2=======\n3>>>>>>>\n");

        let head_commit = repo.head_commit().unwrap();
        assert!(head_commit.is_merge());
    }

    #[test]
    fn untracked_file_blocks_checkout() {
        let (dir, mut repo) = init_repo();
        std::fs::write(dir.path().join("a.txt"), b"A").unwrap();
        cmd_add(&mut repo, "a.txt").unwrap();
        cmd_commit(&mut repo, "a").unwrap();
        cmd_branch(&mut repo, "side").unwrap();
        cmd_checkout_branch(&mut repo, "side").unwrap();

        std::fs::write(dir.path().join("u.txt"), b"U").unwrap();
        let out = cmd_checkout_branch(&mut repo, "master").unwrap();
        assert_eq!(out, Some(checkout::HAZARD_MESSAGE.to_owned()));
        assert_eq!(repo.record.refs.active_branch, "side");
    }

    #[test]
    fn rm_branch_refuses_to_remove_active_branch() {
        let (_dir, mut repo) = init_repo();
        let out = cmd_rm_branch(&mut repo, "master").unwrap();
        assert_eq!(out, Some(CANNOT_REMOVE_CURRENT_BRANCH.to_owned()));
    }

    #[test]
    fn push_then_fetch_round_trips_commits() {
        let (local_dir, mut local) = init_repo();
        std::fs::write(local_dir.path().join("a.txt"), b"A").unwrap();
        cmd_add(&mut local, "a.txt").unwrap();
        cmd_commit(&mut local, "a").unwrap();

        let remote_dir = tempfile::tempdir().unwrap();
        let remote = match Repository::init(remote_dir.path().to_path_buf()).unwrap() {
            InitOutcome::Created(repo) => repo,
            InitOutcome::AlreadyExists => unreachable!(),
        };
        drop(remote);

        cmd_add_remote(&mut local, "origin", &remote_dir.path().to_string_lossy()).unwrap();
        let out = cmd_push(&mut local, "origin", "master").unwrap();
        assert_eq!(out, None);

        let remote_after = Repository::load(remote_dir.path().to_path_buf()).unwrap().unwrap();
        assert_eq!(remote_after.record.refs.head, local.record.refs.head);
        assert_eq!(std::fs::read(remote_dir.path().join("a.txt")).unwrap(), b"A");
    }
}
