//! Three-way merge: file classification against the split point(s), conflict
//! marker emission, and the flat plan-then-apply execution the working-tree
//! reconciler also uses.

use crate::checkout;
use crate::hash::Digest;
use crate::index::Index;
use crate::obj::Blob;
use crate::store::ObjectStore;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeAction {
    /// No change: the active side's content (or absence) wins as-is.
    Keep,
    /// Check out the other side's content and stage it for addition.
    TakeOther,
    /// The split point tracked this file unchanged on the active side, but
    /// the other side deleted it: stage it for removal.
    Remove,
    /// Both sides changed the file (or one changed it, the other deleted
    /// it) in incompatible ways: emit conflict markers.
    Conflict,
}

/// Classifies a single file given its blob digest (if any) at the split
/// point, on the active side (HEAD), and on the other side. This is the
/// literal case analysis behind the three-way comparison table: every
/// combination of presence/absence and equality is handled explicitly
/// rather than folded into one formula, since "take other" and "keep"
/// don't mean the same thing once a side doesn't have the file at all.
fn classify(f_s: Option<Digest>, f_a: Option<Digest>, f_o: Option<Digest>) -> MergeAction {
    use MergeAction::*;
    match (f_s, f_a, f_o) {
        (None, None, None) => Keep,
        (None, None, Some(_)) => TakeOther,
        (None, Some(_), None) => Keep,
        (None, Some(a), Some(o)) => if a == o { Keep } else { Conflict },
        (Some(_), None, None) => Keep,
        (Some(s), None, Some(o)) => if o == s { Keep } else { Conflict },
        (Some(s), Some(a), None) => if a == s { Remove } else { Conflict },
        (Some(s), Some(a), Some(o)) => match (a == s, o == s) {
            (true, true) => Keep,
            (true, false) => TakeOther,
            (false, true) => Keep,
            (false, false) => if a == o { Keep } else { Conflict },
        },
    }
}

/// Combines the outcome of the primary and (when HEAD is itself a merge
/// commit) secondary split-point passes: a file takes the more assertive of
/// the two actions, with conflicts always winning so a real divergence is
/// never silently resolved by the other pass. Precedence: Conflict >
/// TakeOther > Remove > Keep.
fn combine(primary: MergeAction, secondary: Option<MergeAction>) -> MergeAction {
    use MergeAction::*;
    let rank = |a: MergeAction| match a {
        Conflict => 3,
        TakeOther => 2,
        Remove => 1,
        Keep => 0,
    };
    match secondary {
        None => primary,
        Some(s) => if rank(s) > rank(primary) { s } else { primary },
    }
}

/// Computes the merge plan: one [`MergeAction`] per candidate file name,
/// where the candidates are the union of every file tracked by HEAD, the
/// other branch tip, the split point(s), and the working directory.
pub fn plan(
    head_tracked: &BTreeMap<String, Digest>,
    other_tracked: &BTreeMap<String, Digest>,
    split_tracked: &BTreeMap<String, Digest>,
    split2_tracked: Option<&BTreeMap<String, Digest>>,
    working_files: &BTreeSet<String>,
) -> BTreeMap<String, MergeAction> {
    log::trace!("merge::plan: {} head files, {} other files", head_tracked.len(), other_tracked.len());
    let mut candidates = BTreeSet::new();
    candidates.extend(head_tracked.keys().cloned());
    candidates.extend(other_tracked.keys().cloned());
    candidates.extend(split_tracked.keys().cloned());
    candidates.extend(working_files.iter().cloned());
    if let Some(s2) = split2_tracked {
        candidates.extend(s2.keys().cloned());
    }

    let mut result = BTreeMap::new();
    for name in candidates {
        let f_a = head_tracked.get(&name).copied();
        let f_o = other_tracked.get(&name).copied();
        let f_s = split_tracked.get(&name).copied();
        let primary = classify(f_s, f_a, f_o);
        let secondary = split2_tracked.map(|s2| classify(s2.get(&name).copied(), f_a, f_o));
        result.insert(name, combine(primary, secondary));
    }
    log::debug!("merge::plan: {} candidates classified", result.len());
    result
}

/// Renders the conflict-marker file contents for a file whose active-side
/// and other-side bytes (if present) disagree.
pub fn conflict_marker(active: Option<&[u8]>, other: Option<&[u8]>) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"<<<<<<< HEAD\n");
    out.extend_from_slice(active.unwrap_or(&[]));
    out.extend_from_slice(b"=======\n");
    out.extend_from_slice(other.unwrap_or(&[]));
    out.extend_from_slice(b">>>>>>>\n");
    out
}

/// Executes a merge plan against the working directory and index, returning
/// the final file -> blob-digest tracking map for the merge commit and
/// whether any conflict fired.
pub fn apply(
    store: &ObjectStore,
    working_dir: &Path,
    index: &mut Index,
    head_tracked: &BTreeMap<String, Digest>,
    other_tracked: &BTreeMap<String, Digest>,
    plan: &BTreeMap<String, MergeAction>,
) -> crate::error::RitResult<(BTreeMap<String, Digest>, bool)> {
    log::trace!("merge::apply: {} actions", plan.len());
    let mut tracked = head_tracked.clone();
    let mut conflicted = false;

    for (name, action) in plan {
        match action {
            MergeAction::Keep => {}
            MergeAction::TakeOther => {
                let digest = other_tracked[name];
                checkout::restore_file(store, working_dir, other_tracked, name)?;
                tracked.insert(name.clone(), digest);
                index.staged_add.insert(name.clone(), digest);
                index.staged_remove.remove(name);
            }
            MergeAction::Remove => {
                crate::fs::restricted_delete(working_dir, name)?;
                tracked.remove(name);
                index.staged_remove.insert(name.clone());
                index.staged_add.remove(name);
            }
            MergeAction::Conflict => {
                conflicted = true;
                log::warn!("merge conflict on {}", name);
                let active_blob = match head_tracked.get(name) {
                    Some(d) => Some(store.get_blob(*d)?.bytes),
                    None => None,
                };
                let other_blob = match other_tracked.get(name) {
                    Some(d) => Some(store.get_blob(*d)?.bytes),
                    None => None,
                };
                let contents =
                    conflict_marker(active_blob.as_deref(), other_blob.as_deref());
                crate::fs::write_file(working_dir.join(name), &contents)?;
                let blob = Blob::new(name, contents);
                let digest = store.put_blob(&blob)?;
                tracked.insert(name.clone(), digest);
                index.staged_add.insert(name.clone(), digest);
                index.staged_remove.remove(name);
            }
        }
    }

    Ok((tracked, conflicted))
}

pub fn merge_commit_message(other_branch: &str, active_branch: &str) -> String {
    format!("Merged {} into {}.", other_branch, active_branch)
}
