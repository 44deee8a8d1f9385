//! The commit DAG and the walks the rest of the crate needs: a linear
//! first-parent walk (log), a full ancestor closure (reachable set), and
//! split-point search for merge.
//!
//! The DAG is acyclic by construction, but every walk here still carries an
//! explicit seen-set rather than trusting that -- a malformed or hand-edited
//! repository should never be able to hang a traversal.

use crate::hash::Digest;
use crate::obj::CommitSummary;
use std::collections::{BTreeMap, HashSet};

pub type Summaries = BTreeMap<Digest, CommitSummary>;

/// Follows `parent1` from `start` until there's no parent left. Used by
/// `log`.
pub fn first_parent_walk(summaries: &Summaries, start: Digest) -> Vec<Digest> {
    let mut walk = Vec::new();
    let mut seen = HashSet::new();
    let mut current = Some(start);
    while let Some(digest) = current {
        if !seen.insert(digest) {
            break;
        }
        walk.push(digest);
        current = summaries.get(&digest).and_then(|s| s.parent1);
    }
    walk
}

/// The full set of ancestors reachable from `start`, following both
/// `parent1` and `parent2` transitively (`start` itself is included).
pub fn reachable_all(summaries: &Summaries, start: Digest) -> HashSet<Digest> {
    log::trace!("reachable_all: start={}", start);
    let mut seen = HashSet::new();
    let mut stack = vec![start];
    while let Some(digest) = stack.pop() {
        if !seen.insert(digest) {
            continue;
        }
        if let Some(summary) = summaries.get(&digest) {
            stack.extend(summary.parent1);
            stack.extend(summary.parent2);
        }
    }
    log::trace!("reachable_all: start={} found {} ancestors", start, seen.len());
    seen
}

/// Walks `B` via `parent1`, returning the first digest that's a member of
/// `ancestors`, or `None` if no such commit exists.
fn first_common_along_parent1_chain(
    summaries: &Summaries,
    start: Digest,
    ancestors: &HashSet<Digest>,
) -> Option<Digest> {
    let mut seen = HashSet::new();
    let mut current = Some(start);
    while let Some(digest) = current {
        if ancestors.contains(&digest) {
            return Some(digest);
        }
        if !seen.insert(digest) {
            return None;
        }
        current = summaries.get(&digest).and_then(|s| s.parent1);
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitPoint {
    /// The primary split point: the first commit on `B`'s `parent1` chain
    /// that also lies on `A`'s `parent1` chain (§4.E's literal algorithm --
    /// `A`'s full ancestor closure is deliberately not used here, since that
    /// would let a merge commit's second parent leak into the primary
    /// split point).
    pub primary: Option<Digest>,
    /// The secondary split point, present only when `A` itself has a
    /// second parent (the "octopus" case, §4.G). This is a documented
    /// heuristic, not a true lowest-common-ancestor over a multi-parent
    /// DAG: it only considers the ancestry of `A`'s second parent, not a
    /// full symmetric BFS from both tips. See DESIGN.md.
    pub secondary: Option<Digest>,
}

/// Computes the split point(s) used by the merge engine for the current
/// branch tip `a` and the other branch tip `b`.
pub fn split_point(summaries: &Summaries, a: Digest, b: Digest) -> SplitPoint {
    log::trace!("split_point: a={} b={}", a, b);
    let ancestors_of_a: HashSet<Digest> = first_parent_walk(summaries, a).into_iter().collect();
    let primary = first_common_along_parent1_chain(summaries, b, &ancestors_of_a);

    let secondary = summaries.get(&a).and_then(|s| s.parent2).map(|p2| {
        let ancestors_of_p2 = reachable_all(summaries, p2);
        first_common_along_parent1_chain(summaries, b, &ancestors_of_p2)
    }).flatten();

    log::debug!("split_point: primary={:?} secondary={:?}", primary, secondary);
    SplitPoint { primary, secondary }
}

/// Orders every known commit newest-first for `global-log`/`find`, where
/// there's no single chain to walk. Ties (two commits with the same
/// timestamp, possible since resolution is whole seconds) break on digest so
/// the order is reproducible rather than dependent on map iteration.
pub fn sorted_by_recency(summaries: &Summaries) -> Vec<Digest> {
    let mut digests: Vec<Digest> = summaries.keys().copied().collect();
    digests.sort_by(|a, b| {
        let sa = &summaries[a];
        let sb = &summaries[b];
        sb.epoch_seconds.cmp(&sa.epoch_seconds).then_with(|| b.cmp(a))
    });
    digests
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash_bytes;

    fn summary(parent1: Option<Digest>, parent2: Option<Digest>, msg: &str) -> CommitSummary {
        CommitSummary { parent1, parent2, timestamp: "t".into(), message: msg.into(), epoch_seconds: 0 }
    }

    #[test]
    fn first_parent_walk_is_linear() {
        let c0 = hash_bytes(b"c0");
        let c1 = hash_bytes(b"c1");
        let c2 = hash_bytes(b"c2");
        let mut summaries = Summaries::new();
        summaries.insert(c0, summary(None, None, "c0"));
        summaries.insert(c1, summary(Some(c0), None, "c1"));
        summaries.insert(c2, summary(Some(c1), None, "c2"));
        assert_eq!(first_parent_walk(&summaries, c2), vec![c2, c1, c0]);
    }

    #[test]
    fn split_point_on_diverging_branches() {
        // c0 -- c1(master) -- c2(master)
        //   \-- c1'(other)
        let c0 = hash_bytes(b"c0");
        let c1 = hash_bytes(b"c1");
        let c2 = hash_bytes(b"c2");
        let c1p = hash_bytes(b"c1prime");
        let mut summaries = Summaries::new();
        summaries.insert(c0, summary(None, None, "c0"));
        summaries.insert(c1, summary(Some(c0), None, "c1"));
        summaries.insert(c2, summary(Some(c1), None, "c2"));
        summaries.insert(c1p, summary(Some(c0), None, "c1prime"));

        let sp = split_point(&summaries, c2, c1p);
        assert_eq!(sp.primary, Some(c0));
        assert_eq!(sp.secondary, None);
    }

    #[test]
    fn split_point_is_none_for_unrelated_histories() {
        let a = hash_bytes(b"a");
        let b = hash_bytes(b"b");
        let mut summaries = Summaries::new();
        summaries.insert(a, summary(None, None, "a"));
        summaries.insert(b, summary(None, None, "b"));
        let sp = split_point(&summaries, a, b);
        assert_eq!(sp.primary, None);
    }

    #[test]
    fn sorted_by_recency_is_newest_first_with_digest_tiebreak() {
        let c0 = hash_bytes(b"c0");
        let c1 = hash_bytes(b"c1");
        let mut summaries = Summaries::new();
        let mut s0 = summary(None, None, "c0");
        s0.epoch_seconds = 100;
        let mut s1 = summary(None, None, "c1");
        s1.epoch_seconds = 200;
        summaries.insert(c0, s0);
        summaries.insert(c1, s1);
        assert_eq!(sorted_by_recency(&summaries), vec![c1, c0]);
    }

    #[test]
    fn split_point_secondary_follows_heads_second_parent() {
        // c0 -- c1p -- head (parent2 = m3, from an unrelated root r2)
        //              r2 -- m3 -- other
        // head's parent1 chain never touches m3/r2, so the primary split
        // point must be None; the secondary pass (head's second parent
        // only) must still find m3.
        let c0 = hash_bytes(b"c0");
        let c1p = hash_bytes(b"c1p");
        let r2 = hash_bytes(b"r2");
        let m3 = hash_bytes(b"m3");
        let head = hash_bytes(b"head");
        let other = hash_bytes(b"other");

        let mut summaries = Summaries::new();
        summaries.insert(c0, summary(None, None, "c0"));
        summaries.insert(c1p, summary(Some(c0), None, "c1p"));
        summaries.insert(r2, summary(None, None, "r2"));
        summaries.insert(m3, summary(Some(r2), None, "m3"));
        summaries.insert(head, summary(Some(c1p), Some(m3), "merge"));
        summaries.insert(other, summary(Some(m3), None, "other"));

        let sp = split_point(&summaries, head, other);
        assert_eq!(sp.primary, None);
        assert_eq!(sp.secondary, Some(m3));
    }

    #[test]
    fn reachable_all_guards_against_cycles() {
        // malformed: c0 -> c1 -> c0 (should never happen, but must not hang)
        let c0 = hash_bytes(b"c0");
        let c1 = hash_bytes(b"c1");
        let mut summaries = Summaries::new();
        summaries.insert(c0, summary(Some(c1), None, "c0"));
        summaries.insert(c1, summary(Some(c0), None, "c1"));
        let set = reachable_all(&summaries, c0);
        assert_eq!(set.len(), 2);
    }
}
