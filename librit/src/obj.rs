//! The two content-addressable object kinds: [`Blob`] and [`Commit`].
//!
//! They share nothing but "serializable, digestable" -- modeled here as the
//! single [`Object`] trait, rather than forcing them under a common base
//! struct the way an OO design would.

use crate::codec::{self, Decode, Encode};
use crate::error::RitResult;
use crate::hash::{hash_bytes, Digest};
use std::collections::BTreeMap;
use std::io::{Read, Write};

/// A content-addressable object: knows how to turn itself into the bytes
/// its digest is computed over.
pub trait Object: Encode {
    fn digest(&self) -> Digest {
        hash_bytes(codec::encode_to_vec(self))
    }
}

/// An immutable `(file_name, bytes)` pair. Two blobs with identical bytes
/// but different names hash differently -- the name is part of what's
/// hashed, by design.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Blob {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), bytes }
    }
}

impl Encode for Blob {
    fn encode(&self, w: &mut dyn Write) -> std::io::Result<()> {
        codec::write_str(w, &self.name)?;
        codec::write_bytes(w, &self.bytes)
    }
}

impl Decode for Blob {
    fn decode(r: &mut dyn Read) -> RitResult<Self> {
        let name = codec::read_string(r)?;
        let bytes = codec::read_bytes(r)?;
        Ok(Self { name, bytes })
    }
}

impl Object for Blob {}

/// An immutable commit snapshot: up to two parents, a timestamp, a message,
/// and the complete file-name -> blob-digest mapping (not a delta).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub parent1: Option<Digest>,
    pub parent2: Option<Digest>,
    /// already-formatted per `crate::time::format_timestamp`; stored as text
    /// so that a commit's digest and its displayed log entry always agree.
    pub timestamp: String,
    pub message: String,
    pub tracked: BTreeMap<String, Digest>,
}

impl Commit {
    pub fn is_merge(&self) -> bool {
        self.parent2.is_some()
    }

    pub fn is_initial(&self) -> bool {
        self.parent1.is_none()
    }
}

impl Encode for Commit {
    fn encode(&self, w: &mut dyn Write) -> std::io::Result<()> {
        match self.parent1 {
            Some(p) => {
                w.write_all(&[1])?;
                codec::write_str(w, &p.to_hex())?;
            }
            None => w.write_all(&[0])?,
        }
        match self.parent2 {
            Some(p) => {
                w.write_all(&[1])?;
                codec::write_str(w, &p.to_hex())?;
            }
            None => w.write_all(&[0])?,
        }
        codec::write_str(w, &self.timestamp)?;
        codec::write_str(w, &self.message)?;
        codec::write_u64(w, self.tracked.len() as u64)?;
        // `BTreeMap` iterates in key order, so this is already sorted by
        // name -- no extra sort needed to keep the encoding deterministic.
        for (name, digest) in &self.tracked {
            codec::write_str(w, name)?;
            codec::write_str(w, &digest.to_hex())?;
        }
        Ok(())
    }
}

impl Decode for Commit {
    fn decode(r: &mut dyn Read) -> RitResult<Self> {
        let parent1 = read_optional_digest(r)?;
        let parent2 = read_optional_digest(r)?;
        let timestamp = codec::read_string(r)?;
        let message = codec::read_string(r)?;
        let count = codec::read_u64(r)?;
        let mut tracked = BTreeMap::new();
        for _ in 0..count {
            let name = codec::read_string(r)?;
            let digest: Digest = codec::read_string(r)?.parse()?;
            tracked.insert(name, digest);
        }
        Ok(Self { parent1, parent2, timestamp, message, tracked })
    }
}

fn read_optional_digest(r: &mut dyn Read) -> RitResult<Option<Digest>> {
    let mut tag = [0u8; 1];
    r.read_exact(&mut tag)?;
    if tag[0] == 0 {
        return Ok(None);
    }
    Ok(Some(codec::read_string(r)?.parse()?))
}

impl Object for Commit {}

/// The reduced view of a commit kept inline in the control record, so that
/// `log`/`global-log`/`find`/ancestry queries don't need to touch the
/// object store at all.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CommitSummary {
    pub parent1: Option<Digest>,
    pub parent2: Option<Digest>,
    pub timestamp: String,
    pub message: String,
    /// Unix time the commit was made, kept alongside the formatted
    /// `timestamp` purely so `global-log`/`find` can sort newest-first
    /// without re-parsing the display string.
    pub epoch_seconds: i64,
}

impl CommitSummary {
    pub fn new(commit: &Commit, epoch_seconds: i64) -> Self {
        Self {
            parent1: commit.parent1,
            parent2: commit.parent2,
            timestamp: commit.timestamp.clone(),
            message: commit.message.clone(),
            epoch_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[quickcheck]
    fn blob_roundtrip_preserves_name_and_bytes(name: String, bytes: Vec<u8>) -> bool {
        let blob = Blob::new(name, bytes);
        let encoded = codec::encode_to_vec(&blob);
        Blob::decode(&mut &encoded[..]).map(|decoded| decoded == blob).unwrap_or(false)
    }

    #[quickcheck]
    fn commit_digest_is_a_pure_function_of_its_fields(message: String, file_names: Vec<String>) -> bool {
        let tracked: BTreeMap<String, Digest> =
            file_names.into_iter().map(|name| (name, hash_bytes(b"x"))).collect();
        let commit = Commit {
            parent1: None,
            parent2: None,
            timestamp: "t".to_owned(),
            message,
            tracked,
        };
        commit.digest() == commit.clone().digest()
    }

    #[test]
    fn blob_digest_depends_on_name() {
        let a = Blob::new("a.txt", b"same bytes".to_vec());
        let b = Blob::new("b.txt", b"same bytes".to_vec());
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn blob_roundtrips() {
        let blob = Blob::new("wug.txt", b"hello\n".to_vec());
        let bytes = codec::encode_to_vec(&blob);
        let decoded = Blob::decode(&mut &bytes[..]).unwrap();
        assert_eq!(blob, decoded);
    }

    #[test]
    fn commit_roundtrips_and_digest_matches() {
        let mut tracked = BTreeMap::new();
        tracked.insert("a.txt".to_owned(), hash_bytes(b"a"));
        tracked.insert("b.txt".to_owned(), hash_bytes(b"b"));
        let commit = Commit {
            parent1: Some(hash_bytes(b"parent")),
            parent2: None,
            timestamp: "Thu Jan 01 00:00:00 1970 +0000".to_owned(),
            message: "added wug".to_owned(),
            tracked,
        };
        let bytes = codec::encode_to_vec(&commit);
        let decoded = Commit::decode(&mut &bytes[..]).unwrap();
        assert_eq!(commit, decoded);
        assert_eq!(commit.digest(), decoded.digest());
    }

    #[test]
    fn identical_commits_collide() {
        let c1 = Commit {
            parent1: None,
            parent2: None,
            timestamp: "Thu Jan 01 00:00:00 1970 +0000".to_owned(),
            message: "initial commit".to_owned(),
            tracked: BTreeMap::new(),
        };
        let c2 = c1.clone();
        assert_eq!(c1.digest(), c2.digest());
    }
}
