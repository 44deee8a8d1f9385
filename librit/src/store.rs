//! Content-addressed object store: two flat directories, `commits/` and
//! `blobs/`, each holding one file per object named after its digest.

use crate::codec::{self, Decode};
use crate::error::{RitError, RitResult};
use crate::fs;
use crate::hash::Digest;
use crate::obj::{Blob, Commit, Object};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Blob,
    Commit,
}

impl ObjectKind {
    fn dir_name(self) -> &'static str {
        match self {
            ObjectKind::Blob => "blobs",
            ObjectKind::Commit => "commits",
        }
    }
}

pub struct ObjectStore {
    root: PathBuf,
}

impl ObjectStore {
    pub fn new(control_dir: impl Into<PathBuf>) -> Self {
        Self { root: control_dir.into() }
    }

    fn dir(&self, kind: ObjectKind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    fn path(&self, kind: ObjectKind, digest: Digest) -> PathBuf {
        self.dir(kind).join(digest.to_hex())
    }

    pub fn has(&self, kind: ObjectKind, digest: Digest) -> bool {
        fs::exists(self.path(kind, digest))
    }

    pub fn put_blob(&self, blob: &Blob) -> RitResult<Digest> {
        self.put(ObjectKind::Blob, blob)
    }

    pub fn put_commit(&self, commit: &Commit) -> RitResult<Digest> {
        self.put(ObjectKind::Commit, commit)
    }

    fn put(&self, kind: ObjectKind, obj: &(impl Object + ?Sized)) -> RitResult<Digest> {
        let digest = obj.digest();
        log::trace!("put({:?}, {})", kind, digest);
        let path = self.path(kind, digest);
        if !fs::exists(&path) {
            fs::write_file(path, &codec::encode_to_vec(obj))?;
        }
        Ok(digest)
    }

    pub fn get_blob(&self, digest: Digest) -> RitResult<Blob> {
        self.get(ObjectKind::Blob, digest)
    }

    pub fn get_commit(&self, digest: Digest) -> RitResult<Commit> {
        self.get(ObjectKind::Commit, digest)
    }

    fn get<T: Decode>(&self, kind: ObjectKind, digest: Digest) -> RitResult<T> {
        log::trace!("get({:?}, {})", kind, digest);
        let path = self.path(kind, digest);
        if !fs::exists(&path) {
            log::warn!("{:?} {} missing from object store", kind, digest);
            anyhow::bail!(RitError::ObjectMissing(digest));
        }
        let bytes = fs::read_file(path)?;
        T::decode(&mut &bytes[..])
    }

    /// Resolves a (possibly abbreviated) hex prefix against the commit
    /// store. Returns `Ok(None)` when nothing matches, and a hard error on
    /// ambiguity -- matching the "reject ambiguity" policy decided for the
    /// open question on prefix resolution.
    pub fn resolve_commit_prefix(&self, prefix: &str) -> RitResult<Option<Digest>> {
        self.resolve_prefix(ObjectKind::Commit, prefix)
    }

    fn resolve_prefix(&self, kind: ObjectKind, prefix: &str) -> RitResult<Option<Digest>> {
        log::trace!("resolve_prefix({:?}, {})", kind, prefix);
        let dir = self.dir(kind);
        if !dir.exists() {
            return Ok(None);
        }
        let mut matches = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(prefix) {
                matches.push(name.parse::<Digest>()?);
            }
        }
        match matches.len() {
            0 => Ok(None),
            1 => Ok(Some(matches[0])),
            _ => {
                log::warn!("prefix {} is ambiguous: {:?}", prefix, matches);
                anyhow::bail!(RitError::AmbiguousPrefix(prefix.to_owned(), matches))
            }
        }
    }

    pub fn init_layout(&self) -> RitResult<()> {
        std::fs::create_dir_all(self.dir(ObjectKind::Blob))?;
        std::fs::create_dir_all(self.dir(ObjectKind::Commit))?;
        Ok(())
    }
}

pub fn control_dir_path(working_dir: impl AsRef<Path>, control_dir_name: &str) -> PathBuf {
    working_dir.as_ref().join(control_dir_name)
}
