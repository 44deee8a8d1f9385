//! Thin wrappers over `std::fs` and `walkdir`. These are the "external
//! collaborator" primitives the design doc calls out as out of scope for
//! the core's business logic -- kept here as a pass-through so the rest of
//! the crate never touches `std::fs` directly, without growing any
//! decision-making of its own.

use crate::error::RitResult;
use std::path::{Path, PathBuf};

pub fn read_file(path: impl AsRef<Path>) -> RitResult<Vec<u8>> {
    Ok(std::fs::read(path)?)
}

pub fn write_file(path: impl AsRef<Path>, bytes: &[u8]) -> RitResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(std::fs::write(path, bytes)?)
}

pub fn exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().exists()
}

/// Lists regular files in `dir` relative to `dir`, recursively, skipping
/// the repository's own control directory. Order is unspecified; callers
/// that need determinism sort afterwards.
pub fn list_working_files(dir: impl AsRef<Path>, control_dir_name: &str) -> RitResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(dir).into_iter().filter_entry(|e| {
        e.file_name().to_str().map(|s| s != control_dir_name).unwrap_or(true)
    }) {
        let entry = entry?;
        if entry.file_type().is_file() {
            let relative = entry.path().strip_prefix(dir).unwrap_or(entry.path());
            files.push(relative.to_path_buf());
        }
    }
    Ok(files)
}

/// Deletes a tracked file from the working directory. Refuses to operate on
/// anything outside `root` as a last-ditch guard against a caller passing
/// an absolute or `..`-escaping path by mistake.
pub fn restricted_delete(root: impl AsRef<Path>, relative: impl AsRef<Path>) -> RitResult<()> {
    let relative = relative.as_ref();
    anyhow::ensure!(
        !relative.is_absolute() && !relative.components().any(|c| c == std::path::Component::ParentDir),
        "refusing to delete outside the working directory: `{}`",
        relative.display()
    );
    let path = root.as_ref().join(relative);
    if path.exists() {
        std::fs::remove_file(&path)?;
    }
    // Clean up now-empty parent directories, mirroring how a worktree
    // checkout leaves no empty directories behind.
    let mut parent = path.parent();
    while let Some(p) = parent {
        if p == root.as_ref() {
            break;
        }
        match std::fs::read_dir(p) {
            Ok(mut entries) if entries.next().is_none() => {
                let _ = std::fs::remove_dir(p);
                parent = p.parent();
            }
            _ => break,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restricted_delete_rejects_escaping_paths() {
        let dir = tempfile::tempdir().unwrap();
        assert!(restricted_delete(dir.path(), "../evil.txt").is_err());
        assert!(restricted_delete(dir.path(), "/etc/passwd").is_err());
    }

    #[test]
    fn write_then_read_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/c.txt");
        write_file(&path, b"hi").unwrap();
        assert_eq!(read_file(&path).unwrap(), b"hi");
    }
}
