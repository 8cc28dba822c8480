//! Replace-on-write file output

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

/// Write `contents` to `path` without ever leaving a truncated file behind.
///
/// Data goes to a temporary file in the destination directory, is synced, and
/// is then renamed over `path`.
pub fn write_atomic(path: impl AsRef<Path>, contents: &[u8]) -> crate::Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| crate::Error::Io(e.error))?;

    tracing::debug!(path = %path.display(), bytes = contents.len(), "Wrote file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_atomic_replaces_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.bin");

        write_atomic(&path, b"first version").unwrap();
        write_atomic(&path, b"v2").unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"v2");
        // No temporaries left next to the target
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_atomic_missing_dir_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.bin");
        assert!(write_atomic(&path, b"data").is_err());
        assert!(!path.exists());
    }
}
