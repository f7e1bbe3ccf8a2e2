//! Collision-free file creation.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Atomically creates `{stem}.{ext}` in `dir`, falling back to
/// `{stem}_1.{ext}`, `{stem}_2.{ext}`, ... when a name is taken.
///
/// The name is claimed with `create_new`, so concurrent callers never share a
/// file.
pub fn create_unique(dir: &Path, stem: &str, ext: &str) -> io::Result<(PathBuf, File)> {
    let mut path = dir.join(format!("{stem}.{ext}"));
    let mut suffix = 1u32;
    loop {
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                path = dir.join(format!("{stem}_{suffix}.{ext}"));
                suffix += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn test_create_unique_suffixes_taken_names() {
        let dir = tempfile::tempdir().unwrap();

        let (first, _) = create_unique(dir.path(), "report_x", "md").unwrap();
        let (second, _) = create_unique(dir.path(), "report_x", "md").unwrap();
        let (third, _) = create_unique(dir.path(), "report_x", "md").unwrap();

        assert!(first.ends_with("report_x.md"));
        assert!(second.ends_with("report_x_1.md"));
        assert!(third.ends_with("report_x_2.md"));
    }

    #[test]
    fn test_create_unique_under_contention() {
        let dir = tempfile::tempdir().unwrap();
        let threads = 16;
        let barrier = Arc::new(Barrier::new(threads));

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let barrier = Arc::clone(&barrier);
                let dir = dir.path().to_path_buf();
                thread::spawn(move || {
                    barrier.wait();
                    create_unique(&dir, "raw_same", "html").unwrap().0
                })
            })
            .collect();
        let paths: HashSet<PathBuf> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(paths.len(), threads);
    }

    #[test]
    fn test_create_unique_missing_dir_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = create_unique(&dir.path().join("absent"), "a", "md").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
