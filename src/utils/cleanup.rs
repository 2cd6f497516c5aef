use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Remove every file in `paths`, continuing past failures.
///
/// Files that are already gone count as removed. Returns the paths that
/// could not be deleted together with the error.
pub fn remove_files<'a, I>(paths: I) -> (usize, Vec<(PathBuf, io::Error)>)
where
    I: IntoIterator<Item = &'a Path>,
{
    let mut removed = 0;
    let mut failures = Vec::new();

    for path in paths {
        match fs::remove_file(path) {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == io::ErrorKind::NotFound => removed += 1,
            Err(e) => failures.push((path.to_path_buf(), e)),
        }
    }

    (removed, failures)
}

/// Remove a directory tree if it exists.
pub fn remove_dir(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
