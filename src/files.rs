//! Copying, backing up, and removing installed tool directories.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Timestamp format appended to backup directory names.
const BACKUP_TIMESTAMP: &str = "%Y%m%d%H%M%S";

/// Recursively copy a directory, returning the number of files copied.
///
/// The destination is created if needed; existing files are overwritten.
pub fn copy_directory(from: &Path, to: &Path) -> Result<usize> {
    let copy_error = |source| Error::CopyFailed {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };
    fs::create_dir_all(to).map_err(copy_error)?;

    let mut copied = 0;
    for entry in WalkDir::new(from).min_depth(1).follow_links(true) {
        let entry = entry.map_err(|error| {
            copy_error(
                error
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::other("walkdir error")),
            )
        })?;
        let Ok(relative) = entry.path().strip_prefix(from) else {
            continue;
        };
        let target = to.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(copy_error)?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target).map_err(copy_error)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Return the backup location for an installed directory at the given time.
pub fn backup_path(installed: &Path, now: DateTime<Utc>) -> PathBuf {
    let mut name = installed.as_os_str().to_os_string();
    name.push(format!(".backup-{}", now.format(BACKUP_TIMESTAMP)));
    PathBuf::from(name)
}

/// Copy an installed directory to a timestamped sibling and return its path.
pub fn backup_directory(installed: &Path, now: DateTime<Utc>) -> Result<PathBuf> {
    let backup = backup_path(installed, now);
    copy_directory(installed, &backup)?;
    Ok(backup)
}

/// Remove a directory tree if it exists.
pub fn remove_directory(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(Error::RemoveFailed {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    use super::{backup_directory, backup_path, copy_directory, remove_directory};

    #[test]
    fn copies_nested_files() {
        let dir = tempdir().expect("tempdir");
        let from = dir.path().join("from");
        fs::create_dir_all(from.join("examples")).expect("mkdir");
        fs::write(from.join("prompt.yaml"), "id: a").expect("write");
        fs::write(from.join("examples/one.md"), "example").expect("write");
        fs::create_dir_all(from.join("empty")).expect("mkdir");

        let to = dir.path().join("to");
        let copied = copy_directory(&from, &to).expect("copy");
        assert_eq!(copied, 2);
        assert_eq!(fs::read_to_string(to.join("examples/one.md")).expect("read"), "example");
        assert!(to.join("empty").is_dir());
    }

    #[test]
    fn names_backups_with_timestamp() {
        let now = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).single().expect("time");
        assert_eq!(
            backup_path(&PathBuf::from("/tools/x"), now),
            PathBuf::from("/tools/x.backup-20240506070809")
        );
    }

    #[test]
    fn backs_up_and_removes() {
        let dir = tempdir().expect("tempdir");
        let installed = dir.path().join("x");
        fs::create_dir_all(&installed).expect("mkdir");
        fs::write(installed.join("prompt.yaml"), "v1").expect("write");

        let backup = backup_directory(&installed, Utc::now()).expect("backup");
        remove_directory(&installed).expect("remove");
        assert!(!installed.exists());
        assert_eq!(fs::read_to_string(backup.join("prompt.yaml")).expect("read"), "v1");

        remove_directory(&installed).expect("removing twice is fine");
    }
}
