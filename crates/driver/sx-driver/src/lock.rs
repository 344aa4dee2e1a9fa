//! Exclusive ownership of an output directory

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::DriverError;

/// Lock file created inside the output directory
pub const LOCK_FILE_NAME: &str = ".symdex.lock";

/// Held for the duration of a build; the lock file is removed on drop
#[derive(Debug)]
pub struct OutputLock {
    dir: PathBuf,
    path: PathBuf,
}

impl OutputLock {
    /// Create `dir` if needed and take its lock
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Locked`] if the lock file already exists and
    /// [`DriverError::Io`] if the directory or the file cannot be created.
    pub fn acquire(dir: &Path) -> Result<Self, DriverError> {
        fs::create_dir_all(dir).map_err(|err| DriverError::io(dir, err))?;

        let path = dir.join(LOCK_FILE_NAME);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                return Err(DriverError::Locked {
                    dir: dir.to_path_buf(),
                    lock: path,
                });
            }
            Err(err) => return Err(DriverError::io(path, err)),
        };

        let lock = Self {
            dir: dir.to_path_buf(),
            path,
        };
        writeln!(file, "{}", std::process::id()).map_err(|err| DriverError::io(&lock.path, err))?;
        tracing::debug!(dir = %lock.dir.display(), "acquired output directory");
        Ok(lock)
    }

    /// The locked directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Drop for OutputLock {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to release output lock");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_is_exclusive() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");

        let lock = OutputLock::acquire(&out).unwrap();
        assert!(out.join(LOCK_FILE_NAME).exists());
        assert!(matches!(OutputLock::acquire(&out), Err(DriverError::Locked { .. })));

        drop(lock);
        assert!(!out.join(LOCK_FILE_NAME).exists());
        assert!(OutputLock::acquire(&out).is_ok());
    }
}
