use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::InstallError;

/// Exclusive advisory lock on a project root, released on drop.
#[derive(Debug)]
pub struct ProjectLock {
    file: File,
    path: PathBuf,
}

impl ProjectLock {
    pub fn acquire(path: &Path) -> Result<Self, InstallError> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)
            .map_err(|err| InstallError::io(path, err))?;
        if FileExt::try_lock_exclusive(&file).is_err() {
            return Err(InstallError::ProjectLocked {
                path: path.to_path_buf(),
            });
        }
        log::debug!("event=lock_acquired path={}", path.display());
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ProjectLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
mod tests {
    use super::ProjectLock;
    use crate::error::InstallError;
    use tempfile::tempdir;

    #[test]
    fn second_acquire_fails_while_held() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join(".tbootstrap.lock");
        let held = ProjectLock::acquire(&path).expect("first lock");
        assert_eq!(held.path(), path.as_path());

        let err = ProjectLock::acquire(&path).expect_err("second lock must fail");
        assert!(matches!(err, InstallError::ProjectLocked { .. }));

        drop(held);
        ProjectLock::acquire(&path).expect("lock after release");
    }
}
