use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::error::InstallError;

/// Replace `path` with `bytes` via a sibling temp file, so readers never see a torn file.
/// An existing file keeps its permissions; a new one gets 0644 on unix.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), InstallError> {
    let parent = path.parent().ok_or_else(|| {
        InstallError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no parent"),
        )
    })?;
    fs::create_dir_all(parent).map_err(|err| InstallError::io(parent, err))?;

    let existing_perms = fs::metadata(path).ok().map(|meta| meta.permissions());

    let mut temp = NamedTempFile::new_in(parent).map_err(|err| InstallError::io(parent, err))?;
    temp.write_all(bytes)
        .map_err(|err| InstallError::io(path, err))?;
    temp.flush().map_err(|err| InstallError::io(path, err))?;

    match existing_perms {
        Some(perms) => temp
            .as_file()
            .set_permissions(perms)
            .map_err(|err| InstallError::io(path, err))?,
        None => set_default_mode(temp.as_file()).map_err(|err| InstallError::io(path, err))?,
    }

    temp.persist(path)
        .map_err(|err| InstallError::io(path, err.error))?;
    Ok(())
}

#[cfg(unix)]
fn set_default_mode(file: &fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_default_mode(_file: &fs::File) -> std::io::Result<()> {
    Ok(())
}
