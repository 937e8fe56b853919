use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::assets::AssetSource;
use crate::error::InstallError;
use crate::install::fs_ops::write_atomic;
use crate::install::manifest::ManifestEntry;
use crate::logging::field;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyAction {
    Written,
    /// Destination already held the same bytes.
    Unchanged,
    /// Destination existed and the entry does not overwrite.
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct CopiedFile {
    pub destination: PathBuf,
    pub action: CopyAction,
}

fn file_name(rel: &str) -> &str {
    rel.rsplit('/').next().unwrap_or(rel)
}

/// Copy every bundle file matching `entry.source_pattern` into
/// `root/entry.destination`. With `dry_run` nothing is created or written.
pub fn copy_entry(
    entry: &ManifestEntry,
    source: &dyn AssetSource,
    root: &Path,
    dry_run: bool,
) -> Result<Vec<CopiedFile>, InstallError> {
    let files = source.list(&entry.source_pattern)?;
    if files.is_empty() {
        return Err(InstallError::MissingAsset {
            pattern: entry.source_pattern.clone(),
        });
    }

    let dest_dir = root.join(&entry.destination);
    if !dry_run {
        fs::create_dir_all(&dest_dir).map_err(|err| InstallError::io(&dest_dir, err))?;
    }

    let mut copied = Vec::with_capacity(files.len());
    for rel in &files {
        let destination = dest_dir.join(file_name(rel));
        let action = if destination.exists() && !entry.overwrite {
            CopyAction::Skipped
        } else {
            let bytes = source.read(rel)?;
            let same = fs::read(&destination).is_ok_and(|current| current == bytes.as_ref());
            if same {
                CopyAction::Unchanged
            } else {
                if !dry_run {
                    write_atomic(&destination, &bytes)?;
                }
                CopyAction::Written
            }
        };
        log::debug!(
            "event=asset_copy source={} destination={} action={:?} dry_run={}",
            field(rel),
            field(&destination.display().to_string()),
            action,
            dry_run
        );
        copied.push(CopiedFile {
            destination,
            action,
        });
    }

    Ok(copied)
}
