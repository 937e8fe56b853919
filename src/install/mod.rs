pub mod copy;
pub mod fs_ops;
pub mod manifest;
pub mod xml_patch;

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::assets::AssetSource;
use crate::error::InstallError;
use crate::logging::field;
use crate::project::lock::ProjectLock;
use crate::project::paths::LOCK_FILE;
use copy::{CopiedFile, CopyAction, copy_entry};
use manifest::AssetManifest;
use xml_patch::{PatchOutcome, XmlPatchRule, patch_xml};

#[derive(Debug, Clone, Copy, Default)]
pub struct InstallOptions {
    pub dry_run: bool,
    /// Hold `.tbootstrap.lock` in the project root for the whole run.
    pub lock: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatchRecord {
    pub file: PathBuf,
    pub outcome: PatchOutcome,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct InstallOutcome {
    pub dry_run: bool,
    pub files: Vec<CopiedFile>,
    pub patches: Vec<PatchRecord>,
}

impl InstallOutcome {
    pub fn count(&self, action: CopyAction) -> usize {
        self.files.iter().filter(|f| f.action == action).count()
    }

    /// True when any asset was (or, in a dry run, would be) written.
    pub fn assets_changed(&self) -> bool {
        self.count(CopyAction::Written) > 0
    }

    pub fn changed(&self) -> bool {
        self.assets_changed()
            || self
                .patches
                .iter()
                .any(|p| p.outcome == PatchOutcome::Applied)
    }
}

/// Copy every manifest entry in order, then apply each patch rule.
///
/// Stops at the first failure; files copied before it stay in place.
pub fn install(
    manifest: &AssetManifest,
    patches: &[XmlPatchRule],
    source: &dyn AssetSource,
    root: &Path,
    opts: InstallOptions,
) -> Result<InstallOutcome, InstallError> {
    let lock = if opts.lock && !opts.dry_run {
        Some(ProjectLock::acquire(&root.join(LOCK_FILE))?)
    } else {
        None
    };
    if let Some(lock) = &lock {
        log::info!("event=lock_held path={}", field(&lock.path().display().to_string()));
    }

    log::info!(
        "event=install_start project={} source={} entries={} dry_run={}",
        field(&root.display().to_string()),
        field(&source.describe()),
        manifest.entries().len(),
        opts.dry_run
    );

    let mut outcome = InstallOutcome {
        dry_run: opts.dry_run,
        ..InstallOutcome::default()
    };
    for entry in manifest.entries() {
        let copied = copy_entry(entry, source, root, opts.dry_run)?;
        outcome.files.extend(copied);
    }

    for rule in patches {
        let result = patch_xml(root, rule, opts.dry_run)?;
        outcome.patches.push(PatchRecord {
            file: rule.file.clone(),
            outcome: result,
        });
    }

    log::info!(
        "event=install_done written={} unchanged={} skipped={} patches={}",
        outcome.count(CopyAction::Written),
        outcome.count(CopyAction::Unchanged),
        outcome.count(CopyAction::Skipped),
        outcome.patches.len()
    );
    Ok(outcome)
}
