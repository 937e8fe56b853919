use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::PathBuf;

use crate::assets::AssetSource;
use crate::error::InstallError;
use crate::project::paths::ProjectPaths;

/// Bundle directories installed by `tbootstrap install`, in order. Each is
/// copied flat, so nested tag directories get their own entry.
const BOOTSTRAP_DIRS: [&str; 8] = [
    "images",
    "styles",
    "WEB-INF/layouts",
    "WEB-INF/views",
    "WEB-INF/tags/form",
    "WEB-INF/tags/form/fields",
    "WEB-INF/tags/menu",
    "WEB-INF/tags/util",
];

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ManifestEntry {
    pub source_pattern: String,
    /// Relative to the project root.
    pub destination: PathBuf,
    pub overwrite: bool,
}

impl ManifestEntry {
    pub fn new(source_pattern: impl Into<String>, destination: impl Into<PathBuf>, overwrite: bool) -> Self {
        Self {
            source_pattern: source_pattern.into(),
            destination: destination.into(),
            overwrite,
        }
    }
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct AssetManifest {
    entries: Vec<ManifestEntry>,
}

impl AssetManifest {
    pub fn bootstrap(paths: &ProjectPaths) -> Self {
        let entries = BOOTSTRAP_DIRS
            .iter()
            .map(|dir| ManifestEntry::new(format!("{dir}/*.*"), paths.webapp_relative(dir), true))
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// SHA-256 over every file the manifest would install, path then bytes.
    pub fn digest(&self, source: &dyn AssetSource) -> Result<String, InstallError> {
        let mut hasher = Sha256::new();
        for entry in &self.entries {
            for rel in source.list(&entry.source_pattern)? {
                let bytes = source.read(&rel)?;
                hasher.update(rel.as_bytes());
                hasher.update([0u8]);
                hasher.update(&bytes);
            }
        }
        Ok(format!("{:x}", hasher.finalize()))
    }
}

#[cfg(test)]
mod tests {
    use super::AssetManifest;
    use crate::assets::{AssetSource, EmbeddedBundle};
    use crate::project::paths::ProjectPaths;
    use std::path::PathBuf;

    #[test]
    fn bootstrap_manifest_orders_parents_before_nested_tags() {
        let paths = ProjectPaths::new("/work/app", "src/main/webapp");
        let manifest = AssetManifest::bootstrap(&paths);
        let entries = manifest.entries();
        assert_eq!(entries.len(), 8);
        assert_eq!(entries[0].source_pattern, "images/*.*");
        assert_eq!(entries[0].destination, PathBuf::from("src/main/webapp/images"));
        assert_eq!(entries[4].source_pattern, "WEB-INF/tags/form/*.*");
        assert_eq!(entries[5].source_pattern, "WEB-INF/tags/form/fields/*.*");
        assert!(entries.iter().all(|entry| entry.overwrite));
    }

    #[test]
    fn every_bootstrap_entry_matches_embedded_assets() {
        let paths = ProjectPaths::new("/work/app", "src/main/webapp");
        for entry in AssetManifest::bootstrap(&paths).entries() {
            let files = EmbeddedBundle.list(&entry.source_pattern).expect("list");
            assert!(!files.is_empty(), "{} matched nothing", entry.source_pattern);
        }
    }

    #[test]
    fn digest_is_stable() {
        let paths = ProjectPaths::new("/work/app", "src/main/webapp");
        let manifest = AssetManifest::bootstrap(&paths);
        let first = manifest.digest(&EmbeddedBundle).expect("digest");
        let second = manifest.digest(&EmbeddedBundle).expect("digest");
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
    }
}
