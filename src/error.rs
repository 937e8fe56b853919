use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("io failure at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("bundle has no assets matching {pattern}")]
    MissingAsset { pattern: String },
    #[error("malformed document {}: {reason}", path.display())]
    MalformedDocument { path: PathBuf, reason: String },
    #[error("unsupported selector: {selector}")]
    InvalidSelector { selector: String },
    #[error("project locked by another installer: {}", path.display())]
    ProjectLocked { path: PathBuf },
}

impl InstallError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn malformed(path: &Path, reason: impl Into<String>) -> Self {
        Self::MalformedDocument {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}
