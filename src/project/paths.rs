use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_WEBAPP_DIR: &str = "src/main/webapp";
pub const LOCK_FILE: &str = ".tbootstrap.lock";

#[derive(Debug, Clone)]
pub struct ProjectPaths {
    pub root: PathBuf,
    /// Web root relative to `root`.
    pub webapp_rel: PathBuf,
    pub webapp_dir: PathBuf,
}

impl ProjectPaths {
    pub fn new(root: impl Into<PathBuf>, webapp_rel: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let webapp_rel = webapp_rel.into();
        Self {
            webapp_dir: root.join(&webapp_rel),
            root,
            webapp_rel,
        }
    }

    pub fn webapp(&self, rel: &str) -> PathBuf {
        self.webapp_dir.join(rel)
    }

    /// `rel` under the web root, expressed relative to the project root.
    pub fn webapp_relative(&self, rel: &str) -> PathBuf {
        self.webapp_rel.join(rel)
    }
}

fn root_from_inputs(cli: Option<&Path>, env_root: Option<&str>, cwd: PathBuf) -> PathBuf {
    if let Some(path) = cli {
        return path.to_path_buf();
    }
    match env_root {
        Some(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => cwd,
    }
}

pub fn resolve_project_root(cli: Option<&Path>) -> Result<PathBuf> {
    let env_root = env::var("TBOOTSTRAP_PROJECT").ok();
    let cwd = env::current_dir().context("failed to resolve current working directory")?;
    Ok(root_from_inputs(cli, env_root.as_deref(), cwd))
}
