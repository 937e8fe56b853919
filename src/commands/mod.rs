pub mod install;
pub mod manifest;
pub mod property;
pub mod status;

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::assets::{AssetSource, DirBundle, EmbeddedBundle};
use crate::config::{Settings, load_settings};
use crate::env_loader::{DotenvLoadOutcome, load_dotenv};
use crate::project::paths::{ProjectPaths, resolve_project_root};

#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    pub command: String,
    pub ok: bool,
    pub details: Vec<String>,
    pub issues: Vec<String>,
}

impl CommandReport {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ok: true,
            details: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn detail(&mut self, text: impl Into<String>) {
        self.details.push(text.into());
    }

    pub fn issue(&mut self, text: impl Into<String>) {
        self.ok = false;
        self.issues.push(text.into());
    }
}

/// Resolved per-invocation view of the target project.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub paths: ProjectPaths,
    pub settings: Settings,
}

pub fn resolve_context(project: Option<&Path>) -> Result<ProjectContext> {
    let root = resolve_project_root(project)?;
    match load_dotenv(&root) {
        DotenvLoadOutcome::LoadedProject(path) | DotenvLoadOutcome::LoadedFallback(path) => {
            log::debug!("event=dotenv_loaded path={}", path.display());
        }
        DotenvLoadOutcome::Missing => {}
    }
    let settings = load_settings(&root)
        .with_context(|| format!("failed to load settings for {}", root.display()))?;
    let paths = ProjectPaths::new(root, &settings.webapp_dir);
    Ok(ProjectContext { paths, settings })
}

/// `--bundle` wins over `bundle_dir` from settings; otherwise the embedded bundle.
pub fn bundle_for(cli_bundle: Option<&Path>, settings: &Settings) -> Box<dyn AssetSource> {
    match cli_bundle.or(settings.bundle_dir.as_deref()) {
        Some(dir) => Box::new(DirBundle::new(dir)),
        None => Box::new(EmbeddedBundle),
    }
}
