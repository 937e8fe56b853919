use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::project::paths::DEFAULT_WEBAPP_DIR;

pub const CONFIG_FILE: &str = "tbootstrap.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub webapp_dir: String,
    pub bundle_dir: Option<PathBuf>,
    pub lock: bool,
    pub audit_log: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            webapp_dir: DEFAULT_WEBAPP_DIR.to_string(),
            bundle_dir: None,
            lock: false,
            audit_log: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PartialSettings {
    webapp_dir: Option<String>,
    bundle_dir: Option<PathBuf>,
    lock: Option<bool>,
    audit_log: Option<PathBuf>,
}

fn env_or_bool(var: &str, fallback: bool) -> bool {
    match env::var(var) {
        Ok(v) => match v.trim() {
            "1" | "true" | "TRUE" | "yes" | "on" => true,
            "0" | "false" | "FALSE" | "no" | "off" => false,
            _ => fallback,
        },
        Err(_) => fallback,
    }
}

fn env_path(var: &str) -> Option<PathBuf> {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => Some(PathBuf::from(v.trim())),
        _ => None,
    }
}

fn anchored(root: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        root.join(path)
    }
}

pub fn resolve_config_path(project_root: &Path) -> Option<PathBuf> {
    if let Some(custom) = env_path("TBOOTSTRAP_CONFIG_PATH") {
        return Some(custom);
    }

    let local = project_root.join(CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }

    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("tbootstrap").join(CONFIG_FILE))
}

fn merge_file_settings(base: &mut Settings, raw: &str, path: &Path) -> Result<()> {
    let parsed: PartialSettings = toml::from_str(raw)
        .map_err(|err| anyhow!("failed to parse config {}: {err}", path.display()))?;
    if let Some(webapp_dir) = parsed.webapp_dir {
        base.webapp_dir = webapp_dir;
    }
    if parsed.bundle_dir.is_some() {
        base.bundle_dir = parsed.bundle_dir;
    }
    if let Some(lock) = parsed.lock {
        base.lock = lock;
    }
    if parsed.audit_log.is_some() {
        base.audit_log = parsed.audit_log;
    }
    Ok(())
}

fn validate(settings: &Settings) -> Result<()> {
    let webapp = settings.webapp_dir.trim();
    if webapp.is_empty() {
        return Err(anyhow!("invalid webapp_dir: cannot be empty"));
    }
    if Path::new(webapp).is_absolute() {
        return Err(anyhow!(
            "invalid webapp_dir: must be relative to the project root"
        ));
    }
    if Path::new(webapp)
        .components()
        .any(|c| matches!(c, std::path::Component::ParentDir))
    {
        return Err(anyhow!("invalid webapp_dir: must stay inside the project"));
    }
    Ok(())
}

/// Defaults, then the config file, then `TBOOTSTRAP_*` environment overrides.
pub fn load_settings(project_root: &Path) -> Result<Settings> {
    let mut settings = Settings::default();

    if let Some(path) = resolve_config_path(project_root)
        && path.exists()
    {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed reading {}", path.display()))?;
        merge_file_settings(&mut settings, &raw, &path)?;
        log::debug!("event=config_loaded path={}", path.display());
    }

    if let Ok(webapp_dir) = env::var("TBOOTSTRAP_WEBAPP_DIR")
        && !webapp_dir.trim().is_empty()
    {
        settings.webapp_dir = webapp_dir.trim().to_string();
    }
    if let Some(bundle_dir) = env_path("TBOOTSTRAP_BUNDLE_DIR") {
        settings.bundle_dir = Some(bundle_dir);
    }
    if let Some(audit_log) = env_path("TBOOTSTRAP_AUDIT_LOG") {
        settings.audit_log = Some(audit_log);
    }
    settings.lock = env_or_bool("TBOOTSTRAP_LOCK", settings.lock);

    settings.bundle_dir = settings
        .bundle_dir
        .map(|path| anchored(project_root, path));
    settings.audit_log = settings
        .audit_log
        .map(|path| anchored(project_root, path));

    validate(&settings)?;
    Ok(settings)
}
