use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DotenvLoadOutcome {
    LoadedProject(PathBuf),
    LoadedFallback(PathBuf),
    Missing,
}

fn fallback_dotenv_path(tbootstrap_home: Option<PathBuf>, home_dir: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(base) = tbootstrap_home {
        return Some(base.join(".env"));
    }
    Some(home_dir?.join(".tbootstrap/.env"))
}

/// Load `<project>/.env`, else `$TBOOTSTRAP_HOME/.env` or `~/.tbootstrap/.env`.
/// Variables already set in the process win.
pub fn load_dotenv(project_root: &Path) -> DotenvLoadOutcome {
    let local = project_root.join(".env");
    if local.is_file() && dotenvy::from_path(&local).is_ok() {
        return DotenvLoadOutcome::LoadedProject(local);
    }

    let fallback = fallback_dotenv_path(
        env::var_os("TBOOTSTRAP_HOME").map(PathBuf::from),
        dirs::home_dir(),
    );

    let Some(path) = fallback else {
        return DotenvLoadOutcome::Missing;
    };
    if path.is_file() && dotenvy::from_path(&path).is_ok() {
        return DotenvLoadOutcome::LoadedFallback(path);
    }

    DotenvLoadOutcome::Missing
}

#[cfg(test)]
mod tests {
    use super::fallback_dotenv_path;
    use std::path::PathBuf;

    #[test]
    fn fallback_prefers_tbootstrap_home() {
        let got = fallback_dotenv_path(
            Some(PathBuf::from("/opt/tbootstrap")),
            Some(PathBuf::from("/home/alice")),
        );
        assert_eq!(got, Some(PathBuf::from("/opt/tbootstrap/.env")));
    }

    #[test]
    fn fallback_uses_home_when_tbootstrap_home_unset() {
        let got = fallback_dotenv_path(None, Some(PathBuf::from("/home/alice")));
        assert_eq!(got, Some(PathBuf::from("/home/alice/.tbootstrap/.env")));
    }

    #[test]
    fn fallback_is_none_without_any_home() {
        assert_eq!(fallback_dotenv_path(None, None), None);
    }
}
