use glob::{MatchOptions, Pattern};
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::InstallError;

macro_rules! bundled {
    ($($path:literal),* $(,)?) => {
        &[$((
            $path,
            include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/bundle/", $path)) as &[u8],
        )),*]
    };
}

const BUNDLE: &[(&str, &[u8])] = bundled![
    "images/apple-touch-icon.png",
    "images/favicon.ico",
    "images/glyphicons-halflings-white.png",
    "images/glyphicons-halflings.png",
    "styles/bootstrap-responsive.min.css",
    "styles/bootstrap.min.css",
    "styles/standard.css",
    "WEB-INF/layouts/default.jspx",
    "WEB-INF/layouts/layouts.xml",
    "WEB-INF/views/footer.jspx",
    "WEB-INF/views/header.jspx",
    "WEB-INF/views/index.jspx",
    "WEB-INF/views/resourceNotFound.jspx",
    "WEB-INF/views/uncaughtException.jspx",
    "WEB-INF/tags/form/create.tagx",
    "WEB-INF/tags/form/find.tagx",
    "WEB-INF/tags/form/list.tagx",
    "WEB-INF/tags/form/show.tagx",
    "WEB-INF/tags/form/update.tagx",
    "WEB-INF/tags/form/fields/checkbox.tagx",
    "WEB-INF/tags/form/fields/column.tagx",
    "WEB-INF/tags/form/fields/datetime.tagx",
    "WEB-INF/tags/form/fields/display.tagx",
    "WEB-INF/tags/form/fields/input.tagx",
    "WEB-INF/tags/form/fields/select.tagx",
    "WEB-INF/tags/form/fields/table.tagx",
    "WEB-INF/tags/form/fields/textarea.tagx",
    "WEB-INF/tags/menu/category.tagx",
    "WEB-INF/tags/menu/item.tagx",
    "WEB-INF/tags/menu/menu.tagx",
    "WEB-INF/tags/util/language.tagx",
    "WEB-INF/tags/util/load-scripts.tagx",
    "WEB-INF/tags/util/pagination.tagx",
    "WEB-INF/tags/util/panel.tagx",
    "WEB-INF/tags/util/placeholder.tagx",
    "WEB-INF/tags/util/theme.tagx",
];

/// `*` never crosses a `/`, so `styles/*.*` stays flat.
const FLAT: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Read-only store of installable files addressed by `/`-separated relative paths.
pub trait AssetSource {
    fn describe(&self) -> String;

    /// Relative paths matching `pattern`, sorted.
    fn list(&self, pattern: &str) -> Result<Vec<String>, InstallError>;

    fn read(&self, path: &str) -> Result<Cow<'_, [u8]>, InstallError>;
}

fn compile_pattern(pattern: &str) -> Result<Pattern, InstallError> {
    Pattern::new(pattern)
        .map_err(|err| InstallError::InvalidArgument(format!("asset pattern {pattern}: {err}")))
}

/// Assets compiled into the binary from `assets/bundle/`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedBundle;

impl AssetSource for EmbeddedBundle {
    fn describe(&self) -> String {
        "embedded".to_string()
    }

    fn list(&self, pattern: &str) -> Result<Vec<String>, InstallError> {
        let pattern = compile_pattern(pattern)?;
        let mut out = BUNDLE
            .iter()
            .filter(|(path, _)| pattern.matches_with(path, FLAT))
            .map(|(path, _)| (*path).to_string())
            .collect::<Vec<_>>();
        out.sort();
        Ok(out)
    }

    fn read(&self, path: &str) -> Result<Cow<'_, [u8]>, InstallError> {
        BUNDLE
            .iter()
            .find(|(candidate, _)| *candidate == path)
            .map(|(_, bytes)| Cow::Borrowed(*bytes))
            .ok_or_else(|| {
                InstallError::io(
                    Path::new(path),
                    io::Error::new(io::ErrorKind::NotFound, "not in embedded bundle"),
                )
            })
    }
}

/// Assets read from a directory laid out like `assets/bundle/`.
#[derive(Debug, Clone)]
pub struct DirBundle {
    root: PathBuf,
}

impl DirBundle {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for DirBundle {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    fn list(&self, pattern: &str) -> Result<Vec<String>, InstallError> {
        compile_pattern(pattern)?;
        let root = Pattern::escape(&self.root.to_string_lossy());
        let full = format!("{}/{}", root.trim_end_matches('/'), pattern);
        let paths = glob::glob_with(&full, FLAT)
            .map_err(|err| InstallError::InvalidArgument(format!("asset pattern {full}: {err}")))?;

        let mut out = Vec::new();
        for entry in paths {
            let path = entry.map_err(|err| {
                let at = err.path().to_path_buf();
                InstallError::io(&at, io::Error::from(err))
            })?;
            if !path.is_file() {
                continue;
            }
            let Ok(rel) = path.strip_prefix(&self.root) else {
                continue;
            };
            out.push(rel.to_string_lossy().replace('\\', "/"));
        }
        out.sort();
        Ok(out)
    }

    fn read(&self, path: &str) -> Result<Cow<'_, [u8]>, InstallError> {
        let full = self.root.join(path);
        fs::read(&full)
            .map(Cow::Owned)
            .map_err(|err| InstallError::io(&full, err))
    }
}
