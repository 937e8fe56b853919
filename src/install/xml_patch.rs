//! Best-effort attribute edits on XML view fragments.
//!
//! The document is streamed through `quick_xml` and written back event by
//! event, so everything outside the patched start tag keeps its original
//! bytes. The patched tag itself is re-serialized with double-quoted
//! attributes.

use quick_xml::Reader;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use quick_xml::writer::Writer;
use serde::Serialize;
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::InstallError;
use crate::install::fs_ops::write_atomic;
use crate::logging::field;
use crate::project::paths::ProjectPaths;

pub const MENU_VIEW: &str = "WEB-INF/views/menu.jspx";

/// Element selector: `//name`, `//*`, `//name[@attr]` or `//name[@attr='value']`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    element: Option<String>,
    attribute: Option<AttributePredicate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributePredicate {
    name: String,
    value: Option<String>,
}

fn is_name(raw: &str) -> bool {
    !raw.is_empty()
        && raw
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'))
}

impl Selector {
    pub fn parse(raw: &str) -> Result<Self, InstallError> {
        let invalid = || InstallError::InvalidSelector {
            selector: raw.to_string(),
        };

        let rest = raw.trim().strip_prefix("//").ok_or_else(invalid)?;
        let (name, predicate) = match rest.find('[') {
            Some(idx) => {
                let inner = rest[idx..]
                    .strip_prefix('[')
                    .and_then(|p| p.strip_suffix(']'))
                    .ok_or_else(invalid)?;
                (&rest[..idx], Some(inner))
            }
            None => (rest, None),
        };

        let element = match name {
            "*" => None,
            other if is_name(other) => Some(other.to_string()),
            _ => return Err(invalid()),
        };

        let attribute = match predicate {
            None => None,
            Some(inner) => {
                let inner = inner.trim().strip_prefix('@').ok_or_else(invalid)?;
                match inner.split_once('=') {
                    None if is_name(inner.trim()) => Some(AttributePredicate {
                        name: inner.trim().to_string(),
                        value: None,
                    }),
                    None => return Err(invalid()),
                    Some((attr, quoted)) => {
                        let attr = attr.trim();
                        let quoted = quoted.trim();
                        if !is_name(attr) || quoted.len() < 2 {
                            return Err(invalid());
                        }
                        let quote = quoted.chars().next().ok_or_else(invalid)?;
                        if !matches!(quote, '\'' | '"') || !quoted.ends_with(quote) {
                            return Err(invalid());
                        }
                        let value = &quoted[1..quoted.len() - 1];
                        if value.contains(quote) {
                            return Err(invalid());
                        }
                        Some(AttributePredicate {
                            name: attr.to_string(),
                            value: Some(value.to_string()),
                        })
                    }
                }
            }
        };

        Ok(Self { element, attribute })
    }

    fn matches(&self, start: &BytesStart<'_>) -> Result<bool, String> {
        if let Some(element) = &self.element
            && start.name().as_ref() != element.as_bytes()
        {
            return Ok(false);
        }
        let Some(predicate) = &self.attribute else {
            return Ok(true);
        };
        match attribute_value(start, &predicate.name)? {
            None => Ok(false),
            Some(actual) => Ok(predicate
                .value
                .as_deref()
                .is_none_or(|expected| expected == actual)),
        }
    }
}

fn attribute_value(start: &BytesStart<'_>, name: &str) -> Result<Option<String>, String> {
    for attr in start.attributes() {
        let attr = attr.map_err(|err| err.to_string())?;
        if attr.key.as_ref() == name.as_bytes() {
            let value = attr.unescape_value().map_err(|err| err.to_string())?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn with_attribute(start: &BytesStart<'_>, name: &str, value: &str) -> Result<BytesStart<'static>, String> {
    let tag = std::str::from_utf8(start.name().as_ref())
        .map_err(|err| err.to_string())?
        .to_string();
    let mut out = BytesStart::new(tag);
    let mut replaced = false;
    for attr in start.attributes() {
        let attr = attr.map_err(|err| err.to_string())?;
        if attr.key.as_ref() == name.as_bytes() {
            if !replaced {
                out.push_attribute((name, value));
                replaced = true;
            }
            continue;
        }
        if attr.value.contains(&b'"') {
            // Raw bytes from a single-quoted value; the rebuilt tag quotes with `"`.
            let requoted = String::from_utf8_lossy(&attr.value).replace('"', "&quot;");
            out.push_attribute(Attribute {
                key: attr.key,
                value: Cow::Owned(requoted.into_bytes()),
            });
        } else {
            out.push_attribute(attr);
        }
    }
    if !replaced {
        out.push_attribute((name, value));
    }
    Ok(out)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentPatch {
    Patched(String),
    AlreadySet,
    NoMatch,
}

/// Set `name=value` on the first element matching `selector`. `Err` carries a
/// parse failure description.
pub fn patch_document(
    source: &str,
    selector: &Selector,
    name: &str,
    value: &str,
) -> Result<DocumentPatch, String> {
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(false);
    let mut writer = Writer::new(Vec::with_capacity(source.len() + name.len() + value.len() + 4));

    let mut depth: usize = 0;
    let mut saw_root = false;
    let mut result: Option<DocumentPatch> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|err| format!("at byte {}: {err}", reader.buffer_position()))?;
        let event = match event {
            Event::Eof => break,
            Event::Start(start) => {
                if depth == 0 && saw_root {
                    return Err("document has more than one root element".to_string());
                }
                depth += 1;
                saw_root = true;
                match visit(&start, selector, name, value, &mut result)? {
                    Some(patched) => Event::Start(patched),
                    None => Event::Start(start),
                }
            }
            Event::Empty(start) => {
                if depth == 0 && saw_root {
                    return Err("document has more than one root element".to_string());
                }
                saw_root = true;
                match visit(&start, selector, name, value, &mut result)? {
                    Some(patched) => Event::Empty(patched),
                    None => Event::Empty(start),
                }
            }
            Event::End(end) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| "closing tag without opening tag".to_string())?;
                Event::End(end)
            }
            other => other,
        };
        writer
            .write_event(event)
            .map_err(|err| format!("serialization failed: {err}"))?;
    }

    if depth != 0 {
        return Err(format!("{depth} element(s) left open at end of document"));
    }
    if !saw_root {
        return Err("document has no root element".to_string());
    }

    match result {
        Some(DocumentPatch::Patched(_)) => {
            let bytes = writer.into_inner();
            let text = String::from_utf8(bytes).map_err(|err| err.to_string())?;
            Ok(DocumentPatch::Patched(text))
        }
        Some(other) => Ok(other),
        None => Ok(DocumentPatch::NoMatch),
    }
}

fn visit(
    start: &BytesStart<'_>,
    selector: &Selector,
    name: &str,
    value: &str,
    result: &mut Option<DocumentPatch>,
) -> Result<Option<BytesStart<'static>>, String> {
    if result.is_some() || !selector.matches(start)? {
        return Ok(None);
    }
    if attribute_value(start, name)?.as_deref() == Some(value) {
        *result = Some(DocumentPatch::AlreadySet);
        return Ok(None);
    }
    *result = Some(DocumentPatch::Patched(String::new()));
    with_attribute(start, name, value).map(Some)
}

#[derive(Debug, Clone, Serialize)]
pub struct XmlPatchRule {
    /// Relative to the project root.
    pub file: PathBuf,
    pub selector: String,
    pub attribute: String,
    pub value: String,
}

impl XmlPatchRule {
    /// Give the scaffolded menu fragment Bootstrap's `well` styling.
    pub fn menu_well(paths: &ProjectPaths) -> Self {
        Self {
            file: paths.webapp_relative(MENU_VIEW),
            selector: "//div[@id='menu']".to_string(),
            attribute: "class".to_string(),
            value: "well".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchOutcome {
    Applied,
    AlreadySet,
    NoMatch,
    MissingFile,
}

impl PatchOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::AlreadySet => "already_set",
            Self::NoMatch => "no_match",
            Self::MissingFile => "missing_file",
        }
    }
}

pub fn patch_xml(root: &Path, rule: &XmlPatchRule, dry_run: bool) -> Result<PatchOutcome, InstallError> {
    let selector = Selector::parse(&rule.selector)?;
    let path = root.join(&rule.file);

    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            log::warn!(
                "event=patch_skipped reason=missing_file path={}",
                field(&path.display().to_string())
            );
            return Ok(PatchOutcome::MissingFile);
        }
        Err(err) => return Err(InstallError::io(&path, err)),
    };
    let source = String::from_utf8(bytes)
        .map_err(|err| InstallError::malformed(&path, format!("not valid UTF-8: {err}")))?;

    let patched = patch_document(&source, &selector, &rule.attribute, &rule.value)
        .map_err(|reason| InstallError::malformed(&path, reason))?;

    let outcome = match patched {
        DocumentPatch::Patched(text) => {
            if !dry_run {
                write_atomic(&path, text.as_bytes())?;
            }
            PatchOutcome::Applied
        }
        DocumentPatch::AlreadySet => PatchOutcome::AlreadySet,
        DocumentPatch::NoMatch => {
            log::info!(
                "event=patch_no_match path={} selector={}",
                field(&path.display().to_string()),
                field(&rule.selector)
            );
            PatchOutcome::NoMatch
        }
    };
    log::debug!(
        "event=patch path={} outcome={} dry_run={}",
        field(&path.display().to_string()),
        outcome.as_str(),
        dry_run
    );
    Ok(outcome)
}
