use anyhow::{Context, Result};
use std::path::Path;

use crate::commands::{CommandReport, bundle_for, resolve_context};
use crate::install::manifest::AssetManifest;
use crate::install::xml_patch::XmlPatchRule;

pub fn run(project: Option<&Path>, bundle: Option<&Path>) -> Result<CommandReport> {
    let ctx = resolve_context(project)?;
    let mut report = CommandReport::new("manifest");
    let source = bundle_for(bundle, &ctx.settings);
    let manifest = AssetManifest::bootstrap(&ctx.paths);

    report.detail(format!("bundle={}", source.describe()));
    for (idx, entry) in manifest.entries().iter().enumerate() {
        let count = source
            .list(&entry.source_pattern)
            .with_context(|| format!("failed to list {}", entry.source_pattern))?
            .len();
        report.detail(format!(
            "entry.{} {} -> {} overwrite={} files={count}",
            idx + 1,
            entry.source_pattern,
            entry.destination.display(),
            entry.overwrite
        ));
        if count == 0 {
            report.issue(format!("bundle has no assets matching {}", entry.source_pattern));
        }
    }

    let rule = XmlPatchRule::menu_well(&ctx.paths);
    report.detail(format!(
        "patch {} {} @{}={}",
        rule.file.display(),
        rule.selector,
        rule.attribute,
        rule.value
    ));

    if report.ok {
        let digest = manifest
            .digest(&*source)
            .context("failed to hash bundle")?;
        report.detail(format!("bundle_sha256={digest}"));
    }

    Ok(report)
}
