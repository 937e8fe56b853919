use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::audit;
use crate::commands::{CommandReport, bundle_for, resolve_context};
use crate::install::copy::CopyAction;
use crate::install::manifest::AssetManifest;
use crate::install::xml_patch::XmlPatchRule;
use crate::install::{self, InstallOptions};
use crate::project::availability::{MavenProject, ProjectHandle, is_applicable};

#[derive(Debug, Clone, Default)]
pub struct InstallArgs {
    pub project: Option<PathBuf>,
    pub dry_run: bool,
    pub skip_checks: bool,
    pub bundle: Option<PathBuf>,
    pub lock: bool,
}

fn record(log_path: Option<&Path>, status: &str, project: &Path, message: &str) {
    let Some(log_path) = log_path else {
        return;
    };
    if let Err(err) = audit::append_event(log_path, "install", status, project, message) {
        log::warn!("event=audit_failed path={} error={err:#}", log_path.display());
    }
}

pub fn run(args: &InstallArgs) -> Result<CommandReport> {
    let ctx = resolve_context(args.project.as_deref())?;
    let mut report = CommandReport::new("install");
    let root = ctx.paths.root.clone();
    let audit_log = ctx.settings.audit_log.as_deref();

    report.detail(format!("project={}", root.display()));

    if args.skip_checks {
        report.detail("availability=skipped");
    } else {
        let maven = MavenProject::new(ctx.paths.clone());
        if !is_applicable(Some(&maven as &dyn ProjectHandle)) {
            report.issue("bootstrap install not available for this project; run `tbootstrap status` for details");
            record(audit_log, "refused", &root, "availability checks failed");
            return Ok(report);
        }
    }

    let source = bundle_for(args.bundle.as_deref(), &ctx.settings);
    report.detail(format!("bundle={}", source.describe()));

    let manifest = AssetManifest::bootstrap(&ctx.paths);
    let rules = [XmlPatchRule::menu_well(&ctx.paths)];
    let opts = InstallOptions {
        dry_run: args.dry_run,
        lock: args.lock || ctx.settings.lock,
    };

    let outcome = match install::install(&manifest, &rules, &*source, &root, opts) {
        Ok(outcome) => outcome,
        Err(err) => {
            record(audit_log, "failed", &root, &err.to_string());
            return Err(err).context("install failed");
        }
    };

    let written = outcome.count(CopyAction::Written);
    let unchanged = outcome.count(CopyAction::Unchanged);
    let skipped = outcome.count(CopyAction::Skipped);
    report.detail(format!("dry_run={}", outcome.dry_run));
    report.detail(format!("written={written}"));
    report.detail(format!("unchanged={unchanged}"));
    report.detail(format!("skipped={skipped}"));
    for file in &outcome.files {
        if file.action == CopyAction::Unchanged {
            continue;
        }
        let rel = file.destination.strip_prefix(&root).unwrap_or(&file.destination);
        let verb = match (file.action, outcome.dry_run) {
            (CopyAction::Written, true) => "would write",
            (CopyAction::Written, false) => "wrote",
            _ => "kept",
        };
        report.detail(format!("{verb} {}", rel.display()));
    }
    for patch in &outcome.patches {
        report.detail(format!("patch {}={}", patch.file.display(), patch.outcome.as_str()));
    }
    report.detail(format!("assets_changed={}", outcome.assets_changed()));
    report.detail(format!("changed={}", outcome.changed()));

    if !outcome.dry_run {
        record(
            audit_log,
            "ok",
            &root,
            &format!("written={written} unchanged={unchanged} skipped={skipped}"),
        );
    }

    Ok(report)
}
