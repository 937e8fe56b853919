use anyhow::Result;
use std::path::Path;

use crate::commands::{CommandReport, resolve_context};
use crate::project::availability::{MavenProject, ProjectHandle, availability_checks};

pub fn run(project: Option<&Path>) -> Result<CommandReport> {
    let ctx = resolve_context(project)?;
    let mut report = CommandReport::new("status");

    report.detail(format!("project={}", ctx.paths.root.display()));
    report.detail(format!("webapp_dir={}", ctx.paths.webapp_rel.display()));

    let maven = MavenProject::new(ctx.paths.clone());
    let checks = availability_checks(Some(&maven as &dyn ProjectHandle));
    for check in &checks {
        report.detail(format!("check.{}={}", check.name, check.passed));
    }

    let failed = checks
        .iter()
        .filter(|check| !check.passed)
        .map(|check| check.name)
        .collect::<Vec<_>>();
    if failed.is_empty() {
        report.detail("applicable=true");
    } else {
        report.detail("applicable=false");
        report.issue(format!("bootstrap install not available: {}", failed.join(", ")));
    }

    Ok(report)
}
