use anyhow::{Context, Result};

use crate::commands::CommandReport;
use crate::property::{PropertyName, get_property};

pub fn run(name: Option<&str>, list: bool) -> Result<CommandReport> {
    let mut report = CommandReport::new("property");

    if list {
        for entry in PropertyName::ALL {
            report.detail(format!("{entry:?}={}", entry.display_name()));
        }
        return Ok(report);
    }

    let name = name.unwrap_or_default();
    let value = get_property(name).context("property lookup failed")?;
    match value {
        Some(value) => report.detail(format!("{name}={value}")),
        None => report.detail(format!("{name}=<unset>")),
    }
    Ok(report)
}
