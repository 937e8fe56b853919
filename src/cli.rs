use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;
use crate::logging;

#[derive(Debug, Parser)]
#[command(name = "tbootstrap")]
#[command(about = "Install Twitter Bootstrap assets into a scaffolded Spring MVC web project")]
pub struct Cli {
    #[arg(long, global = true)]
    pub json: bool,

    /// Project root (defaults to TBOOTSTRAP_PROJECT, then the current directory).
    #[arg(long, global = true, value_name = "DIR")]
    pub project: Option<PathBuf>,

    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Report whether the project can take the install.
    Status,
    Install(InstallArgs),
    Property(PropertyArgs),
    /// Show what `install` would copy and patch.
    Manifest(ManifestArgs),
}

#[derive(Debug, Args)]
pub struct InstallArgs {
    #[arg(long)]
    pub dry_run: bool,
    #[arg(long)]
    pub skip_checks: bool,
    #[arg(long, value_name = "DIR")]
    pub bundle: Option<PathBuf>,
    #[arg(long)]
    pub lock: bool,
}

#[derive(Debug, Args)]
pub struct PropertyArgs {
    #[arg(required_unless_present = "list")]
    pub name: Option<String>,
    #[arg(long, conflicts_with = "name")]
    pub list: bool,
}

#[derive(Debug, Args)]
pub struct ManifestArgs {
    #[arg(long, value_name = "DIR")]
    pub bundle: Option<PathBuf>,
}

fn print_report(report: &commands::CommandReport, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("command: {}", report.command);
    println!("ok: {}", report.ok);
    if !report.details.is_empty() {
        println!("details:");
        for detail in &report.details {
            println!("- {detail}");
        }
    }
    if !report.issues.is_empty() {
        println!("issues:");
        for issue in &report.issues {
            println!("- {issue}");
        }
    }
    Ok(())
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let project = cli.project.as_deref();

    let report = match &cli.command {
        Command::Status => commands::status::run(project)?,
        Command::Install(args) => commands::install::run(&commands::install::InstallArgs {
            project: cli.project.clone(),
            dry_run: args.dry_run,
            skip_checks: args.skip_checks,
            bundle: args.bundle.clone(),
            lock: args.lock,
        })?,
        Command::Property(args) => commands::property::run(args.name.as_deref(), args.list)?,
        Command::Manifest(args) => commands::manifest::run(project, args.bundle.as_deref())?,
    };

    print_report(&report, cli.json)?;

    if report.ok {
        Ok(())
    } else {
        std::process::exit(2);
    }
}
