mod assets;
mod audit;
mod cli;
mod commands;
mod config;
mod env_loader;
mod error;
mod install;
mod logging;
mod project;
mod property;

fn main() {
    if let Err(err) = cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
