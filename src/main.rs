mod commands;
mod domain;
mod services;
#[cfg(test)]
mod test_support;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::commands::base_commands::{CliArgs, Commands};
use crate::commands::compare_cmd::compare_command;
use crate::commands::completions_cmd::completions_command;
use crate::commands::simulate_cmd::simulate_command;
use crate::commands::solve_cmd::solve_command;
use crate::commands::sweep_cmd::sweep_command;

fn main() -> ExitCode {
    init_logging();
    let args = CliArgs::parse();
    match args.command {
        cmd @ Commands::Solve { .. } => solve_command(cmd),
        cmd @ Commands::Simulate { .. } => simulate_command(cmd),
        cmd @ Commands::Compare { .. } => compare_command(cmd),
        cmd @ Commands::Sweep { .. } => sweep_command(cmd),
        cmd @ Commands::Completions { .. } => completions_command(cmd),
    }
}

// Reports go to stdout, so logs stay on stderr. RUST_LOG overrides the level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
