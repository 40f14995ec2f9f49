use std::process::ExitCode;

use clap::CommandFactory;
use clap_complete::generate;

use crate::commands::base_commands::{CliArgs, Commands};

pub fn completions_command(cmd: Commands) -> ExitCode {
    if let Commands::Completions { shell } = cmd {
        let mut command = CliArgs::command();
        let name = command.get_name().to_string();
        generate(shell, &mut command, name, &mut std::io::stdout());
    }
    ExitCode::SUCCESS
}
