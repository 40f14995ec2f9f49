use std::process::ExitCode;

use crate::commands::base_commands::Commands;
use crate::commands::report_format::{format_metrics, format_parameters};
use crate::services::comparison_types::{ComparisonReport, write_report};
use crate::services::steady_state::SteadyStateSolver;

pub fn solve_command(cmd: Commands) -> ExitCode {
    if let Commands::Solve { parameters, output } = cmd {
        let parameters = match parameters.resolve() {
            Ok(parameters) => parameters,
            Err(e) => {
                eprintln!("Failed to load parameters: {e:?}");
                return ExitCode::FAILURE;
            }
        };

        let metrics = match SteadyStateSolver::new(parameters) {
            Ok(solver) => solver.metrics(),
            Err(e) => {
                eprintln!("Failed to solve steady state: {e:?}");
                return ExitCode::FAILURE;
            }
        };

        println!("{}", format_parameters(&parameters));
        println!();
        println!("{}", format_metrics("Analytic", &metrics));

        if let Some(output) = output {
            let mut report = ComparisonReport::new(parameters);
            report.analytic = Some(metrics);
            if let Err(e) = write_report(&output, &report) {
                eprintln!("Failed to write report: {e:?}");
                return ExitCode::FAILURE;
            }
            println!("Report written to {output}");
        }
    }
    ExitCode::SUCCESS
}
