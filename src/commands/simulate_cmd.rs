use std::process::ExitCode;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use crate::commands::base_commands::{Commands, resolve_seed};
use crate::commands::report_format::{format_metrics, format_outcomes, format_parameters};
use crate::services::comparison_types::{
    ComparisonReport, EmpiricalReport, OutcomeCounts, write_report,
};
use crate::services::queueing_simulation::QueueingSimulation;

pub fn simulate_command(cmd: Commands) -> ExitCode {
    if let Commands::Simulate {
        parameters,
        seed,
        output,
    } = cmd
    {
        let parameters = match parameters.resolve() {
            Ok(parameters) => parameters,
            Err(e) => {
                eprintln!("Failed to load parameters: {e:?}");
                return ExitCode::FAILURE;
            }
        };
        let seed = resolve_seed(seed);
        debug!(seed, "simulating");

        let mut simulation = match QueueingSimulation::new(parameters, StdRng::seed_from_u64(seed)) {
            Ok(simulation) => simulation,
            Err(e) => {
                eprintln!("Failed to create simulation: {e:?}");
                return ExitCode::FAILURE;
            }
        };
        simulation.run();

        let metrics = match simulation.finalize() {
            Ok(metrics) => metrics,
            Err(e) => {
                eprintln!("Failed to derive empirical statistics: {e:?}");
                return ExitCode::FAILURE;
            }
        };
        let outcomes = OutcomeCounts::from_statistics(simulation.statistics(), simulation.in_flight());

        println!("{}", format_parameters(&parameters));
        println!();
        println!("{}", format_outcomes(seed, &outcomes));
        println!();
        println!("{}", format_metrics("Empirical", &metrics));

        if let Some(output) = output {
            let mut report = ComparisonReport::new(parameters);
            report.empirical = Some(EmpiricalReport {
                seed,
                outcomes,
                metrics,
            });
            if let Err(e) = write_report(&output, &report) {
                eprintln!("Failed to write report: {e:?}");
                return ExitCode::FAILURE;
            }
            println!("Report written to {output}");
        }
    }
    ExitCode::SUCCESS
}
