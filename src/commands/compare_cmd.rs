use std::process::ExitCode;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use crate::commands::base_commands::{Commands, resolve_seed};
use crate::commands::report_format::{
    format_chi_squared, format_metrics, format_outcomes, format_parameters,
};
use crate::domain::parameters::{ParameterSet, PatiencePolicy};
use crate::services::chi_squared::chi_squared_test;
use crate::services::comparison_types::{
    ComparisonReport, EmpiricalReport, OutcomeCounts, write_report,
};
use crate::services::convergence::convergence_analysis;
use crate::services::probability_plot::{
    timestamped_plot_path, write_convergence_png, write_probability_bars_png,
};
use crate::services::queueing_simulation::QueueingSimulation;
use crate::services::steady_state::SteadyStateSolver;

pub fn compare_command(cmd: Commands) -> ExitCode {
    if let Commands::Compare {
        parameters,
        seed,
        interval_count,
        plot_dir,
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
        debug!(seed, interval_count, "comparing");

        let analytic = match SteadyStateSolver::new(parameters) {
            Ok(solver) => solver.metrics(),
            Err(e) => {
                eprintln!("Failed to solve steady state: {e:?}");
                return ExitCode::FAILURE;
            }
        };

        let mut simulation = match QueueingSimulation::new(parameters, StdRng::seed_from_u64(seed)) {
            Ok(simulation) => simulation,
            Err(e) => {
                eprintln!("Failed to create simulation: {e:?}");
                return ExitCode::FAILURE;
            }
        };
        simulation.run();
        let empirical = match simulation.finalize() {
            Ok(metrics) => metrics,
            Err(e) => {
                eprintln!("Failed to derive empirical statistics: {e:?}");
                return ExitCode::FAILURE;
            }
        };
        let outcomes = OutcomeCounts::from_statistics(simulation.statistics(), simulation.in_flight());

        let chi_squared = match chi_squared_test(analytic.probabilities(), empirical.probabilities()) {
            Ok(test) => test,
            Err(e) => {
                eprintln!("Failed to run chi-squared test: {e:?}");
                return ExitCode::FAILURE;
            }
        };

        println!("{}", format_parameters(&parameters));
        println!();
        println!("{}", format_metrics("Analytic", &analytic));
        println!();
        println!("{}", format_outcomes(seed, &outcomes));
        println!();
        println!("{}", format_metrics("Empirical", &empirical));
        println!();
        println!("{}", format_chi_squared(&chi_squared));

        // Only the plots and the report carry the convergence data.
        let convergence = if plot_dir.is_some() || output.is_some() {
            match convergence_analysis(
                simulation.statistics().customers_in_system(),
                parameters.state_count(),
                interval_count,
            ) {
                Ok(analysis) => Some(analysis),
                Err(e) => {
                    eprintln!("Failed to analyse convergence: {e:?}");
                    return ExitCode::FAILURE;
                }
            }
        } else {
            None
        };

        if let (Some(plot_dir), Some(convergence)) = (plot_dir, &convergence) {
            if let Err(e) = std::fs::create_dir_all(&plot_dir) {
                eprintln!("Failed to create plot directory: {e:?}");
                return ExitCode::FAILURE;
            }

            let bars_path = timestamped_plot_path(&plot_dir, "final_probs");
            if let Err(e) = write_probability_bars_png(
                &bars_path,
                empirical.probabilities(),
                analytic.probabilities(),
                &plot_caption(&parameters),
            ) {
                eprintln!("Failed to write probability plot: {e:?}");
                return ExitCode::FAILURE;
            }
            println!("Probability plot written to {}", bars_path.display());

            let convergence_path = timestamped_plot_path(&plot_dir, "convergence");
            if let Err(e) =
                write_convergence_png(&convergence_path, convergence, analytic.probabilities())
            {
                eprintln!("Failed to write convergence plot: {e:?}");
                return ExitCode::FAILURE;
            }
            println!("Convergence plot written to {}", convergence_path.display());
        }

        if let Some(output) = output {
            let mut report = ComparisonReport::new(parameters);
            report.analytic = Some(analytic);
            report.empirical = Some(EmpiricalReport {
                seed,
                outcomes,
                metrics: empirical,
            });
            report.chi_squared = Some(chi_squared);
            report.convergence = convergence;
            if let Err(e) = write_report(&output, &report) {
                eprintln!("Failed to write report: {e:?}");
                return ExitCode::FAILURE;
            }
            println!("Report written to {output}");
        }
    }
    ExitCode::SUCCESS
}

fn plot_caption(parameters: &ParameterSet) -> String {
    let caption = format!(
        "lambda = {}, mu = {}, n = {}, m = {}",
        parameters.arrival_rate,
        parameters.service_rate,
        parameters.server_count,
        parameters.queue_capacity
    );
    match parameters.patience {
        PatiencePolicy::WithPatience => format!("{caption}, v = {}", parameters.patience_rate),
        PatiencePolicy::PatienceDisabled => caption,
    }
}
