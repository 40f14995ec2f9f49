use std::process::ExitCode;

use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::info;

use crate::commands::base_commands::{Commands, resolve_seed};
use crate::commands::report_format::{format_parameters, format_sweep_table};
use crate::domain::parameters::ParameterSet;
use crate::services::comparison_types::SweepColumn;
use crate::services::queueing_simulation::{QueueingSimulation, SimulationError};
use crate::services::steady_state::{SolverError, SteadyStateSolver};

#[derive(Error, Debug)]
pub enum SweepError {
    #[error("failed to solve steady state: {0}")]
    Solver(#[from] SolverError),
    #[error("failed to simulate: {0}")]
    Simulation(#[from] SimulationError),
}

pub fn sweep_command(cmd: Commands) -> ExitCode {
    if let Commands::Sweep {
        parameters,
        seed,
        service_rates,
        queue_capacities,
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

        let points = sweep_points(&parameters, &service_rates, &queue_capacities);
        let mut columns = Vec::with_capacity(points.len());
        for (service_rate, queue_capacity) in points {
            match run_column(parameters, service_rate, queue_capacity, seed) {
                Ok(column) => columns.push(column),
                Err(e) => {
                    eprintln!(
                        "Failed to run sweep point mu = {service_rate}, m = {queue_capacity}: {e:?}"
                    );
                    return ExitCode::FAILURE;
                }
            }
        }

        println!("{}", format_parameters(&parameters));
        println!("Seed: {seed}");
        println!();
        println!("{}", format_sweep_table(&columns));
    }
    ExitCode::SUCCESS
}

// With neither axis given the service rate is raised to mu + 1 and mu + 3.
fn sweep_points(
    parameters: &ParameterSet,
    service_rates: &[f64],
    queue_capacities: &[usize],
) -> Vec<(f64, usize)> {
    let mu = parameters.service_rate;
    let service_rates = match (service_rates.is_empty(), queue_capacities.is_empty()) {
        (false, _) => service_rates.to_vec(),
        (true, true) => vec![mu, mu + 1.0, mu + 3.0],
        (true, false) => vec![mu],
    };
    let queue_capacities = if queue_capacities.is_empty() {
        vec![parameters.queue_capacity]
    } else {
        queue_capacities.to_vec()
    };

    service_rates
        .iter()
        .flat_map(|&rate| queue_capacities.iter().map(move |&capacity| (rate, capacity)))
        .collect()
}

fn run_column(
    parameters: ParameterSet,
    service_rate: f64,
    queue_capacity: usize,
    seed: u64,
) -> Result<SweepColumn, SweepError> {
    let parameters = ParameterSet {
        service_rate,
        queue_capacity,
        ..parameters
    };
    let analytic = SteadyStateSolver::new(parameters)?.metrics();

    let mut simulation = QueueingSimulation::new(parameters, StdRng::seed_from_u64(seed))?;
    simulation.run();
    let empirical = simulation.finalize()?;
    info!(
        service_rate,
        queue_capacity,
        analytic_rejection = analytic.rejection_probability(),
        empirical_rejection = empirical.rejection_probability(),
        "sweep point finished"
    );

    Ok(SweepColumn {
        service_rate,
        queue_capacity,
        analytic,
        empirical,
    })
}
