use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::domain::parameters::{ParameterSet, PatiencePolicy};
use crate::services::parameters_yaml::{ParametersYamlError, load_parameters_from_yaml_file};

#[derive(Parser)]
#[command(author, version, about)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct ParameterArgs {
    /// Parameter YAML file; replaces the rate and capacity flags
    #[arg(short, long)]
    pub config: Option<String>,
    /// Arrival rate (lambda)
    #[arg(long, default_value_t = 10.0)]
    pub arrival_rate: f64,
    /// Service rate per server (mu)
    #[arg(long, default_value_t = 3.0)]
    pub service_rate: f64,
    /// Number of servers (n)
    #[arg(long, default_value_t = 3)]
    pub servers: usize,
    /// Number of waiting places (m)
    #[arg(long, default_value_t = 4)]
    pub queue_capacity: usize,
    /// Patience rate of waiting customers (v)
    #[arg(long, default_value_t = 6.0)]
    pub patience_rate: f64,
    /// Simulated time to run for
    #[arg(long, default_value_t = 5000.0)]
    pub horizon: f64,
    /// Waiting customers never leave the queue
    #[arg(long)]
    pub no_patience: bool,
}

impl ParameterArgs {
    /// Builds the validated parameter set. `--no-patience` also applies on top
    /// of a config file.
    pub fn resolve(&self) -> Result<ParameterSet, ParametersYamlError> {
        let mut parameters = match &self.config {
            Some(path) => load_parameters_from_yaml_file(path)?,
            None => ParameterSet {
                arrival_rate: self.arrival_rate,
                service_rate: self.service_rate,
                server_count: self.servers,
                queue_capacity: self.queue_capacity,
                patience_rate: self.patience_rate,
                horizon: self.horizon,
                patience: PatiencePolicy::WithPatience,
            },
        };
        if self.no_patience {
            parameters.patience = PatiencePolicy::PatienceDisabled;
        }
        parameters.validate()?;
        Ok(parameters)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the analytic steady-state statistics
    Solve {
        #[command(flatten)]
        parameters: ParameterArgs,
        /// Output report file (YAML, or JSON for a .json extension)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Run the discrete-event simulation and report empirical statistics
    Simulate {
        #[command(flatten)]
        parameters: ParameterArgs,
        /// Seed for a reproducible run
        #[arg(short, long)]
        seed: Option<u64>,
        /// Output report file (YAML, or JSON for a .json extension)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Simulate and compare against the analytic model
    Compare {
        #[command(flatten)]
        parameters: ParameterArgs,
        /// Seed for a reproducible run
        #[arg(short, long)]
        seed: Option<u64>,
        /// Number of intervals for the convergence analysis
        #[arg(short, long, default_value_t = 100)]
        interval_count: usize,
        /// Directory to write the probability and convergence plots into
        #[arg(short, long)]
        plot_dir: Option<String>,
        /// Output report file (YAML, or JSON for a .json extension)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Solve and simulate once per service rate and queue capacity, side by side
    Sweep {
        #[command(flatten)]
        parameters: ParameterArgs,
        /// Seed shared by every run
        #[arg(short, long)]
        seed: Option<u64>,
        /// Service rates to compare [default: mu, mu + 1, mu + 3 unless capacities are given]
        #[arg(long, value_delimiter = ',')]
        service_rates: Vec<f64>,
        /// Queue capacities to compare [default: the queue capacity]
        #[arg(long, value_delimiter = ',')]
        queue_capacities: Vec<usize>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Uses the given seed or draws a fresh one, so every run can be replayed.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(rand::random)
}
