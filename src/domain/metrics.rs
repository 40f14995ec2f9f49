use serde::Serialize;

use crate::domain::parameters::ParameterSet;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Averages {
    pub customers_in_queue: f64,
    pub customers_in_system: f64,
    pub time_in_queue: f64,
    pub time_in_system: f64,
}

/// Immutable KPI set of a queueing system, produced once from either a
/// finished simulation run or the steady-state solution.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct QueueingMetrics {
    probabilities: Vec<f64>,
    rejection_probability: f64,
    relative_bandwidth: f64,
    absolute_bandwidth: f64,
    average_customers_in_queue: f64,
    average_customers_in_system: f64,
    average_time_in_queue: f64,
    average_time_in_system: f64,
    average_busy_servers: f64,
}

impl QueueingMetrics {
    /// The last entry of `probabilities` is the rejection probability.
    pub fn new(parameters: &ParameterSet, probabilities: Vec<f64>, averages: Averages) -> Self {
        let rejection_probability = probabilities.last().copied().unwrap_or(0.0);
        let relative_bandwidth = 1.0 - rejection_probability;
        Self {
            rejection_probability,
            relative_bandwidth,
            absolute_bandwidth: parameters.arrival_rate * relative_bandwidth,
            average_customers_in_queue: averages.customers_in_queue,
            average_customers_in_system: averages.customers_in_system,
            average_time_in_queue: averages.time_in_queue,
            average_time_in_system: averages.time_in_system,
            average_busy_servers: relative_bandwidth * parameters.rho(),
            probabilities,
        }
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn probability_sum(&self) -> f64 {
        self.probabilities.iter().sum()
    }

    pub fn rejection_probability(&self) -> f64 {
        self.rejection_probability
    }

    pub fn relative_bandwidth(&self) -> f64 {
        self.relative_bandwidth
    }

    pub fn absolute_bandwidth(&self) -> f64 {
        self.absolute_bandwidth
    }

    pub fn average_customers_in_queue(&self) -> f64 {
        self.average_customers_in_queue
    }

    pub fn average_customers_in_system(&self) -> f64 {
        self.average_customers_in_system
    }

    pub fn average_time_in_queue(&self) -> f64 {
        self.average_time_in_queue
    }

    pub fn average_time_in_system(&self) -> f64 {
        self.average_time_in_system
    }

    pub fn average_busy_servers(&self) -> f64 {
        self.average_busy_servers
    }
}
