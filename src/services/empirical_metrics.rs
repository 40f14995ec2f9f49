use thiserror::Error;

use crate::domain::metrics::{Averages, QueueingMetrics};
use crate::domain::parameters::ParameterSet;
use crate::services::statistics::StatisticsCollector;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricsError {
    #[error("no {0} observed before the horizon")]
    DegenerateRun(&'static str),
}

/// Turns the observations of a finished run into the KPI set.
///
/// Entry `k` of the probability vector (`k < n + m`) is the share of arrivals
/// admitted at post-join level `k + 1`, i.e. arrivals that found `k`
/// customers; the last entry is the share of rejected arrivals.
pub fn empirical_metrics(
    parameters: &ParameterSet,
    statistics: &StatisticsCollector,
) -> Result<QueueingMetrics, MetricsError> {
    let total = statistics.admitted() + statistics.rejected();
    if total == 0 {
        return Err(MetricsError::DegenerateRun("arrivals"));
    }

    let levels = parameters.server_count + parameters.queue_capacity;
    let mut probabilities = vec![0.0; levels + 1];
    for level in statistics.admission_levels() {
        if (1..=levels).contains(level) {
            probabilities[level - 1] += 1.0;
        }
    }
    probabilities[levels] = statistics.rejected() as f64;
    for probability in &mut probabilities {
        *probability /= total as f64;
    }

    let averages = Averages {
        customers_in_queue: mean_count(statistics.customers_in_queue(), "arrivals")?,
        customers_in_system: mean_count(statistics.customers_in_system(), "arrivals")?,
        time_in_queue: mean(statistics.waiting_times(), "terminated customers")?,
        time_in_system: mean(statistics.sojourn_times(), "terminated customers")?,
    };

    Ok(QueueingMetrics::new(parameters, probabilities, averages))
}

fn mean(values: &[f64], what: &'static str) -> Result<f64, MetricsError> {
    if values.is_empty() {
        return Err(MetricsError::DegenerateRun(what));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

fn mean_count(values: &[usize], what: &'static str) -> Result<f64, MetricsError> {
    if values.is_empty() {
        return Err(MetricsError::DegenerateRun(what));
    }
    Ok(values.iter().sum::<usize>() as f64 / values.len() as f64)
}
