use crate::domain::metrics::{Averages, QueueingMetrics};
use crate::domain::parameters::{ParameterSet, PatiencePolicy};

/// Derives the KPI set from a stationary distribution `[P0..P(n+m)]`.
///
/// Time averages follow from Little's law with the offered rate `λ`. Without
/// patience (single server only) the system size is taken as `1 + Lq`.
pub fn analytic_metrics(parameters: &ParameterSet, probabilities: &[f64]) -> QueueingMetrics {
    let customers_in_queue: f64 = probabilities
        .iter()
        .skip(parameters.server_count + 1)
        .enumerate()
        .map(|(i, p)| (i + 1) as f64 * p)
        .sum();

    let customers_in_system = match parameters.patience {
        PatiencePolicy::WithPatience => probabilities
            .iter()
            .enumerate()
            .map(|(k, p)| k as f64 * p)
            .sum(),
        PatiencePolicy::PatienceDisabled => 1.0 + customers_in_queue,
    };

    let averages = Averages {
        customers_in_queue,
        customers_in_system,
        time_in_queue: customers_in_queue / parameters.arrival_rate,
        time_in_system: customers_in_system / parameters.arrival_rate,
    };
    QueueingMetrics::new(parameters, probabilities.to_vec(), averages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::steady_state::SteadyStateSolver;
    use crate::test_support::parameters;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn reference_scenario_averages() {
        let metrics = SteadyStateSolver::new(parameters(10.0, 3.0, 3, 4, 6.0))
            .unwrap()
            .metrics();

        assert!((metrics.average_customers_in_queue() - 0.480523907982001).abs() < TOLERANCE);
        assert!((metrics.average_customers_in_system() - 2.821048279232080).abs() < TOLERANCE);
        assert!((metrics.average_time_in_queue() - 0.048052390798200).abs() < TOLERANCE);
        assert!((metrics.average_time_in_system() - 0.282104827923208).abs() < TOLERANCE);
    }

    #[test]
    fn derived_rates_follow_the_rejection_probability() {
        let metrics = SteadyStateSolver::new(parameters(10.0, 3.0, 3, 4, 6.0))
            .unwrap()
            .metrics();
        let rejection = metrics.rejection_probability();

        assert!((rejection - 0.009528343835776).abs() < TOLERANCE);
        assert!((metrics.relative_bandwidth() - (1.0 - rejection)).abs() < TOLERANCE);
        assert!((metrics.absolute_bandwidth() - 10.0 * (1.0 - rejection)).abs() < TOLERANCE);
        assert!(
            (metrics.average_busy_servers() - (1.0 - rejection) * 10.0 / 3.0).abs() < TOLERANCE
        );
    }

    #[test]
    fn queue_length_counts_only_waiting_states() {
        let params = parameters(1.0, 1.0, 2, 2, 1.0);
        let metrics = analytic_metrics(&params, &[0.1, 0.2, 0.3, 0.25, 0.15]);

        assert!((metrics.average_customers_in_queue() - (0.25 + 2.0 * 0.15)).abs() < TOLERANCE);
        assert!(
            (metrics.average_customers_in_system() - (0.2 + 0.6 + 0.75 + 0.6)).abs() < TOLERANCE
        );
    }

    #[test]
    fn patience_disabled_reports_one_plus_queue_length() {
        let mut params = parameters(4.0, 2.0, 1, 3, 1.0);
        params.patience = PatiencePolicy::PatienceDisabled;
        let metrics = SteadyStateSolver::new(params).unwrap().metrics();

        assert_eq!(
            metrics.average_customers_in_system(),
            1.0 + metrics.average_customers_in_queue()
        );
        assert!((metrics.average_customers_in_queue() - 68.0 / 31.0).abs() < TOLERANCE);
        assert!((metrics.average_time_in_queue() - 17.0 / 31.0).abs() < TOLERANCE);
        assert!((metrics.rejection_probability() - 16.0 / 31.0).abs() < TOLERANCE);
    }

    #[test]
    fn loss_system_has_an_empty_queue() {
        let metrics = SteadyStateSolver::new(parameters(6.0, 2.0, 2, 0, 1.0))
            .unwrap()
            .metrics();

        assert_eq!(metrics.average_customers_in_queue(), 0.0);
        assert_eq!(metrics.average_time_in_queue(), 0.0);
        assert!((metrics.probability_sum() - 1.0).abs() < TOLERANCE);
    }
}
