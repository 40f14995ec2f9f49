use std::collections::HashMap;

use rand::Rng;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::metrics::QueueingMetrics;
use crate::domain::parameters::{ParameterError, ParameterSet};
use crate::services::arrival_generator::ArrivalGenerator;
use crate::services::customer_process::{CustomerProcess, ProcessContext};
use crate::services::delay_sampler::{DelaySampler, ExponentialSampler, SamplerError};
use crate::services::empirical_metrics::{MetricsError, empirical_metrics};
use crate::services::event_clock::EventClock;
use crate::services::server_pool::{CustomerId, ServerPool};
use crate::services::statistics::StatisticsCollector;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("invalid parameters: {0}")]
    InvalidParameter(#[from] ParameterError),
    #[error("failed to build delay sampler: {0}")]
    Sampler(#[from] SamplerError),
    #[error("failed to derive metrics: {0}")]
    Metrics(#[from] MetricsError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationEvent {
    Arrival,
    PatienceExpired(CustomerId),
    ServiceCompleted(CustomerId),
}

/// Discrete-event simulation of an M/M/n/m queue with reneging.
///
/// Everything runs on one logical thread: the clock pops events in time order
/// and each event moves exactly one customer (or the arrival stream) forward.
pub struct QueueingSimulation<S: DelaySampler> {
    parameters: ParameterSet,
    sampler: S,
    clock: EventClock<SimulationEvent>,
    pool: ServerPool,
    arrivals: ArrivalGenerator,
    customers: HashMap<CustomerId, CustomerProcess>,
    statistics: StatisticsCollector,
}

impl<R: Rng> QueueingSimulation<ExponentialSampler<R>> {
    pub fn new(parameters: ParameterSet, rng: R) -> Result<Self, SimulationError> {
        parameters.validate()?;
        let sampler = ExponentialSampler::new(&parameters, rng)?;
        Self::with_sampler(parameters, sampler)
    }
}

impl<S: DelaySampler> QueueingSimulation<S> {
    pub fn with_sampler(parameters: ParameterSet, sampler: S) -> Result<Self, SimulationError> {
        parameters.validate()?;
        let mut clock = EventClock::new(parameters.horizon);
        let arrivals = ArrivalGenerator::new();
        arrivals.start(&mut clock);
        debug!(?parameters, "simulation created");

        Ok(Self {
            pool: ServerPool::new(parameters.server_count),
            parameters,
            sampler,
            clock,
            arrivals,
            customers: HashMap::new(),
            statistics: StatisticsCollector::new(),
        })
    }

    /// Runs until the horizon. Customers still queued or in service at that
    /// point are abandoned and contribute no termination statistics.
    pub fn run(&mut self) {
        while self.step().is_some() {}
        info!(
            horizon = self.clock.horizon(),
            arrivals = self.arrivals.arrivals(),
            served = self.statistics.served(),
            reneged = self.statistics.reneged(),
            rejected = self.statistics.rejected(),
            in_flight = self.customers.len(),
            busy_servers = self.pool.busy_servers(),
            "simulation finished"
        );
    }

    pub fn step(&mut self) -> Option<SimulationEvent> {
        let event = self.clock.advance()?;
        self.dispatch(event);
        Some(event)
    }

    fn dispatch(&mut self, event: SimulationEvent) {
        match event {
            SimulationEvent::Arrival => {
                let id = self.arrivals.on_arrival(&mut self.clock, &mut self.sampler);
                if let Some(customer) = CustomerProcess::arrive(id, &mut self.context()) {
                    self.customers.insert(id, customer);
                }
            }
            SimulationEvent::PatienceExpired(id) => {
                if let Some(customer) = self.customers.remove(&id) {
                    debug_assert!(customer.is_waiting(), "patience fired for a customer in service");
                    customer.renege(&mut self.context());
                }
            }
            SimulationEvent::ServiceCompleted(id) => {
                if let Some(customer) = self.customers.remove(&id) {
                    // Built field by field: the handed-over customer is looked
                    // up in `self.customers` while the context is alive.
                    let mut ctx = ProcessContext {
                        parameters: &self.parameters,
                        clock: &mut self.clock,
                        pool: &mut self.pool,
                        sampler: &mut self.sampler,
                        statistics: &mut self.statistics,
                    };
                    if let Some(next) = customer.depart(&mut ctx) {
                        if let Some(waiting) = self.customers.get_mut(&next) {
                            waiting.grant(&mut ctx);
                        }
                    }
                }
            }
        }
    }

    fn context(&mut self) -> ProcessContext<'_, S> {
        ProcessContext {
            parameters: &self.parameters,
            clock: &mut self.clock,
            pool: &mut self.pool,
            sampler: &mut self.sampler,
            statistics: &mut self.statistics,
        }
    }

    pub fn finalize(&self) -> Result<QueueingMetrics, SimulationError> {
        Ok(empirical_metrics(&self.parameters, &self.statistics)?)
    }

    pub fn statistics(&self) -> &StatisticsCollector {
        &self.statistics
    }

    #[cfg(test)]
    pub fn pool(&self) -> &ServerPool {
        &self.pool
    }

    #[cfg(test)]
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    #[cfg(test)]
    pub fn is_finished(&self) -> bool {
        self.clock.is_finished()
    }

    pub fn in_flight(&self) -> usize {
        self.customers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parameters::PatiencePolicy;
    use crate::services::steady_state::SteadyStateSolver;
    use crate::test_support::{ScriptedSampler, parameters};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn arrival_filling_the_queue_to_capacity_is_admitted_and_the_next_is_rejected() {
        // n = 1, m = 1: arrivals at t = 0, 1, 2 while the first customer is in service.
        let params = parameters(1.0, 1.0, 1, 1, 1.0);
        let sampler = ScriptedSampler::new()
            .inter_arrivals(&[1.0, 1.0])
            .services(&[100.0])
            .patiences(&[100.0]);
        let mut simulation = QueueingSimulation::with_sampler(params, sampler).unwrap();

        simulation.run();

        let statistics = simulation.statistics();
        assert_eq!(statistics.customers_in_queue(), &[0, 0, 1]);
        assert_eq!(statistics.customers_in_system(), &[0, 1, 2]);
        assert_eq!(statistics.admission_levels(), &[1, 2]);
        assert_eq!(statistics.rejected(), 1);
        assert_eq!(statistics.waiting_times(), &[0.0]);
        assert_eq!(statistics.sojourn_times(), &[0.0]);
        assert_eq!(simulation.pool().busy_servers(), 1);
        assert_eq!(simulation.pool().waiting_count(), 1);
        assert_eq!(simulation.in_flight(), 2);
    }

    #[test]
    fn zero_queue_capacity_rejects_every_arrival_that_would_wait() {
        let params = parameters(1.0, 1.0, 1, 0, 1.0);
        let sampler = ScriptedSampler::new()
            .inter_arrivals(&[1.0])
            .services(&[100.0]);
        let mut simulation = QueueingSimulation::with_sampler(params, sampler).unwrap();

        simulation.run();

        assert_eq!(simulation.statistics().admission_levels(), &[1]);
        assert_eq!(simulation.statistics().rejected(), 1);
        assert_eq!(simulation.pool().waiting_count(), 0);
    }

    #[test]
    fn patience_expiring_first_reneges_without_consuming_a_server() {
        // Customer 1 arrives at t = 1 behind a service ending at t = 5 and
        // loses patience at t = 3.
        let params = parameters(1.0, 1.0, 1, 1, 1.0);
        let sampler = ScriptedSampler::new()
            .inter_arrivals(&[1.0])
            .services(&[5.0])
            .patiences(&[2.0]);
        let mut simulation = QueueingSimulation::with_sampler(params, sampler).unwrap();

        assert_eq!(simulation.step(), Some(SimulationEvent::Arrival));
        assert_eq!(simulation.step(), Some(SimulationEvent::Arrival));
        assert_eq!(simulation.step(), Some(SimulationEvent::PatienceExpired(1)));
        assert_eq!(simulation.now(), 3.0);
        assert_eq!(simulation.pool().busy_servers(), 1);
        assert_eq!(simulation.pool().waiting_count(), 0);
        assert_eq!(simulation.statistics().reneged(), 1);

        assert_eq!(simulation.step(), Some(SimulationEvent::ServiceCompleted(0)));
        assert_eq!(simulation.pool().busy_servers(), 0);
        assert_eq!(simulation.step(), None);

        let statistics = simulation.statistics();
        assert_eq!(statistics.served(), 1);
        assert_eq!(statistics.reneged(), 1);
        assert_eq!(statistics.waiting_times(), &[2.0, 0.0]);
        assert_eq!(statistics.sojourn_times(), &[2.0, 5.0]);
    }

    #[test]
    fn server_becoming_free_first_cancels_the_patience_timer() {
        // Customer 1 waits from t = 1 to t = 5, well before its patience at t = 11.
        let params = parameters(1.0, 1.0, 1, 1, 1.0);
        let sampler = ScriptedSampler::new()
            .inter_arrivals(&[1.0])
            .services(&[5.0, 1.0])
            .patiences(&[10.0]);
        let mut simulation = QueueingSimulation::with_sampler(params, sampler).unwrap();

        let mut events = Vec::new();
        while let Some(event) = simulation.step() {
            events.push(event);
        }

        assert_eq!(
            events,
            vec![
                SimulationEvent::Arrival,
                SimulationEvent::Arrival,
                SimulationEvent::ServiceCompleted(0),
                SimulationEvent::ServiceCompleted(1),
            ]
        );
        let statistics = simulation.statistics();
        assert_eq!(statistics.served(), 2);
        assert_eq!(statistics.reneged(), 0);
        assert_eq!(statistics.waiting_times(), &[0.0, 4.0]);
        assert_eq!(statistics.sojourn_times(), &[5.0, 5.0]);
        assert_eq!(simulation.pool().busy_servers(), 0);
    }

    #[test]
    fn patience_disabled_customers_never_renege() {
        let mut params = parameters(8.0, 2.0, 1, 3, 50.0);
        params.patience = PatiencePolicy::PatienceDisabled;
        params.horizon = 2_000.0;
        let mut simulation = QueueingSimulation::new(params, StdRng::seed_from_u64(3)).unwrap();

        simulation.run();

        assert_eq!(simulation.statistics().reneged(), 0);
        assert!(simulation.statistics().served() > 0);
        assert!(simulation.statistics().rejected() > 0);
    }

    #[test]
    fn run_stops_at_the_horizon() {
        let params = parameters(10.0, 3.0, 3, 4, 6.0);
        let mut simulation = QueueingSimulation::new(params, StdRng::seed_from_u64(1)).unwrap();

        simulation.run();

        assert!(simulation.is_finished());
        assert_eq!(simulation.now(), params.horizon);
        assert_eq!(simulation.step(), None);
    }

    #[test]
    fn occupancy_never_exceeds_servers_plus_queue_capacity() {
        let params = parameters(20.0, 3.0, 2, 3, 1.0);
        let mut simulation = QueueingSimulation::new(params, StdRng::seed_from_u64(11)).unwrap();

        while simulation.step().is_some() {
            assert!(simulation.pool().busy_servers() <= 2);
            assert!(simulation.pool().waiting_count() <= 3);
        }
        let limit = params.server_count + params.queue_capacity;
        assert!(
            simulation
                .statistics()
                .admission_levels()
                .iter()
                .all(|level| (1..=limit).contains(level))
        );
    }

    #[test]
    fn same_seed_reproduces_the_same_metrics() {
        let params = parameters(10.0, 3.0, 3, 4, 6.0);
        let mut first = QueueingSimulation::new(params, StdRng::seed_from_u64(99)).unwrap();
        let mut second = QueueingSimulation::new(params, StdRng::seed_from_u64(99)).unwrap();

        first.run();
        second.run();

        assert_eq!(first.finalize().unwrap(), second.finalize().unwrap());
    }

    #[test]
    fn invalid_parameters_are_rejected_at_construction() {
        let params = parameters(10.0, 0.0, 3, 4, 6.0);
        let result = QueueingSimulation::new(params, StdRng::seed_from_u64(1));

        assert!(matches!(result, Err(SimulationError::InvalidParameter(_))));
    }

    #[test]
    fn finalize_before_any_arrival_is_a_degenerate_run() {
        let params = parameters(10.0, 3.0, 3, 4, 6.0);
        let simulation = QueueingSimulation::new(params, StdRng::seed_from_u64(1)).unwrap();

        assert!(matches!(
            simulation.finalize(),
            Err(SimulationError::Metrics(MetricsError::DegenerateRun(_)))
        ));
    }

    #[test]
    fn empirical_rejection_matches_the_analytic_model_on_a_long_run() {
        let mut params = parameters(10.0, 3.0, 3, 4, 6.0);
        params.horizon = 50_000.0;
        let mut simulation = QueueingSimulation::new(params, StdRng::seed_from_u64(2024)).unwrap();
        simulation.run();
        let empirical = simulation.finalize().unwrap();
        let analytic = SteadyStateSolver::new(params).unwrap().metrics();

        assert!(
            (empirical.rejection_probability() - analytic.rejection_probability()).abs() < 0.02,
            "empirical {} vs analytic {}",
            empirical.rejection_probability(),
            analytic.rejection_probability()
        );
        assert_eq!(empirical.probabilities().len(), analytic.probabilities().len());
        for (state, (e, a)) in empirical
            .probabilities()
            .iter()
            .zip(analytic.probabilities())
            .enumerate()
        {
            assert!((e - a).abs() < 0.02, "state {state}: empirical {e} vs analytic {a}");
        }
        assert!(
            (empirical.average_customers_in_queue() - analytic.average_customers_in_queue()).abs()
                < 0.05
        );
        assert!(
            (empirical.average_time_in_system() - analytic.average_time_in_system()).abs() < 0.01
        );
    }
}
