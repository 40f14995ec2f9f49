use crate::services::delay_sampler::DelaySampler;
use crate::services::event_clock::EventClock;
use crate::services::queueing_simulation::SimulationEvent;
use crate::services::server_pool::CustomerId;

/// Endless Poisson stream of customers. Each arrival schedules the next one,
/// so the stream only stops when the clock reaches its horizon.
#[derive(Debug, Default)]
pub struct ArrivalGenerator {
    next_customer: CustomerId,
}

impl ArrivalGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self, clock: &mut EventClock<SimulationEvent>) {
        clock.schedule_after(0.0, SimulationEvent::Arrival);
    }

    pub fn on_arrival<S: DelaySampler>(
        &mut self,
        clock: &mut EventClock<SimulationEvent>,
        sampler: &mut S,
    ) -> CustomerId {
        let customer = self.next_customer;
        self.next_customer += 1;
        clock.schedule_after(sampler.inter_arrival(), SimulationEvent::Arrival);
        customer
    }

    pub fn arrivals(&self) -> u64 {
        self.next_customer
    }
}
