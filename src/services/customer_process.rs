use tracing::trace;

use crate::domain::outcome::CustomerOutcome;
use crate::domain::parameters::{ParameterSet, PatiencePolicy};
use crate::services::delay_sampler::DelaySampler;
use crate::services::event_clock::{EventClock, EventId};
use crate::services::queueing_simulation::SimulationEvent;
use crate::services::server_pool::{CustomerId, RequestOutcome, ServerPool};
use crate::services::statistics::StatisticsCollector;

pub struct ProcessContext<'a, S: DelaySampler> {
    pub parameters: &'a ParameterSet,
    pub clock: &'a mut EventClock<SimulationEvent>,
    pub pool: &'a mut ServerPool,
    pub sampler: &'a mut S,
    pub statistics: &'a mut StatisticsCollector,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Waiting { patience_timer: Option<EventId> },
    InService { waiting_time: f64 },
}

/// One admitted customer between arrival and termination.
#[derive(Debug)]
pub struct CustomerProcess {
    id: CustomerId,
    arrival_time: f64,
    phase: Phase,
}

impl CustomerProcess {
    // The request joins the pool first; the capacity check then looks at the
    // wait list with the request already in it. Returns `None` for a rejected
    // arrival, which has terminated by the time this returns.
    pub fn arrive<S: DelaySampler>(id: CustomerId, ctx: &mut ProcessContext<'_, S>) -> Option<Self> {
        let now = ctx.clock.now();
        ctx.statistics
            .record_arrival(ctx.pool.waiting_count(), ctx.pool.occupancy());

        let mut customer = Self {
            id,
            arrival_time: now,
            phase: Phase::Waiting {
                patience_timer: None,
            },
        };

        match ctx.pool.request(id) {
            RequestOutcome::Granted => {
                ctx.statistics.record_admission(ctx.pool.occupancy());
                trace!(customer = id, time = now, "served on arrival");
                customer.start_service(ctx);
            }
            RequestOutcome::Queued => {
                if ctx.pool.waiting_count() > ctx.parameters.queue_capacity {
                    ctx.pool.withdraw(id);
                    ctx.statistics.record_rejection();
                    trace!(customer = id, time = now, "rejected, queue full");
                    return None;
                }
                ctx.statistics.record_admission(ctx.pool.occupancy());
                let patience_timer = match ctx.parameters.patience {
                    PatiencePolicy::WithPatience => Some(ctx.clock.schedule_after(
                        ctx.sampler.patience(),
                        SimulationEvent::PatienceExpired(id),
                    )),
                    PatiencePolicy::PatienceDisabled => None,
                };
                customer.phase = Phase::Waiting { patience_timer };
                trace!(
                    customer = id,
                    time = now,
                    waiting = ctx.pool.waiting_count(),
                    "joined the queue"
                );
            }
        }
        Some(customer)
    }

    pub fn is_waiting(&self) -> bool {
        matches!(self.phase, Phase::Waiting { .. })
    }

    pub fn grant<S: DelaySampler>(&mut self, ctx: &mut ProcessContext<'_, S>) {
        if let Phase::Waiting {
            patience_timer: Some(timer),
        } = self.phase
        {
            ctx.clock.cancel(timer);
        }
        trace!(customer = self.id, time = ctx.clock.now(), "server granted");
        self.start_service(ctx);
    }

    fn start_service<S: DelaySampler>(&mut self, ctx: &mut ProcessContext<'_, S>) {
        self.phase = Phase::InService {
            waiting_time: ctx.clock.now() - self.arrival_time,
        };
        ctx.clock.schedule_after(
            ctx.sampler.service(),
            SimulationEvent::ServiceCompleted(self.id),
        );
    }

    pub fn renege<S: DelaySampler>(self, ctx: &mut ProcessContext<'_, S>) -> CustomerOutcome {
        ctx.pool.withdraw(self.id);
        let waited = ctx.clock.now() - self.arrival_time;
        ctx.statistics
            .record_termination(CustomerOutcome::Reneged, waited, waited);
        trace!(customer = self.id, time = ctx.clock.now(), waited, "reneged");
        CustomerOutcome::Reneged
    }

    /// Service finished. Frees the server and returns the waiting customer it
    /// was handed to, if any; that customer still has to be granted.
    pub fn depart<S: DelaySampler>(self, ctx: &mut ProcessContext<'_, S>) -> Option<CustomerId> {
        let sojourn = ctx.clock.now() - self.arrival_time;
        let waiting_time = match self.phase {
            Phase::InService { waiting_time } => waiting_time,
            Phase::Waiting { .. } => sojourn,
        };
        ctx.statistics
            .record_termination(CustomerOutcome::Served, waiting_time, sojourn);
        trace!(customer = self.id, time = ctx.clock.now(), sojourn, "served");
        ctx.pool.release()
    }
}
