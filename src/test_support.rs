use std::collections::VecDeque;

use crate::domain::parameters::{ParameterSet, PatiencePolicy};
use crate::services::delay_sampler::DelaySampler;

// Returned once a script runs dry, far beyond any horizon used in tests
const EXHAUSTED: f64 = 1e9;

// A DelaySampler that replays fixed delays in order
#[derive(Debug, Default)]
pub struct ScriptedSampler {
    inter_arrivals: VecDeque<f64>,
    services: VecDeque<f64>,
    patiences: VecDeque<f64>,
}

impl ScriptedSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inter_arrivals(mut self, delays: &[f64]) -> Self {
        self.inter_arrivals = delays.iter().copied().collect();
        self
    }

    pub fn services(mut self, delays: &[f64]) -> Self {
        self.services = delays.iter().copied().collect();
        self
    }

    pub fn patiences(mut self, delays: &[f64]) -> Self {
        self.patiences = delays.iter().copied().collect();
        self
    }
}

impl DelaySampler for ScriptedSampler {
    fn inter_arrival(&mut self) -> f64 {
        self.inter_arrivals.pop_front().unwrap_or(EXHAUSTED)
    }

    fn service(&mut self) -> f64 {
        self.services.pop_front().unwrap_or(EXHAUSTED)
    }

    fn patience(&mut self) -> f64 {
        self.patiences.pop_front().unwrap_or(EXHAUSTED)
    }
}

pub fn parameters(
    arrival_rate: f64,
    service_rate: f64,
    server_count: usize,
    queue_capacity: usize,
    patience_rate: f64,
) -> ParameterSet {
    ParameterSet {
        arrival_rate,
        service_rate,
        server_count,
        queue_capacity,
        patience_rate,
        horizon: 100.0,
        patience: PatiencePolicy::WithPatience,
    }
}
