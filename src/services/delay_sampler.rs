use rand::Rng;
use rand_distr::{Distribution, Exp};
use thiserror::Error;

use crate::domain::parameters::ParameterSet;

#[derive(Error, Debug)]
pub enum SamplerError {
    #[error("invalid {name} for an exponential distribution: {message}")]
    InvalidRate { name: &'static str, message: String },
}

/// Source of the three random delays that drive a simulation run.
pub trait DelaySampler {
    fn inter_arrival(&mut self) -> f64;
    fn service(&mut self) -> f64;
    fn patience(&mut self) -> f64;
}

pub struct ExponentialSampler<R: Rng> {
    rng: R,
    arrival: Exp<f64>,
    service: Exp<f64>,
    patience: Exp<f64>,
}

impl<R: Rng> ExponentialSampler<R> {
    pub fn new(parameters: &ParameterSet, rng: R) -> Result<Self, SamplerError> {
        Ok(Self {
            rng,
            arrival: exponential("arrival rate", parameters.arrival_rate)?,
            service: exponential("service rate", parameters.service_rate)?,
            patience: exponential("patience rate", parameters.patience_rate)?,
        })
    }
}

fn exponential(name: &'static str, rate: f64) -> Result<Exp<f64>, SamplerError> {
    Exp::new(rate).map_err(|e| SamplerError::InvalidRate {
        name,
        message: e.to_string(),
    })
}

impl<R: Rng> DelaySampler for ExponentialSampler<R> {
    fn inter_arrival(&mut self) -> f64 {
        self.arrival.sample(&mut self.rng)
    }

    fn service(&mut self) -> f64 {
        self.service.sample(&mut self.rng)
    }

    fn patience(&mut self) -> f64 {
        self.patience.sample(&mut self.rng)
    }
}
