use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("{name} must be a positive finite number, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("server count must be greater than zero")]
    ZeroServers,
    #[error("patience-disabled analytic model is defined for a single server, got {0}")]
    UnsupportedServerCount(usize),
    #[error("{servers} servers and {capacity} waiting places exceed the limit of {} states", MAX_STATE_COUNT)]
    TooManyStates { servers: usize, capacity: usize },
}

// Upper bound on `n + m + 1`, the length of every probability vector.
pub const MAX_STATE_COUNT: usize = 1_000_000;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PatiencePolicy {
    #[default]
    WithPatience,
    PatienceDisabled,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ParameterSet {
    pub arrival_rate: f64,
    pub service_rate: f64,
    pub server_count: usize,
    pub queue_capacity: usize,
    #[serde(default)]
    pub patience_rate: f64,
    pub horizon: f64,
    #[serde(default)]
    pub patience: PatiencePolicy,
}

impl ParameterSet {
    pub fn validate(&self) -> Result<(), ParameterError> {
        ensure_positive("arrival rate", self.arrival_rate)?;
        ensure_positive("service rate", self.service_rate)?;
        if self.patience == PatiencePolicy::WithPatience {
            ensure_positive("patience rate", self.patience_rate)?;
        }
        ensure_positive("horizon", self.horizon)?;
        if self.server_count == 0 {
            return Err(ParameterError::ZeroServers);
        }
        let states = self
            .server_count
            .checked_add(self.queue_capacity)
            .and_then(|levels| levels.checked_add(1));
        if !states.is_some_and(|states| states <= MAX_STATE_COUNT) {
            return Err(ParameterError::TooManyStates {
                servers: self.server_count,
                capacity: self.queue_capacity,
            });
        }
        Ok(())
    }

    pub fn rho(&self) -> f64 {
        self.arrival_rate / self.service_rate
    }

    /// Patience relative to service, `v / μ`. Zero when patience is disabled.
    pub fn beta(&self) -> f64 {
        match self.patience {
            PatiencePolicy::WithPatience => self.patience_rate / self.service_rate,
            PatiencePolicy::PatienceDisabled => 0.0,
        }
    }

    /// Number of states `n + m + 1` of the birth-death chain, which is also
    /// the length of every probability vector. Bounded by `validate`.
    pub fn state_count(&self) -> usize {
        self.server_count
            .saturating_add(self.queue_capacity)
            .saturating_add(1)
    }
}

fn ensure_positive(name: &'static str, value: f64) -> Result<(), ParameterError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ParameterError::NonPositive { name, value })
    }
}
