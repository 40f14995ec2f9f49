//! Stationary distribution of the finite birth-death chain with states
//! `0..=n+m` (customers in the system).
//!
//! Birth rate is `λ` everywhere. Death rate is `kμ` for `k <= n` and
//! `nμ + iv` in queue state `n + i`, so the unnormalised weights are
//! `ρ^k / k!` and `ρ^n / n! · ρ^i / Π_{l=1..i}(n + lβ)`. The weights are
//! accumulated as logarithms and normalised with the largest one factored out,
//! which keeps every intermediate finite for large `n`, `m` or `ρ`.

use thiserror::Error;
use tracing::debug;

use crate::domain::metrics::QueueingMetrics;
use crate::domain::parameters::{ParameterError, ParameterSet, PatiencePolicy};
use crate::services::analytic_metrics::analytic_metrics;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("invalid parameters: {0}")]
    InvalidParameter(#[from] ParameterError),
    #[error("stationary probabilities are not representable for rho = {rho}, n = {servers}, m = {capacity}")]
    NumericOverflow {
        rho: f64,
        servers: usize,
        capacity: usize,
    },
}

#[derive(Debug, Clone)]
pub struct SteadyStateSolver {
    parameters: ParameterSet,
    probabilities: Vec<f64>,
}

impl SteadyStateSolver {
    pub fn new(parameters: ParameterSet) -> Result<Self, SolverError> {
        parameters.validate()?;
        if parameters.patience == PatiencePolicy::PatienceDisabled && parameters.server_count != 1
        {
            return Err(ParameterError::UnsupportedServerCount(parameters.server_count).into());
        }

        let probabilities = stationary_distribution(&parameters)?;
        debug!(
            rho = parameters.rho(),
            beta = parameters.beta(),
            rejection = probabilities.last().copied().unwrap_or_default(),
            "steady state solved"
        );
        Ok(Self {
            parameters,
            probabilities,
        })
    }

    /// `[P0, P1..Pn, P(n+1)..P(n+m)]`; the last entry is the rejection probability.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn metrics(&self) -> QueueingMetrics {
        analytic_metrics(&self.parameters, &self.probabilities)
    }
}

fn log_weights(parameters: &ParameterSet) -> Vec<f64> {
    let n = parameters.server_count;
    let beta = parameters.beta();
    let ln_rho = parameters.rho().ln();

    let mut weights = Vec::with_capacity(parameters.state_count());
    let mut current = 0.0;
    weights.push(current);
    for k in 1..=n {
        current += ln_rho - (k as f64).ln();
        weights.push(current);
    }
    for l in 1..=parameters.queue_capacity {
        current += ln_rho - (n as f64 + l as f64 * beta).ln();
        weights.push(current);
    }
    weights
}

fn stationary_distribution(parameters: &ParameterSet) -> Result<Vec<f64>, SolverError> {
    let overflow = || SolverError::NumericOverflow {
        rho: parameters.rho(),
        servers: parameters.server_count,
        capacity: parameters.queue_capacity,
    };

    let log_weights = log_weights(parameters);
    let max = log_weights
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return Err(overflow());
    }

    let scaled: Vec<f64> = log_weights.iter().map(|w| (w - max).exp()).collect();
    let total: f64 = scaled.iter().sum();
    let probabilities: Vec<f64> = scaled.iter().map(|w| w / total).collect();
    if !total.is_finite() || probabilities.iter().any(|p| !p.is_finite()) {
        return Err(overflow());
    }
    Ok(probabilities)
}
