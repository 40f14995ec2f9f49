use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::domain::metrics::QueueingMetrics;
use crate::domain::parameters::ParameterSet;
use crate::services::chi_squared::ChiSquaredTest;
use crate::services::convergence::ConvergenceAnalysis;
use crate::services::statistics::StatisticsCollector;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to serialize report as yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("failed to serialize report as json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write report: {0}")]
    Write(#[from] std::io::Error),
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub arrivals: usize,
    pub served: usize,
    pub reneged: usize,
    pub rejected: usize,
    pub in_flight: usize,
}

impl OutcomeCounts {
    pub fn from_statistics(statistics: &StatisticsCollector, in_flight: usize) -> Self {
        Self {
            arrivals: statistics.arrivals(),
            served: statistics.served(),
            reneged: statistics.reneged(),
            rejected: statistics.rejected(),
            in_flight,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct EmpiricalReport {
    pub seed: u64,
    pub outcomes: OutcomeCounts,
    pub metrics: QueueingMetrics,
}

/// Both sides of one sweep point.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SweepColumn {
    pub service_rate: f64,
    pub queue_capacity: usize,
    pub analytic: QueueingMetrics,
    pub empirical: QueueingMetrics,
}

#[derive(Serialize, Debug, Clone)]
pub struct ComparisonReport {
    pub generated_at: String,
    pub parameters: ParameterSet,
    pub analytic: Option<QueueingMetrics>,
    pub empirical: Option<EmpiricalReport>,
    pub chi_squared: Option<ChiSquaredTest>,
    pub convergence: Option<ConvergenceAnalysis>,
}

impl ComparisonReport {
    pub fn new(parameters: ParameterSet) -> Self {
        Self {
            generated_at: chrono::Local::now().to_rfc3339(),
            parameters,
            analytic: None,
            empirical: None,
            chi_squared: None,
            convergence: None,
        }
    }
}

/// Serializes the report as JSON when `path` ends in `.json`, as YAML otherwise.
pub fn serialize_report(path: &str, report: &ComparisonReport) -> Result<String, ReportError> {
    let is_json = Path::new(path)
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(serde_json::to_string_pretty(report)?)
    } else {
        Ok(serde_yaml::to_string(report)?)
    }
}

pub fn write_report(path: &str, report: &ComparisonReport) -> Result<(), ReportError> {
    let contents = serialize_report(path, report)?;
    std::fs::write(path, contents)?;
    Ok(())
}
