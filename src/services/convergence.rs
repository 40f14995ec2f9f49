use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvergenceError {
    #[error("interval count must be greater than zero")]
    ZeroIntervals,
    #[error("{snapshots} snapshots cannot be split into {intervals} intervals")]
    TooFewSnapshots { snapshots: usize, intervals: usize },
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StateConvergence {
    pub state: usize,
    pub fractions: Vec<f64>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ConvergenceAnalysis {
    pub prefix_lengths: Vec<usize>,
    pub states: Vec<StateConvergence>,
}

pub fn split_evenly(len: usize, parts: usize) -> Vec<usize> {
    if parts == 0 {
        return Vec::new();
    }
    let base = len / parts;
    let longer = len % parts;
    (0..parts)
        .map(|index| if index < longer { base + 1 } else { base })
        .collect()
}

/// Splits the per-arrival occupancy snapshots into `interval_count` chunks and
/// reports, for every state `0..state_count`, its frequency within each
/// cumulative prefix. The last prefix covers the whole run.
pub fn convergence_analysis(
    snapshots: &[usize],
    state_count: usize,
    interval_count: usize,
) -> Result<ConvergenceAnalysis, ConvergenceError> {
    if interval_count == 0 {
        return Err(ConvergenceError::ZeroIntervals);
    }
    if snapshots.len() < interval_count {
        return Err(ConvergenceError::TooFewSnapshots {
            snapshots: snapshots.len(),
            intervals: interval_count,
        });
    }

    let mut counts = vec![0usize; state_count];
    let mut prefix_lengths = Vec::with_capacity(interval_count);
    let mut states: Vec<StateConvergence> = (0..state_count)
        .map(|state| StateConvergence {
            state,
            fractions: Vec::with_capacity(interval_count),
        })
        .collect();

    let mut start = 0;
    for size in split_evenly(snapshots.len(), interval_count) {
        let end = start + size;
        for snapshot in &snapshots[start..end] {
            if let Some(count) = counts.get_mut(*snapshot) {
                *count += 1;
            }
        }
        for (series, count) in states.iter_mut().zip(&counts) {
            series.fractions.push(*count as f64 / end as f64);
        }
        prefix_lengths.push(end);
        start = end;
    }

    Ok(ConvergenceAnalysis {
        prefix_lengths,
        states,
    })
}
