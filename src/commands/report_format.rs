use crate::domain::metrics::QueueingMetrics;
use crate::domain::parameters::{ParameterSet, PatiencePolicy};
use crate::services::chi_squared::ChiSquaredTest;
use crate::services::comparison_types::{OutcomeCounts, SweepColumn};

pub fn format_parameters(parameters: &ParameterSet) -> String {
    let patience = match parameters.patience {
        PatiencePolicy::WithPatience => format!("{}", parameters.patience_rate),
        PatiencePolicy::PatienceDisabled => "disabled".to_string(),
    };

    let mut lines = Vec::new();
    lines.push("Input parameters".to_string());
    lines.push(format!("Arrival rate (lambda): {}", parameters.arrival_rate));
    lines.push(format!("Service rate (mu): {}", parameters.service_rate));
    lines.push(format!("Servers (n): {}", parameters.server_count));
    lines.push(format!("Queue capacity (m): {}", parameters.queue_capacity));
    lines.push(format!("Patience rate (v): {patience}"));
    lines.push(format!("Horizon: {}", parameters.horizon));

    lines.join("\n")
}

pub fn format_metrics(title: &str, metrics: &QueueingMetrics) -> String {
    let mut lines = Vec::new();
    lines.push(format!("{title} statistics"));
    lines.push("Probabilities:".to_string());
    for (state, probability) in metrics.probabilities().iter().enumerate() {
        lines.push(format!("#{state}: {probability:.6}"));
    }
    lines.push(format!("Sum: {:.6}", metrics.probability_sum()));
    lines.push(String::new());
    for (label, value) in kpi_rows(metrics) {
        lines.push(format!("{label}: {value:.6}"));
    }

    lines.join("\n")
}

pub fn format_outcomes(seed: u64, outcomes: &OutcomeCounts) -> String {
    format!(
        "Seed: {seed}\nArrivals: {} (served {}, reneged {}, rejected {}, in flight {})",
        outcomes.arrivals, outcomes.served, outcomes.reneged, outcomes.rejected, outcomes.in_flight
    )
}

pub fn format_chi_squared(test: &ChiSquaredTest) -> String {
    format!(
        "Chi-squared: statistic {:.6}, degrees of freedom {}, p-value {:.6}",
        test.statistic, test.degrees_of_freedom, test.p_value
    )
}

/// One analytic and one empirical row per KPI, one column per sweep point.
pub fn format_sweep_table(columns: &[SweepColumn]) -> String {
    let mut lines = Vec::new();
    let header: Vec<String> = columns
        .iter()
        .map(|column| format!("mu={} m={}", column.service_rate, column.queue_capacity))
        .collect();
    lines.push(format!("KPI | {}", header.join(" | ")));
    lines.push(format!(
        "----|{}",
        vec!["-----"; columns.len()].join("|")
    ));

    let analytic: Vec<Vec<(&'static str, f64)>> = columns
        .iter()
        .map(|column| kpi_rows(&column.analytic))
        .collect();
    let empirical: Vec<Vec<(&'static str, f64)>> = columns
        .iter()
        .map(|column| kpi_rows(&column.empirical))
        .collect();
    if let Some(first) = analytic.first() {
        for (index, (label, _)) in first.iter().enumerate() {
            for (side, rows) in [("analytic", &analytic), ("empirical", &empirical)] {
                let values: Vec<String> = rows
                    .iter()
                    .map(|row| format!("{:.6}", row[index].1))
                    .collect();
                lines.push(format!("{label} ({side}) | {}", values.join(" | ")));
            }
        }
    }

    lines.join("\n")
}

fn kpi_rows(metrics: &QueueingMetrics) -> Vec<(&'static str, f64)> {
    vec![
        ("Probability of rejection", metrics.rejection_probability()),
        ("Relative bandwidth", metrics.relative_bandwidth()),
        ("Absolute bandwidth", metrics.absolute_bandwidth()),
        (
            "Average customers in queue",
            metrics.average_customers_in_queue(),
        ),
        (
            "Average customers in system",
            metrics.average_customers_in_system(),
        ),
        ("Average time in queue", metrics.average_time_in_queue()),
        ("Average time in system", metrics.average_time_in_system()),
        ("Average busy servers", metrics.average_busy_servers()),
    ]
}
