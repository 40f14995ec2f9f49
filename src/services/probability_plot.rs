use std::path::{Path, PathBuf};

use plotters::prelude::*;
use thiserror::Error;

use crate::services::convergence::ConvergenceAnalysis;

#[derive(Error, Debug)]
pub enum ProbabilityPlotError {
    #[error("nothing to plot")]
    EmptyData,
    #[error("probability vectors differ in length: {empirical} vs {analytic}")]
    LengthMismatch { empirical: usize, analytic: usize },
    #[error("failed to render probability plot: {0}")]
    Render(String),
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S-%6f";

pub fn timestamped_plot_path(dir: &str, suffix: &str) -> PathBuf {
    let stamp = chrono::Local::now().format(TIMESTAMP_FORMAT);
    Path::new(dir).join(format!("{stamp}_{suffix}.png"))
}

fn grid_shape(cells: usize) -> (usize, usize) {
    let columns = (cells as f64).sqrt().ceil().max(1.0) as usize;
    let rows = cells.div_ceil(columns).max(1);
    (rows, columns)
}

fn render_error<E: std::fmt::Display>(error: E) -> ProbabilityPlotError {
    ProbabilityPlotError::Render(error.to_string())
}

pub fn write_probability_bars_png(
    output_path: &Path,
    empirical: &[f64],
    analytic: &[f64],
    caption: &str,
) -> Result<(), ProbabilityPlotError> {
    if empirical.is_empty() {
        return Err(ProbabilityPlotError::EmptyData);
    }
    if empirical.len() != analytic.len() {
        return Err(ProbabilityPlotError::LengthMismatch {
            empirical: empirical.len(),
            analytic: analytic.len(),
        });
    }

    let max_probability = empirical
        .iter()
        .chain(analytic)
        .cloned()
        .fold(0.0, f64::max);
    let max_y = (max_probability * 1.1).max(0.01);
    let max_x = empirical.len() as f64 - 0.5;

    let root = BitMapBackend::new(output_path, (900, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(render_error)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption("Final probabilities", ("sans-serif", 30))
        .x_label_area_size(55)
        .y_label_area_size(65)
        .build_cartesian_2d(-0.5..max_x, 0.0..max_y)
        .map_err(render_error)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(caption)
        .y_desc("Probability")
        .label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .x_labels(empirical.len())
        .x_label_formatter(&|value| format!("{:.0}", value))
        .draw()
        .map_err(render_error)?;

    let empirical_color = RGBColor(30, 122, 204);
    let analytic_color = RGBColor(230, 126, 34);
    chart
        .draw_series(empirical.iter().enumerate().map(|(state, probability)| {
            let x = state as f64;
            Rectangle::new([(x - 0.35, 0.0), (x, *probability)], empirical_color.filled())
        }))
        .map_err(render_error)?
        .label("empirical")
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], empirical_color.filled()));
    chart
        .draw_series(analytic.iter().enumerate().map(|(state, probability)| {
            let x = state as f64;
            Rectangle::new([(x, 0.0), (x + 0.35, *probability)], analytic_color.filled())
        }))
        .map_err(render_error)?
        .label("analytic")
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], analytic_color.filled()));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_error)?;

    root.present().map_err(render_error)?;
    Ok(())
}

/// One chart per state: its frequency over growing prefixes of the run as
/// bars, with the analytic probability as a horizontal line.
pub fn write_convergence_png(
    output_path: &Path,
    analysis: &ConvergenceAnalysis,
    analytic: &[f64],
) -> Result<(), ProbabilityPlotError> {
    if analysis.states.is_empty() || analysis.prefix_lengths.is_empty() {
        return Err(ProbabilityPlotError::EmptyData);
    }
    if analysis.states.len() != analytic.len() {
        return Err(ProbabilityPlotError::LengthMismatch {
            empirical: analysis.states.len(),
            analytic: analytic.len(),
        });
    }

    let (rows, columns) = grid_shape(analysis.states.len());
    let intervals = analysis.prefix_lengths.len() as i32;
    let root = BitMapBackend::new(output_path, (columns as u32 * 320, rows as u32 * 260))
        .into_drawing_area();
    root.fill(&WHITE).map_err(render_error)?;

    let bar_color = RGBColor(30, 122, 204);
    for ((area, series), expected) in root
        .split_evenly((rows, columns))
        .iter()
        .zip(&analysis.states)
        .zip(analytic)
    {
        let max_y = series
            .fractions
            .iter()
            .cloned()
            .fold(*expected, f64::max)
            .max(0.01)
            * 1.1;

        let mut chart = ChartBuilder::on(area)
            .margin(10)
            .caption(format!("probability {}", series.state), ("sans-serif", 18))
            .x_label_area_size(25)
            .y_label_area_size(40)
            .build_cartesian_2d(0..intervals, 0.0..max_y)
            .map_err(render_error)?;
        chart
            .configure_mesh()
            .disable_mesh()
            .label_style(("sans-serif", 12))
            .draw()
            .map_err(render_error)?;

        chart
            .draw_series(series.fractions.iter().enumerate().map(|(index, fraction)| {
                let index = index as i32;
                Rectangle::new([(index, 0.0), (index + 1, *fraction)], bar_color.filled())
            }))
            .map_err(render_error)?;
        chart
            .draw_series(LineSeries::new(
                [(0, *expected), (intervals, *expected)],
                RED.stroke_width(2),
            ))
            .map_err(render_error)?;
    }

    root.present().map_err(render_error)?;
    Ok(())
}
