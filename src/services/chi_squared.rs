use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChiSquaredError {
    #[error("rows of the contingency table differ in length: {first} vs {second}")]
    LengthMismatch { first: usize, second: usize },
    #[error("contingency table has an empty row")]
    EmptyRow,
    #[error("contingency table holds a negative or non-finite entry: {0}")]
    InvalidEntry(f64),
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct ChiSquaredTest {
    pub statistic: f64,
    pub degrees_of_freedom: usize,
    pub p_value: f64,
}

/// Pearson test of homogeneity on the 2×K table `[first, second]`.
///
/// Columns without any mass carry no information and are dropped before the
/// expected frequencies are formed. With a single degree of freedom the
/// Yates continuity correction is applied.
pub fn chi_squared_test(first: &[f64], second: &[f64]) -> Result<ChiSquaredTest, ChiSquaredError> {
    if first.len() != second.len() {
        return Err(ChiSquaredError::LengthMismatch {
            first: first.len(),
            second: second.len(),
        });
    }
    if let Some(entry) = first
        .iter()
        .chain(second)
        .find(|value| !value.is_finite() || **value < 0.0)
    {
        return Err(ChiSquaredError::InvalidEntry(*entry));
    }

    let columns: Vec<(f64, f64)> = first
        .iter()
        .zip(second)
        .map(|(a, b)| (*a, *b))
        .filter(|(a, b)| a + b > 0.0)
        .collect();
    let first_total: f64 = columns.iter().map(|(a, _)| a).sum();
    let second_total: f64 = columns.iter().map(|(_, b)| b).sum();
    if first_total <= 0.0 || second_total <= 0.0 {
        return Err(ChiSquaredError::EmptyRow);
    }

    let degrees_of_freedom = columns.len() - 1;
    if degrees_of_freedom == 0 {
        return Ok(ChiSquaredTest {
            statistic: 0.0,
            degrees_of_freedom,
            p_value: 1.0,
        });
    }

    let total = first_total + second_total;
    let yates = degrees_of_freedom == 1;
    let statistic: f64 = columns
        .iter()
        .flat_map(|(a, b)| {
            let column_total = a + b;
            [
                (*a, first_total * column_total / total),
                (*b, second_total * column_total / total),
            ]
        })
        .map(|(observed, expected)| {
            let mut difference = (observed - expected).abs();
            if yates {
                difference -= difference.min(0.5);
            }
            difference * difference / expected
        })
        .sum();

    Ok(ChiSquaredTest {
        statistic,
        degrees_of_freedom,
        p_value: chi_squared_survival(statistic, degrees_of_freedom),
    })
}

/// Upper tail `P(X > statistic)` of a chi-squared distribution.
pub fn chi_squared_survival(statistic: f64, degrees_of_freedom: usize) -> f64 {
    regularized_upper_gamma(degrees_of_freedom as f64 / 2.0, statistic / 2.0)
}

const MAX_ITERATIONS: usize = 500;
const TINY: f64 = 1e-300;

fn regularized_upper_gamma(a: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 1.0;
    }
    if x < a + 1.0 {
        (1.0 - lower_gamma_series(a, x)).clamp(0.0, 1.0)
    } else {
        upper_gamma_fraction(a, x).clamp(0.0, 1.0)
    }
}

fn gamma_prefactor(a: f64, x: f64) -> f64 {
    (a * x.ln() - x - ln_gamma(a)).exp()
}

// Converges quickly for x < a + 1.
fn lower_gamma_series(a: f64, x: f64) -> f64 {
    let mut denominator = a;
    let mut term = 1.0 / a;
    let mut sum = term;
    for _ in 0..MAX_ITERATIONS {
        denominator += 1.0;
        term *= x / denominator;
        sum += term;
        if term.abs() < sum.abs() * f64::EPSILON {
            break;
        }
    }
    sum * gamma_prefactor(a, x)
}

// Modified Lentz evaluation, valid for x >= a + 1.
fn upper_gamma_fraction(a: f64, x: f64) -> f64 {
    let mut b = x + 1.0 - a;
    let mut c = 1.0 / TINY;
    let mut d = 1.0 / b;
    let mut fraction = d;
    for i in 1..=MAX_ITERATIONS {
        let i = i as f64;
        let numerator = -i * (i - a);
        b += 2.0;
        d = numerator * d + b;
        if d.abs() < TINY {
            d = TINY;
        }
        c = b + numerator / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        let delta = d * c;
        fraction *= delta;
        if (delta - 1.0).abs() < f64::EPSILON {
            break;
        }
    }
    gamma_prefactor(a, x) * fraction
}

/// Lanczos approximation (g = 7) of `ln Γ(x)` for `x > 0`.
fn ln_gamma(x: f64) -> f64 {
    const G: f64 = 7.0;
    const COEFFICIENTS: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];

    let x = x - 1.0;
    let series = COEFFICIENTS
        .iter()
        .enumerate()
        .skip(1)
        .fold(COEFFICIENTS[0], |sum, (i, c)| sum + c / (x + i as f64));
    let t = x + G + 0.5;
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + series.ln()
}
