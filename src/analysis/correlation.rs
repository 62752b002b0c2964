use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::data::filter::FilteredSeries;
use crate::error::{StatsError, StatsResult};

/// How a date is turned into the numeric time axis of the correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeEncoding {
    /// Calendar year only. Months of the same year share one x value.
    #[default]
    Year,
    /// Days since 0001-01-01; keeps month resolution.
    Ordinal,
}

impl TimeEncoding {
    pub fn encode(self, date: NaiveDate) -> f64 {
        match self {
            TimeEncoding::Year => date.year() as f64,
            TimeEncoding::Ordinal => date.num_days_from_ce() as f64,
        }
    }
}

/// Pearson correlation between time and value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correlation {
    pub coefficient: f64,
    /// Two-tailed p-value of the t test on `coefficient`.
    pub p_value: f64,
    /// Number of pairs used after dropping missing values.
    pub sample_size: usize,
}

/// Correlate the time axis with the observed values.
///
/// Rows with a missing value are dropped before computing, which shrinks the
/// sample size.
pub fn correlate(series: &FilteredSeries<'_>, encoding: TimeEncoding) -> StatsResult<Correlation> {
    let (x, y): (Vec<f64>, Vec<f64>) = series
        .iter()
        .filter_map(|obs| obs.value.map(|v| (encoding.encode(obs.date), v)))
        .unzip();
    pearson(&x, &y)
}

/// Pearson's r with a two-tailed Student t significance test.
///
/// A constant axis has no linear association: r = 0, p = 1.
pub fn pearson(x: &[f64], y: &[f64]) -> StatsResult<Correlation> {
    let n = x.len().min(y.len());
    if n < 2 {
        return Err(StatsError::InsufficientData {
            required: 2,
            found: n,
        });
    }
    let (x, y) = (&x[..n], &y[..n]);

    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;
    let cov: f64 = x
        .iter()
        .zip(y)
        .map(|(a, b)| (a - mean_x) * (b - mean_y))
        .sum();
    let ss_x: f64 = x.iter().map(|a| (a - mean_x).powi(2)).sum();
    let ss_y: f64 = y.iter().map(|b| (b - mean_y).powi(2)).sum();

    if ss_x == 0.0 || ss_y == 0.0 {
        return Ok(Correlation {
            coefficient: 0.0,
            p_value: 1.0,
            sample_size: n,
        });
    }

    let r = (cov / (ss_x.sqrt() * ss_y.sqrt())).clamp(-1.0, 1.0);
    Ok(Correlation {
        coefficient: r,
        p_value: p_value_for_r(r, n),
        sample_size: n,
    })
}

fn p_value_for_r(r: f64, n: usize) -> f64 {
    // Two points always lie on a line; the test has no degrees of freedom.
    if n < 3 {
        return 1.0;
    }
    if r.abs() >= 1.0 {
        return 0.0;
    }

    let df = (n - 2) as f64;
    let t_stat = r * (df / (1.0 - r * r)).sqrt();
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * dist.sf(t_stat.abs())).clamp(0.0, 1.0),
        Err(e) => {
            log::warn!("t distribution with {df} degrees of freedom: {e}");
            1.0
        }
    }
}
