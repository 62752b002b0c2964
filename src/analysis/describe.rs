use std::fmt;

use crate::data::filter::{filter, select_one, FilteredSeries};
use crate::data::model::Dataset;
use crate::error::{StatsError, StatsResult};

/// Descriptive statistics of a series, in `describe()` layout.
///
/// `std` and `variance` use the sample (n - 1) convention and are `None` when
/// fewer than two values are defined.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub std: Option<f64>,
    pub variance: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
    sorted: Vec<f64>,
}

impl Summary {
    /// Any quantile of the summarised values.
    pub fn quantile(&self, q: f64) -> StatsResult<f64> {
        quantile_sorted(&self.sorted, q)
    }

    /// Label/value rows for a two-column table.
    pub fn rows(&self) -> Vec<(&'static str, Stat)> {
        vec![
            ("count", Stat::Count(self.count)),
            ("mean", Stat::Value(Some(self.mean))),
            ("std", Stat::Value(self.std)),
            ("var", Stat::Value(self.variance)),
            ("min", Stat::Value(Some(self.min))),
            ("25%", Stat::Value(Some(self.q25))),
            ("50%", Stat::Value(Some(self.median))),
            ("75%", Stat::Value(Some(self.q75))),
            ("max", Stat::Value(Some(self.max))),
        ]
    }
}

/// One cell of a statistics table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stat {
    /// A tally, shown without decimals.
    Count(usize),
    /// A measured or estimated quantity; `None` renders as a dash.
    Value(Option<f64>),
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stat::Count(n) => write!(f, "{n}"),
            Stat::Value(Some(v)) => write!(f, "{v:.3}"),
            Stat::Value(None) => f.write_str("–"),
        }
    }
}

/// Number of defined values. Never fails.
pub fn count(series: &FilteredSeries<'_>) -> usize {
    series.iter().filter(|obs| obs.value.is_some()).count()
}

pub fn describe(series: &FilteredSeries<'_>) -> StatsResult<Summary> {
    describe_values(&series.values())
}

pub fn describe_values(values: &[f64]) -> StatsResult<Summary> {
    let mean = mean(values).ok_or(StatsError::EmptySeries)?;
    let variance = sample_variance(values);
    let sorted = sorted(values);

    Ok(Summary {
        count: values.len(),
        mean,
        std: variance.map(f64::sqrt),
        variance,
        min: sorted[0],
        q25: quantile_sorted(&sorted, 0.25)?,
        median: quantile_sorted(&sorted, 0.5)?,
        q75: quantile_sorted(&sorted, 0.75)?,
        max: sorted[sorted.len() - 1],
        sorted,
    })
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample variance (n - 1 denominator).
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some(ss / (values.len() - 1) as f64)
}

/// Quantile with linear interpolation between order statistics
/// (position `q * (n - 1)`).
pub fn quantile(values: &[f64], q: f64) -> StatsResult<f64> {
    quantile_sorted(&sorted(values), q)
}

fn quantile_sorted(sorted: &[f64], q: f64) -> StatsResult<f64> {
    if !(0.0..=1.0).contains(&q) {
        return Err(StatsError::InvalidParameter(format!(
            "quantile {q} outside [0, 1]"
        )));
    }
    if sorted.is_empty() {
        return Err(StatsError::EmptySeries);
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Ok(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(f64::total_cmp);
    v
}

// ---------------------------------------------------------------------------
// Variability per category
// ---------------------------------------------------------------------------

/// Spread of one category over the whole dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryVariability {
    pub category: String,
    pub count: usize,
    pub variance: Option<f64>,
    pub std: Option<f64>,
}

/// Variance and standard deviation of every category, in dataset order.
pub fn variability_by_category(dataset: &Dataset) -> Vec<CategoryVariability> {
    dataset
        .categories()
        .iter()
        .map(|category| {
            let values = filter(dataset, &select_one(category.as_str())).values();
            let variance = sample_variance(&values);
            CategoryVariability {
                category: category.clone(),
                count: values.len(),
                variance,
                std: variance.map(f64::sqrt),
            }
        })
        .collect()
}
