use crate::data::filter::FilteredSeries;
use crate::error::{StatsError, StatsResult};

/// One equal-width bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
    /// `count / (total * width)`, so the bar areas sum to 1.
    pub density: f64,
}

impl Bin {
    pub fn center(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

pub fn histogram(series: &FilteredSeries<'_>, bins: usize) -> StatsResult<Vec<Bin>> {
    histogram_values(&series.values(), bins)
}

/// Probability-density histogram over `[min, max]`. The last bin is closed on
/// the right. A constant input gets one bin of width 1 centred on the value.
pub fn histogram_values(values: &[f64], bins: usize) -> StatsResult<Vec<Bin>> {
    if bins == 0 {
        return Err(StatsError::InvalidParameter("histogram needs at least one bin".into()));
    }
    if values.is_empty() {
        return Err(StatsError::EmptySeries);
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let total = values.len() as f64;

    if min == max {
        return Ok(vec![Bin {
            lower: min - 0.5,
            upper: min + 0.5,
            count: values.len(),
            density: 1.0,
        }]);
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            lower: min + width * i as f64,
            upper: min + width * (i + 1) as f64,
            count,
            density: count as f64 / (total * width),
        })
        .collect())
}
