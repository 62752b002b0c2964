use serde::Deserialize;
use statrs::distribution::{Continuous, Normal};
use statrs::function::factorial::{ln_binomial, ln_factorial};

use super::describe::{mean, quantile, sample_variance, Stat};
use crate::data::filter::FilteredSeries;
use crate::error::{StatsError, StatsResult};

// ---------------------------------------------------------------------------
// Threshold – what counts as an exceedance
// ---------------------------------------------------------------------------

/// Exceedance threshold, either relative to the data or absolute.
///
/// In TOML: `{ quantile = 0.9 }` or `{ value = 25.0 }`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Threshold {
    /// The q-th quantile of the defined values.
    Quantile(f64),
    /// A fixed value in the data's unit (°C).
    Value(f64),
}

impl Threshold {
    /// The threshold in data units for `values`.
    pub fn resolve(self, values: &[f64]) -> StatsResult<f64> {
        match self {
            Threshold::Quantile(q) => quantile(values, q),
            Threshold::Value(v) if v.is_finite() => Ok(v),
            Threshold::Value(v) => Err(StatsError::InvalidParameter(format!(
                "threshold {v} is not finite"
            ))),
        }
    }
}

fn exceedances(values: &[f64], threshold: f64) -> usize {
    values.iter().filter(|&&v| v > threshold).count()
}

// ---------------------------------------------------------------------------
// Mass / density functions
// ---------------------------------------------------------------------------

/// `λ^x e^{-λ} / x!`, evaluated in log space. `λ = 0` puts all mass at 0.
pub fn poisson_pmf(x: u64, lambda: f64) -> f64 {
    if lambda <= 0.0 {
        return if x == 0 { 1.0 } else { 0.0 };
    }
    (x as f64 * lambda.ln() - lambda - ln_factorial(x)).exp()
}

/// `C(n, x) p^x (1-p)^{n-x}`, evaluated in log space. `p = 0` and `p = 1`
/// put all mass at 0 and n respectively.
pub fn binomial_pmf(x: u64, n: u64, p: f64) -> f64 {
    if x > n {
        return 0.0;
    }
    if p <= 0.0 {
        return if x == 0 { 1.0 } else { 0.0 };
    }
    if p >= 1.0 {
        return if x == n { 1.0 } else { 0.0 };
    }
    (ln_binomial(n, x) + x as f64 * p.ln() + (n - x) as f64 * (1.0 - p).ln()).exp()
}

// ---------------------------------------------------------------------------
// Normal fit
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct NormalFit {
    pub mu: f64,
    pub sigma: f64,
    /// Evenly spaced over `[mu - 3σ, mu + 3σ]`.
    pub x: Vec<f64>,
    pub density: Vec<f64>,
}

impl NormalFit {
    pub fn curve(&self) -> Vec<[f64; 2]> {
        self.x.iter().zip(&self.density).map(|(&x, &y)| [x, y]).collect()
    }
}

pub fn fit_normal(series: &FilteredSeries<'_>, resolution: usize) -> StatsResult<NormalFit> {
    fit_normal_values(&series.values(), resolution)
}

/// Fit a normal density to `values` (sample standard deviation).
///
/// A constant input (including a single value) is `DegenerateDistribution`.
pub fn fit_normal_values(values: &[f64], resolution: usize) -> StatsResult<NormalFit> {
    if resolution < 2 {
        return Err(StatsError::InvalidParameter(format!(
            "normal curve needs at least 2 points, got {resolution}"
        )));
    }
    let mu = mean(values).ok_or(StatsError::EmptySeries)?;
    if values.iter().all(|&v| v == values[0]) {
        return Err(StatsError::DegenerateDistribution { value: values[0] });
    }
    let sigma = sample_variance(values)
        .map(f64::sqrt)
        .ok_or(StatsError::InsufficientData {
            required: 2,
            found: values.len(),
        })?;

    let dist = Normal::new(mu, sigma).map_err(|e| StatsError::InvalidParameter(e.to_string()))?;
    let lo = mu - 3.0 * sigma;
    let step = 6.0 * sigma / (resolution - 1) as f64;
    let x: Vec<f64> = (0..resolution).map(|i| lo + step * i as f64).collect();
    let density = x.iter().map(|&xi| dist.pdf(xi)).collect();

    Ok(NormalFit {
        mu,
        sigma,
        x,
        density,
    })
}

/// What to draw over the histogram: a density curve, or a single spike when
/// the data has no spread.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalOverlay {
    Curve(NormalFit),
    PointMass(f64),
}

pub fn normal_overlay(series: &FilteredSeries<'_>, resolution: usize) -> StatsResult<NormalOverlay> {
    match fit_normal(series, resolution) {
        Ok(fit) => Ok(NormalOverlay::Curve(fit)),
        Err(StatsError::DegenerateDistribution { value }) => Ok(NormalOverlay::PointMass(value)),
        Err(e) => Err(e),
    }
}

// ---------------------------------------------------------------------------
// Poisson extreme-event model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct PoissonFit {
    pub threshold: f64,
    /// Observations strictly above `threshold`.
    pub events: usize,
    /// Series length, missing values included.
    pub periods: usize,
    /// Events per period.
    pub lambda: f64,
    /// Support `0..events + 5`.
    pub x: Vec<u64>,
    pub pmf: Vec<f64>,
    /// `pmf` scaled by the observed event count.
    pub expected_counts: Vec<f64>,
}

impl PoissonFit {
    pub fn curve(&self) -> Vec<[f64; 2]> {
        self.x.iter().zip(&self.pmf).map(|(&x, &y)| [x as f64, y]).collect()
    }
}

pub fn fit_poisson(series: &FilteredSeries<'_>, threshold: Threshold) -> StatsResult<PoissonFit> {
    fit_poisson_values(&series.values(), series.len(), threshold)
}

/// `values` are the defined values of a series of `periods` rows.
pub fn fit_poisson_values(
    values: &[f64],
    periods: usize,
    threshold: Threshold,
) -> StatsResult<PoissonFit> {
    if periods == 0 {
        return Err(StatsError::EmptySeries);
    }
    let threshold = threshold.resolve(values)?;
    let events = exceedances(values, threshold);
    let lambda = events as f64 / periods as f64;

    let x: Vec<u64> = (0..events as u64 + 5).collect();
    let pmf: Vec<f64> = x.iter().map(|&k| poisson_pmf(k, lambda)).collect();
    let expected_counts = pmf.iter().map(|p| p * events as f64).collect();

    Ok(PoissonFit {
        threshold,
        events,
        periods,
        lambda,
        x,
        pmf,
        expected_counts,
    })
}

// ---------------------------------------------------------------------------
// Binomial threshold-exceedance model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct BinomialFit {
    pub threshold: f64,
    /// Series length, missing values included.
    pub trials: usize,
    /// Observations strictly above `threshold`.
    pub successes: usize,
    pub p: f64,
    /// Support `0..=trials`.
    pub x: Vec<u64>,
    pub pmf: Vec<f64>,
}

impl BinomialFit {
    pub fn curve(&self) -> Vec<[f64; 2]> {
        self.x.iter().zip(&self.pmf).map(|(&x, &y)| [x as f64, y]).collect()
    }
}

pub fn fit_binomial(series: &FilteredSeries<'_>, threshold: Threshold) -> StatsResult<BinomialFit> {
    fit_binomial_values(&series.values(), series.len(), threshold)
}

pub fn fit_binomial_values(
    values: &[f64],
    trials: usize,
    threshold: Threshold,
) -> StatsResult<BinomialFit> {
    if trials == 0 {
        return Err(StatsError::EmptySeries);
    }
    let threshold = threshold.resolve(values)?;
    let successes = exceedances(values, threshold);
    let p = successes as f64 / trials as f64;

    let n = trials as u64;
    let x: Vec<u64> = (0..=n).collect();
    let pmf = x.iter().map(|&k| binomial_pmf(k, n, p)).collect();

    Ok(BinomialFit {
        threshold,
        trials,
        successes,
        p,
        x,
        pmf,
    })
}

// ---------------------------------------------------------------------------
// DistributionFit – any of the three
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum DistributionFit {
    Normal(NormalFit),
    Poisson(PoissonFit),
    Binomial(BinomialFit),
}

impl DistributionFit {
    pub fn name(&self) -> &'static str {
        match self {
            DistributionFit::Normal(_) => "Normal",
            DistributionFit::Poisson(_) => "Poisson",
            DistributionFit::Binomial(_) => "Binomial",
        }
    }

    /// Estimated parameters as label/value pairs.
    pub fn parameters(&self) -> Vec<(&'static str, Stat)> {
        let value = |v: f64| Stat::Value(Some(v));
        match self {
            DistributionFit::Normal(f) => vec![("μ", value(f.mu)), ("σ", value(f.sigma))],
            DistributionFit::Poisson(f) => vec![
                ("threshold", value(f.threshold)),
                ("events", Stat::Count(f.events)),
                ("periods", Stat::Count(f.periods)),
                ("λ", value(f.lambda)),
            ],
            DistributionFit::Binomial(f) => vec![
                ("threshold", value(f.threshold)),
                ("n", Stat::Count(f.trials)),
                ("k", Stat::Count(f.successes)),
                ("p", value(f.p)),
            ],
        }
    }

    pub fn curve(&self) -> Vec<[f64; 2]> {
        match self {
            DistributionFit::Normal(f) => f.curve(),
            DistributionFit::Poisson(f) => f.curve(),
            DistributionFit::Binomial(f) => f.curve(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trapezoid(points: &[[f64; 2]]) -> f64 {
        points
            .windows(2)
            .map(|w| (w[1][0] - w[0][0]) * (w[0][1] + w[1][1]) / 2.0)
            .sum()
    }

    #[test]
    fn normal_density_integrates_to_about_one() {
        let values = [21.0, 23.5, 22.0, 25.1, 24.3, 20.9, 26.0, 22.8];
        let fit = fit_normal_values(&values, 100).unwrap();
        assert_eq!(fit.x.len(), 100);
        assert!((fit.x[0] - (fit.mu - 3.0 * fit.sigma)).abs() < 1e-9);
        assert!((fit.x[99] - (fit.mu + 3.0 * fit.sigma)).abs() < 1e-9);
        // ±3σ holds 99.73% of the mass
        assert!((trapezoid(&fit.curve()) - 0.9973).abs() < 1e-2);
    }

    #[test]
    fn normal_density_matches_formula() {
        let fit = fit_normal_values(&[-1.0, 1.0], 3).unwrap();
        let sigma = 2f64.sqrt();
        let peak = 1.0 / (sigma * (2.0 * std::f64::consts::PI).sqrt());
        assert!((fit.density[1] - peak).abs() < 1e-12);
    }

    #[test]
    fn constant_series_is_degenerate() {
        assert_eq!(
            fit_normal_values(&[15.0, 15.0, 15.0], 100),
            Err(StatsError::DegenerateDistribution { value: 15.0 })
        );
        assert_eq!(fit_normal_values(&[], 100), Err(StatsError::EmptySeries));
    }

    #[test]
    fn binomial_example() {
        let fit = fit_binomial_values(&[10.0, 20.0, 30.0, 40.0], 4, Threshold::Value(25.0)).unwrap();
        assert_eq!((fit.trials, fit.successes), (4, 2));
        assert_eq!(fit.p, 0.5);
        assert_eq!(fit.x, vec![0, 1, 2, 3, 4]);
        assert!((fit.pmf[2] - 0.375).abs() < 1e-12);
        assert!((fit.pmf.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn binomial_edges_are_point_masses() {
        let none = fit_binomial_values(&[1.0, 2.0], 2, Threshold::Value(99.0)).unwrap();
        assert_eq!(none.pmf, vec![1.0, 0.0, 0.0]);
        let all = fit_binomial_values(&[1.0, 2.0], 2, Threshold::Value(0.0)).unwrap();
        assert_eq!(all.pmf, vec![0.0, 0.0, 1.0]);
        assert_eq!(
            fit_binomial_values(&[], 0, Threshold::Value(0.0)),
            Err(StatsError::EmptySeries)
        );
    }

    #[test]
    fn poisson_counts_values_above_quantile() {
        let values: Vec<f64> = (1..=20).map(f64::from).collect();
        let fit = fit_poisson_values(&values, 20, Threshold::Quantile(0.9)).unwrap();
        // q90 of 1..=20 is 18.1 → 19 and 20 exceed it
        assert_eq!(fit.events, 2);
        assert!((fit.lambda - 0.1).abs() < 1e-12);
        assert_eq!(fit.x, (0..7).collect::<Vec<u64>>());
        assert!((fit.pmf.iter().sum::<f64>() - 1.0).abs() < 1e-3);
        assert!((fit.expected_counts[0] - 2.0 * (-0.1f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn poisson_without_events_is_a_point_mass() {
        let fit = fit_poisson_values(&[5.0, 5.0, 5.0], 3, Threshold::Quantile(0.9)).unwrap();
        assert_eq!(fit.events, 0);
        assert_eq!(fit.lambda, 0.0);
        assert_eq!(fit.pmf, vec![1.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(
            fit_poisson_values(&[], 0, Threshold::Quantile(0.9)),
            Err(StatsError::EmptySeries)
        );
    }

    #[test]
    fn pmfs_match_closed_forms() {
        assert!((poisson_pmf(3, 2.0) - 8.0 * (-2.0f64).exp() / 6.0).abs() < 1e-12);
        assert!((binomial_pmf(1, 3, 0.25) - 3.0 * 0.25 * 0.5625).abs() < 1e-12);
        assert_eq!(binomial_pmf(4, 3, 0.5), 0.0);
    }

    #[test]
    fn fit_parameters_are_labelled() {
        let fit = DistributionFit::Binomial(
            fit_binomial_values(&[1.0, 3.0], 2, Threshold::Value(2.0)).unwrap(),
        );
        assert_eq!(fit.name(), "Binomial");
        let params = fit.parameters();
        assert_eq!(params[1], ("n", Stat::Count(2)));
        assert_eq!(params[2].1.to_string(), "1");
        assert_eq!(params[3], ("p", Stat::Value(Some(0.5))));
        assert_eq!(fit.curve().len(), 3);
    }
}
