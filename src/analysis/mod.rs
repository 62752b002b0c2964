/// Analysis layer: statistics and model fits over a filtered series.
///
/// ```text
///   FilteredSeries ──┬──▶ describe      → Summary
///                    ├──▶ trend         → TrendSeries
///                    ├──▶ correlation   → Correlation (r, p)
///                    ├──▶ histogram     → Vec<Bin>
///                    └──▶ distribution  → Normal / Poisson / Binomial fits
/// ```
///
/// Every branch is computed on its own; one failing never blocks the others.
pub mod correlation;
pub mod describe;
pub mod distribution;
pub mod histogram;
pub mod trend;

use crate::config::AnalysisConfig;
use crate::data::filter::{filter, CategorySelection, FilteredSeries};
use crate::data::model::Dataset;
use crate::error::StatsResult;

use correlation::{correlate, Correlation};
use describe::{describe, Summary};
use distribution::{
    fit_binomial, fit_poisson, normal_overlay, BinomialFit, DistributionFit, NormalOverlay,
    PoissonFit, Threshold,
};
use histogram::{histogram, Bin};
use trend::{trend, TrendSeries};

/// Everything the analysis page shows for one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub selection: CategorySelection,
    /// Rows in the filtered series, missing values included.
    pub rows: usize,
    pub summary: StatsResult<Summary>,
    pub trend: TrendSeries,
    pub correlation: StatsResult<Correlation>,
    pub histogram: StatsResult<Vec<Bin>>,
    pub normal: StatsResult<NormalOverlay>,
    pub poisson: StatsResult<PoissonFit>,
    pub binomial: StatsResult<BinomialFit>,
}

impl AnalysisReport {
    /// The fits that succeeded, in display order.
    pub fn fits(&self) -> Vec<DistributionFit> {
        let mut fits = Vec::new();
        if let Ok(NormalOverlay::Curve(f)) = &self.normal {
            fits.push(DistributionFit::Normal(f.clone()));
        }
        if let Ok(f) = &self.poisson {
            fits.push(DistributionFit::Poisson(f.clone()));
        }
        if let Ok(f) = &self.binomial {
            fits.push(DistributionFit::Binomial(f.clone()));
        }
        fits
    }
}

/// Filter `dataset` and run every derivation on the result.
pub fn run(
    dataset: &Dataset,
    selection: &CategorySelection,
    config: &AnalysisConfig,
) -> AnalysisReport {
    analyse(&filter(dataset, selection), selection, config)
}

/// Run every derivation on an already filtered series.
pub fn analyse(
    series: &FilteredSeries<'_>,
    selection: &CategorySelection,
    config: &AnalysisConfig,
) -> AnalysisReport {
    log::debug!(
        "analysing {} rows for {:?} (binomial threshold {:?})",
        series.len(),
        selection,
        config.binomial_threshold
    );

    AnalysisReport {
        selection: selection.clone(),
        rows: series.len(),
        summary: logged("summary", describe(series)),
        trend: trend(series),
        correlation: logged("correlation", correlate(series, config.time_encoding)),
        histogram: logged("histogram", histogram(series, config.histogram_bins)),
        normal: logged("normal fit", normal_overlay(series, config.normal_resolution)),
        poisson: logged(
            "poisson fit",
            fit_poisson(series, Threshold::Quantile(config.extreme_quantile)),
        ),
        binomial: logged("binomial fit", fit_binomial(series, config.binomial_threshold)),
    }
}

fn logged<T>(what: &str, result: StatsResult<T>) -> StatsResult<T> {
    if let Err(e) = &result {
        log::warn!("{what} not available: {e}");
    }
    result
}
