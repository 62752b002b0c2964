//! Statistics core of the climate portfolio: load a monthly temperature
//! sheet, filter it by capital, and derive summary statistics, trends,
//! correlation and Normal / Poisson / Binomial fits.
//!
//! ```no_run
//! use climate_folio::analysis;
//! use climate_folio::config::AppConfig;
//! use climate_folio::data::{filter::select_one, loader::load_file};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = AppConfig::default();
//! let dataset = load_file(&config.data.path, &config.data.columns, None)?;
//! let report = analysis::run(&dataset, &select_one("Recife"), &config.analysis);
//! if let Ok(summary) = &report.summary {
//!     println!("mean {:.2} °C over {} months", summary.mean, summary.count);
//! }
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
