use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::analysis::correlation::TimeEncoding;
use crate::analysis::distribution::Threshold;

// ---------------------------------------------------------------------------
// Top-level configuration
// ---------------------------------------------------------------------------

/// Application configuration, read from a TOML file.
///
/// Every field has a default, so an empty file (or no file at all) yields a
/// working setup pointed at `data/BASE_DADOS_10ANOS.xlsx`.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub analysis: AnalysisConfig,
    pub profile: Profile,
}

impl AppConfig {
    /// Load from `path`, or fall back to defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in config file {}", path.display()))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(text).context("parsing TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.analysis.validate()
    }
}

// ---------------------------------------------------------------------------
// [data]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub path: PathBuf,
    /// Worksheet name or 0-based index. First sheet when unset.
    pub sheet: Option<String>,
    pub columns: ColumnNames,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/BASE_DADOS_10ANOS.xlsx"),
            sheet: None,
            columns: ColumnNames::default(),
        }
    }
}

/// Header names of the three required columns.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub date: String,
    pub category: String,
    pub value: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            date: "DATA MEDIÇÃO".to_string(),
            category: "CAPITAL".to_string(),
            value: "TEMP. MÉDIA MENSAL".to_string(),
        }
    }
}

impl ColumnNames {
    /// Locate `name` among `headers`, ignoring case and surrounding spaces.
    pub fn position(headers: &[String], name: &str) -> Option<usize> {
        let wanted = name.trim().to_lowercase();
        headers
            .iter()
            .position(|h| h.trim().to_lowercase() == wanted)
    }
}

// ---------------------------------------------------------------------------
// [analysis]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Number of sample points of the normal density curve.
    pub normal_resolution: usize,
    pub histogram_bins: usize,
    /// Quantile above which a month counts as an extreme event.
    pub extreme_quantile: f64,
    pub binomial_threshold: Threshold,
    pub time_encoding: TimeEncoding,
    pub preview_rows: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            normal_resolution: 100,
            histogram_bins: 15,
            extreme_quantile: 0.90,
            binomial_threshold: Threshold::Quantile(0.90),
            time_encoding: TimeEncoding::Year,
            preview_rows: 5,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if self.normal_resolution < 2 {
            bail!(
                "analysis.normal_resolution must be at least 2, got {}",
                self.normal_resolution
            );
        }
        if self.histogram_bins == 0 {
            bail!("analysis.histogram_bins must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.extreme_quantile) {
            bail!(
                "analysis.extreme_quantile must be within [0, 1], got {}",
                self.extreme_quantile
            );
        }
        match self.binomial_threshold {
            Threshold::Quantile(q) if !(0.0..=1.0).contains(&q) => {
                bail!("analysis.binomial_threshold quantile must be within [0, 1], got {q}")
            }
            Threshold::Value(v) if !v.is_finite() => {
                bail!("analysis.binomial_threshold value must be finite")
            }
            _ => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// [profile]
// ---------------------------------------------------------------------------

/// Biography text for the portfolio pages.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub about: Vec<String>,
    pub education: Vec<String>,
    pub experience: Vec<String>,
    pub skills: Vec<String>,
    pub languages: Vec<String>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "Maria Julia".to_string(),
            about: vec![
                "I am 22 and want to move into technology because I enjoy a challenge.".into(),
                "I am building data science and programming skills to sharpen my analysis of real-world problems.".into(),
            ],
            education: vec!["Degree in Systems Analysis.".into()],
            experience: vec![
                "Seven years as a bank clerk in mortgage lending, working with financial analysis and credit management systems.".into(),
            ],
            skills: vec![
                "Programming languages: Java, Python, JavaScript, SQL".into(),
                "Databases and data analysis".into(),
                "Web development and APIs".into(),
                "Data visualization".into(),
            ],
            languages: vec![
                "English: fluent".into(),
                "Spanish: intermediate".into(),
                "French: intermediate".into(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.analysis.normal_resolution, 100);
        assert_eq!(config.analysis.histogram_bins, 15);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [data]
            path = "temps.csv"

            [data.columns]
            value = "temp"

            [analysis]
            binomial_threshold = { value = 25.0 }
            time_encoding = "ordinal"
            "#,
        )
        .unwrap();
        assert_eq!(config.data.path, PathBuf::from("temps.csv"));
        assert_eq!(config.data.columns.value, "temp");
        assert_eq!(config.data.columns.category, "CAPITAL");
        assert_eq!(config.analysis.binomial_threshold, Threshold::Value(25.0));
        assert_eq!(config.analysis.time_encoding, TimeEncoding::Ordinal);
        assert_eq!(config.analysis.extreme_quantile, 0.90);
    }

    #[test]
    fn out_of_range_quantile_is_rejected() {
        let err = AppConfig::from_toml_str("[analysis]\nextreme_quantile = 1.5\n").unwrap_err();
        assert!(format!("{err:#}").contains("extreme_quantile"));
    }

    #[test]
    fn column_lookup_ignores_case_and_padding() {
        let headers = vec![" Capital ".to_string(), "temp. média mensal".to_string()];
        assert_eq!(ColumnNames::position(&headers, "CAPITAL"), Some(0));
        assert_eq!(ColumnNames::position(&headers, "TEMP. MÉDIA MENSAL"), Some(1));
        assert_eq!(ColumnNames::position(&headers, "DATA MEDIÇÃO"), None);
    }
}
