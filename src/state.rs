use std::path::Path;
use std::sync::Arc;

use climate_folio::analysis::describe::{variability_by_category, CategoryVariability};
use climate_folio::analysis::distribution::Threshold;
use climate_folio::analysis::{analyse, AnalysisReport};
use climate_folio::config::AppConfig;
use climate_folio::data::filter::{filtered_indices, CategorySelection, FilteredSeries};
use climate_folio::data::loader::load_file;
use climate_folio::data::model::Dataset;

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Education,
    Skills,
    Analysis,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Home, Page::Education, Page::Skills, Page::Analysis];

    pub fn label(self) -> &'static str {
        match self {
            Page::Home => "🏠 Home",
            Page::Education => "🎓 Education & Experience",
            Page::Skills => "🛠 Skills",
            Page::Analysis => "📊 Data Analysis",
        }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    pub page: Page,

    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<Arc<Dataset>>,

    /// Selected categories.
    pub selection: CategorySelection,

    /// Indices of observations passing `selection` (cached).
    pub visible_indices: Vec<usize>,

    /// Results for the current selection and settings.
    pub report: Option<AnalysisReport>,

    /// Variance / std per category over the whole dataset.
    pub variability: Vec<CategoryVariability>,

    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            page: Page::Home,
            dataset: None,
            selection: CategorySelection::new(),
            visible_indices: Vec::new(),
            report: None,
            variability: Vec::new(),
            color_map: None,
            status_message: None,
        }
    }

    /// Load the dataset named in the configuration.
    pub fn load_configured(&mut self) {
        let path = self.config.data.path.clone();
        self.load(&path);
    }

    /// Load a dataset from `path`, reporting failure in the status line.
    pub fn load(&mut self, path: &Path) {
        let columns = &self.config.data.columns;
        match load_file(path, columns, self.config.data.sheet.as_deref()) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} observations for categories {:?}",
                    dataset.len(),
                    dataset.categories()
                );
                self.set_dataset(Arc::new(dataset));
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.clear_dataset();
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Drop the dataset and everything derived from it.
    fn clear_dataset(&mut self) {
        self.dataset = None;
        self.selection.clear();
        self.visible_indices.clear();
        self.report = None;
        self.variability.clear();
        self.color_map = None;
    }

    /// Ingest a newly loaded dataset; the first category starts selected.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.color_map = Some(ColorMap::new(dataset.categories()));
        self.variability = variability_by_category(&dataset);
        self.selection = dataset.categories().iter().take(1).cloned().collect();
        self.visible_indices = filtered_indices(&dataset, &self.selection);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.recompute();
    }

    /// Change the selection. Filtering is skipped when nothing changed.
    pub fn set_selection(&mut self, selection: CategorySelection) {
        if selection == self.selection && self.report.is_some() {
            return;
        }
        self.selection = selection;
        self.refilter();
    }

    pub fn select_only(&mut self, category: &str) {
        self.set_selection(CategorySelection::from([category.to_string()]));
    }

    pub fn toggle_category(&mut self, category: &str) {
        let mut selection = self.selection.clone();
        if !selection.remove(category) {
            selection.insert(category.to_string());
        }
        self.set_selection(selection);
    }

    /// Change the binomial threshold (slider or quantile mode).
    pub fn set_binomial_threshold(&mut self, threshold: Threshold) {
        if self.config.analysis.binomial_threshold != threshold {
            self.config.analysis.binomial_threshold = threshold;
            self.recompute();
        }
    }

    /// Lowest and highest defined value in the whole dataset, for the slider.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let values = self
            .dataset
            .as_ref()?
            .observations()
            .iter()
            .filter_map(|obs| obs.value);
        values.fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// Recompute `visible_indices` after a selection change.
    fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.selection);
        }
        self.recompute();
    }

    /// Rerun the analysis on the cached indices.
    fn recompute(&mut self) {
        self.report = self.dataset.as_ref().map(|ds| {
            let series = FilteredSeries::from_indices(ds, self.visible_indices.clone());
            analyse(&series, &self.selection, &self.config.analysis)
        });
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use climate_folio::data::model::Observation;
    use climate_folio::error::StatsError;

    use super::*;

    fn dataset() -> Arc<Dataset> {
        let mut rows = Vec::new();
        for (m, (a, b)) in [(20.0, 15.0), (22.0, 15.0), (24.0, 15.0), (26.0, 15.0)]
            .into_iter()
            .enumerate()
        {
            let date = NaiveDate::from_ymd_opt(2020, m as u32 + 1, 1).unwrap();
            rows.push(Observation::new(date, "Recife", Some(a)));
            rows.push(Observation::new(date, "Curitiba", Some(b)));
        }
        Arc::new(Dataset::from_observations(rows))
    }

    #[test]
    fn first_category_is_selected_on_load() {
        let mut state = AppState::new(AppConfig::default());
        state.set_dataset(dataset());
        assert_eq!(state.selection, CategorySelection::from(["Recife".to_string()]));
        assert_eq!(state.visible_indices, [0, 2, 4, 6]);
        let report = state.report.as_ref().unwrap();
        assert_eq!(report.summary.as_ref().unwrap().mean, 23.0);
        assert_eq!(state.variability.len(), 2);
    }

    #[test]
    fn constant_category_falls_back_without_failing_others() {
        let mut state = AppState::new(AppConfig::default());
        state.set_dataset(dataset());
        state.select_only("Curitiba");
        let report = state.report.as_ref().unwrap();
        assert!(report.summary.is_ok());
        assert!(matches!(
            report.normal,
            Ok(climate_folio::analysis::distribution::NormalOverlay::PointMass(v)) if v == 15.0
        ));
        assert_eq!(report.poisson.as_ref().unwrap().events, 0);
    }

    #[test]
    fn empty_selection_reports_no_data() {
        let mut state = AppState::new(AppConfig::default());
        state.set_dataset(dataset());
        state.toggle_category("Recife");
        assert!(state.selection.is_empty());
        let report = state.report.as_ref().unwrap();
        assert_eq!(report.rows, 0);
        assert_eq!(report.summary, Err(StatsError::EmptySeries));
        assert!(report.trend.is_empty());
        assert!(report.fits().is_empty());
    }

    #[test]
    fn threshold_change_reruns_binomial() {
        let mut state = AppState::new(AppConfig::default());
        state.set_dataset(dataset());
        state.set_binomial_threshold(Threshold::Value(21.0));
        let fit = state.report.as_ref().unwrap().binomial.as_ref().unwrap();
        assert_eq!((fit.trials, fit.successes), (4, 3));
        assert_eq!(state.value_range(), Some((15.0, 26.0)));
    }

    #[test]
    fn failed_load_sets_status() {
        let mut state = AppState::new(AppConfig::default());
        state.load(Path::new("does/not/exist.csv"));
        assert!(state.dataset.is_none());
        assert!(state.status_message.as_deref().unwrap().starts_with("Error"));
    }

    #[test]
    fn failed_reload_drops_previous_results() {
        let mut state = AppState::new(AppConfig::default());
        state.set_dataset(dataset());
        assert!(state.report.is_some());

        state.load(Path::new("does/not/exist.csv"));
        assert!(state.dataset.is_none());
        assert!(state.report.is_none());
        assert!(state.selection.is_empty());
        assert!(state.visible_indices.is_empty());
        assert!(state.variability.is_empty());
        assert!(state.color_map.is_none());
        assert_eq!(state.value_range(), None);
        assert!(state.status_message.as_deref().unwrap().starts_with("Error"));
    }
}
