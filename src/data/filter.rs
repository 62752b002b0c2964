use std::collections::BTreeSet;

use super::model::{Dataset, Observation};

// ---------------------------------------------------------------------------
// Filter predicate: which categories are selected
// ---------------------------------------------------------------------------

/// The set of selected categories. Rows matching any of them pass.
pub type CategorySelection = BTreeSet<String>;

/// A selection holding exactly one category.
pub fn select_one(category: impl Into<String>) -> CategorySelection {
    BTreeSet::from([category.into()])
}

/// A selection holding every category of the dataset.
pub fn select_all(dataset: &Dataset) -> CategorySelection {
    dataset.categories().iter().cloned().collect()
}

/// Return indices of observations whose category is selected, in dataset order.
///
/// An empty selection (or one naming no known category) yields no indices.
pub fn filtered_indices(dataset: &Dataset, selection: &CategorySelection) -> Vec<usize> {
    dataset
        .observations()
        .iter()
        .enumerate()
        .filter(|(_, obs)| selection.contains(&obs.category))
        .map(|(i, _)| i)
        .collect()
}

/// Filter `dataset` down to the selected categories.
pub fn filter<'a>(dataset: &'a Dataset, selection: &CategorySelection) -> FilteredSeries<'a> {
    FilteredSeries::from_indices(dataset, filtered_indices(dataset, selection))
}

// ---------------------------------------------------------------------------
// FilteredSeries – read-only view over matching rows
// ---------------------------------------------------------------------------

/// Ordered subsequence of a dataset's observations.
#[derive(Debug, Clone)]
pub struct FilteredSeries<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredSeries<'a> {
    /// Build a view from precomputed indices (e.g. memoized by the caller).
    /// Out-of-range indices are dropped.
    pub fn from_indices(dataset: &'a Dataset, mut indices: Vec<usize>) -> Self {
        indices.retain(|&i| i < dataset.len());
        FilteredSeries { dataset, indices }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Observation> + '_ {
        let observations = self.dataset.observations();
        self.indices.iter().map(move |&i| &observations[i])
    }

    /// Defined values in series order; missing values are skipped.
    pub fn values(&self) -> Vec<f64> {
        self.iter().filter_map(|obs| obs.value).collect()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of rows, including those with a missing value.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn dataset() -> Dataset {
        let rows = [
            (1, "Recife", Some(27.0)),
            (1, "Curitiba", Some(17.0)),
            (2, "Recife", None),
            (2, "Curitiba", Some(18.0)),
            (3, "Recife", Some(28.0)),
        ];
        Dataset::from_observations(
            rows.iter()
                .map(|&(m, cat, v)| {
                    Observation::new(NaiveDate::from_ymd_opt(2020, m, 1).unwrap(), cat, v)
                })
                .collect(),
        )
    }

    #[test]
    fn single_category_preserves_order() {
        let ds = dataset();
        let series = filter(&ds, &select_one("Recife"));
        assert_eq!(series.indices(), [0, 2, 4]);
        assert_eq!(series.len(), 3);
        assert_eq!(series.values(), vec![27.0, 28.0]);
    }

    #[test]
    fn set_selection_is_a_union() {
        let ds = dataset();
        let series = filter(&ds, &select_all(&ds));
        assert_eq!(series.len(), ds.len());
    }

    #[test]
    fn unknown_or_empty_selection_is_empty_not_an_error() {
        let ds = dataset();
        assert!(filter(&ds, &select_one("Manaus")).is_empty());
        assert!(filter(&ds, &CategorySelection::new()).is_empty());
    }

    #[test]
    fn stale_indices_are_dropped() {
        let ds = dataset();
        let series = FilteredSeries::from_indices(&ds, vec![1, 99]);
        assert_eq!(series.indices(), [1]);
    }
}
