use std::collections::BTreeSet;

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Observation – one row of the source sheet
// ---------------------------------------------------------------------------

/// One monthly measurement for a single capital.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Last day of the measured month.
    pub date: NaiveDate,
    /// Capital-city identifier.
    pub category: String,
    /// Mean monthly temperature in °C. `None` when the cell was empty.
    pub value: Option<f64>,
}

impl Observation {
    pub fn new(date: NaiveDate, category: impl Into<String>, value: Option<f64>) -> Self {
        Observation {
            date,
            category: category.into(),
            value,
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded sheet
// ---------------------------------------------------------------------------

/// The full parsed dataset. Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    observations: Vec<Observation>,
    /// Distinct categories in order of first appearance.
    categories: Vec<String>,
}

impl Dataset {
    /// Build the category index from the loaded rows.
    pub fn from_observations(observations: Vec<Observation>) -> Self {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut categories = Vec::new();
        for obs in &observations {
            if seen.insert(obs.category.as_str()) {
                categories.push(obs.category.clone());
            }
        }
        Dataset {
            observations,
            categories,
        }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// First `n` rows, for the data preview table.
    pub fn head(&self, n: usize) -> &[Observation] {
        &self.observations[..n.min(self.observations.len())]
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}
