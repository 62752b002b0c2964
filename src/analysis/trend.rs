use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::data::filter::FilteredSeries;
use crate::data::model::Observation;

/// A filtered series sorted by date, ready for line charts and correlation.
///
/// Sorting is stable, so rows sharing a date keep their dataset order.
/// Iterating does not consume the series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrendSeries {
    points: Vec<Observation>,
}

pub fn trend(series: &FilteredSeries<'_>) -> TrendSeries {
    let mut points: Vec<Observation> = series.iter().cloned().collect();
    points.sort_by_key(|obs| obs.date);
    TrendSeries { points }
}

impl TrendSeries {
    /// `(date, value)` pairs in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, Option<f64>)> + '_ {
        self.points.iter().map(|obs| (obs.date, obs.value))
    }

    pub fn observations(&self) -> &[Observation] {
        &self.points
    }

    /// Plot coordinates per category, skipping missing values.
    pub fn lines_by_category(&self) -> BTreeMap<&str, Vec<[f64; 2]>> {
        let mut lines: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
        for obs in &self.points {
            if let Some(v) = obs.value {
                lines
                    .entry(obs.category.as_str())
                    .or_default()
                    .push([decimal_year(obs.date), v]);
            }
        }
        lines
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl<'a> IntoIterator for &'a TrendSeries {
    type Item = (NaiveDate, Option<f64>);
    type IntoIter = Box<dyn Iterator<Item = (NaiveDate, Option<f64>)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Date as a fractional year, e.g. 2020-07-01 → ~2020.5. Used as the chart x axis.
pub fn decimal_year(date: NaiveDate) -> f64 {
    let days_in_year = NaiveDate::from_ymd_opt(date.year(), 12, 31).map_or(365, |d| d.ordinal());
    date.year() as f64 + date.ordinal0() as f64 / days_in_year as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter, select_all};
    use crate::data::model::Dataset;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn sorts_by_date_keeping_ties_in_insertion_order() {
        let ds = Dataset::from_observations(vec![
            Observation::new(date(2021, 1, 31), "A", Some(3.0)),
            Observation::new(date(2020, 1, 31), "A", Some(1.0)),
            Observation::new(date(2020, 1, 31), "B", Some(2.0)),
        ]);
        let t = trend(&filter(&ds, &select_all(&ds)));
        let values: Vec<_> = t.iter().map(|(_, v)| v.unwrap()).collect();
        assert_eq!(values, [1.0, 2.0, 3.0]);
        assert_eq!(t.observations()[1].category, "B");
    }

    #[test]
    fn can_be_iterated_repeatedly() {
        let ds = Dataset::from_observations(vec![
            Observation::new(date(2020, 1, 31), "A", Some(10.0)),
            Observation::new(date(2020, 2, 29), "A", None),
        ]);
        let t = trend(&filter(&ds, &select_all(&ds)));
        assert_eq!(t.iter().count(), 2);
        assert_eq!((&t).into_iter().count(), 2);
        assert_eq!(t.lines_by_category()["A"].len(), 1);
    }

    #[test]
    fn decimal_year_is_monotonic() {
        assert_eq!(decimal_year(date(2020, 1, 1)), 2020.0);
        assert!(decimal_year(date(2020, 12, 31)) < 2021.0);
        assert!(decimal_year(date(2020, 6, 30)) > decimal_year(date(2020, 5, 31)));
    }
}
