use std::path::Path;

use calamine::{open_workbook_auto, Data, DataType, Range, Reader};
use chrono::{NaiveDate, NaiveDateTime};

use super::model::{Dataset, Observation};
use crate::config::ColumnNames;
use crate::error::DataError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a temperature dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xls` / `.xlsb` / `.ods` – workbook, header row first
/// * `.csv` – header row first, comma separated
///
/// `sheet` selects a worksheet by name or 0-based index (workbooks only).
pub fn load_file(
    path: &Path,
    columns: &ColumnNames,
    sheet: Option<&str>,
) -> Result<Dataset, DataError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => load_workbook(path, columns, sheet)?,
        "csv" => load_csv(path, columns)?,
        other => {
            return Err(DataError::load(
                path,
                format!("unsupported file extension: .{other}"),
            ))
        }
    };

    log::debug!(
        "read {} observations from {}",
        dataset.len(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Column lookup
// ---------------------------------------------------------------------------

/// Positions of the three required columns in the header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    date: usize,
    category: usize,
    value: usize,
}

impl ColumnIndex {
    fn locate(headers: &[String], names: &ColumnNames) -> Result<Self, DataError> {
        let find = |name: &str| {
            ColumnNames::position(headers, name).ok_or_else(|| {
                DataError::schema(format!(
                    "missing required column '{name}' (found: {headers:?})"
                ))
            })
        };
        Ok(ColumnIndex {
            date: find(&names.date)?,
            category: find(&names.category)?,
            value: find(&names.value)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Workbook loader
// ---------------------------------------------------------------------------

fn load_workbook(
    path: &Path,
    columns: &ColumnNames,
    sheet: Option<&str>,
) -> Result<Dataset, DataError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| DataError::load(path, e))?;

    let range = match sheet {
        Some(sel) => match sel.parse::<usize>() {
            Ok(idx) => workbook
                .worksheet_range_at(idx)
                .ok_or_else(|| DataError::load(path, format!("no sheet at index {idx}")))?
                .map_err(|e| DataError::load(path, e))?,
            Err(_) => workbook
                .worksheet_range(sel)
                .map_err(|e| DataError::load(path, e))?,
        },
        None => workbook
            .worksheet_range_at(0)
            .ok_or_else(|| DataError::load(path, "workbook has no worksheets"))?
            .map_err(|e| DataError::load(path, e))?,
    };

    observations_from_range(&range, columns).map(Dataset::from_observations)
}

/// Convert a worksheet range (header row first) into observations.
fn observations_from_range(
    range: &Range<Data>,
    columns: &ColumnNames,
) -> Result<Vec<Observation>, DataError> {
    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| DataError::schema("worksheet is empty"))?
        .iter()
        .map(|c| c.to_string())
        .collect();
    let idx = ColumnIndex::locate(&headers, columns)?;

    let mut observations = Vec::new();
    for (i, row) in rows.enumerate() {
        let line = i + 2;
        let cell = |c: usize| row.get(c).unwrap_or(&Data::Empty);
        if [idx.date, idx.category, idx.value]
            .iter()
            .all(|&c| cell(c).is_empty())
        {
            continue;
        }
        observations.push(observation_from_cells(
            line,
            columns,
            cell(idx.date),
            cell(idx.category),
            cell(idx.value),
        )?);
    }
    Ok(observations)
}

fn observation_from_cells(
    line: usize,
    columns: &ColumnNames,
    date: &Data,
    category: &Data,
    value: &Data,
) -> Result<Observation, DataError> {
    let date = cell_to_date(date).ok_or_else(|| {
        DataError::schema(format!(
            "row {line}: '{date}' in column '{}' is not a date",
            columns.date
        ))
    })?;

    let category = match category {
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    };
    if category.is_empty() {
        return Err(DataError::schema(format!(
            "row {line}: column '{}' is empty",
            columns.category
        )));
    }

    let value = cell_to_value(value).ok_or_else(|| {
        DataError::schema(format!(
            "row {line}: '{value}' in column '{}' is not a number",
            columns.value
        ))
    })?;

    Ok(Observation::new(date, category, value))
}

/// Only cells the workbook formats as dates, or date text, are accepted.
/// A bare number in the date column is a mistyped column, not a serial date.
fn cell_to_date(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::DateTime(_) => cell.as_datetime().map(|dt| dt.date()),
        Data::String(s) | Data::DateTimeIso(s) => parse_date_str(s),
        _ => None,
    }
}

/// `Some(None)` for an empty cell, `None` when the cell is not numeric.
fn cell_to_value(cell: &Data) -> Option<Option<f64>> {
    match cell {
        Data::Empty => Some(None),
        Data::Float(f) => Some(f.is_finite().then_some(*f)),
        Data::Int(i) => Some(Some(*i as f64)),
        Data::String(s) => parse_value_str(s),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one observation per line.
/// Columns other than the three required ones are ignored.
fn load_csv(path: &Path, columns: &ColumnNames) -> Result<Dataset, DataError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| DataError::load(path, e))?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DataError::load(path, e))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();
    let idx = ColumnIndex::locate(&headers, columns)?;

    let mut observations = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let line = row_no + 2;
        let record = result.map_err(|e| DataError::load(path, format!("CSV line {line}: {e}")))?;
        let field = |c: usize| record.get(c).unwrap_or("").trim();

        let (date_s, category, value_s) = (field(idx.date), field(idx.category), field(idx.value));
        if date_s.is_empty() && category.is_empty() && value_s.is_empty() {
            continue;
        }

        let date = parse_date_str(date_s).ok_or_else(|| {
            DataError::schema(format!(
                "row {line}: '{date_s}' in column '{}' is not a date",
                columns.date
            ))
        })?;
        if category.is_empty() {
            return Err(DataError::schema(format!(
                "row {line}: column '{}' is empty",
                columns.category
            )));
        }
        let value = parse_value_str(value_s).ok_or_else(|| {
            DataError::schema(format!(
                "row {line}: '{value_s}' in column '{}' is not a number",
                columns.value
            ))
        })?;

        observations.push(Observation::new(date, category, value));
    }

    Ok(Dataset::from_observations(observations))
}

// ---------------------------------------------------------------------------
// Text parsing helpers
// ---------------------------------------------------------------------------

/// Parse a calendar date; a time-of-day part is accepted and dropped.
fn parse_date_str(s: &str) -> Option<NaiveDate> {
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Parse a temperature. Empty or `NaN` text is a missing value (`Some(None)`);
/// a lone decimal comma is accepted.
fn parse_value_str(s: &str) -> Option<Option<f64>> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("nan") {
        return Some(None);
    }
    let parsed = if !s.contains('.') && s.matches(',').count() == 1 {
        s.replace(',', ".").parse::<f64>()
    } else {
        s.parse::<f64>()
    };
    parsed.ok().map(|v| v.is_finite().then_some(v))
}
