/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .xlsx / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + validate sheet → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Observation>, category index
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  category selection → FilteredSeries
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
