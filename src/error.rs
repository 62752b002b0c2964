use std::path::PathBuf;

use thiserror::Error;

/// Failures while turning a spreadsheet into a [`Dataset`](crate::data::model::Dataset).
///
/// Both variants are fatal for the analysis page: nothing downstream can run
/// without a validated dataset.
#[derive(Debug, Error)]
pub enum DataError {
    /// The source could not be opened or read at all.
    #[error("cannot load {}: {reason}", path.display())]
    Load { path: PathBuf, reason: String },

    /// The source was readable but does not have the expected shape.
    #[error("schema error: {0}")]
    Schema(String),
}

impl DataError {
    pub(crate) fn load(path: &std::path::Path, reason: impl ToString) -> Self {
        DataError::Load {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn schema(msg: impl Into<String>) -> Self {
        DataError::Schema(msg.into())
    }
}

/// Recoverable failures of a single statistic or fit.
///
/// The analysis page renders "not available" for the affected panel and keeps
/// going with the others.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("no values to analyse")]
    EmptySeries,

    #[error("need at least {required} values, found {found}")]
    InsufficientData { required: usize, found: usize },

    /// Every value equals `value`; a density with zero spread is undefined.
    #[error("all values equal {value}; distribution is degenerate")]
    DegenerateDistribution { value: f64 },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type StatsResult<T> = Result<T, StatsError>;
