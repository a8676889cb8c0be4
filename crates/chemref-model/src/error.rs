use std::path::PathBuf;

use crate::enums::DictVariant;

/// Errors surfaced at the library boundary.
///
/// Data-quality findings (validation failures, duplicate rows, merge
/// conflicts) are deliberately not represented here; those are collected
/// into a [`crate::ProblemRecord`] and returned alongside results.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("data file '{name}' in category '{category}' not found at {path}")]
    NotFound {
        category: String,
        name: String,
        path: PathBuf,
    },

    #[error("invalid argument '{argument}' for parameter '{parameter}': {detail}")]
    Input {
        parameter: &'static str,
        argument: String,
        detail: String,
    },

    #[error("missing optional capability: {detail}")]
    MissingDependency { detail: String },

    #[error(
        "block code does not match the '{id_column}' value in category '{category}' \
         of the {variant} dictionary ({mismatches} mismatching rows)"
    )]
    Integrity {
        category: String,
        variant: DictVariant,
        id_column: &'static str,
        mismatches: usize,
    },

    #[error("bad data in dataset '{dataset}': {detail}")]
    DataQuality { dataset: String, detail: String },

    #[error("failed to download {url}: {detail}")]
    Fetch { url: String, detail: String },

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Polars(#[from] polars::error::PolarsError),
}

impl DataError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn data_quality(dataset: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::DataQuality {
            dataset: dataset.into(),
            detail: detail.into(),
        }
    }

    pub fn fetch(url: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            detail: detail.into(),
        }
    }

    pub fn input(
        parameter: &'static str,
        argument: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::Input {
            parameter,
            argument: argument.into(),
            detail: detail.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
