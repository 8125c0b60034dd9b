use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop a load. Missing or malformed cells are not errors;
/// they are cleaned to absent values by [`super::clean`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {}: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("reading delimited data: {0}")]
    Csv(#[from] csv::Error),

    #[error("parsing JSON records: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected JSON layout: {0}")]
    JsonShape(String),

    #[error("reading parquet data: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("decoding arrow column: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}
