//! CSV Data Loader Module
//! Reads the sales export with Polars and hands it to the normalizer.

use super::normalizer::{DataNormalizer, NormalizeError, NormalizeOptions};
use super::record::{ProductRecord, REQUIRED_COLUMNS};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Data file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing required column '{0}'")]
    MissingColumn(String),
    #[error("Malformed value {value:?} in column '{column}' at row {row}")]
    MalformedInput {
        column: String,
        row: usize,
        value: String,
    },
}

impl From<NormalizeError> for LoaderError {
    fn from(err: NormalizeError) -> Self {
        match err {
            NormalizeError::MalformedInput { column, row, value } => {
                LoaderError::MalformedInput { column, row, value }
            }
            NormalizeError::PolarsError(e) => LoaderError::CsvError(e),
        }
    }
}

/// The normalized sales table. Read-only once built.
#[derive(Debug, Clone)]
pub struct SalesDataset {
    df: DataFrame,
    source: PathBuf,
}

impl SalesDataset {
    /// Normalize an in-memory table that already holds the required columns.
    pub fn from_dataframe(
        df: DataFrame,
        source: impl Into<PathBuf>,
        options: NormalizeOptions,
    ) -> Result<Self, LoaderError> {
        DataLoader::check_required_columns(&df)?;
        let df = DataNormalizer::new(options).normalize(df)?;
        Ok(Self {
            df,
            source: source.into(),
        })
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn row_count(&self) -> usize {
        self.df.height()
    }

    pub fn records(&self) -> PolarsResult<Vec<ProductRecord>> {
        ProductRecord::from_dataframe(&self.df)
    }
}

/// Loads the sales export with Polars.
pub struct DataLoader {
    options: NormalizeOptions,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new(NormalizeOptions::default())
    }
}

impl DataLoader {
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    /// Read and normalize a CSV file.
    ///
    /// Every column is read as text so that formatting characters survive
    /// until the normalizer strips them.
    pub fn load_csv(&self, path: &Path) -> Result<SalesDataset, LoaderError> {
        info!(path = %path.display(), "Loading sales export");

        if !path.is_file() {
            error!(path = %path.display(), "Sales export not found");
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }

        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;

        info!(rows = df.height(), columns = df.width(), "CSV read");

        let dataset = SalesDataset::from_dataframe(df, path, self.options.clone())?;

        info!(rows = dataset.row_count(), "Sales export normalized");
        Ok(dataset)
    }

    /// Fail on the first required column the table lacks.
    pub fn check_required_columns(df: &DataFrame) -> Result<(), LoaderError> {
        for name in REQUIRED_COLUMNS {
            if df.column(name).is_err() {
                error!(column = name, "Required column missing");
                return Err(LoaderError::MissingColumn(name.to_string()));
            }
        }
        Ok(())
    }
}
