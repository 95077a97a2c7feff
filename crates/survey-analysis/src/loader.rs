//! Reading and writing the survey table.

use crate::error::{AnalysisError, Result, ResultExt};
use crate::schema::{
    MISSING_MARKERS, NUMERIC_COLUMNS, SURVEY_COLUMNS, require_columns, require_numeric,
};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;
use tracing::{debug, info};

/// Load the survey CSV into a DataFrame.
///
/// Missing-value markers such as the literal `None` are parsed as nulls.
/// Fails with an IO error when the file is absent and with
/// [`AnalysisError::ColumnNotFound`] when an expected column is missing.
/// `Age` and `Years_of_Experience` must parse as numbers, otherwise the
/// load fails with [`AnalysisError::TypeConversionFailed`].
pub fn load_survey(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(AnalysisError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Input file not found: {}", path.display()),
        )));
    }

    info!("Loading dataset from: {}", path.display());
    let df = read_csv(path).context(format!("Failed to read {}", path.display()))?;
    require_columns(&df, &SURVEY_COLUMNS)?;
    require_numeric(&df, &NUMERIC_COLUMNS)?;

    debug!("Dataset loaded: {:?}", df.shape());
    Ok(df)
}

fn read_csv(path: &Path) -> PolarsResult<DataFrame> {
    let null_values = NullValues::AllColumns(
        MISSING_MARKERS
            .iter()
            .map(|marker| (*marker).into())
            .collect(),
    );

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(1000))
        .with_parse_options(
            CsvParseOptions::default()
                .with_quote_char(Some(b'"'))
                .with_null_values(Some(null_values)),
        )
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
}

/// Write the table as CSV with a header row, creating parent directories.
pub fn write_survey(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path).context(format!("Failed to create {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .context(format!("Failed to write {}", path.display()))?;

    info!("Saved {} rows to {}", df.height(), path.display());
    Ok(())
}
