use thiserror::Error;

use crate::data::model::ColumnType;

/// Errors raised by the column-aware parts of the pipeline.
///
/// Parse and I/O failures travel as `anyhow::Error`; these variants stay
/// downcastable once wrapped so the UI can tell a schema mismatch apart.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("column '{column}' not found in the uploaded table (available: {})", .available.join(", "))]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },

    #[error("column '{column}' must be numeric but was read as {found}")]
    NotNumeric { column: String, found: ColumnType },
}
