use thiserror::Error;

// ---------------------------------------------------------------------------
// Library error type
// ---------------------------------------------------------------------------

/// Errors raised by the analysis core.
///
/// An empty peak selection is deliberately *not* represented here; see
/// [`crate::analysis::pipeline::Matching::Skipped`].
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Malformed trace or catalog data (length mismatch, empty, non-finite).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A scalar parameter outside its domain.
    #[error("invalid {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    /// CSV rendering failed.
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    /// Workbook rendering failed.
    #[error("excel export failed: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),
}

impl AnalysisError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        AnalysisError::InvalidInput(message.into())
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
