use std::fmt;

use crate::analysis::detector::{self, DetectedPeak};
use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// Trace – one validated (wavenumber, absorbance) series
// ---------------------------------------------------------------------------

/// A spectral trace: wavenumber (x) and absorbance (y), aligned by index.
///
/// Samples keep acquisition order; ascending and descending wavenumber axes
/// are both accepted and nothing is re-sorted.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    wavenumber: Vec<f64>,
    absorbance: Vec<f64>,
}

impl Trace {
    /// Build a trace, rejecting empty, mismatched or non-finite input.
    pub fn new(wavenumber: Vec<f64>, absorbance: Vec<f64>) -> Result<Self> {
        validate_pair(&wavenumber, &absorbance)?;
        Ok(Trace {
            wavenumber,
            absorbance,
        })
    }

    pub fn wavenumber(&self) -> &[f64] {
        &self.wavenumber
    }

    pub fn absorbance(&self) -> &[f64] {
        &self.absorbance
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.wavenumber.len()
    }

    /// Always false for a constructed trace; kept for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.wavenumber.is_empty()
    }

    /// Iterate `(wavenumber, absorbance)` pairs in acquisition order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.wavenumber
            .iter()
            .copied()
            .zip(self.absorbance.iter().copied())
    }

    /// Run the local-maxima detector on this trace.
    pub fn detect_peaks(&self, threshold: f64) -> Result<Vec<DetectedPeak>> {
        detector::detect_peaks(&self.wavenumber, &self.absorbance, threshold)
    }
}

/// Shared validation for paired sequences.
pub(crate) fn validate_pair(wavenumber: &[f64], absorbance: &[f64]) -> Result<()> {
    if wavenumber.is_empty() || absorbance.is_empty() {
        return Err(AnalysisError::invalid_input("trace is empty"));
    }
    if wavenumber.len() != absorbance.len() {
        return Err(AnalysisError::invalid_input(format!(
            "wavenumber has {} values but absorbance has {}",
            wavenumber.len(),
            absorbance.len()
        )));
    }
    for (row, (x, y)) in wavenumber.iter().zip(absorbance).enumerate() {
        if !x.is_finite() || !y.is_finite() {
            return Err(AnalysisError::invalid_input(format!(
                "row {row}: non-numeric value ({x}, {y})"
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// DataPreview – the head of the source table, for display
// ---------------------------------------------------------------------------

/// Number of rows kept for the raw data preview.
pub const PREVIEW_ROWS: usize = 5;

/// The first few rows of the parsed trace plus the source column names.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPreview {
    /// Names of the two columns used; synthesized when the file has no header.
    pub columns: [String; 2],
    pub rows: Vec<(f64, f64)>,
}

impl DataPreview {
    pub fn new(columns: [String; 2], trace: &Trace) -> Self {
        DataPreview {
            columns,
            rows: trace.points().take(PREVIEW_ROWS).collect(),
        }
    }

    /// Column names used when the source file has no header row.
    pub fn default_columns() -> [String; 2] {
        ["0".to_string(), "1".to_string()]
    }
}

// ---------------------------------------------------------------------------
// LoadedTrace – a trace together with where it came from
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LoadedTrace {
    /// File name (no directory) for display.
    pub name: String,
    pub trace: Trace,
    pub preview: DataPreview,
}

impl fmt::Display for LoadedTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} points)", self.name, self.trace.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_rejects_length_mismatch() {
        let err = Trace::new(vec![1000.0, 1005.0], vec![0.1]).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
        assert!(err.to_string().contains("2 values"));
    }

    #[test]
    fn test_trace_rejects_empty() {
        assert!(Trace::new(vec![], vec![]).is_err());
    }

    #[test]
    fn test_trace_rejects_nan() {
        let err = Trace::new(vec![1000.0, 1005.0], vec![0.1, f64::NAN]).unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_trace_keeps_descending_order() {
        let trace = Trace::new(vec![4000.0, 3998.0, 3996.0], vec![0.1, 0.2, 0.3]).unwrap();
        assert_eq!(trace.wavenumber(), &[4000.0, 3998.0, 3996.0]);
        assert_eq!(trace.len(), 3);
    }

    #[test]
    fn test_preview_takes_head() {
        let x: Vec<f64> = (0..10).map(|i| 1000.0 + i as f64).collect();
        let y = vec![0.5; 10];
        let trace = Trace::new(x, y).unwrap();
        let preview = DataPreview::new(DataPreview::default_columns(), &trace);
        assert_eq!(preview.rows.len(), PREVIEW_ROWS);
        assert_eq!(preview.rows[0], (1000.0, 0.5));
    }
}
