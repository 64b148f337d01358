use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::catalog::ReferenceCatalog;
use super::detector::DetectedPeak;
use super::matcher::{match_substances, MatchRecord};
use super::report::Report;
use crate::data::model::Trace;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

pub const THRESHOLD_RANGE: RangeInclusive<f64> = 0.01..=0.1;
pub const THRESHOLD_STEP: f64 = 0.01;
pub const TOLERANCE_RANGE: RangeInclusive<f64> = 1.0..=10.0;
pub const TOLERANCE_STEP: f64 = 1.0;

/// Scalars controlling one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    /// Minimum absorbance for a local maximum to count as a peak.
    pub threshold: f64,
    /// Maximum distance (cm⁻¹) between a selected and a reference peak.
    pub tolerance: f64,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            threshold: 0.02,
            tolerance: 5.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Which detected peaks take part in matching.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PeakSelection {
    #[default]
    All,
    /// Explicit positions, matched in the order given.
    Positions(Vec<f64>),
}

impl PeakSelection {
    pub fn resolve(&self, peaks: &[DetectedPeak]) -> Vec<f64> {
        match self {
            PeakSelection::All => peaks.iter().map(|p| p.position).collect(),
            PeakSelection::Positions(positions) => positions.clone(),
        }
    }
}

/// Notice raised when matching is skipped because nothing is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptySelection;

impl fmt::Display for EmptySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Please select at least one peak to analyze.")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Matching {
    Completed(Vec<MatchRecord>),
    Skipped(EmptySelection),
}

impl Matching {
    pub fn records(&self) -> &[MatchRecord] {
        match self {
            Matching::Completed(records) => records,
            Matching::Skipped(_) => &[],
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Outcome of one run over one trace.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub peaks: Vec<DetectedPeak>,
    pub matching: Matching,
}

impl Analysis {
    /// Export document; absent when matching was skipped.
    pub fn report(&self) -> Option<Report> {
        match &self.matching {
            Matching::Completed(records) => Some(Report::new(&self.peaks, records)),
            Matching::Skipped(_) => None,
        }
    }
}

/// Detect, select, match.
pub fn run(
    trace: &Trace,
    catalog: &ReferenceCatalog,
    params: &AnalysisParams,
    selection: &PeakSelection,
) -> Result<Analysis> {
    let peaks = trace.detect_peaks(params.threshold)?;
    let matching = match_selection(&peaks, catalog, params.tolerance, selection)?;
    Ok(Analysis { peaks, matching })
}

/// Matching step alone, for callers that keep detected peaks between
/// selection changes.
pub fn match_selection(
    peaks: &[DetectedPeak],
    catalog: &ReferenceCatalog,
    tolerance: f64,
    selection: &PeakSelection,
) -> Result<Matching> {
    let selected = selection.resolve(peaks);
    if selected.is_empty() {
        log::debug!("no peaks selected, skipping matching");
        return Ok(Matching::Skipped(EmptySelection));
    }
    Ok(Matching::Completed(match_substances(
        &selected, catalog, tolerance,
    )?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;

    fn example_trace() -> Trace {
        Trace::new(
            vec![1000.0, 1005.0, 1010.0, 1015.0, 1020.0, 1025.0],
            vec![0.01, 0.03, 0.015, 0.01, 0.025, 0.01],
        )
        .unwrap()
    }

    #[test]
    fn test_default_params() {
        let params = AnalysisParams::default();
        assert_eq!(params.threshold, 0.02);
        assert_eq!(params.tolerance, 5.0);
        assert!(THRESHOLD_RANGE.contains(&params.threshold));
        assert!(TOLERANCE_RANGE.contains(&params.tolerance));
    }

    #[test]
    fn test_params_deserialize_with_defaults() {
        let params: AnalysisParams = serde_json::from_str(r#"{"tolerance": 8}"#).unwrap();
        assert_eq!(params.threshold, 0.02);
        assert_eq!(params.tolerance, 8.0);
    }

    #[test]
    fn test_run_with_hypothetical_reference() {
        let catalog = ReferenceCatalog::from_entries([("Hypothetical", vec![1007.0])]).unwrap();
        let analysis = run(
            &example_trace(),
            &catalog,
            &AnalysisParams::default(),
            &PeakSelection::All,
        )
        .unwrap();

        assert_eq!(analysis.peaks.len(), 2);
        let records = analysis.matching.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].detected_peak, 1005.0);
    }

    #[test]
    fn test_run_with_builtin_catalog_has_no_t622_match() {
        let analysis = run(
            &example_trace(),
            &ReferenceCatalog::builtin(),
            &AnalysisParams::default(),
            &PeakSelection::All,
        )
        .unwrap();
        assert!(analysis
            .matching
            .records()
            .iter()
            .all(|r| r.substance != "T-622"));
    }

    #[test]
    fn test_empty_selection_skips_matching_and_report() {
        let analysis = run(
            &example_trace(),
            &ReferenceCatalog::builtin(),
            &AnalysisParams::default(),
            &PeakSelection::Positions(vec![]),
        )
        .unwrap();
        assert_eq!(analysis.matching, Matching::Skipped(EmptySelection));
        assert!(analysis.report().is_none());
    }

    #[test]
    fn test_no_peaks_detected_skips_matching() {
        let params = AnalysisParams {
            threshold: 0.5,
            ..AnalysisParams::default()
        };
        let analysis = run(
            &example_trace(),
            &ReferenceCatalog::builtin(),
            &params,
            &PeakSelection::All,
        )
        .unwrap();
        assert!(analysis.peaks.is_empty());
        assert!(matches!(analysis.matching, Matching::Skipped(_)));
    }

    #[test]
    fn test_completed_matching_without_hits_still_reports() {
        let catalog = ReferenceCatalog::from_entries([("T-622", vec![1736.0])]).unwrap();
        let analysis = run(
            &example_trace(),
            &catalog,
            &AnalysisParams::default(),
            &PeakSelection::All,
        )
        .unwrap();
        let report = analysis.report().unwrap();
        assert!(report.results().is_empty());
        assert_eq!(report.raw_peaks().rows.len(), 2);
    }

    #[test]
    fn test_selection_order_is_kept() {
        let catalog = ReferenceCatalog::from_entries([("X", vec![1010.0])]).unwrap();
        let params = AnalysisParams {
            threshold: 0.02,
            tolerance: 10.0,
        };
        let analysis = run(
            &example_trace(),
            &catalog,
            &params,
            &PeakSelection::Positions(vec![1020.0, 1005.0]),
        )
        .unwrap();
        let detected: Vec<f64> = analysis
            .matching
            .records()
            .iter()
            .map(|r| r.detected_peak)
            .collect();
        assert_eq!(detected, vec![1020.0, 1005.0]);
    }

    #[test]
    fn test_invalid_tolerance_aborts_run() {
        let params = AnalysisParams {
            threshold: 0.02,
            tolerance: f64::NAN,
        };
        let err = run(
            &example_trace(),
            &ReferenceCatalog::builtin(),
            &params,
            &PeakSelection::All,
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidParameter { .. }));
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let catalog = ReferenceCatalog::builtin();
        let trace = example_trace();
        let params = AnalysisParams::default();
        let first = run(&trace, &catalog, &params, &PeakSelection::All).unwrap();
        let second = run(&trace, &catalog, &params, &PeakSelection::All).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.report(), second.report());
    }
}
