use serde::{Deserialize, Serialize};

use super::catalog::ReferenceCatalog;
use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// MatchRecord – one (substance, reference peak, detected peak) hit
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(rename = "Substance")]
    pub substance: String,
    #[serde(rename = "Peak Detected (cm-1)")]
    pub detected_peak: f64,
    #[serde(rename = "Reference Peak (cm-1)")]
    pub reference_peak: f64,
    #[serde(rename = "Justification")]
    pub justification: String,
}

impl MatchRecord {
    fn new(substance: &str, detected_peak: f64, reference_peak: f64) -> Self {
        MatchRecord {
            substance: substance.to_string(),
            detected_peak,
            reference_peak,
            justification: format!(
                "{substance} detected via peak at {detected_peak} cm-1 (ref: {reference_peak} cm-1)"
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Compare every selected peak against every reference peak of every
/// substance and keep the pairs with `|selected - reference| <= tolerance`.
///
/// Rows come out grouped by catalog order, then reference peak order, then
/// selection order. A selected peak close to two bands of the same
/// substance produces two rows.
pub fn match_substances(
    selected: &[f64],
    catalog: &ReferenceCatalog,
    tolerance: f64,
) -> Result<Vec<MatchRecord>> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(AnalysisError::InvalidParameter {
            name: "tolerance",
            value: tolerance,
        });
    }

    let mut records = Vec::new();
    for entry in catalog.iter() {
        for &reference in entry.peaks() {
            for &peak in selected {
                if (peak - reference).abs() <= tolerance {
                    records.push(MatchRecord::new(entry.substance(), peak, reference));
                }
            }
        }
    }

    log::debug!(
        "{} matches for {} selected peaks (tolerance {tolerance})",
        records.len(),
        selected.len()
    );
    Ok(records)
}
