//! Thresholded local-maxima detection.
//!
//! A sample is a peak when it is strictly higher than both immediate
//! neighbours and at least as high as the threshold. Flat maxima are
//! reported once, at the first index of the plateau. The first and last
//! samples are never peaks.

use serde::{Deserialize, Serialize};

use crate::data::model::validate_pair;
use crate::error::{AnalysisError, Result};

/// A detected local maximum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectedPeak {
    /// Wavenumber of the peak sample (cm⁻¹).
    #[serde(rename = "Wavenumber (cm-1)")]
    pub position: f64,
    /// Absorbance at the peak sample.
    #[serde(rename = "Absorbance")]
    pub height: f64,
}

/// Detect peaks in `absorbance`, reporting positions from `wavenumber`.
///
/// Output is in input index order.
pub fn detect_peaks(
    wavenumber: &[f64],
    absorbance: &[f64],
    threshold: f64,
) -> Result<Vec<DetectedPeak>> {
    validate_pair(wavenumber, absorbance)?;
    if !threshold.is_finite() {
        return Err(AnalysisError::InvalidParameter {
            name: "threshold",
            value: threshold,
        });
    }

    let peaks: Vec<DetectedPeak> = local_maxima(absorbance)
        .into_iter()
        .filter(|&idx| absorbance[idx] >= threshold)
        .map(|idx| DetectedPeak {
            position: wavenumber[idx],
            height: absorbance[idx],
        })
        .collect();

    log::debug!(
        "detected {} peaks in {} samples (threshold {threshold})",
        peaks.len(),
        absorbance.len()
    );
    Ok(peaks)
}

/// Indices of local maxima, first index for plateaus, edges excluded.
fn local_maxima(data: &[f64]) -> Vec<usize> {
    let n = data.len();
    let mut maxima = Vec::new();
    if n < 3 {
        return maxima;
    }

    #[allow(clippy::float_cmp)] // plateau detection compares exact sample values
    let eq = |a: f64, b: f64| a == b;

    let mut i = 1;
    while i < n - 1 {
        if data[i] > data[i - 1] {
            // Walk to the end of a possible plateau.
            let start = i;
            let mut end = i;
            while end + 1 < n && eq(data[end + 1], data[start]) {
                end += 1;
            }
            if end + 1 < n && data[end + 1] < data[start] {
                maxima.push(start);
            }
            i = end + 1;
        } else {
            i += 1;
        }
    }
    maxima
}

#[cfg(test)]
mod tests {
    use super::*;

    const X: [f64; 6] = [1000.0, 1005.0, 1010.0, 1015.0, 1020.0, 1025.0];
    const Y: [f64; 6] = [0.01, 0.03, 0.015, 0.01, 0.025, 0.01];

    #[test]
    fn test_detects_example_peaks() {
        let peaks = detect_peaks(&X, &Y, 0.02).unwrap();
        assert_eq!(
            peaks,
            vec![
                DetectedPeak { position: 1005.0, height: 0.03 },
                DetectedPeak { position: 1020.0, height: 0.025 },
            ]
        );
    }

    #[test]
    fn test_threshold_filters_lower_peak() {
        let peaks = detect_peaks(&X, &Y, 0.026).unwrap();
        assert_eq!(peaks.len(), 1);
        assert_eq!(peaks[0].position, 1005.0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let peaks = detect_peaks(&X, &Y, 0.025).unwrap();
        assert_eq!(peaks.len(), 2);
    }

    #[test]
    fn test_all_below_threshold_is_empty() {
        let peaks = detect_peaks(&X, &Y, 0.5).unwrap();
        assert!(peaks.is_empty());
    }

    #[test]
    fn test_heights_never_below_threshold() {
        let y: Vec<f64> = (0..200).map(|i| ((i as f64) * 0.37).sin().abs() * 0.1).collect();
        let x: Vec<f64> = (0..200).map(|i| 4000.0 - 2.0 * i as f64).collect();
        for threshold in [0.0, 0.02, 0.05, 0.09] {
            for peak in detect_peaks(&x, &y, threshold).unwrap() {
                assert!(peak.height >= threshold);
            }
        }
    }

    #[test]
    fn test_edges_are_not_peaks() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [0.9, 0.1, 0.5, 0.1, 0.9];
        let peaks = detect_peaks(&x, &y, 0.0).unwrap();
        assert_eq!(peaks, vec![DetectedPeak { position: 3.0, height: 0.5 }]);
    }

    #[test]
    fn test_plateau_reports_first_index() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = [0.0, 0.4, 0.4, 0.4, 0.1, 0.0];
        let peaks = detect_peaks(&x, &y, 0.1).unwrap();
        assert_eq!(peaks, vec![DetectedPeak { position: 2.0, height: 0.4 }]);
    }

    #[test]
    fn test_edge_plateau_is_not_a_peak() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [0.0, 0.4, 0.4, 0.4];
        assert!(detect_peaks(&x, &y, 0.0).unwrap().is_empty());
    }

    #[test]
    fn test_shoulder_is_not_a_peak() {
        // Rises, flattens, keeps rising: no maximum on the flat part.
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = [0.0, 0.2, 0.2, 0.5, 0.1, 0.0];
        let peaks = detect_peaks(&x, &y, 0.0).unwrap();
        assert_eq!(peaks, vec![DetectedPeak { position: 4.0, height: 0.5 }]);
    }

    #[test]
    fn test_short_traces_have_no_peaks() {
        assert!(detect_peaks(&[1.0], &[0.5], 0.0).unwrap().is_empty());
        assert!(detect_peaks(&[1.0, 2.0], &[0.5, 0.9], 0.0).unwrap().is_empty());
    }

    #[test]
    fn test_mismatched_lengths_fail() {
        let err = detect_peaks(&X, &Y[..5], 0.02).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(matches!(
            detect_peaks(&[], &[], 0.02),
            Err(AnalysisError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_nan_threshold_fails() {
        assert!(matches!(
            detect_peaks(&X, &Y, f64::NAN),
            Err(AnalysisError::InvalidParameter { name: "threshold", .. })
        ));
    }

    #[test]
    fn test_detection_is_deterministic() {
        let first = detect_peaks(&X, &Y, 0.02).unwrap();
        let second = detect_peaks(&X, &Y, 0.02).unwrap();
        assert_eq!(first, second);
    }
}
