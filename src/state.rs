use std::path::Path;

use anyhow::{Context, Result};

use ftir_peak_analyzer::analysis::catalog::ReferenceCatalog;
use ftir_peak_analyzer::analysis::detector::DetectedPeak;
use ftir_peak_analyzer::analysis::pipeline::{self, AnalysisParams, Matching, PeakSelection};
use ftir_peak_analyzer::analysis::report::{self, Report};
use ftir_peak_analyzer::data::model::LoadedTrace;

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Reference signatures, injected once at start-up.
    pub catalog: ReferenceCatalog,

    /// Threshold / tolerance as set by the sliders.
    pub params: AnalysisParams,

    /// Loaded trace (None until user loads a file).
    pub loaded: Option<LoadedTrace>,

    /// Peaks detected at the current threshold.
    pub peaks: Vec<DetectedPeak>,

    /// Selection flag per entry of `peaks`.
    pub selected: Vec<bool>,

    /// Result of the last matching step.
    pub matching: Option<Matching>,

    /// Colour per matched substance.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ReferenceCatalog::builtin())
    }
}

impl AppState {
    pub fn new(catalog: ReferenceCatalog) -> Self {
        Self {
            catalog,
            params: AnalysisParams::default(),
            loaded: None,
            peaks: Vec::new(),
            selected: Vec::new(),
            matching: None,
            color_map: None,
            status_message: None,
        }
    }

    /// Ingest a newly loaded trace; every detected peak starts selected.
    pub fn set_trace(&mut self, loaded: LoadedTrace) {
        self.loaded = Some(loaded);
        self.peaks.clear();
        self.selected.clear();
        self.status_message = None;
        self.redetect();
    }

    /// Re-run detection after a threshold change, then re-match.
    ///
    /// Peaks the user had deselected stay deselected if they are detected
    /// again; newly appearing peaks start selected.
    pub fn redetect(&mut self) {
        let Some(loaded) = &self.loaded else {
            return;
        };

        let mut deselected: Vec<f64> = self
            .peaks
            .iter()
            .zip(&self.selected)
            .filter(|(_, &sel)| !sel)
            .map(|(p, _)| p.position)
            .collect();

        match loaded.trace.detect_peaks(self.params.threshold) {
            Ok(peaks) => {
                // Each remembered deselection applies to one peak only, so
                // repeated wavenumbers keep their own flags.
                self.selected = peaks
                    .iter()
                    .map(|p| match deselected.iter().position(|&d| d == p.position) {
                        Some(idx) => {
                            deselected.remove(idx);
                            false
                        }
                        None => true,
                    })
                    .collect();
                self.peaks = peaks;
                self.rematch();
            }
            Err(e) => self.fail(e.into()),
        }
    }

    /// Re-run matching after a tolerance or selection change.
    pub fn rematch(&mut self) {
        if self.loaded.is_none() {
            return;
        }
        let selection = PeakSelection::Positions(self.selected_positions());
        match pipeline::match_selection(
            &self.peaks,
            &self.catalog,
            self.params.tolerance,
            &selection,
        ) {
            Ok(matching) => {
                self.color_map = Some(ColorMap::new(
                    matching.records().iter().map(|r| r.substance.as_str()),
                ));
                self.matching = Some(matching);
            }
            Err(e) => self.fail(e.into()),
        }
    }

    fn fail(&mut self, error: anyhow::Error) {
        log::error!("Analysis failed: {error:#}");
        self.status_message = Some(format!("Error: {error:#}"));
        self.matching = None;
        self.color_map = None;
    }

    /// Positions of selected peaks, in detection order.
    pub fn selected_positions(&self) -> Vec<f64> {
        self.peaks
            .iter()
            .zip(&self.selected)
            .filter(|(_, &sel)| sel)
            .map(|(p, _)| p.position)
            .collect()
    }

    /// Flip the selection of one detected peak.
    pub fn toggle_peak(&mut self, index: usize) {
        if let Some(flag) = self.selected.get_mut(index) {
            *flag = !*flag;
            self.rematch();
        }
    }

    pub fn select_all_peaks(&mut self) {
        self.selected.iter_mut().for_each(|s| *s = true);
        self.rematch();
    }

    pub fn select_no_peaks(&mut self) {
        self.selected.iter_mut().for_each(|s| *s = false);
        self.rematch();
    }

    /// Export document for the current state, if matching ran.
    pub fn report(&self) -> Option<Report> {
        match self.matching.as_ref()? {
            Matching::Completed(records) => Some(Report::new(&self.peaks, records)),
            Matching::Skipped(_) => None,
        }
    }

    /// Write the current report as `.xlsx`.
    pub fn export_to(&self, path: &Path) -> Result<()> {
        let report = self
            .report()
            .context("nothing to export: select at least one peak")?;
        report
            .save_xlsx(path)
            .with_context(|| format!("writing {}", path.display()))
    }

    /// Write the current detection results as CSV.
    pub fn export_csv_to(&self, path: &Path) -> Result<()> {
        let records = match self.matching.as_ref() {
            Some(Matching::Completed(records)) => records,
            _ => anyhow::bail!("nothing to export: select at least one peak"),
        };
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        report::write_matches_csv(records, file)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("exported {} results to {}", records.len(), path.display());
        Ok(())
    }
}
