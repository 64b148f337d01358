use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use ftir_peak_analyzer::analysis::pipeline::{
    Matching, THRESHOLD_RANGE, THRESHOLD_STEP, TOLERANCE_RANGE, TOLERANCE_STEP,
};
use ftir_peak_analyzer::analysis::report::{DEFAULT_CSV_FILE_NAME, DEFAULT_FILE_NAME};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – parameters and peak selection
// ---------------------------------------------------------------------------

/// Render the left panel: sliders, then the peak selection list.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Parameters");
    ui.separator();

    let threshold_changed = ui
        .add(
            Slider::new(&mut state.params.threshold, THRESHOLD_RANGE)
                .step_by(THRESHOLD_STEP)
                .fixed_decimals(2)
                .text("Threshold (Absorbance)"),
        )
        .changed();
    let tolerance_changed = ui
        .add(
            Slider::new(&mut state.params.tolerance, TOLERANCE_RANGE)
                .step_by(TOLERANCE_STEP)
                .fixed_decimals(0)
                .text("Tolerance (cm-1)"),
        )
        .changed();

    if threshold_changed {
        state.redetect();
    } else if tolerance_changed {
        state.rematch();
    }

    ui.add_space(8.0);
    ui.heading("Select Peaks to Analyze");
    ui.separator();

    if state.loaded.is_none() {
        ui.label("No spectrum loaded.");
        return;
    }
    if state.peaks.is_empty() {
        ui.label("No peaks above the threshold.");
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all_peaks();
        }
        if ui.small_button("None").clicked() {
            state.select_no_peaks();
        }
        let n_selected = state.selected.iter().filter(|&&s| s).count();
        ui.label(format!("{n_selected}/{}", state.peaks.len()));
    });

    if let Some(Matching::Skipped(notice)) = &state.matching {
        ui.label(RichText::new(notice.to_string()).color(Color32::from_rgb(0xd0, 0x90, 0x00)));
    }

    let mut toggled = None;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (i, peak) in state.peaks.iter().enumerate() {
                let mut checked = state.selected[i];
                let label = format!("{} cm-1  (A = {:.4})", peak.position, peak.height);
                if ui.checkbox(&mut checked, label).changed() {
                    toggled = Some(i);
                }
            }
        });

    if let Some(i) = toggled {
        state.toggle_peak(i);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = matches!(state.matching, Some(Matching::Completed(_)));
            if ui
                .add_enabled(can_export, egui::Button::new("Export Excel…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(can_export, egui::Button::new("Export CSV…"))
                .clicked()
            {
                save_csv_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(loaded) = &state.loaded {
            ui.label(format!(
                "{loaded}, {} peaks detected, {} matches",
                state.peaks.len(),
                state
                    .matching
                    .as_ref()
                    .map_or(0, |m| m.records().len())
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open FTIR spectrum")
        .add_filter("Supported files", &["csv", "tsv", "txt", "parquet", "pq", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Tab separated", &["tsv", "txt"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        match ftir_peak_analyzer::data::loader::load_trace(&path) {
            Ok(loaded) => state.set_trace(loaded),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export detection results")
        .set_file_name(DEFAULT_FILE_NAME)
        .add_filter("Excel", &["xlsx"])
        .save_file();

    if let Some(path) = file {
        match state.export_to(&path) {
            Ok(()) => state.status_message = None,
            Err(e) => {
                log::error!("Export failed: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn save_csv_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export detection results")
        .set_file_name(DEFAULT_CSV_FILE_NAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match state.export_csv_to(&path) {
            Ok(()) => state.status_message = None,
            Err(e) => {
                log::error!("Export failed: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
