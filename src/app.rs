use eframe::egui::{self, CollapsingHeader, ScrollArea, Ui};

use ftir_peak_analyzer::analysis::pipeline::Matching;

use crate::state::AppState;
use crate::ui::{panels, plot, tables};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct FtirApp {
    pub state: AppState,
}

impl FtirApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for FtirApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: sliders and peak selection ----
        egui::SidePanel::left("peak_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: preview, plot, results ----
        egui::CentralPanel::default().show(ctx, |ui| {
            central_panel(ui, &self.state);
        });
    }
}

fn central_panel(ui: &mut Ui, state: &AppState) {
    ui.heading("FTIR Peak Analysis - Additives Detection");

    let Some(loaded) = &state.loaded else {
        plot::spectrum_plot(ui, state, 0.0);
        return;
    };

    let plot_height = (ui.available_height() * 0.6).max(300.0);

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            CollapsingHeader::new("Raw Data Preview")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    tables::preview_table(ui, &loaded.preview);
                });

            ui.add_space(4.0);
            plot::spectrum_plot(ui, state, plot_height);

            ui.add_space(8.0);
            CollapsingHeader::new("Raw Peaks")
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    tables::peaks_table(ui, &state.peaks, &state.selected);
                });

            ui.add_space(8.0);
            ui.heading("Detection Results");
            match &state.matching {
                Some(Matching::Completed(records)) => {
                    tables::results_table(ui, records, state.color_map.as_ref());
                }
                Some(Matching::Skipped(notice)) => {
                    ui.label(notice.to_string());
                }
                None => {}
            }
        });
}
