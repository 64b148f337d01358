use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use ftir_peak_analyzer::analysis::detector::DetectedPeak;
use ftir_peak_analyzer::analysis::matcher::MatchRecord;
use ftir_peak_analyzer::analysis::report::{RAW_PEAKS_COLUMNS, RESULTS_COLUMNS};
use ftir_peak_analyzer::data::model::DataPreview;

use crate::color::ColorMap;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Raw data preview
// ---------------------------------------------------------------------------

/// Head of the uploaded table.
pub fn preview_table(ui: &mut Ui, preview: &DataPreview) {
    ui.push_id("preview_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(140.0))
            .column(Column::remainder())
            .header(ROW_HEIGHT, |mut header| {
                for name in &preview.columns {
                    header.col(|ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|mut body| {
                for &(x, y) in &preview.rows {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui| {
                            ui.label(x.to_string());
                        });
                        row.col(|ui| {
                            ui.label(y.to_string());
                        });
                    });
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Detected peaks
// ---------------------------------------------------------------------------

/// Every detected peak, selected or not; unselected rows are dimmed.
pub fn peaks_table(ui: &mut Ui, peaks: &[DetectedPeak], selected: &[bool]) {
    if peaks.is_empty() {
        ui.label("No peaks above the threshold.");
        return;
    }

    ui.push_id("peaks_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(140.0))
            .column(Column::remainder())
            .header(ROW_HEIGHT, |mut header| {
                for title in RAW_PEAKS_COLUMNS {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, peaks.len(), |mut row| {
                    let peak = &peaks[row.index()];
                    let active = selected.get(row.index()).copied().unwrap_or(true);
                    let cell = |text: String| {
                        let text = RichText::new(text);
                        if active {
                            text
                        } else {
                            text.weak()
                        }
                    };
                    row.col(|ui| {
                        ui.label(cell(peak.position.to_string()));
                    });
                    row.col(|ui| {
                        ui.label(cell(format!("{:.4}", peak.height)));
                    });
                });
            });
    });
}

// ---------------------------------------------------------------------------
// Detection results
// ---------------------------------------------------------------------------

/// Match records, one row each, substance coloured as in the plot.
pub fn results_table(ui: &mut Ui, records: &[MatchRecord], colors: Option<&ColorMap>) {
    if records.is_empty() {
        ui.label("No reference peak within tolerance.");
        return;
    }

    ui.push_id("results_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(160.0))
            .column(Column::auto().at_least(130.0))
            .column(Column::auto().at_least(130.0))
            .column(Column::remainder())
            .header(ROW_HEIGHT, |mut header| {
                for title in RESULTS_COLUMNS {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, records.len(), |mut row| {
                    let record = &records[row.index()];
                    row.col(|ui| {
                        let mut text = RichText::new(&record.substance);
                        if let Some(cm) = colors {
                            text = text.color(cm.color_for(&record.substance));
                        }
                        ui.label(text);
                    });
                    row.col(|ui| {
                        ui.label(record.detected_peak.to_string());
                    });
                    row.col(|ui| {
                        ui.label(record.reference_peak.to_string());
                    });
                    row.col(|ui| {
                        ui.label(&record.justification);
                    });
                });
            });
    });
}
