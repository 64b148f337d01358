use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Line, LineStyle, Plot, PlotPoint, PlotPoints, Points, VLine};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Spectrum plot (central panel)
// ---------------------------------------------------------------------------

/// Plot-space x for a wavenumber. The axis is drawn negated so that
/// wavenumbers decrease left to right.
fn to_plot_x(wavenumber: f64) -> f64 {
    -wavenumber
}

/// Wavenumber shown for a plot-space x.
fn from_plot_x(x: f64) -> f64 {
    -x
}

fn hover_label(name: &str, point: &PlotPoint) -> String {
    let wavenumber = from_plot_x(point.x);
    if name.is_empty() {
        format!("{wavenumber:.1} cm-1\nA = {:.4}", point.y)
    } else {
        format!("{name}\n{wavenumber:.1} cm-1\nA = {:.4}", point.y)
    }
}

/// Render the spectrum with detected peaks and matched reference bands.
///
/// The wavenumber axis runs high → low, as FTIR spectra are usually read.
pub fn spectrum_plot(ui: &mut Ui, state: &AppState, height: f32) {
    let Some(loaded) = &state.loaded else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a spectrum to start  (File → Open…)");
        });
        return;
    };

    Plot::new("spectrum_plot")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("Wavenumber (cm-1)")
        .y_axis_label("Absorbance")
        .x_axis_formatter(|mark, _range| format!("{}", from_plot_x(mark.value)))
        .label_formatter(hover_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let trace: PlotPoints = loaded.trace.points().map(|(x, y)| [to_plot_x(x), y]).collect();
            plot_ui.line(
                Line::new(trace)
                    .name(&loaded.name)
                    .color(Color32::from_rgb(0xd0, 0x30, 0x30))
                    .width(1.5),
            );

            let mut selected: Vec<[f64; 2]> = Vec::new();
            let mut others: Vec<[f64; 2]> = Vec::new();
            for (peak, &sel) in state.peaks.iter().zip(&state.selected) {
                let point = [to_plot_x(peak.position), peak.height];
                if sel {
                    selected.push(point);
                } else {
                    others.push(point);
                }
            }

            plot_ui.points(
                Points::new(selected)
                    .name("Selected peaks")
                    .color(Color32::from_rgb(0x20, 0x60, 0xe0))
                    .radius(4.0),
            );
            plot_ui.points(
                Points::new(others)
                    .name("Other peaks")
                    .color(Color32::GRAY)
                    .radius(3.0),
            );

            // One dashed line per matched reference band.
            if let (Some(matching), Some(colors)) = (&state.matching, &state.color_map) {
                let mut drawn: Vec<(&str, f64)> = Vec::new();
                for record in matching.records() {
                    let key = (record.substance.as_str(), record.reference_peak);
                    if drawn.contains(&key) {
                        continue;
                    }
                    drawn.push(key);
                    plot_ui.vline(
                        VLine::new(to_plot_x(record.reference_peak))
                            .name(&record.substance)
                            .color(colors.color_for(&record.substance))
                            .style(LineStyle::Dashed { length: 6.0 })
                            .width(1.0),
                    );
                }
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_mapping_reverses_order() {
        assert!(to_plot_x(4000.0) < to_plot_x(400.0));
        assert_eq!(from_plot_x(to_plot_x(1736.0)), 1736.0);
    }

    #[test]
    fn test_hover_label_shows_positive_wavenumber() {
        let point = PlotPoint::new(to_plot_x(1005.0), 0.03);
        assert_eq!(hover_label("", &point), "1005.0 cm-1\nA = 0.0300");
        assert_eq!(hover_label("PE", &point), "PE\n1005.0 cm-1\nA = 0.0300");
    }
}
