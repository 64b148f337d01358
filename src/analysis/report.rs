//! Two-sheet export document.
//!
//! [`Report::new`] only arranges existing values into tables; rendering to
//! `.xlsx` is a separate step so the structure can be inspected in tests
//! without touching a workbook.

use std::io;
use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;

use super::detector::DetectedPeak;
use super::matcher::MatchRecord;
use crate::error::Result;

pub const RESULTS_SHEET: &str = "Detection Results";
pub const RAW_PEAKS_SHEET: &str = "Raw Peaks";

pub const RESULTS_COLUMNS: [&str; 4] = [
    "Substance",
    "Peak Detected (cm-1)",
    "Reference Peak (cm-1)",
    "Justification",
];
pub const RAW_PEAKS_COLUMNS: [&str; 2] = ["Wavenumber (cm-1)", "Absorbance"];

/// Suggested file name for the exported workbook.
pub const DEFAULT_FILE_NAME: &str = "ftir_detection_results.xlsx";
/// Suggested file name for the CSV export of the detection results.
pub const DEFAULT_CSV_FILE_NAME: &str = "ftir_detection_results.csv";

// ---------------------------------------------------------------------------
// Table model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: &'static str,
    pub columns: &'static [&'static str],
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Match results and raw peaks, in export order.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    sheets: [Sheet; 2],
}

impl Report {
    pub fn new(peaks: &[DetectedPeak], matches: &[MatchRecord]) -> Self {
        let results = Sheet {
            name: RESULTS_SHEET,
            columns: &RESULTS_COLUMNS,
            rows: matches
                .iter()
                .map(|m| {
                    vec![
                        Cell::Text(m.substance.clone()),
                        Cell::Number(m.detected_peak),
                        Cell::Number(m.reference_peak),
                        Cell::Text(m.justification.clone()),
                    ]
                })
                .collect(),
        };
        let raw_peaks = Sheet {
            name: RAW_PEAKS_SHEET,
            columns: &RAW_PEAKS_COLUMNS,
            rows: peaks
                .iter()
                .map(|p| vec![Cell::Number(p.position), Cell::Number(p.height)])
                .collect(),
        };
        Report {
            sheets: [results, raw_peaks],
        }
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn results(&self) -> &Sheet {
        &self.sheets[0]
    }

    pub fn raw_peaks(&self) -> &Sheet {
        &self.sheets[1]
    }

    /// Render the workbook into memory.
    pub fn to_xlsx_buffer(&self) -> Result<Vec<u8>> {
        let mut workbook = self.build_workbook()?;
        Ok(workbook.save_to_buffer()?)
    }

    /// Render the workbook to `path`.
    pub fn save_xlsx(&self, path: &Path) -> Result<()> {
        let mut workbook = self.build_workbook()?;
        workbook.save(path)?;
        log::info!("exported report to {}", path.display());
        Ok(())
    }

    fn build_workbook(&self) -> Result<Workbook> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        for sheet in &self.sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(sheet.name)?;

            for (col, title) in sheet.columns.iter().enumerate() {
                worksheet.write_string_with_format(0, col as u16, *title, &header_format)?;
                worksheet.set_column_width(col as u16, column_width(title))?;
            }

            for (row, cells) in sheet.rows.iter().enumerate() {
                let row = row as u32 + 1;
                for (col, cell) in cells.iter().enumerate() {
                    match cell {
                        Cell::Text(s) => worksheet.write_string(row, col as u16, s)?,
                        Cell::Number(v) => worksheet.write_number(row, col as u16, *v)?,
                    };
                }
            }
        }
        Ok(workbook)
    }
}

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// Write `rows` as CSV under the given header.
///
/// The header is written even when `rows` is empty.
pub fn write_csv<T: Serialize, W: io::Write>(columns: &[&str], rows: &[T], writer: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    writer.write_record(columns)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Detection results as CSV, same columns as the results sheet.
pub fn write_matches_csv<W: io::Write>(matches: &[MatchRecord], writer: W) -> Result<()> {
    write_csv(&RESULTS_COLUMNS, matches, writer)
}

/// Raw peaks as CSV, same columns as the raw peaks sheet.
pub fn write_peaks_csv<W: io::Write>(peaks: &[DetectedPeak], writer: W) -> Result<()> {
    write_csv(&RAW_PEAKS_COLUMNS, peaks, writer)
}

fn column_width(title: &str) -> f64 {
    match title {
        "Justification" => 60.0,
        "Substance" => 24.0,
        _ => title.len() as f64 + 2.0,
    }
}
