//! Analysis core: pure functions from a trace to a report.
//!
//! Architecture:
//! ```text
//!   Trace (wavenumber, absorbance)
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ detector  │  thresholded local maxima → Vec<DetectedPeak>
//!   └──────────┘
//!        │  (selection)
//!        ▼
//!   ┌──────────┐     ┌──────────┐
//!   │ matcher   │◄────│ catalog   │  substance → reference peaks
//!   └──────────┘     └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ report    │  "Detection Results" + "Raw Peaks" → .xlsx
//!   └──────────┘
//! ```
//!
//! `pipeline` strings the steps together for one run.

pub mod catalog;
pub mod detector;
pub mod matcher;
pub mod pipeline;
pub mod report;
