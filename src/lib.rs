//! FTIR peak detection and additive identification.
//!
//! The library holds the pure analysis core and file loading; the desktop
//! viewer in `main.rs` is a thin caller on top of [`analysis::pipeline`].

pub mod analysis;
pub mod data;
pub mod error;

pub use analysis::catalog::ReferenceCatalog;
pub use analysis::detector::{detect_peaks, DetectedPeak};
pub use analysis::matcher::{match_substances, MatchRecord};
pub use analysis::pipeline::{run, Analysis, AnalysisParams, Matching, PeakSelection};
pub use analysis::report::Report;
pub use data::model::Trace;
pub use error::AnalysisError;
