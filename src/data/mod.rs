//! Data layer: trace types and file loading.
//!
//! Architecture:
//! ```text
//!  .csv / .tsv / .parquet / .json
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  first two columns → LoadedTrace
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  Trace    │  validated wavenumber/absorbance pairs
//!   └──────────┘
//! ```

pub mod loader;
pub mod model;
