use std::collections::HashSet;

use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// Built-in signature table: substance → characteristic bands (cm⁻¹)
// ---------------------------------------------------------------------------

/// Polymer additives, fillers, comonomers and base resins with their
/// characteristic FTIR bands. Row order and per-row band order are the
/// order results are reported in.
const BUILTIN: &[(&str, &[f64])] = &[
    ("T-622", &[1736.0]),
    ("C-944", &[1568.0, 1530.0]),
    ("C-3346", &[1540.0]),
    ("Chimassorb 119", &[1530.0]),
    ("I-1010", &[1745.0]),
    ("I-1076", &[1740.0]),
    ("I-168", &[1212.0, 1194.0, 850.0]),
    ("W-399", &[1205.0]),
    ("Cyanox", &[1790.0, 1705.0]),
    ("Slip (KE, KS, KU, KB)", &[1640.0]),
    ("Slip (EBS)", &[1640.0, 1554.0]),
    ("lauryl amide (antistat)", &[1620.0]),
    ("Ca(St)2", &[1578.0, 1540.0]),
    ("Zn(St)2", &[1539.0]),
    ("Talc", &[1020.0, 670.0, 465.0, 451.0]),
    ("Superfloss", &[1087.0, 800.0, 475.0]),
    ("CaCO3", &[875.0, 1450.0, 1800.0]),
    ("CaSO4", &[1155.0, 1125.0, 675.0, 613.0, 595.0]),
    ("EVA", &[1740.0, 1238.0, 1020.0]),
    ("Degraded carbonyl", &[1718.0]),
    ("Butene comonomer", &[1378.0, 770.0]),
    ("Hexene comonomer", &[1377.0, 895.0]),
    ("Octene comonomer", &[1377.0]),
    ("PE", &[2940.0, 1460.0, 730.0, 720.0]),
    ("PP", &[1167.0, 997.0, 972.0, 841.0]),
    ("PIB", &[1230.0, 950.0, 923.0]),
    ("Polybutylene", &[1380.0, 760.0]),
    ("Polyamide", &[1636.0, 1540.0, 3300.0]),
    ("PET", &[1730.0, 1248.0, 1110.0]),
    ("EVOH", &[1100.0, 850.0, 3350.0]),
    ("Surlyn (Na)", &[1699.0]),
    ("Surlyn (Zn)", &[1699.0, 1585.0]),
    ("Acrylics", &[1735.0, 1165.0]),
    ("PS", &[756.0, 700.0, 1600.0]),
    ("Silicone", &[1262.0, 1020.0, 799.0]),
];

// ---------------------------------------------------------------------------
// ReferenceEntry / ReferenceCatalog
// ---------------------------------------------------------------------------

/// One substance and its reference band positions (never empty).
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceEntry {
    substance: String,
    peaks: Vec<f64>,
}

impl ReferenceEntry {
    pub fn substance(&self) -> &str {
        &self.substance
    }

    pub fn peaks(&self) -> &[f64] {
        &self.peaks
    }
}

/// Read-only lookup table of reference signatures.
///
/// Built once and handed to whoever needs it; there is no way to modify a
/// catalog after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceCatalog {
    entries: Vec<ReferenceEntry>,
}

impl ReferenceCatalog {
    /// The built-in additive/polymer table.
    pub fn builtin() -> Self {
        ReferenceCatalog {
            entries: BUILTIN
                .iter()
                .map(|(name, peaks)| ReferenceEntry {
                    substance: (*name).to_string(),
                    peaks: peaks.to_vec(),
                })
                .collect(),
        }
    }

    /// Build an alternate catalog, keeping the given order.
    pub fn from_entries<I, S, P>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, P)>,
        S: Into<String>,
        P: Into<Vec<f64>>,
    {
        let mut seen = HashSet::new();
        let mut out = Vec::new();

        for (name, peaks) in entries {
            let substance = name.into();
            let peaks = peaks.into();
            if peaks.is_empty() {
                return Err(AnalysisError::invalid_input(format!(
                    "substance '{substance}' has no reference peaks"
                )));
            }
            if let Some(bad) = peaks.iter().find(|p| !p.is_finite()) {
                return Err(AnalysisError::invalid_input(format!(
                    "substance '{substance}' has a non-finite reference peak ({bad})"
                )));
            }
            if !seen.insert(substance.clone()) {
                return Err(AnalysisError::invalid_input(format!(
                    "duplicate substance '{substance}'"
                )));
            }
            out.push(ReferenceEntry { substance, peaks });
        }

        Ok(ReferenceCatalog { entries: out })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReferenceEntry> {
        self.entries.iter()
    }

    /// Reference peaks of one substance.
    pub fn get(&self, substance: &str) -> Option<&[f64]> {
        self.entries
            .iter()
            .find(|e| e.substance == substance)
            .map(|e| e.peaks.as_slice())
    }

    /// Substance names in catalog order.
    pub fn substances(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.substance.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ReferenceCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
