use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::Float64Array;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use ftir_peak_analyzer::analysis::catalog::ReferenceCatalog;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// (substance, amplitude, band width σ in cm⁻¹) mixed into the sample.
const COMPONENTS: &[(&str, f64, f64)] = &[
    ("PE", 0.09, 6.0),
    ("Talc", 0.04, 8.0),
    ("I-1010", 0.025, 4.0),
    ("CaCO3", 0.03, 10.0),
];

fn main() -> Result<()> {
    env_logger::init();

    let stem = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_trace"));

    let catalog = ReferenceCatalog::builtin();
    let mut bands: Vec<(f64, f64, f64)> = Vec::new();
    for &(name, amplitude, sigma) in COMPONENTS {
        let peaks = catalog
            .get(name)
            .with_context(|| format!("'{name}' missing from the reference catalog"))?;
        bands.extend(peaks.iter().map(|&mu| (mu, sigma, amplitude)));
    }
    log::debug!("{} bands from {} components", bands.len(), COMPONENTS.len());

    // Wavenumbers: 4000 → 400, step 2 (descending, as instruments export)
    let wavenumbers: Vec<f64> = (0..1801).map(|i| 4000.0 - i as f64 * 2.0).collect();

    let mut rng = SimpleRng::new(42);
    let absorbance: Vec<f64> = wavenumbers
        .iter()
        .map(|&wn| {
            let signal: f64 = bands
                .iter()
                .map(|&(mu, sigma, amp)| gaussian(wn, mu, sigma, amp))
                .sum();
            0.005 + signal + rng.gauss(0.0, 0.0005)
        })
        .collect();

    // CSV
    let csv_path = stem.with_extension("csv");
    let mut writer = csv::Writer::from_path(&csv_path)
        .with_context(|| format!("creating {}", csv_path.display()))?;
    writer.write_record(["Wavenumber (cm-1)", "Absorbance"])?;
    for (x, y) in wavenumbers.iter().zip(&absorbance) {
        writer.write_record([x.to_string(), format!("{y:.6}")])?;
    }
    writer.flush()?;

    // Parquet
    let schema = Arc::new(Schema::new(vec![
        Field::new("wavenumber", DataType::Float64, false),
        Field::new("absorbance", DataType::Float64, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from(wavenumbers.clone())),
            Arc::new(Float64Array::from(absorbance)),
        ],
    )
    .context("building record batch")?;

    let parquet_path = stem.with_extension("parquet");
    let file = std::fs::File::create(&parquet_path)
        .with_context(|| format!("creating {}", parquet_path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;

    println!(
        "Wrote {} points to {} and {}",
        wavenumbers.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
