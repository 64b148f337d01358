use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::{DataPreview, LoadedTrace, Trace};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a two-column trace from a file.  Dispatch by extension.
///
/// Supported formats (first column wavenumber, second absorbance; any
/// further columns are ignored):
/// * `.csv`            – comma separated, header row optional
/// * `.tsv` / `.txt`   – tab separated, header row optional
/// * `.parquet` / `.pq` – first two numeric columns
/// * `.json`           – pandas `orient="values"` or `orient="split"`
pub fn load_trace(path: &Path) -> Result<LoadedTrace> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let (columns, trace) = match ext.as_str() {
        "csv" => load_delimited(path, b',')?,
        "tsv" | "txt" => load_delimited(path, b'\t')?,
        "parquet" | "pq" => load_parquet(path)?,
        "json" => load_json(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let preview = DataPreview::new(columns, &trace);

    log::info!("Loaded {name}: {} points", trace.len());
    Ok(LoadedTrace {
        name,
        trace,
        preview,
    })
}

fn build_trace(wavenumber: Vec<f64>, absorbance: Vec<f64>) -> Result<Trace> {
    Ok(Trace::new(wavenumber, absorbance)?)
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

/// The first row is a header when neither of its first two fields is a
/// number; a row with exactly one numeric field is malformed.
fn load_delimited(path: &Path, delimiter: u8) -> Result<([String; 2], Trace)> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(delimiter)
        .from_path(path)
        .context("opening delimited file")?;

    parse_delimited(reader)
}

fn parse_delimited<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<([String; 2], Trace)> {
    let mut columns = DataPreview::default_columns();
    let mut wavenumber = Vec::new();
    let mut absorbance = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("row {row_no}"))?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        if record.len() < 2 {
            bail!("row {row_no}: expected at least two columns, found {}", record.len());
        }

        let x = record[0].parse::<f64>();
        let y = record[1].parse::<f64>();
        match (x, y) {
            (Ok(x), Ok(y)) => {
                wavenumber.push(x);
                absorbance.push(y);
            }
            (Err(_), Err(_)) if row_no == 0 => {
                columns = [record[0].to_string(), record[1].to_string()];
            }
            _ => bail!(
                "row {row_no}: '{}', '{}' is not a pair of numbers",
                &record[0],
                &record[1]
            ),
        }
    }

    Ok((columns, build_trace(wavenumber, absorbance)?))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// The two layouts pandas writes for a plain table.
///
/// ```json
/// [[4000.0, 0.012], [3998.0, 0.013], ...]
/// ```
/// ```json
/// {"columns": ["cm-1", "A"], "data": [[4000.0, 0.012], ...]}
/// ```
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonTable {
    Values(Vec<Vec<serde_json::Value>>),
    Split {
        columns: Vec<serde_json::Value>,
        data: Vec<Vec<serde_json::Value>>,
    },
}

fn load_json(path: &Path) -> Result<([String; 2], Trace)> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<([String; 2], Trace)> {
    let table: JsonTable = serde_json::from_str(text).context("parsing JSON table")?;

    let (columns, rows) = match table {
        JsonTable::Values(rows) => (DataPreview::default_columns(), rows),
        JsonTable::Split { columns, data } => {
            if columns.len() < 2 {
                bail!("JSON table has {} columns, expected at least two", columns.len());
            }
            let name = |v: &serde_json::Value| match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            ([name(&columns[0]), name(&columns[1])], data)
        }
    };

    let mut wavenumber = Vec::with_capacity(rows.len());
    let mut absorbance = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        if row.len() < 2 {
            bail!("row {i}: expected at least two values, found {}", row.len());
        }
        let x = row[0]
            .as_f64()
            .with_context(|| format!("row {i}: wavenumber {} is not a number", row[0]))?;
        let y = row[1]
            .as_f64()
            .with_context(|| format!("row {i}: absorbance {} is not a number", row[1]))?;
        wavenumber.push(x);
        absorbance.push(y);
    }

    Ok((columns, build_trace(wavenumber, absorbance)?))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load the first two columns of a Parquet file.
///
/// Both columns may be any of Float64, Float32, Int64 or Int32. Works with
/// files written by **Pandas** (`df.to_parquet()`) and **Polars**
/// (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<([String; 2], Trace)> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let fields = builder.schema().fields();
    if fields.len() < 2 {
        bail!("Parquet file has {} columns, expected at least two", fields.len());
    }
    let columns = [fields[0].name().clone(), fields[1].name().clone()];

    let reader = builder.build().context("building parquet reader")?;

    let mut wavenumber = Vec::new();
    let mut absorbance = Vec::new();
    let mut offset = 0;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let x_col = batch.column(0);
        let y_col = batch.column(1);

        for row in 0..batch.num_rows() {
            let x = numeric_value(x_col, row)
                .with_context(|| format!("row {}: failed to read '{}'", offset + row, columns[0]))?;
            let y = numeric_value(y_col, row)
                .with_context(|| format!("row {}: failed to read '{}'", offset + row, columns[1]))?;
            wavenumber.push(x);
            absorbance.push(y);
        }
        offset += batch.num_rows();
    }

    Ok((columns, build_trace(wavenumber, absorbance)?))
}

// -- Arrow helpers --

/// Read one numeric cell as `f64`.
fn numeric_value(col: &ArrayRef, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value");
    }
    let value = match col.data_type() {
        DataType::Float64 => downcast::<Float64Array>(col)?.value(row),
        DataType::Float32 => downcast::<Float32Array>(col)?.value(row) as f64,
        DataType::Int64 => downcast::<Int64Array>(col)?.value(row) as f64,
        DataType::Int32 => downcast::<Int32Array>(col)?.value(row) as f64,
        other => bail!("expected a numeric column, got {other:?}"),
    };
    Ok(value)
}

fn downcast<T: 'static>(col: &ArrayRef) -> Result<&T> {
    col.as_any()
        .downcast_ref::<T>()
        .with_context(|| format!("unexpected array type {:?}", col.data_type()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_csv_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "sample.csv",
            "cm-1,A,comment\n1000,0.01,x\n1005,0.03,y\n1010,0.015,z\n",
        );
        let loaded = load_trace(&path).unwrap();
        assert_eq!(loaded.name, "sample.csv");
        assert_eq!(loaded.trace.wavenumber(), &[1000.0, 1005.0, 1010.0]);
        assert_eq!(loaded.trace.absorbance(), &[0.01, 0.03, 0.015]);
        assert_eq!(loaded.preview.columns, ["cm-1".to_string(), "A".to_string()]);
    }

    #[test]
    fn test_csv_without_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "raw.csv", "4000.0,0.012\n3998.0,0.013\n\n");
        let loaded = load_trace(&path).unwrap();
        assert_eq!(loaded.trace.len(), 2);
        assert_eq!(loaded.preview.columns, DataPreview::default_columns());
    }

    #[test]
    fn test_tab_separated() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "raw.tsv", "x\ty\n1000\t0.5\n1002\t0.6\n");
        let loaded = load_trace(&path).unwrap();
        assert_eq!(loaded.trace.absorbance(), &[0.5, 0.6]);
    }

    #[test]
    fn test_csv_non_numeric_row_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "bad.csv", "x,y\n1000,0.5\n1002,oops\n");
        let err = load_trace(&path).unwrap_err();
        assert!(format!("{err:#}").contains("row 2"));
    }

    #[test]
    fn test_half_numeric_first_row_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "bad_first.csv", "1000,abc\n1005,0.03\n1010,0.01\n");
        let err = load_trace(&path).unwrap_err();
        assert!(format!("{err:#}").contains("row 0"));
    }

    #[test]
    fn test_csv_single_column_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "one.csv", "1000\n1002\n");
        assert!(load_trace(&path).is_err());
    }

    #[test]
    fn test_header_only_csv_is_empty_trace() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "empty.csv", "x,y\n");
        let err = load_trace(&path).unwrap_err();
        assert!(format!("{err:#}").contains("empty"));
    }

    #[test]
    fn test_json_values_layout() {
        let (columns, trace) = parse_json("[[1000, 0.1], [1002, 0.2, \"extra\"]]").unwrap();
        assert_eq!(columns, DataPreview::default_columns());
        assert_eq!(trace.wavenumber(), &[1000.0, 1002.0]);
    }

    #[test]
    fn test_json_split_layout() {
        let text = r#"{"columns": ["cm-1", "A"], "index": [0, 1], "data": [[1000, 0.1], [1002, 0.2]]}"#;
        let (columns, trace) = parse_json(text).unwrap();
        assert_eq!(columns, ["cm-1".to_string(), "A".to_string()]);
        assert_eq!(trace.absorbance(), &[0.1, 0.2]);
    }

    #[test]
    fn test_json_null_value_fails() {
        assert!(parse_json("[[1000, null]]").is_err());
    }

    #[test]
    fn test_parquet_first_two_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("wavenumber", DataType::Float64, false),
            Field::new("absorbance", DataType::Float32, false),
            Field::new("scan", DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Float64Array::from(vec![1000.0, 1002.0, 1004.0])),
                Arc::new(Float32Array::from(vec![0.25_f32, 0.5, 0.125])),
                Arc::new(Int64Array::from(vec![1, 1, 1])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let loaded = load_trace(&path).unwrap();
        assert_eq!(loaded.trace.wavenumber(), &[1000.0, 1002.0, 1004.0]);
        assert_eq!(loaded.trace.absorbance(), &[0.25, 0.5, 0.125]);
        assert_eq!(
            loaded.preview.columns,
            ["wavenumber".to_string(), "absorbance".to_string()]
        );
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_trace(Path::new("spectrum.spa")).unwrap_err();
        assert!(err.to_string().contains(".spa"));
    }
}
