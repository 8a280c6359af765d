use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, DemoTable};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the demo table, mapping every failure onto [`LoadError`].
pub fn load_demo_table(path: &Path) -> Result<DemoTable, LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    load_file(path).map_err(|e| LoadError::Unreadable {
        path: path.to_path_buf(),
        reason: format!("{e:#}"),
    })
}

/// Load a demo table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one demo row per record
/// * `.json`    – `[{ "SquareFeet": 1200, "ActualPrice": null, ... }, ...]`
/// * `.parquet` – flat numeric / boolean / string columns
pub fn load_file(path: &Path) -> Result<DemoTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<DemoTable> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        bail!("CSV has no header row");
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(guess_cell).collect());
    }

    DemoTable::new(headers, rows)
}

/// Tokens pandas treats as NaN by default, minus the exotic ones.
const NA_TOKENS: &[&str] = &["NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

fn guess_cell(raw: &str) -> CellValue {
    let s = raw.trim();
    if s.is_empty() || NA_TOKENS.contains(&s) {
        return CellValue::Missing;
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Number(f);
    }
    match s {
        "true" | "True" => CellValue::Number(1.0),
        "false" | "False" => CellValue::Number(0.0),
        _ => CellValue::Text(s.to_string()),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
/// Keys absent from a record become missing cells.
fn load_json(path: &Path) -> Result<DemoTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    let mut parsed: Vec<BTreeMap<String, CellValue>> = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut cells = BTreeMap::new();
        for (key, val) in obj {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
            let cell = json_to_cell(val).with_context(|| format!("Row {i}, column '{key}'"))?;
            cells.insert(key.clone(), cell);
        }
        parsed.push(cells);
    }

    let rows = parsed
        .into_iter()
        .map(|mut cells| {
            columns
                .iter()
                .map(|col| cells.remove(col).unwrap_or(CellValue::Missing))
                .collect()
        })
        .collect();

    DemoTable::new(columns, rows)
}

fn json_to_cell(val: &JsonValue) -> Result<CellValue> {
    Ok(match val {
        JsonValue::Null => CellValue::Missing,
        JsonValue::Number(n) => CellValue::Number(n.as_f64().context("number out of range")?),
        JsonValue::Bool(b) => CellValue::Number(if *b { 1.0 } else { 0.0 }),
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Array(_) | JsonValue::Object(_) => bail!("nested values are not supported"),
    })
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by Pandas (`df.to_parquet()`) or Polars.
/// Numeric and boolean columns become numbers, string columns text.
fn load_parquet(path: &Path) -> Result<DemoTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();

    let reader = builder.build().context("building parquet reader")?;

    let mut rows: Vec<Vec<CellValue>> = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let offset = rows.len();
        rows.extend((0..batch.num_rows()).map(|_| Vec::with_capacity(columns.len())));

        for (col_idx, name) in columns.iter().enumerate() {
            let cells = column_cells(batch.column(col_idx))
                .with_context(|| format!("column '{name}'"))?;
            for (row, cell) in cells.into_iter().enumerate() {
                rows[offset + row].push(cell);
            }
        }
    }

    DemoTable::new(columns, rows)
}

// -- Arrow helpers --

/// Convert one Arrow column into cells.
fn column_cells(col: &ArrayRef) -> Result<Vec<CellValue>> {
    let data_type = col.data_type();

    if data_type.is_numeric() || *data_type == DataType::Boolean {
        let as_float = cast(col, &DataType::Float64).context("casting to Float64")?;
        let floats = as_float.as_primitive::<Float64Type>();
        return Ok(floats
            .iter()
            .map(|v| v.map_or(CellValue::Missing, CellValue::Number))
            .collect());
    }

    match data_type {
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => {
            let as_text = cast(col, &DataType::Utf8).context("casting to Utf8")?;
            let strings = as_text.as_string::<i32>();
            Ok(strings
                .iter()
                .map(|v| v.map_or(CellValue::Missing, |s| CellValue::Text(s.to_string())))
                .collect())
        }
        DataType::Null => Ok(vec![CellValue::Missing; col.len()]),
        other => bail!("unsupported column type {other:?}"),
    }
}
