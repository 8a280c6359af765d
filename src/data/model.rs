use std::collections::BTreeSet;
use std::fmt;

use anyhow::{Result, bail};

// ---------------------------------------------------------------------------
// CellValue – a single cell of the demo table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring what a CSV / Parquet column can hold.
/// Booleans are stored as 0.0 / 1.0 numbers.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Missing,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Missing => write!(f, "N/A"),
        }
    }
}

impl CellValue {
    /// The numeric value, if the cell holds one. NaN counts as missing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// DemoTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Column-aligned rows. Row identity is the position in `rows`.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoTable {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl DemoTable {
    /// Build a table, rejecting duplicate column names and ragged rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for col in &columns {
            if !seen.insert(col.as_str()) {
                bail!("duplicate column '{col}'");
            }
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                bail!(
                    "row {i} has {} cells but the table has {} columns",
                    row.len(),
                    columns.len()
                );
            }
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn row(&self, index: usize) -> Option<&[CellValue]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
