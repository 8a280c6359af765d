//! Data layer: demo table types, loading, and dropdown labels.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → DemoTable
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ DemoTable  │  columns + Vec<row>, CellValue cells
//!   └───────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  labels   │  "Row i | Actual: $…" per row
//!   └──────────┘
//! ```

pub mod labels;
pub mod loader;
pub mod model;

/// Column holding the observed sale price of each demo row.
pub const ACTUAL_COL: &str = "ActualPrice";
