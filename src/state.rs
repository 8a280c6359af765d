use crate::config::Config;
use crate::data::labels::{DemoOption, build_options};
use crate::data::loader::load_demo_table;
use crate::data::model::{CellValue, DemoTable};
use crate::data::ACTUAL_COL;
use crate::error::{LoadError, RequestError};
use crate::model::{ModelBundle, load_bundle};

// ---------------------------------------------------------------------------
// Application context
// ---------------------------------------------------------------------------

/// Everything loaded at startup. Read-only afterwards and shared by all
/// handlers behind an `Arc`.
#[derive(Debug)]
pub struct AppContext {
    bundle: ModelBundle,
    table: DemoTable,

    /// Dropdown entries, one per row (cached).
    options: Vec<DemoOption>,

    /// Table column of each model feature, in feature order.
    feature_cols: Vec<usize>,

    /// Table column of the actual price, if present.
    actual_col: Option<usize>,
}

/// Outcome of running the model on one demo row.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub index: usize,
    pub prediction: f64,
    pub actual: Option<f64>,
    /// Feature name and cell, in feature order.
    pub features: Vec<(String, CellValue)>,
}

impl Evaluation {
    /// `prediction - actual`, when the actual price is known.
    pub fn difference(&self) -> Option<f64> {
        self.actual.map(|a| self.prediction - a)
    }
}

impl AppContext {
    /// Load both artifacts named by `config` and check they agree.
    pub fn load(config: &Config) -> Result<Self, LoadError> {
        let bundle = load_bundle(&config.model_path)?;
        log::info!(
            "Loaded model bundle from {} ({} features)",
            config.model_path.display(),
            bundle.features.len()
        );

        let table = load_demo_table(&config.demo_path)?;
        log::info!(
            "Loaded {} demo rows ({} columns) from {}",
            table.len(),
            table.columns().len(),
            config.demo_path.display()
        );

        Self::new(bundle, table)
    }

    /// Resolve every feature to a table column and cache the dropdown labels.
    ///
    /// Fails when a feature has no column, or when a feature column holds
    /// text. Missing cells are allowed here and rejected per request.
    pub fn new(bundle: ModelBundle, table: DemoTable) -> Result<Self, LoadError> {
        let mut feature_cols = Vec::with_capacity(bundle.features.len());
        for name in &bundle.features {
            let col = table
                .column_index(name)
                .ok_or_else(|| LoadError::UnknownFeature(name.clone()))?;

            for (row, cells) in table.rows().enumerate() {
                if let CellValue::Text(value) = &cells[col] {
                    return Err(LoadError::NonNumericFeature {
                        column: name.clone(),
                        row,
                        value: value.clone(),
                    });
                }
            }
            feature_cols.push(col);
        }

        let actual_col = table.column_index(ACTUAL_COL);
        if actual_col.is_none() {
            log::warn!("Demo table has no '{ACTUAL_COL}' column; actual prices show as N/A");
        }

        let options = build_options(&table, actual_col);

        Ok(Self {
            bundle,
            table,
            options,
            feature_cols,
            actual_col,
        })
    }

    pub fn options(&self) -> &[DemoOption] {
        &self.options
    }

    pub fn features(&self) -> &[String] {
        &self.bundle.features
    }

    /// Number of demo rows.
    pub fn row_count(&self) -> usize {
        self.table.len()
    }

    pub fn feature_count(&self) -> usize {
        self.bundle.features.len()
    }

    /// Bounds-check `index`, build the feature vector and run the model.
    pub fn evaluate(&self, index: i64) -> Result<Evaluation, RequestError> {
        let row = usize::try_from(index)
            .ok()
            .and_then(|i| self.table.row(i).map(|row| (i, row)));
        let Some((index, row)) = row else {
            return Err(RequestError::IndexOutOfRange {
                index,
                rows: self.table.len(),
            });
        };

        let mut x = Vec::with_capacity(self.feature_cols.len());
        let mut features = Vec::with_capacity(self.feature_cols.len());
        for (name, &col) in self.bundle.features.iter().zip(&self.feature_cols) {
            let cell = &row[col];
            let value = cell.as_f64().ok_or_else(|| RequestError::MissingFeature {
                row: index,
                feature: name.clone(),
            })?;
            x.push(value);
            features.push((name.clone(), cell.clone()));
        }

        let prediction = self.bundle.predict_one(x);
        let actual = self.actual_col.and_then(|c| row[c].as_f64());

        Ok(Evaluation {
            index,
            prediction,
            actual,
            features,
        })
    }
}
