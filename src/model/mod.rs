//! Model bundle: a fitted regressor plus the ordered feature names it expects.
//!
//! The bundle ships as JSON:
//!
//! ```json
//! {
//!   "model": { "kind": "linear", "intercept": 25000.0, "coefficients": [110.0, 4000.0] },
//!   "features": ["SquareFeet", "Bedrooms"]
//! }
//! ```
//!
//! `kind` may also be `tree_ensemble`, see [`forest::TreeEnsemble`].

pub mod forest;
pub mod linear;

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use forest::TreeEnsemble;
use linear::LinearModel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Regressor {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsemble),
}

impl Regressor {
    fn validate(&self, n_features: usize) -> Result<(), String> {
        match self {
            Regressor::Linear(m) => m.validate(n_features),
            Regressor::TreeEnsemble(m) => m.validate(n_features),
        }
    }

    /// One output per input row. Each row must hold one value per feature.
    pub fn predict(&self, rows: &[Vec<f64>]) -> Vec<f64> {
        rows.iter()
            .map(|x| match self {
                Regressor::Linear(m) => m.predict(x),
                Regressor::TreeEnsemble(m) => m.predict(x),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBundle {
    pub model: Regressor,
    pub features: Vec<String>,
}

impl ModelBundle {
    /// Parse and validate a bundle from JSON text.
    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        let bundle: ModelBundle =
            serde_json::from_str(text).map_err(|e| LoadError::MalformedBundle(e.to_string()))?;
        bundle.validate()?;
        Ok(bundle)
    }

    fn validate(&self) -> Result<(), LoadError> {
        if self.features.is_empty() {
            return Err(LoadError::MalformedBundle("feature list is empty".to_string()));
        }
        let mut seen = BTreeSet::new();
        for name in &self.features {
            if !seen.insert(name.as_str()) {
                return Err(LoadError::MalformedBundle(format!(
                    "feature '{name}' is listed twice"
                )));
            }
        }
        self.model
            .validate(self.features.len())
            .map_err(LoadError::MalformedBundle)
    }

    /// Predict a single feature vector, already in `features` order.
    pub fn predict_one(&self, x: Vec<f64>) -> f64 {
        self.model.predict(&[x])[0]
    }
}

/// Read the bundle artifact from disk.
pub fn load_bundle(path: &Path) -> Result<ModelBundle, LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path).map_err(|e| LoadError::Unreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    ModelBundle::from_json(&text)
}
