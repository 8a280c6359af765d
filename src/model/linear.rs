use serde::{Deserialize, Serialize};

/// Ordinary linear regressor: `intercept + Σ coefficients[i] * x[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearModel {
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.coefficients.len() != n_features {
            return Err(format!(
                "linear model has {} coefficients for {} features",
                self.coefficients.len(),
                n_features
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err("linear model has non-finite parameters".to_string());
        }
        Ok(())
    }

    pub fn predict(&self, x: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(x)
                .map(|(w, v)| w * v)
                .sum::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicts_weighted_sum() {
        let model = LinearModel {
            intercept: 10_000.0,
            coefficients: vec![100.0, 5_000.0],
        };
        assert_eq!(model.predict(&[1500.0, 3.0]), 10_000.0 + 150_000.0 + 15_000.0);
    }

    #[test]
    fn coefficient_count_must_match_features() {
        let model = LinearModel {
            intercept: 0.0,
            coefficients: vec![1.0],
        };
        assert!(model.validate(1).is_ok());
        assert!(model.validate(2).unwrap_err().contains("1 coefficients for 2 features"));
    }
}
