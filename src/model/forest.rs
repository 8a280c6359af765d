use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Tree ensemble (random forest / gradient boosting export)
// ---------------------------------------------------------------------------

/// How per-tree outputs are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Gradient boosting: leaves already carry the learning rate.
    Sum,
    /// Random forest: average of the trees.
    Mean,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub feature: usize,
    pub threshold: f64,
    pub left: usize,
    pub right: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    Leaf(f64),
    Split(Split),
}

/// Flat node array, root at index 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    /// Children must come strictly after their parent, which rules out cycles
    /// and bounds traversal by `nodes.len()`.
    fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Leaf(value) if !value.is_finite() => {
                    return Err(format!("node {i} has a non-finite leaf value"));
                }
                Node::Leaf(_) => {}
                Node::Split(split) => {
                    if split.feature >= n_features {
                        return Err(format!(
                            "node {i} splits on feature {} but only {n_features} exist",
                            split.feature
                        ));
                    }
                    for child in [split.left, split.right] {
                        if child <= i || child >= self.nodes.len() {
                            return Err(format!("node {i} has invalid child {child}"));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Walk from the root; `x[feature] <= threshold` goes left.
    pub fn predict(&self, x: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf(value) => return *value,
                Node::Split(split) => {
                    idx = if x[split.feature] <= split.threshold {
                        split.left
                    } else {
                        split.right
                    };
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    #[serde(default)]
    pub base_score: f64,
    pub aggregation: Aggregation,
    pub trees: Vec<Tree>,
}

impl TreeEnsemble {
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("tree ensemble has no trees".to_string());
        }
        if !self.base_score.is_finite() {
            return Err("tree ensemble has a non-finite base score".to_string());
        }
        for (t, tree) in self.trees.iter().enumerate() {
            tree.validate(n_features).map_err(|e| format!("tree {t}: {e}"))?;
        }
        Ok(())
    }

    pub fn predict(&self, x: &[f64]) -> f64 {
        let total: f64 = self.trees.iter().map(|t| t.predict(x)).sum();
        let combined = match self.aggregation {
            Aggregation::Sum => total,
            Aggregation::Mean => total / self.trees.len() as f64,
        };
        self.base_score + combined
    }
}
