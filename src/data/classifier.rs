use serde::{Deserialize, Serialize};

use super::model::{ClassLabel, ScaledVector};
use crate::error::InferenceError;

// ---------------------------------------------------------------------------
// Capability traits
// ---------------------------------------------------------------------------

/// Any fitted model that maps a scaled row to one label.
pub trait Classifier: Send + Sync {
    /// Short name of the model family, for logs.
    fn kind(&self) -> &'static str;

    /// Width of the rows the model was fitted on.
    fn n_features(&self) -> usize;

    fn classes(&self) -> &[ClassLabel];

    fn predict(&self, x: &ScaledVector) -> Result<ClassLabel, InferenceError>;
}

/// A classifier that can also report per-class probabilities, in `classes()` order.
pub trait ProbabilisticClassifier: Classifier {
    fn predict_proba(&self, x: &ScaledVector) -> Result<Vec<f64>, InferenceError>;
}

/// The loaded classifier, tagged with its capability once at load time.
pub enum LoadedClassifier {
    WithConfidence(Box<dyn ProbabilisticClassifier>),
    LabelOnly(Box<dyn Classifier>),
}

impl LoadedClassifier {
    pub fn supports_confidence(&self) -> bool {
        matches!(self, LoadedClassifier::WithConfidence(_))
    }
}

impl Classifier for LoadedClassifier {
    fn kind(&self) -> &'static str {
        match self {
            LoadedClassifier::WithConfidence(m) => m.kind(),
            LoadedClassifier::LabelOnly(m) => m.kind(),
        }
    }

    fn n_features(&self) -> usize {
        match self {
            LoadedClassifier::WithConfidence(m) => m.n_features(),
            LoadedClassifier::LabelOnly(m) => m.n_features(),
        }
    }

    fn classes(&self) -> &[ClassLabel] {
        match self {
            LoadedClassifier::WithConfidence(m) => m.classes(),
            LoadedClassifier::LabelOnly(m) => m.classes(),
        }
    }

    fn predict(&self, x: &ScaledVector) -> Result<ClassLabel, InferenceError> {
        match self {
            LoadedClassifier::WithConfidence(m) => m.predict(x),
            LoadedClassifier::LabelOnly(m) => m.predict(x),
        }
    }
}

impl std::fmt::Debug for LoadedClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedClassifier")
            .field("kind", &self.kind())
            .field("n_features", &self.n_features())
            .field("classes", &self.classes())
            .field("confidence", &self.supports_confidence())
            .finish()
    }
}

fn ensure_width(expected: usize, x: &ScaledVector) -> Result<(), InferenceError> {
    if x.len() == expected {
        Ok(())
    } else {
        Err(InferenceError::WidthMismatch {
            scaled: x.len(),
            expected,
        })
    }
}

/// Index of the first maximum; ties resolve to the lowest index.
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

// ---------------------------------------------------------------------------
// Decision tree (flattened node arrays)
// ---------------------------------------------------------------------------

pub const TREE_LEAF: i64 = -1;

/// A fitted tree in flattened form. Node `i` is a leaf when
/// `children_left[i] == TREE_LEAF`; otherwise a row goes left when
/// `x[feature[i]] <= threshold[i]`. `value[i]` holds per-class counts or
/// fractions at that node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNodes {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

impl TreeNodes {
    fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        let n = self.children_left.len();
        if n == 0 {
            return Err("tree has no nodes".into());
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err(format!("tree node arrays disagree in length (expected {n})"));
        }
        for i in 0..n {
            let (left, right) = (self.children_left[i], self.children_right[i]);
            if left != TREE_LEAF {
                // Children always come after their parent, which also rules out cycles.
                let in_range = |c: i64| c > i as i64 && (c as usize) < n;
                if !in_range(left) || !in_range(right) {
                    return Err(format!("node {i} has out-of-range children"));
                }
                let f = self.feature[i];
                if f < 0 || f as usize >= n_features {
                    return Err(format!("node {i} splits on feature {f} of {n_features}"));
                }
            }
            let values = &self.value[i];
            if values.len() != n_classes {
                return Err(format!(
                    "node {i} has {} class values, expected {n_classes}",
                    values.len()
                ));
            }
            if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(format!("node {i} has a negative or non-finite class value"));
            }
            // A leaf with no weight has no class distribution to report.
            if left == TREE_LEAF && values.iter().sum::<f64>() <= 0.0 {
                return Err(format!("leaf {i} has no class weight"));
            }
        }
        Ok(())
    }

    /// Walk from the root to a leaf and return its normalized class distribution.
    fn leaf_distribution(&self, x: &[f64]) -> Vec<f64> {
        let mut node = 0usize;
        while self.children_left[node] != TREE_LEAF {
            let f = self.feature[node] as usize;
            node = if x[f] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        normalize(&self.value[node])
    }
}

fn normalize(counts: &[f64]) -> Vec<f64> {
    let total: f64 = counts.iter().sum();
    if total > 0.0 {
        counts.iter().map(|c| c / total).collect()
    } else {
        vec![0.0; counts.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub n_features: usize,
    pub classes: Vec<ClassLabel>,
    #[serde(flatten)]
    pub tree: TreeNodes,
}

impl DecisionTree {
    pub fn validate(&self) -> Result<(), String> {
        validate_classes(&self.classes)?;
        self.tree.validate(self.n_features, self.classes.len())
    }
}

impl Classifier for DecisionTree {
    fn kind(&self) -> &'static str {
        "decision_tree"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn classes(&self) -> &[ClassLabel] {
        &self.classes
    }

    fn predict(&self, x: &ScaledVector) -> Result<ClassLabel, InferenceError> {
        let proba = self.predict_proba(x)?;
        Ok(self.classes[argmax(&proba)].clone())
    }
}

impl ProbabilisticClassifier for DecisionTree {
    fn predict_proba(&self, x: &ScaledVector) -> Result<Vec<f64>, InferenceError> {
        ensure_width(self.n_features, x)?;
        Ok(self.tree.leaf_distribution(x.values()))
    }
}

// ---------------------------------------------------------------------------
// Random forest
// ---------------------------------------------------------------------------

/// Averages the normalized leaf distributions of every tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub n_features: usize,
    pub classes: Vec<ClassLabel>,
    pub estimators: Vec<TreeNodes>,
}

impl RandomForest {
    pub fn validate(&self) -> Result<(), String> {
        validate_classes(&self.classes)?;
        if self.estimators.is_empty() {
            return Err("forest has no trees".into());
        }
        for (i, tree) in self.estimators.iter().enumerate() {
            tree.validate(self.n_features, self.classes.len())
                .map_err(|e| format!("tree {i}: {e}"))?;
        }
        Ok(())
    }
}

impl Classifier for RandomForest {
    fn kind(&self) -> &'static str {
        "random_forest"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn classes(&self) -> &[ClassLabel] {
        &self.classes
    }

    fn predict(&self, x: &ScaledVector) -> Result<ClassLabel, InferenceError> {
        let proba = self.predict_proba(x)?;
        Ok(self.classes[argmax(&proba)].clone())
    }
}

impl ProbabilisticClassifier for RandomForest {
    fn predict_proba(&self, x: &ScaledVector) -> Result<Vec<f64>, InferenceError> {
        ensure_width(self.n_features, x)?;
        let mut sum = vec![0.0; self.classes.len()];
        for tree in &self.estimators {
            for (acc, p) in sum.iter_mut().zip(tree.leaf_distribution(x.values())) {
                *acc += p;
            }
        }
        let n_trees = self.estimators.len() as f64;
        Ok(sum.into_iter().map(|s| s / n_trees).collect())
    }
}

// ---------------------------------------------------------------------------
// Linear models
// ---------------------------------------------------------------------------

/// Coefficients of a linear model. Binary problems carry a single row whose
/// decision value is positive for `classes[1]`; multiclass problems carry one
/// row per class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub n_features: usize,
    pub classes: Vec<ClassLabel>,
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

impl LinearModel {
    pub fn validate(&self) -> Result<(), String> {
        validate_classes(&self.classes)?;
        let rows = if self.classes.len() == 2 {
            1
        } else {
            self.classes.len()
        };
        if self.coef.len() != rows || self.intercept.len() != rows {
            return Err(format!(
                "expected {rows} coefficient rows and intercepts, found {} and {}",
                self.coef.len(),
                self.intercept.len()
            ));
        }
        if let Some(i) = self.coef.iter().position(|row| row.len() != self.n_features) {
            return Err(format!("coefficient row {i} is not {} wide", self.n_features));
        }
        Ok(())
    }

    fn is_binary(&self) -> bool {
        self.coef.len() == 1
    }

    fn decision_function(&self, x: &ScaledVector) -> Result<Vec<f64>, InferenceError> {
        ensure_width(self.n_features, x)?;
        Ok(self
            .coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, b)| row.iter().zip(x.values()).map(|(w, v)| w * v).sum::<f64>() + b)
            .collect())
    }

    fn label_from_decision(&self, decision: &[f64]) -> ClassLabel {
        if self.is_binary() {
            let idx = usize::from(decision[0] > 0.0);
            self.classes[idx].clone()
        } else {
            self.classes[argmax(decision)].clone()
        }
    }
}

/// Logistic regression: sigmoid for binary, softmax for multiclass.
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticRegression(pub LinearModel);

impl Classifier for LogisticRegression {
    fn kind(&self) -> &'static str {
        "logistic_regression"
    }

    fn n_features(&self) -> usize {
        self.0.n_features
    }

    fn classes(&self) -> &[ClassLabel] {
        &self.0.classes
    }

    fn predict(&self, x: &ScaledVector) -> Result<ClassLabel, InferenceError> {
        let decision = self.0.decision_function(x)?;
        Ok(self.0.label_from_decision(&decision))
    }
}

impl ProbabilisticClassifier for LogisticRegression {
    fn predict_proba(&self, x: &ScaledVector) -> Result<Vec<f64>, InferenceError> {
        let decision = self.0.decision_function(x)?;
        if self.0.is_binary() {
            let p = 1.0 / (1.0 + (-decision[0]).exp());
            return Ok(vec![1.0 - p, p]);
        }
        let max = decision.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let exp: Vec<f64> = decision.iter().map(|d| (d - max).exp()).collect();
        let total: f64 = exp.iter().sum();
        Ok(exp.into_iter().map(|e| e / total).collect())
    }
}

/// Linear support vector classifier: label only, no probability output.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSvc(pub LinearModel);

impl Classifier for LinearSvc {
    fn kind(&self) -> &'static str {
        "linear_svc"
    }

    fn n_features(&self) -> usize {
        self.0.n_features
    }

    fn classes(&self) -> &[ClassLabel] {
        &self.0.classes
    }

    fn predict(&self, x: &ScaledVector) -> Result<ClassLabel, InferenceError> {
        let decision = self.0.decision_function(x)?;
        Ok(self.0.label_from_decision(&decision))
    }
}

fn validate_classes(classes: &[ClassLabel]) -> Result<(), String> {
    if classes.len() < 2 {
        return Err(format!("need at least 2 classes, found {}", classes.len()));
    }
    Ok(())
}
