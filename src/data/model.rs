use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Feature – one wine-chemistry attribute
// ---------------------------------------------------------------------------

/// The eleven measured attributes, listed in the order the artifacts were fitted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Feature {
    FixedAcidity,
    VolatileAcidity,
    CitricAcid,
    ResidualSugar,
    Chlorides,
    FreeSulfurDioxide,
    TotalSulfurDioxide,
    Density,
    Ph,
    Sulphates,
    Alcohol,
}

impl Feature {
    pub const ALL: [Feature; 11] = [
        Feature::FixedAcidity,
        Feature::VolatileAcidity,
        Feature::CitricAcid,
        Feature::ResidualSugar,
        Feature::Chlorides,
        Feature::FreeSulfurDioxide,
        Feature::TotalSulfurDioxide,
        Feature::Density,
        Feature::Ph,
        Feature::Sulphates,
        Feature::Alcohol,
    ];

    /// Label shown next to the input field.
    pub fn label(self) -> &'static str {
        match self {
            Feature::FixedAcidity => "Fixed Acidity",
            Feature::VolatileAcidity => "Volatile Acidity",
            Feature::CitricAcid => "Citric Acid",
            Feature::ResidualSugar => "Residual Sugar",
            Feature::Chlorides => "Chlorides",
            Feature::FreeSulfurDioxide => "Free Sulfur Dioxide",
            Feature::TotalSulfurDioxide => "Total Sulfur Dioxide",
            Feature::Density => "Density",
            Feature::Ph => "pH",
            Feature::Sulphates => "Sulphates",
            Feature::Alcohol => "Alcohol",
        }
    }

    /// Column name the scaler was fitted with.
    pub fn column(self) -> &'static str {
        match self {
            Feature::FixedAcidity => "fixed acidity",
            Feature::VolatileAcidity => "volatile acidity",
            Feature::CitricAcid => "citric acid",
            Feature::ResidualSugar => "residual sugar",
            Feature::Chlorides => "chlorides",
            Feature::FreeSulfurDioxide => "free sulfur dioxide",
            Feature::TotalSulfurDioxide => "total sulfur dioxide",
            Feature::Density => "density",
            Feature::Ph => "pH",
            Feature::Sulphates => "sulphates",
            Feature::Alcohol => "alcohol",
        }
    }

    /// Skewed measurements that were log1p-transformed before training.
    pub fn is_log_transformed(self) -> bool {
        matches!(
            self,
            Feature::ResidualSugar | Feature::FreeSulfurDioxide | Feature::TotalSulfurDioxide
        )
    }

    /// Apply this feature's fixed preprocessing to a raw value.
    pub fn preprocess(self, raw: f64) -> f64 {
        if self.is_log_transformed() {
            log1p(raw)
        } else {
            raw
        }
    }
}

/// `ln(x + 1)`, spelled exactly as the training pipeline computed it.
pub fn log1p(x: f64) -> f64 {
    (x + 1.0).ln()
}

// ---------------------------------------------------------------------------
// Measurements – raw form values
// ---------------------------------------------------------------------------

/// Raw values as typed by the user. Every field defaults to 0.0 and no range
/// is enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Measurements {
    pub fixed_acidity: f64,
    pub volatile_acidity: f64,
    pub citric_acid: f64,
    pub residual_sugar: f64,
    pub chlorides: f64,
    pub free_sulfur_dioxide: f64,
    pub total_sulfur_dioxide: f64,
    pub density: f64,
    pub ph: f64,
    pub sulphates: f64,
    pub alcohol: f64,
}

impl Measurements {
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::FixedAcidity => self.fixed_acidity,
            Feature::VolatileAcidity => self.volatile_acidity,
            Feature::CitricAcid => self.citric_acid,
            Feature::ResidualSugar => self.residual_sugar,
            Feature::Chlorides => self.chlorides,
            Feature::FreeSulfurDioxide => self.free_sulfur_dioxide,
            Feature::TotalSulfurDioxide => self.total_sulfur_dioxide,
            Feature::Density => self.density,
            Feature::Ph => self.ph,
            Feature::Sulphates => self.sulphates,
            Feature::Alcohol => self.alcohol,
        }
    }

    pub fn get_mut(&mut self, feature: Feature) -> &mut f64 {
        match feature {
            Feature::FixedAcidity => &mut self.fixed_acidity,
            Feature::VolatileAcidity => &mut self.volatile_acidity,
            Feature::CitricAcid => &mut self.citric_acid,
            Feature::ResidualSugar => &mut self.residual_sugar,
            Feature::Chlorides => &mut self.chlorides,
            Feature::FreeSulfurDioxide => &mut self.free_sulfur_dioxide,
            Feature::TotalSulfurDioxide => &mut self.total_sulfur_dioxide,
            Feature::Density => &mut self.density,
            Feature::Ph => &mut self.ph,
            Feature::Sulphates => &mut self.sulphates,
            Feature::Alcohol => &mut self.alcohol,
        }
    }
}

// ---------------------------------------------------------------------------
// FeatureRecord – one named row, ready for the scaler
// ---------------------------------------------------------------------------

/// A single-row record addressed by column name. Position in the record
/// carries no meaning; the scaler picks columns out by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRecord {
    values: BTreeMap<String, f64>,
}

impl FeatureRecord {
    /// Build the record from raw form values, applying the log1p transform.
    pub fn from_measurements(m: &Measurements) -> Self {
        let values = Feature::ALL
            .iter()
            .map(|&f| (f.column().to_string(), f.preprocess(m.get(f))))
            .collect();
        FeatureRecord { values }
    }

    /// Build a record from already-preprocessed `(column, value)` pairs.
    #[cfg(test)]
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        FeatureRecord {
            values: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// ScaledVector – scaler output in fitted column order
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ScaledVector(Vec<f64>);

impl ScaledVector {
    pub fn new(values: Vec<f64>) -> Self {
        ScaledVector(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

// ---------------------------------------------------------------------------
// ClassLabel / PredictionResult
// ---------------------------------------------------------------------------

/// A class label as stored in the classifier artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassLabel {
    Integer(i64),
    Text(String),
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassLabel::Integer(i) => write!(f, "{i}"),
            ClassLabel::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Outcome of one prediction: the label and, for classifiers that expose
/// class probabilities, the highest of them.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub label: ClassLabel,
    pub confidence: Option<f64>,
}
