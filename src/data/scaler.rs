use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::model::{FeatureRecord, ScaledVector};
use crate::error::InferenceError;

// ---------------------------------------------------------------------------
// StandardScaler – fitted per-column standardization
// ---------------------------------------------------------------------------

/// Fitted standardization: `(x - mean) / scale`, one entry per column in
/// `feature_names` order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub feature_names: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Number of columns the scaler was fitted on.
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Structural checks run once at load time.
    pub fn validate(&self) -> Result<(), String> {
        let n = self.feature_names.len();
        if n == 0 {
            return Err("scaler has no feature names".into());
        }
        if self.mean.len() != n || self.scale.len() != n {
            return Err(format!(
                "{n} feature names but {} means and {} scales",
                self.mean.len(),
                self.scale.len()
            ));
        }
        let unique: BTreeSet<&str> = self.feature_names.iter().map(String::as_str).collect();
        if unique.len() != n {
            return Err("duplicate feature names".into());
        }
        if let Some(i) = self
            .mean
            .iter()
            .chain(self.scale.iter())
            .position(|v| !v.is_finite())
        {
            return Err(format!("non-finite fitted parameter at index {i}"));
        }
        Ok(())
    }

    /// Scale one record. Columns are looked up by name, so the record's own
    /// ordering is irrelevant; the output follows `feature_names`.
    pub fn transform(&self, record: &FeatureRecord) -> Result<ScaledVector, InferenceError> {
        let missing: Vec<String> = self
            .feature_names
            .iter()
            .filter(|name| record.get(name).is_none())
            .cloned()
            .collect();
        let unexpected: Vec<String> = record
            .columns()
            .filter(|col| !self.feature_names.iter().any(|name| name == col))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() || !unexpected.is_empty() {
            return Err(InferenceError::ColumnMismatch {
                missing,
                unexpected,
            });
        }

        let mut scaled = Vec::with_capacity(self.feature_names.len());
        for ((name, &mean), &scale) in self.feature_names.iter().zip(&self.mean).zip(&self.scale) {
            // Presence checked above.
            let x = record.get(name).unwrap_or(f64::NAN);
            if !x.is_finite() {
                return Err(InferenceError::NonFinite {
                    column: name.clone(),
                });
            }
            // Constant columns were fitted with scale 0; they are left unscaled.
            let scale = if scale == 0.0 { 1.0 } else { scale };
            scaled.push((x - mean) / scale);
        }
        Ok(ScaledVector::new(scaled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_column_scaler() -> StandardScaler {
        StandardScaler {
            feature_names: vec!["alcohol".into(), "pH".into()],
            mean: vec![10.0, 3.0],
            scale: vec![2.0, 0.5],
        }
    }

    #[test]
    fn transform_standardizes_in_fitted_order() {
        let record = FeatureRecord::from_pairs(vec![("pH", 4.0), ("alcohol", 14.0)]);
        let scaled = two_column_scaler().transform(&record).unwrap();
        assert_eq!(scaled.values(), &[2.0, 2.0]);
    }

    #[test]
    fn transform_is_independent_of_record_order() {
        let scaler = two_column_scaler();
        let a = FeatureRecord::from_pairs(vec![("alcohol", 9.0), ("pH", 3.3)]);
        let b = FeatureRecord::from_pairs(vec![("pH", 3.3), ("alcohol", 9.0)]);
        assert_eq!(scaler.transform(&a), scaler.transform(&b));
    }

    #[test]
    fn zero_scale_leaves_column_centered_only() {
        let scaler = StandardScaler {
            feature_names: vec!["density".into()],
            mean: vec![0.5],
            scale: vec![0.0],
        };
        let record = FeatureRecord::from_pairs(vec![("density", 2.0)]);
        assert_eq!(scaler.transform(&record).unwrap().values(), &[1.5]);
    }

    #[test]
    fn missing_and_unexpected_columns_are_reported() {
        let record = FeatureRecord::from_pairs(vec![("alcohol", 9.0), ("density", 1.0)]);
        let err = two_column_scaler().transform(&record).unwrap_err();
        assert_eq!(
            err,
            InferenceError::ColumnMismatch {
                missing: vec!["pH".into()],
                unexpected: vec!["density".into()],
            }
        );
    }

    #[test]
    fn nan_input_is_rejected() {
        let record = FeatureRecord::from_pairs(vec![("alcohol", f64::NAN), ("pH", 3.0)]);
        let err = two_column_scaler().transform(&record).unwrap_err();
        assert_eq!(
            err,
            InferenceError::NonFinite {
                column: "alcohol".into()
            }
        );
    }

    #[test]
    fn validate_catches_length_mismatch() {
        let mut scaler = two_column_scaler();
        scaler.scale.pop();
        assert!(scaler.validate().is_err());
        assert!(two_column_scaler().validate().is_ok());
    }

    #[test]
    fn validate_catches_duplicate_names() {
        let scaler = StandardScaler {
            feature_names: vec!["pH".into(), "pH".into()],
            mean: vec![0.0, 0.0],
            scale: vec![1.0, 1.0],
        };
        assert_eq!(scaler.validate(), Err("duplicate feature names".to_string()));
    }
}
