// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//! JSON model artifacts.
//!
//! The training pipeline exports the fitted scaler and regressor as two JSON
//! documents. Both are validated here, once, at startup: a malformed
//! artifact is a `LoadError`, never a panic during evaluation.
//!
//! Scaler:
//! ```json
//! {"mean": [11 numbers], "scale": [11 numbers]}
//! ```
//! Model:
//! ```json
//! {"kind": "linear", "coefficients": [11 numbers], "intercept": 12.3}
//! {"kind": "tree_ensemble", "aggregation": {"method": "mean"},
//!  "trees": [{"children_left": [...], "children_right": [...],
//!             "feature": [...], "threshold": [...], "value": [...]}]}
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::regressor::{Aggregation, LinearRegressor, RegressionTree, TreeEnsembleRegressor};
use super::scaler::StandardScaler;
use super::Predictor;
use crate::error::LoadError;
use crate::mix::{FeatureVector, FEATURE_COUNT};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScalerArtifact {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeArtifact {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear {
        coefficients: Vec<f64>,
        intercept: f64,
    },
    TreeEnsemble {
        trees: Vec<TreeArtifact>,
        #[serde(default = "default_aggregation")]
        aggregation: Aggregation,
    },
}

fn default_aggregation() -> Aggregation {
    Aggregation::Mean
}

fn feature_vector(what: &'static str, name: &str, values: &[f64]) -> Result<FeatureVector, LoadError> {
    let vector: FeatureVector = values.try_into().map_err(|_| LoadError::InvalidArtifact {
        what,
        reason: format!("`{}` has {} entries, expected {}", name, values.len(), FEATURE_COUNT),
    })?;
    if let Some(j) = vector.iter().position(|v| !v.is_finite()) {
        return Err(LoadError::InvalidArtifact {
            what,
            reason: format!("`{}`[{}] is not finite", name, j),
        });
    }
    Ok(vector)
}

fn read_artifact(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl ScalerArtifact {
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        serde_json::from_str(json).map_err(|source| LoadError::Json {
            what: "scaler",
            source,
        })
    }

    pub fn into_scaler(self) -> Result<StandardScaler, LoadError> {
        let mean = feature_vector("scaler", "mean", &self.mean)?;
        let scale = feature_vector("scaler", "scale", &self.scale)?;
        if let Some(j) = scale.iter().position(|s| *s < 0.0) {
            return Err(LoadError::InvalidArtifact {
                what: "scaler",
                reason: format!("`scale`[{}] is negative", j),
            });
        }
        Ok(StandardScaler::new(mean, scale))
    }
}

impl ModelArtifact {
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        serde_json::from_str(json).map_err(|source| LoadError::Json {
            what: "model",
            source,
        })
    }

    pub fn into_predictor(self) -> Result<Box<dyn Predictor>, LoadError> {
        match self {
            ModelArtifact::Linear {
                coefficients,
                intercept,
            } => {
                let coefficients = feature_vector("model", "coefficients", &coefficients)?;
                if !intercept.is_finite() {
                    return Err(LoadError::InvalidArtifact {
                        what: "model",
                        reason: "`intercept` is not finite".into(),
                    });
                }
                Ok(Box::new(LinearRegressor::new(coefficients, intercept)))
            }
            ModelArtifact::TreeEnsemble { trees, aggregation } => {
                if let Aggregation::Boosted {
                    init,
                    learning_rate,
                } = &aggregation
                {
                    if !init.is_finite() || !learning_rate.is_finite() {
                        return Err(LoadError::InvalidArtifact {
                            what: "model",
                            reason: "boosting init / learning_rate must be finite".into(),
                        });
                    }
                }
                let fitted = trees
                    .iter()
                    .enumerate()
                    .map(|(i, t)| {
                        RegressionTree::from_arrays(
                            &t.children_left,
                            &t.children_right,
                            &t.feature,
                            &t.threshold,
                            &t.value,
                        )
                        .map_err(|err| LoadError::InvalidArtifact {
                            what: "model",
                            reason: format!("tree {}: {}", i, err),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let ensemble =
                    TreeEnsembleRegressor::new(fitted, aggregation).map_err(|err| LoadError::InvalidArtifact {
                        what: "model",
                        reason: err.to_string(),
                    })?;
                Ok(Box::new(ensemble))
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            ModelArtifact::Linear { .. } => "linear".to_string(),
            ModelArtifact::TreeEnsemble { trees, .. } => format!("tree_ensemble ({} trees)", trees.len()),
        }
    }
}

/// Load and validate the feature scaler.
pub fn load_scaler(path: impl AsRef<Path>) -> Result<StandardScaler, LoadError> {
    let path = path.as_ref();
    let scaler = ScalerArtifact::from_json(&read_artifact(path)?)?.into_scaler()?;
    info!(path = %path.display(), "loaded feature scaler");
    Ok(scaler)
}

/// Load and validate the strength regressor.
pub fn load_predictor(path: impl AsRef<Path>) -> Result<Box<dyn Predictor>, LoadError> {
    let path = path.as_ref();
    let artifact = ModelArtifact::from_json(&read_artifact(path)?)?;
    let kind = artifact.describe();
    let predictor = artifact.into_predictor()?;
    info!(path = %path.display(), model = %kind, "loaded strength model");
    Ok(predictor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Scaler;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_scaler_round_trip_through_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let doc = json!({"mean": vec![1.0; 11], "scale": vec![2.0; 11]});
        write!(file, "{}", doc).unwrap();
        let scaler = load_scaler(file.path()).unwrap();
        assert_eq!(scaler.transform(&[5.0; 11]), [2.0; 11]);
    }

    #[test]
    fn test_scaler_wrong_length() {
        let err = ScalerArtifact::from_json(&json!({"mean": vec![0.0; 10], "scale": vec![1.0; 11]}).to_string())
            .unwrap()
            .into_scaler()
            .unwrap_err();
        match err {
            LoadError::InvalidArtifact { reason, .. } => assert!(reason.contains("10 entries"), "{}", reason),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_linear_artifact() {
        let mut coefficients = vec![0.0; 11];
        coefficients[9] = -50.0;
        let model = ModelArtifact::from_json(
            &json!({"kind": "linear", "coefficients": coefficients, "intercept": 60.0}).to_string(),
        )
        .unwrap()
        .into_predictor()
        .unwrap();
        let mut x = [0.0; 11];
        x[9] = 0.4;
        assert!((model.predict(&x) - 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_tree_ensemble_artifact_defaults_to_mean() {
        let tree = json!({
            "children_left": [1, -1, -1], "children_right": [2, -1, -1],
            "feature": [0, -2, -2], "threshold": [400.0, -2.0, -2.0],
            "value": [0.0, 30.0, 50.0]
        });
        let artifact =
            ModelArtifact::from_json(&json!({"kind": "tree_ensemble", "trees": [tree.clone(), tree]}).to_string())
                .unwrap();
        assert!(matches!(
            artifact,
            ModelArtifact::TreeEnsemble {
                aggregation: Aggregation::Mean,
                ..
            }
        ));
        let model = artifact.into_predictor().unwrap();
        let mut x = [0.0; 11];
        x[0] = 450.0;
        assert_eq!(model.predict(&x), 50.0);
    }

    #[test]
    fn test_empty_ensemble_rejected() {
        let err = ModelArtifact::from_json(r#"{"kind": "tree_ensemble", "trees": []}"#)
            .unwrap()
            .into_predictor()
            .err()
            .unwrap();
        match err {
            LoadError::InvalidArtifact { what, reason } => {
                assert_eq!(what, "model");
                assert!(reason.contains("no trees"), "{}", reason);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_malformed_tree_names_tree_index() {
        let good = json!({
            "children_left": [-1], "children_right": [-1],
            "feature": [-2], "threshold": [-2.0], "value": [30.0]
        });
        let bad = json!({
            "children_left": [1, -1], "children_right": [-1, -1],
            "feature": [0, -2], "threshold": [1.0, -2.0], "value": [0.0, 1.0]
        });
        let err = ModelArtifact::from_json(&json!({"kind": "tree_ensemble", "trees": [good, bad]}).to_string())
            .unwrap()
            .into_predictor()
            .err()
            .unwrap();
        assert!(err.to_string().contains("tree 1: node 0 has only one child"), "{}", err);
    }

    #[test]
    fn test_unknown_kind_is_json_error() {
        assert!(matches!(
            ModelArtifact::from_json(r#"{"kind": "neural_net"}"#),
            Err(LoadError::Json { what: "model", .. })
        ));
    }

    #[test]
    fn test_missing_model_file() {
        assert!(matches!(
            load_predictor("/no/such/model.json"),
            Err(LoadError::Io { .. })
        ));
    }
}
