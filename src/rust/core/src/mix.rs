// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//
// SmartMix — Mix design input and validated feature vector
//
// The predictor was fit on one exact column order. `MixField::FEATURE_ORDER`
// is that order and `MixDesign::features` is the only place a feature
// vector is assembled.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::config::{EvaluatorConfig, WaterMode};
use crate::error::{EvaluationError, InputIssue, Result};

/// Number of features the predictor and scaler consume.
pub const FEATURE_COUNT: usize = 11;

/// Raw feature vector in `MixField::FEATURE_ORDER`.
pub type FeatureVector = [f64; FEATURE_COUNT];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixField {
    Cement,
    Water,
    NaturalCoarseAggregate,
    NaturalFineAggregate,
    RcaReplacement,
    MrcaReplacement,
    SilicaFume,
    FlyAsh,
    NylonFiber,
    WcRatio,
    Superplasticizer,
}

impl MixField {
    /// Column order of the trained model. Do not reorder.
    pub const FEATURE_ORDER: [MixField; FEATURE_COUNT] = [
        MixField::Cement,
        MixField::Water,
        MixField::NaturalCoarseAggregate,
        MixField::NaturalFineAggregate,
        MixField::RcaReplacement,
        MixField::MrcaReplacement,
        MixField::SilicaFume,
        MixField::FlyAsh,
        MixField::NylonFiber,
        MixField::WcRatio,
        MixField::Superplasticizer,
    ];

    /// Position of this field in the feature vector.
    pub fn index(self) -> usize {
        match self {
            MixField::Cement => 0,
            MixField::Water => 1,
            MixField::NaturalCoarseAggregate => 2,
            MixField::NaturalFineAggregate => 3,
            MixField::RcaReplacement => 4,
            MixField::MrcaReplacement => 5,
            MixField::SilicaFume => 6,
            MixField::FlyAsh => 7,
            MixField::NylonFiber => 8,
            MixField::WcRatio => 9,
            MixField::Superplasticizer => 10,
        }
    }

    /// Canonical JSON key.
    pub fn key(self) -> &'static str {
        match self {
            MixField::Cement => "cement",
            MixField::Water => "water",
            MixField::NaturalCoarseAggregate => "natural_coarse_aggregate",
            MixField::NaturalFineAggregate => "natural_fine_aggregate",
            MixField::RcaReplacement => "rca_replacement",
            MixField::MrcaReplacement => "mrca_replacement",
            MixField::SilicaFume => "silica_fume",
            MixField::FlyAsh => "fly_ash",
            MixField::NylonFiber => "nylon_fiber",
            MixField::WcRatio => "wc_ratio",
            MixField::Superplasticizer => "superplasticizer",
        }
    }

    /// Short keys used by the dashboard widgets.
    pub fn alias(self) -> &'static str {
        match self {
            MixField::Cement => "cement",
            MixField::Water => "water",
            MixField::NaturalCoarseAggregate => "nca",
            MixField::NaturalFineAggregate => "nfa",
            MixField::RcaReplacement => "rca_p",
            MixField::MrcaReplacement => "mrca_p",
            MixField::SilicaFume => "sf",
            MixField::FlyAsh => "fa",
            MixField::NylonFiber => "fiber",
            MixField::WcRatio => "wc",
            MixField::Superplasticizer => "sp",
        }
    }
}

impl fmt::Display for MixField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Unvalidated mix as supplied by the presentation layer.
///
/// Every field is optional so that a missing value surfaces as
/// `InvalidInput` naming the field instead of a deserialisation failure.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MixInput {
    #[serde(default)]
    pub cement: Option<f64>,
    #[serde(default)]
    pub water: Option<f64>,
    #[serde(default, alias = "nca")]
    pub natural_coarse_aggregate: Option<f64>,
    #[serde(default, alias = "nfa")]
    pub natural_fine_aggregate: Option<f64>,
    #[serde(default, alias = "rca_p")]
    pub rca_replacement: Option<f64>,
    #[serde(default, alias = "mrca_p")]
    pub mrca_replacement: Option<f64>,
    #[serde(default, alias = "sf")]
    pub silica_fume: Option<f64>,
    #[serde(default, alias = "fa")]
    pub fly_ash: Option<f64>,
    #[serde(default, alias = "fiber")]
    pub nylon_fiber: Option<f64>,
    #[serde(default, alias = "wc")]
    pub wc_ratio: Option<f64>,
    #[serde(default, alias = "sp")]
    pub superplasticizer: Option<f64>,
}

impl MixInput {
    pub fn get(&self, field: MixField) -> Option<f64> {
        match field {
            MixField::Cement => self.cement,
            MixField::Water => self.water,
            MixField::NaturalCoarseAggregate => self.natural_coarse_aggregate,
            MixField::NaturalFineAggregate => self.natural_fine_aggregate,
            MixField::RcaReplacement => self.rca_replacement,
            MixField::MrcaReplacement => self.mrca_replacement,
            MixField::SilicaFume => self.silica_fume,
            MixField::FlyAsh => self.fly_ash,
            MixField::NylonFiber => self.nylon_fiber,
            MixField::WcRatio => self.wc_ratio,
            MixField::Superplasticizer => self.superplasticizer,
        }
    }

    pub fn set(&mut self, field: MixField, value: Option<f64>) {
        let slot = match field {
            MixField::Cement => &mut self.cement,
            MixField::Water => &mut self.water,
            MixField::NaturalCoarseAggregate => &mut self.natural_coarse_aggregate,
            MixField::NaturalFineAggregate => &mut self.natural_fine_aggregate,
            MixField::RcaReplacement => &mut self.rca_replacement,
            MixField::MrcaReplacement => &mut self.mrca_replacement,
            MixField::SilicaFume => &mut self.silica_fume,
            MixField::FlyAsh => &mut self.fly_ash,
            MixField::NylonFiber => &mut self.nylon_fiber,
            MixField::WcRatio => &mut self.wc_ratio,
            MixField::Superplasticizer => &mut self.superplasticizer,
        };
        *slot = value;
    }

    /// Parse a JSON object field by field.
    ///
    /// Canonical keys win over widget aliases when both are present. A key
    /// holding anything but a number (or `null`, treated as missing) is
    /// reported as `NonNumeric` for that field.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| EvaluationError::MalformedInput(e.to_string()))?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| EvaluationError::MalformedInput("expected a JSON object".into()))?;

        let mut input = MixInput::default();
        for field in MixField::FEATURE_ORDER {
            let raw = object
                .get(field.key())
                .or_else(|| object.get(field.alias()));
            let parsed = match raw {
                None | Some(Value::Null) => None,
                Some(v) => Some(
                    v.as_f64()
                        .ok_or_else(|| EvaluationError::invalid(field, InputIssue::NonNumeric))?,
                ),
            };
            input.set(field, parsed);
        }
        Ok(input)
    }
}

/// Relative tolerance on derived water.
const DERIVED_WATER_TOLERANCE: f64 = 1e-9;

fn check_bounds(field: MixField, value: f64, config: &EvaluatorConfig) -> Result<()> {
    if !value.is_finite() {
        return Err(EvaluationError::invalid(field, InputIssue::NonNumeric));
    }
    let bound = config.bounds.get(field);
    if !bound.contains(value) {
        return Err(EvaluationError::invalid(
            field,
            InputIssue::OutOfBounds {
                value,
                min: bound.min,
                max: bound.max,
            },
        ));
    }
    Ok(())
}

/// A validated mix: every field present, finite and inside its bound.
///
/// Fields are public for reporting; [`MixDesign::validate`] re-checks a mix
/// built or deserialised outside [`MixDesign::from_input`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MixDesign {
    pub cement: f64,
    pub water: f64,
    pub natural_coarse_aggregate: f64,
    pub natural_fine_aggregate: f64,
    pub rca_replacement: f64,
    pub mrca_replacement: f64,
    pub silica_fume: f64,
    pub fly_ash: f64,
    pub nylon_fiber: f64,
    pub wc_ratio: f64,
    pub superplasticizer: f64,
}

impl MixDesign {
    /// Validate an input against the configured bounds and water mode.
    ///
    /// In `WaterMode::Derived` water is recomputed from `wc_ratio` and the
    /// binder mass; any supplied water value is ignored. In
    /// `WaterMode::Direct` water is required and bounded like the others.
    pub fn from_input(input: &MixInput, config: &EvaluatorConfig) -> Result<Self> {
        let mut values = [0.0; FEATURE_COUNT];

        for field in MixField::FEATURE_ORDER {
            if field == MixField::Water && config.water_mode == WaterMode::Derived {
                continue;
            }
            let value = input
                .get(field)
                .ok_or_else(|| EvaluationError::invalid(field, InputIssue::Missing))?;
            check_bounds(field, value, config)?;
            values[field.index()] = value;
        }

        let mut design = Self::from_features(&values);
        if config.water_mode == WaterMode::Derived {
            design.water = design.wc_ratio * design.binder();
            debug!(water = design.water, "derived water from w/c ratio");
        }
        Ok(design)
    }

    /// Re-check an already built mix against `config`.
    ///
    /// Every field must be finite and inside its bound. In
    /// `WaterMode::Derived` water is not bounded but must equal
    /// `wc_ratio * binder()` (to rounding).
    pub fn validate(&self, config: &EvaluatorConfig) -> Result<()> {
        let values = self.features();
        for field in MixField::FEATURE_ORDER {
            if field == MixField::Water && config.water_mode == WaterMode::Derived {
                continue;
            }
            check_bounds(field, values[field.index()], config)?;
        }

        if config.water_mode == WaterMode::Derived {
            let expected = self.wc_ratio * self.binder();
            let tolerance = DERIVED_WATER_TOLERANCE * expected.abs().max(1.0);
            if !self.water.is_finite() || (self.water - expected).abs() > tolerance {
                return Err(EvaluationError::invalid(
                    MixField::Water,
                    InputIssue::Inconsistent {
                        value: self.water,
                        expected,
                    },
                ));
            }
        }
        Ok(())
    }

    fn from_features(v: &FeatureVector) -> Self {
        MixDesign {
            cement: v[0],
            water: v[1],
            natural_coarse_aggregate: v[2],
            natural_fine_aggregate: v[3],
            rca_replacement: v[4],
            mrca_replacement: v[5],
            silica_fume: v[6],
            fly_ash: v[7],
            nylon_fiber: v[8],
            wc_ratio: v[9],
            superplasticizer: v[10],
        }
    }

    /// Feature vector in the model's training order.
    pub fn features(&self) -> FeatureVector {
        [
            self.cement,
            self.water,
            self.natural_coarse_aggregate,
            self.natural_fine_aggregate,
            self.rca_replacement,
            self.mrca_replacement,
            self.silica_fume,
            self.fly_ash,
            self.nylon_fiber,
            self.wc_ratio,
            self.superplasticizer,
        ]
    }

    /// Total cementitious mass (cement + silica fume + fly ash), kg/m³.
    pub fn binder(&self) -> f64 {
        self.cement + self.silica_fume + self.fly_ash
    }

    /// SHA-256 over the little-endian feature bytes, hex encoded.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for value in self.features() {
            hasher.update(value.to_le_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reference_input() -> MixInput {
        MixInput::from_value(&json!({
            "cement": 350.0, "sf": 0.0, "fa": 0.0, "wc": 0.45,
            "nca": 1100.0, "nfa": 700.0, "rca_p": 0.0, "mrca_p": 0.0,
            "sp": 2.0, "fiber": 0.0
        }))
        .unwrap()
    }

    #[test]
    fn test_feature_order_matches_indices() {
        for (i, field) in MixField::FEATURE_ORDER.iter().enumerate() {
            assert_eq!(field.index(), i, "{} out of place", field);
        }
    }

    #[test]
    fn test_aliases_parse() {
        let input = reference_input();
        assert_eq!(input.natural_coarse_aggregate, Some(1100.0));
        assert_eq!(input.superplasticizer, Some(2.0));
        assert_eq!(input.water, None);
    }

    #[test]
    fn test_canonical_key_wins_over_alias() {
        let input = MixInput::from_value(&json!({"cement": 400.0, "sf": 5.0, "silica_fume": 10.0})).unwrap();
        assert_eq!(input.silica_fume, Some(10.0));
    }

    #[test]
    fn test_serde_aliases_match_from_value() {
        let via_serde: MixInput =
            serde_json::from_value(json!({"cement": 350.0, "wc": 0.45, "sp": 2.0})).unwrap();
        let via_fields = MixInput::from_value(&json!({"cement": 350.0, "wc": 0.45, "sp": 2.0})).unwrap();
        assert_eq!(via_serde, via_fields);
    }

    #[test]
    fn test_non_numeric_field_is_invalid_input() {
        let err = MixInput::from_value(&json!({"cement": "lots"})).unwrap_err();
        assert_eq!(
            err,
            EvaluationError::invalid(MixField::Cement, InputIssue::NonNumeric)
        );
    }

    #[test]
    fn test_non_object_payload_is_malformed() {
        assert!(matches!(
            MixInput::from_json("[1, 2, 3]"),
            Err(EvaluationError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_derived_water() {
        let config = EvaluatorConfig::default();
        let mut input = reference_input();
        input.silica_fume = Some(30.0);
        input.fly_ash = Some(20.0);
        let design = MixDesign::from_input(&input, &config).unwrap();
        assert!((design.water - 0.45 * 400.0).abs() < 1e-9);
        assert_eq!(design.features()[1], design.water);
    }

    #[test]
    fn test_derived_mode_ignores_supplied_water() {
        let config = EvaluatorConfig::default();
        let mut input = reference_input();
        input.water = Some(999.0);
        let design = MixDesign::from_input(&input, &config).unwrap();
        assert!((design.water - 157.5).abs() < 1e-9);
    }

    #[test]
    fn test_direct_mode_requires_water() {
        let config = EvaluatorConfig {
            water_mode: WaterMode::Direct,
            ..EvaluatorConfig::default()
        };
        let err = MixDesign::from_input(&reference_input(), &config).unwrap_err();
        assert_eq!(
            err,
            EvaluationError::invalid(MixField::Water, InputIssue::Missing)
        );
    }

    #[test]
    fn test_direct_mode_keeps_water() {
        let config = EvaluatorConfig {
            water_mode: WaterMode::Direct,
            ..EvaluatorConfig::default()
        };
        let mut input = reference_input();
        input.water = Some(180.0);
        let design = MixDesign::from_input(&input, &config).unwrap();
        assert_eq!(design.water, 180.0);
        assert_eq!(design.wc_ratio, 0.45);
    }

    #[test]
    fn test_wc_ratio_bounds() {
        let config = EvaluatorConfig::default();
        for wc in [0.19, 0.81] {
            let mut input = reference_input();
            input.wc_ratio = Some(wc);
            match MixDesign::from_input(&input, &config) {
                Err(EvaluationError::InvalidInput { field, issue }) => {
                    assert_eq!(field, MixField::WcRatio);
                    assert!(matches!(issue, InputIssue::OutOfBounds { .. }));
                }
                other => panic!("expected InvalidInput for wc={}, got {:?}", wc, other),
            }
        }
        for wc in [0.20, 0.80] {
            let mut input = reference_input();
            input.wc_ratio = Some(wc);
            assert!(MixDesign::from_input(&input, &config).is_ok(), "wc={}", wc);
        }
    }

    #[test]
    fn test_percentages_are_bounded() {
        let config = EvaluatorConfig::default();
        let mut input = reference_input();
        input.rca_replacement = Some(120.0);
        assert!(matches!(
            MixDesign::from_input(&input, &config),
            Err(EvaluationError::InvalidInput {
                field: MixField::RcaReplacement,
                ..
            })
        ));
    }

    #[test]
    fn test_nan_rejected() {
        let config = EvaluatorConfig::default();
        let mut input = reference_input();
        input.fly_ash = Some(f64::NAN);
        assert_eq!(
            MixDesign::from_input(&input, &config).unwrap_err(),
            EvaluationError::invalid(MixField::FlyAsh, InputIssue::NonNumeric)
        );
    }

    #[test]
    fn test_validate_accepts_from_input_output() {
        for mode in [WaterMode::Derived, WaterMode::Direct] {
            let config = EvaluatorConfig {
                water_mode: mode,
                ..EvaluatorConfig::default()
            };
            let mut input = reference_input();
            input.water = Some(160.0);
            let design = MixDesign::from_input(&input, &config).unwrap();
            assert_eq!(design.validate(&config), Ok(()));
        }
    }

    #[test]
    fn test_validate_catches_hand_built_mix() {
        let config = EvaluatorConfig::default();
        let good = MixDesign::from_input(&reference_input(), &config).unwrap();

        let mut mix = good.clone();
        mix.rca_replacement = 250.0;
        assert!(matches!(
            mix.validate(&config),
            Err(EvaluationError::InvalidInput {
                field: MixField::RcaReplacement,
                issue: InputIssue::OutOfBounds { .. },
            })
        ));

        let mut mix = good.clone();
        mix.water = 9999.0;
        assert!(matches!(
            mix.validate(&config),
            Err(EvaluationError::InvalidInput {
                field: MixField::Water,
                issue: InputIssue::Inconsistent { .. },
            })
        ));

        let json = serde_json::to_value(&good).unwrap();
        let mut tampered = json.clone();
        tampered["wc_ratio"] = json!(0.95);
        let mix: MixDesign = serde_json::from_value(tampered).unwrap();
        assert!(matches!(
            mix.validate(&config),
            Err(EvaluationError::InvalidInput {
                field: MixField::WcRatio,
                ..
            })
        ));
    }

    #[test]
    fn test_direct_mode_bounds_water() {
        let config = EvaluatorConfig {
            water_mode: WaterMode::Direct,
            ..EvaluatorConfig::default()
        };
        let mut input = reference_input();
        input.water = Some(180.0);
        let mut mix = MixDesign::from_input(&input, &config).unwrap();
        mix.water = 9999.0;
        assert!(matches!(
            mix.validate(&config),
            Err(EvaluationError::InvalidInput {
                field: MixField::Water,
                issue: InputIssue::OutOfBounds { .. },
            })
        ));
    }

    #[test]
    fn test_fingerprint_is_stable_and_sensitive() {
        let config = EvaluatorConfig::default();
        let a = MixDesign::from_input(&reference_input(), &config).unwrap();
        let b = MixDesign::from_input(&reference_input(), &config).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);

        let mut c = a.clone();
        c.superplasticizer = 2.5;
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
