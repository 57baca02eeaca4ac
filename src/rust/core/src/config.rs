// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//
// SmartMix — Evaluator configuration
//
// Every constant the pipeline depends on lives here: input bounds, the
// water mode, LCA emission factors, unit costs and the rank ladder.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ConfigError, LoadError};
use crate::mix::MixField;
use crate::science::benchmark::DEFAULT_BENCHMARK_K;

/// Sustainability index above which a mix ranks A+.
pub const RANK_A_PLUS_THRESHOLD: f64 = 4.5;
/// Sustainability index above which a mix ranks A.
pub const RANK_A_THRESHOLD: f64 = 3.5;
/// Sustainability index above which a mix ranks B. Anything else is C.
pub const RANK_B_THRESHOLD: f64 = 2.0;

/// Closed interval a mix field must fall in.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bound {
    pub min: f64,
    pub max: f64,
}

impl Bound {
    pub const fn new(min: f64, max: f64) -> Self {
        Bound { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Per-field input bounds (dashboard widget ranges).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixBounds {
    pub cement: Bound,
    /// Only consulted in `WaterMode::Direct`.
    pub water: Bound,
    pub natural_coarse_aggregate: Bound,
    pub natural_fine_aggregate: Bound,
    pub rca_replacement: Bound,
    pub mrca_replacement: Bound,
    pub silica_fume: Bound,
    pub fly_ash: Bound,
    pub nylon_fiber: Bound,
    pub wc_ratio: Bound,
    pub superplasticizer: Bound,
}

impl Default for MixBounds {
    fn default() -> Self {
        Self {
            cement: Bound::new(250.0, 600.0),
            water: Bound::new(100.0, 300.0),
            natural_coarse_aggregate: Bound::new(500.0, 1300.0),
            natural_fine_aggregate: Bound::new(400.0, 1000.0),
            rca_replacement: Bound::new(0.0, 100.0),
            mrca_replacement: Bound::new(0.0, 100.0),
            silica_fume: Bound::new(0.0, 100.0),
            fly_ash: Bound::new(0.0, 200.0),
            nylon_fiber: Bound::new(0.0, 5.0),
            wc_ratio: Bound::new(0.20, 0.80),
            superplasticizer: Bound::new(0.0, 15.0),
        }
    }
}

impl MixBounds {
    pub fn get(&self, field: MixField) -> Bound {
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
}

/// How the water content reaches the model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterMode {
    /// `water = wc_ratio * (cement + silica_fume + fly_ash)`.
    #[default]
    Derived,
    /// Water is entered directly; `wc_ratio` is an independent input.
    Direct,
}

/// How aggregates and additives appear in the CO2 breakdown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateAccounting {
    /// One "Aggregates" and one "Additives" entry.
    #[default]
    Combined,
    /// Coarse, fine, superplasticizer and fiber each reported separately.
    Itemized,
}

/// Per-kg factors for the seven priced/emitting materials.
/// Used both for kg CO2/kg and for currency/kg.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialFactors {
    pub cement: f64,
    pub silica_fume: f64,
    pub fly_ash: f64,
    pub coarse_aggregate: f64,
    pub fine_aggregate: f64,
    pub superplasticizer: f64,
    pub nylon_fiber: f64,
}

impl MaterialFactors {
    /// kg CO2 per kg of material.
    pub fn default_emissions() -> Self {
        Self {
            cement: 0.85,
            silica_fume: 0.02,
            fly_ash: 0.01,
            coarse_aggregate: 0.005,
            fine_aggregate: 0.005,
            superplasticizer: 0.7,
            nylon_fiber: 2.5,
        }
    }

    /// Currency units per kg of material.
    pub fn default_costs() -> Self {
        Self {
            cement: 0.10,
            silica_fume: 0.25,
            fly_ash: 0.03,
            coarse_aggregate: 0.015,
            fine_aggregate: 0.012,
            superplasticizer: 1.5,
            nylon_fiber: 4.0,
        }
    }

    fn entries(&self) -> [(&'static str, f64); 7] {
        [
            ("cement", self.cement),
            ("silica_fume", self.silica_fume),
            ("fly_ash", self.fly_ash),
            ("coarse_aggregate", self.coarse_aggregate),
            ("fine_aggregate", self.fine_aggregate),
            ("superplasticizer", self.superplasticizer),
            ("nylon_fiber", self.nylon_fiber),
        ]
    }
}

/// Strict lower bounds of each rank.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankThresholds {
    pub a_plus: f64,
    pub a: f64,
    pub b: f64,
}

impl Default for RankThresholds {
    fn default() -> Self {
        Self {
            a_plus: RANK_A_PLUS_THRESHOLD,
            a: RANK_A_THRESHOLD,
            b: RANK_B_THRESHOLD,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    pub bounds: MixBounds,
    pub water_mode: WaterMode,
    #[serde(default = "MaterialFactors::default_emissions")]
    pub emission_factors: MaterialFactors,
    #[serde(default = "MaterialFactors::default_costs")]
    pub unit_costs: MaterialFactors,
    pub aggregate_accounting: AggregateAccounting,
    pub rank_thresholds: RankThresholds,
    /// Number of nearest lab mixes to report.
    pub benchmark_k: usize,
    /// Predicted strengths below this raise a WARNING event (MPa).
    pub low_strength_warning_mpa: f64,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            bounds: MixBounds::default(),
            water_mode: WaterMode::Derived,
            emission_factors: MaterialFactors::default_emissions(),
            unit_costs: MaterialFactors::default_costs(),
            aggregate_accounting: AggregateAccounting::Combined,
            rank_thresholds: RankThresholds::default(),
            benchmark_k: DEFAULT_BENCHMARK_K,
            low_strength_warning_mpa: 20.0,
        }
    }
}

impl EvaluatorConfig {
    /// Parse a JSON config; absent keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let config: EvaluatorConfig = serde_json::from_str(json).map_err(|source| LoadError::Json {
            what: "evaluator config",
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        info!(path = %path.display(), water_mode = ?config.water_mode, "loaded evaluator config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for field in MixField::FEATURE_ORDER {
            let bound = self.bounds.get(field);
            if !(bound.min.is_finite() && bound.max.is_finite()) || bound.min > bound.max || bound.min < 0.0 {
                return Err(ConfigError::InvalidBound {
                    field,
                    min: bound.min,
                    max: bound.max,
                });
            }
        }

        for (table, factors) in [
            ("emission", &self.emission_factors),
            ("cost", &self.unit_costs),
        ] {
            for (material, value) in factors.entries() {
                if !value.is_finite() || value < 0.0 {
                    return Err(ConfigError::InvalidFactor {
                        table,
                        material,
                        value,
                    });
                }
            }
        }

        let t = &self.rank_thresholds;
        let finite = t.a_plus.is_finite() && t.a.is_finite() && t.b.is_finite();
        if !finite || !(t.a_plus > t.a && t.a > t.b) {
            return Err(ConfigError::InvalidRankThresholds {
                a_plus: t.a_plus,
                a: t.a,
                b: t.b,
            });
        }

        if self.benchmark_k == 0 {
            return Err(ConfigError::ZeroBenchmarkK);
        }
        Ok(())
    }
}
