// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//
// SmartMix — MixKernel: evaluation orchestrator
//
// This file is part of SmartMix, developed by Santhosh Shyamsundar, Prabhu S., and Studio Tyto.
// For licensing terms, see the LICENSE file in the project root.

// ============================================================================
// MixKernel: one entry point for the presentation layer
// ============================================================================
// Holds the long-lived read-only assets (scaler, predictor, lab table,
// config), built once at startup. `assess` turns one raw mix into a
// serialisable MixReport plus validation events.
// ============================================================================

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;

use crate::config::{EvaluatorConfig, WaterMode};
use crate::error::{BenchmarkError, ConfigError, EvaluationError, LoadError};
use crate::evaluator::{evaluate, PredictionResult};
use crate::mix::{MixDesign, MixInput};
use crate::model::{load_predictor, load_scaler, ModelArtifact, Predictor, Scaler, ScalerArtifact};
use crate::reference::ReferenceMixTable;
use crate::science::benchmark::BenchmarkResult;
use crate::science::mechanics::{MechanicalEstimate, MechanicsEngine};
use crate::science::performance::PerformanceProfile;
use crate::science::sustainability::{EnvironmentalMetrics, SustainabilityScore};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationEvent {
    pub topic: String,
    pub message: String,
    pub severity: Severity,
}

impl ValidationEvent {
    fn new(topic: &str, message: String, severity: Severity) -> Self {
        ValidationEvent {
            topic: topic.to_string(),
            message,
            severity,
        }
    }
}

pub const TOPIC_STRENGTH: &str = "MIX.STRENGTH";
pub const TOPIC_SUSTAINABILITY: &str = "MIX.SUSTAINABILITY";
pub const TOPIC_INPUT: &str = "MIX.INPUT";
pub const TOPIC_BENCHMARK: &str = "MIX.BENCHMARK";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MixReport {
    pub prediction: PredictionResult,
    pub mechanics: MechanicalEstimate,
    pub environment: EnvironmentalMetrics,
    pub sustainability: SustainabilityScore,
    pub performance: PerformanceProfile,
    pub benchmark: Vec<BenchmarkResult>,
    /// SHA-256 of the feature vector, for caching and audit.
    pub fingerprint: String,
    pub events: Vec<ValidationEvent>,
    pub compute_time_ms: f32,
}

/// Files making up a deployment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetPaths {
    pub scaler: PathBuf,
    pub model: PathBuf,
    pub table: PathBuf,
    pub config: Option<PathBuf>,
}

pub struct MixKernel {
    config: EvaluatorConfig,
    scaler: Box<dyn Scaler>,
    predictor: Box<dyn Predictor>,
    table: ReferenceMixTable,
}

impl fmt::Debug for MixKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MixKernel")
            .field("config", &self.config)
            .field("table_rows", &self.table.len())
            .finish_non_exhaustive()
    }
}

impl MixKernel {
    pub fn new(
        config: EvaluatorConfig,
        scaler: Box<dyn Scaler>,
        predictor: Box<dyn Predictor>,
        table: ReferenceMixTable,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(MixKernel {
            config,
            scaler,
            predictor,
            table,
        })
    }

    /// Startup phase: read every asset from disk. Any failure is fatal.
    pub fn load(paths: &AssetPaths) -> Result<Self, LoadError> {
        let config = match &paths.config {
            Some(path) => EvaluatorConfig::from_path(path)?,
            None => EvaluatorConfig::default(),
        };
        let scaler = load_scaler(&paths.scaler)?;
        let predictor = load_predictor(&paths.model)?;
        let table = ReferenceMixTable::from_path(&paths.table)?;
        info!(rows = table.len(), "mix kernel ready");
        Ok(Self::new(config, Box::new(scaler), predictor, table)?)
    }

    /// Build from in-memory artifacts (the WASM host fetches the files).
    pub fn from_artifacts(
        scaler_json: &str,
        model_json: &str,
        table_text: &str,
        config_json: Option<&str>,
    ) -> Result<Self, LoadError> {
        let config = match config_json {
            Some(json) => EvaluatorConfig::from_json(json)?,
            None => EvaluatorConfig::default(),
        };
        let scaler = ScalerArtifact::from_json(scaler_json)?.into_scaler()?;
        let predictor = ModelArtifact::from_json(model_json)?.into_predictor()?;
        let table = ReferenceMixTable::from_text(table_text)?;
        Ok(Self::new(config, Box::new(scaler), predictor, table)?)
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    pub fn table(&self) -> &ReferenceMixTable {
        &self.table
    }

    pub fn scaler(&self) -> &dyn Scaler {
        self.scaler.as_ref()
    }

    pub fn predictor(&self) -> &dyn Predictor {
        self.predictor.as_ref()
    }

    /// Validate, evaluate and benchmark one mix.
    pub fn assess(&self, input: &MixInput) -> Result<MixReport, EvaluationError> {
        let start = instant::Instant::now();
        let mut events = Vec::new();

        if self.config.water_mode == WaterMode::Derived {
            if let Some(water) = input.water {
                warn!(water, "water supplied in derived mode, ignoring");
                events.push(ValidationEvent::new(
                    TOPIC_INPUT,
                    format!(
                        "Supplied water ({:.1} kg/m3) ignored: water is derived from w/c ratio",
                        water
                    ),
                    Severity::Warning,
                ));
            }
        }

        let mix = MixDesign::from_input(input, &self.config)?;
        let evaluation = evaluate(&mix, self.predictor(), self.scaler(), &self.config)?;
        let strength = evaluation.prediction.strength;

        if strength < self.config.low_strength_warning_mpa {
            events.push(ValidationEvent::new(
                TOPIC_STRENGTH,
                format!("Low 28d Strength: {:.1} MPa", strength),
                Severity::Warning,
            ));
        }

        if let Some(EvaluationError::DegenerateRatio {
            total_co2,
            total_cost,
        }) = &evaluation.degenerate
        {
            events.push(ValidationEvent::new(
                TOPIC_SUSTAINABILITY,
                format!(
                    "Sustainability index undefined (CO2 {:.1} x cost {:.2} = 0); reported as 0.0 / C",
                    total_co2, total_cost
                ),
                Severity::Warning,
            ));
        }

        let mechanics = MechanicsEngine::estimate(strength)?;
        let performance = PerformanceProfile::compute(strength, &evaluation.environment, &mix);

        let k = self.config.benchmark_k;
        let benchmark = match self.table.nearest(strength, k) {
            Ok(rows) => {
                if rows.len() < k {
                    events.push(ValidationEvent::new(
                        TOPIC_BENCHMARK,
                        format!("Only {} of {} reference mixes available", rows.len(), k),
                        Severity::Info,
                    ));
                }
                rows
            }
            Err(BenchmarkError::EmptyTable) => {
                warn!("reference table is empty, benchmark skipped");
                events.push(ValidationEvent::new(
                    TOPIC_BENCHMARK,
                    "Reference table is empty; no benchmark available".to_string(),
                    Severity::Warning,
                ));
                Vec::new()
            }
            // Strength was checked finite by the evaluator.
            Err(BenchmarkError::InvalidQuery { strength }) => {
                return Err(EvaluationError::NonFinitePrediction { strength })
            }
        };

        let fingerprint = mix.fingerprint();
        debug!(%fingerprint, events = events.len(), "mix assessed");

        Ok(MixReport {
            prediction: evaluation.prediction,
            mechanics,
            environment: evaluation.environment,
            sustainability: evaluation.sustainability,
            performance,
            benchmark,
            fingerprint,
            events,
            compute_time_ms: start.elapsed().as_secs_f32() * 1000.0,
        })
    }

    /// `assess` on a JSON object of mix fields.
    pub fn assess_json(&self, mix_json: &str) -> Result<MixReport, EvaluationError> {
        self.assess(&MixInput::from_json(mix_json)?)
    }
}

// ============================================================================
// WASM bridge
// ============================================================================

#[wasm_bindgen]
pub struct WasmMixKernel {
    inner: MixKernel,
}

fn to_js_error(err: impl fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

impl WasmMixKernel {
    pub fn kernel(&self) -> &MixKernel {
        &self.inner
    }
}

#[wasm_bindgen]
impl WasmMixKernel {
    #[wasm_bindgen(constructor)]
    pub fn new(
        scaler_json: &str,
        model_json: &str,
        table_text: &str,
        config_json: Option<String>,
    ) -> Result<WasmMixKernel, JsValue> {
        let inner = MixKernel::from_artifacts(scaler_json, model_json, table_text, config_json.as_deref())
            .map_err(to_js_error)?;
        Ok(WasmMixKernel { inner })
    }

    /// Evaluate a mix given as JSON.
    ///
    /// # Returns
    /// The `MixReport` as JSON, or `{"error": "...", "field": "..."}` when the
    /// mix is rejected. `field` is present only for invalid inputs.
    pub fn evaluate(&self, mix_json: &str) -> String {
        match self.inner.assess_json(mix_json) {
            Ok(report) => serde_json::to_string(&report).unwrap_or_default(),
            Err(err) => {
                let mut body = serde_json::json!({ "error": err.to_string() });
                if let EvaluationError::InvalidInput { field, .. } = &err {
                    body["field"] = serde_json::Value::from(field.key());
                }
                body.to_string()
            }
        }
    }

    /// Evaluate a mix given as a JS object; returns the report object.
    #[wasm_bindgen(js_name = evaluateObject)]
    pub fn evaluate_object(&self, mix: JsValue) -> Result<JsValue, JsValue> {
        let value: serde_json::Value = serde_wasm_bindgen::from_value(mix).map_err(to_js_error)?;
        let input = MixInput::from_value(&value).map_err(to_js_error)?;
        let report = self.inner.assess(&input).map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&report).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = referenceCount)]
    pub fn reference_count(&self) -> usize {
        self.inner.table().len()
    }
}
