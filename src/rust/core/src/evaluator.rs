// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//
// SmartMix — Mix Evaluator
//
// ============================================================================
// Pure pipeline: features -> scaler -> predictor -> strength
//                raw mix  -> CO2 / cost -> index -> rank
// ============================================================================
// No I/O and no shared state. The predictor and scaler are borrowed, so one
// loaded model serves any number of concurrent evaluations.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EvaluatorConfig;
use crate::error::{EvaluationError, Result};
use crate::mix::MixDesign;
use crate::model::{Predictor, Scaler};
use crate::science::sustainability::{EnvironmentalMetrics, SustainabilityEngine, SustainabilityScore};

/// Predicted 28-day compressive strength and the mix it was computed from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub strength: f64, // MPa
    pub provenance: MixDesign,
}

/// Output of [`evaluate`].
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    pub prediction: PredictionResult,
    pub environment: EnvironmentalMetrics,
    pub sustainability: SustainabilityScore,
    /// Set when the index denominator was zero and `sustainability` holds
    /// the sentinel score.
    pub degenerate: Option<EvaluationError>,
}

/// Scale the mix features and run the predictor.
///
/// A NaN, infinite or negative output is rejected; nothing downstream can
/// make sense of it.
pub fn predict_strength(mix: &MixDesign, predictor: &dyn Predictor, scaler: &dyn Scaler) -> Result<f64> {
    let scaled = scaler.transform(&mix.features());
    let strength = predictor.predict(&scaled);
    if !strength.is_finite() {
        return Err(EvaluationError::NonFinitePrediction { strength });
    }
    if strength < 0.0 {
        return Err(EvaluationError::NegativeStrength { strength });
    }
    Ok(strength)
}

/// Run the full pipeline on one mix.
///
/// The mix is re-validated against `config` first, so a `MixDesign` built
/// by hand or deserialised still fails with `InvalidInput` when a field is
/// out of bounds or derived water disagrees with `wc_ratio`.
pub fn evaluate(
    mix: &MixDesign,
    predictor: &dyn Predictor,
    scaler: &dyn Scaler,
    config: &EvaluatorConfig,
) -> Result<Evaluation> {
    mix.validate(config)?;
    let strength = predict_strength(mix, predictor, scaler)?;
    debug!(strength, "strength predicted");

    let environment = SustainabilityEngine::compute_metrics(mix, config);
    debug!(
        total_co2 = environment.total_co2,
        total_cost = environment.total_cost,
        "environmental metrics computed"
    );

    let (sustainability, degenerate) =
        SustainabilityEngine::score_or_sentinel(strength, &environment, &config.rank_thresholds);
    debug!(index = sustainability.index, rank = %sustainability.rank, "mix ranked");

    Ok(Evaluation {
        prediction: PredictionResult {
            strength,
            provenance: mix.clone(),
        },
        environment,
        sustainability,
        degenerate,
    })
}
