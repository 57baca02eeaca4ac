// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//! Closed-form formulas used by the evaluation pipeline.
//!
//! Pure scalar functions. Anything that can be undefined for a given input
//! returns an error rather than a NaN.
//!
//! References:
//! - ACI 318: Elastic modulus, E = 4700·sqrt(f'c) MPa
//! - ACI 363R: Splitting tensile strength, f_sp ≈ 0.55·sqrt(f'c)

use crate::error::{EvaluationError, Result};

/// Splitting tensile coefficient (MPa^0.5).
pub const SPLIT_TENSILE_COEFFICIENT: f64 = 0.55;

/// Elastic modulus coefficient (GPa per MPa^0.5).
pub const ELASTIC_MODULUS_COEFFICIENT: f64 = 4.7;

/// Scale applied to `strength / (co2 * cost)` so typical mixes land in 0-6.
pub const SUSTAINABILITY_INDEX_SCALE: f64 = 1000.0;

// ============================================================================
// MECHANICAL ESTIMATES
// ============================================================================

fn checked_sqrt_strength(fc: f64) -> Result<f64> {
    if fc.is_nan() || fc.is_infinite() {
        return Err(EvaluationError::NonFinitePrediction { strength: fc });
    }
    if fc < 0.0 {
        return Err(EvaluationError::NegativeStrength { strength: fc });
    }
    Ok(fc.sqrt())
}

/// Splitting tensile strength estimate
///
/// f_sp = 0.55 * sqrt(f_c)
///
/// # Arguments
/// * `fc` - Compressive strength in MPa
///
/// # Returns
/// Splitting tensile strength in MPa
pub fn split_tensile_strength(fc: f64) -> Result<f64> {
    Ok(SPLIT_TENSILE_COEFFICIENT * checked_sqrt_strength(fc)?)
}

/// ACI 318 Elastic Modulus
///
/// E = 4.7 * sqrt(f_c) GPa
///
/// # Arguments
/// * `fc` - Compressive strength in MPa
///
/// # Returns
/// Elastic modulus in GPa
pub fn aci_elastic_modulus(fc: f64) -> Result<f64> {
    Ok(ELASTIC_MODULUS_COEFFICIENT * checked_sqrt_strength(fc)?)
}

// ============================================================================
// SUSTAINABILITY
// ============================================================================

/// Composite sustainability index
///
/// index = strength / (total_co2 * total_cost) * 1000
///
/// Fails with `DegenerateRatio` when the denominator is zero.
pub fn sustainability_index(strength: f64, total_co2: f64, total_cost: f64) -> Result<f64> {
    let denominator = total_co2 * total_cost;
    if denominator == 0.0 {
        return Err(EvaluationError::DegenerateRatio {
            total_co2,
            total_cost,
        });
    }
    Ok(strength / denominator * SUSTAINABILITY_INDEX_SCALE)
}

// ============================================================================
// TESTS
// ============================================================================
